//! Literal substring matching for `LIKE`/`ILIKE` filters.

/// Escapes the `LIKE` metacharacters `\`, `%` and `_` so user input matches
/// only itself. PostgreSQL's default escape character is the backslash.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Pattern matching any value that contains `search` literally. The empty
/// search yields `%%`, which matches everything.
pub fn contains_pattern(search: &str) -> String {
    format!("%{}%", escape_like(search))
}
