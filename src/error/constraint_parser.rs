use std::sync::LazyLock;

use regex::Regex;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Constraint names follow the `{table}_{column}_{suffix}` convention used by
/// the migrations (`themes_theme_id_key`, `users_email_key`, `users_role_check`).
pub struct ConstraintParser;

/// Matches "Key (field)=(value)" in PostgreSQL detail messages
static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key/value regex"));

static COLUMN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"column "([^"]+)""#).expect("valid column regex"));

static RELATION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:relation|table) "([^"]+)""#).expect("valid relation regex")
});

const CONSTRAINT_SUFFIXES: &[&str] = &["_key", "_check", "_idx", "_fkey", "_pkey"];

impl ConstraintParser {
    /// Parses a unique constraint violation into `(entity, field, value)`.
    ///
    /// ```
    /// use vcard_rs::error::ConstraintParser;
    ///
    /// let message = "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(a@b.io) already exists.";
    /// let parsed = ConstraintParser::parse_unique_violation(message, Some("users_email_key"));
    /// assert_eq!(parsed, Some(("users".to_string(), "email".to_string(), "a@b.io".to_string())));
    /// ```
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value_from_message(message);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity =
            Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a not-null violation into `(entity, field)`.
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity = Self::extract_table_from_message(message)
            .or_else(|| constraint_name.and_then(Self::parse_constraint_name).map(|(e, _)| e))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a check constraint violation into `(entity, field)`.
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some(parsed);
        }

        let field = Self::extract_column_from_message(message)?;
        let entity =
            Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits `{table}_{column}_{suffix}` into `(table, column)`; the column
    /// keeps its inner underscores.
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;
        let (entity, field) = stem.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }

    pub fn extract_column_from_message(message: &str) -> Option<String> {
        COLUMN_NAME
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_table_from_message(message: &str) -> Option<String> {
        RELATION_NAME
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        KEY_VALUE.captures(message).and_then(|caps| {
            let field = caps.get(1)?.as_str().to_string();
            let value = caps.get(2)?.as_str().to_string();
            Some((field, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constraint_name_keeps_multi_word_columns() {
        assert_eq!(
            ConstraintParser::parse_constraint_name("themes_theme_id_key"),
            Some(("themes".to_string(), "theme_id".to_string()))
        );
        assert_eq!(
            ConstraintParser::parse_constraint_name("users_role_check"),
            Some(("users".to_string(), "role".to_string()))
        );
        assert_eq!(ConstraintParser::parse_constraint_name("nonsense"), None);
        assert_eq!(ConstraintParser::parse_constraint_name("_key"), None);
    }

    #[test]
    fn test_parse_unique_violation_for_theme_id() {
        let message = "duplicate key value violates unique constraint \"themes_theme_id_key\"\nDETAIL: Key (theme_id)=(t1) already exists.";
        let parsed = ConstraintParser::parse_unique_violation(message, Some("themes_theme_id_key"));
        assert_eq!(
            parsed,
            Some((
                "themes".to_string(),
                "theme_id".to_string(),
                "t1".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_constraint_name() {
        let message = "duplicate key value violates unique constraint on table \"users\"\nDETAIL: Key (email)=(a@b.io) already exists.";
        let parsed = ConstraintParser::parse_unique_violation(message, None);
        assert_eq!(
            parsed,
            Some(("users".to_string(), "email".to_string(), "a@b.io".to_string()))
        );
    }

    #[test]
    fn test_parse_not_null_violation() {
        let message =
            "null value in column \"name\" of relation \"themes\" violates not-null constraint";
        assert_eq!(
            ConstraintParser::parse_not_null_violation(message, None),
            Some(("themes".to_string(), "name".to_string()))
        );
    }

    #[test]
    fn test_parse_check_violation() {
        let message = "new row for relation \"users\" violates check constraint \"users_role_check\"";
        assert_eq!(
            ConstraintParser::parse_check_violation(message, Some("users_role_check")),
            Some(("users".to_string(), "role".to_string()))
        );
    }

    #[test]
    fn test_graceful_parsing_failures() {
        assert_eq!(ConstraintParser::parse_unique_violation("garbage", None), None);
        assert_eq!(ConstraintParser::parse_not_null_violation("garbage", None), None);
        assert_eq!(ConstraintParser::parse_check_violation("garbage", None), None);
    }
}
