//! PostgreSQL functions exposed to the diesel query builder.

use diesel::define_sql_function;
use diesel::sql_types::{Array, Jsonb, Text};

define_sql_function! {
    /// `jsonb_set(target, path, new_value)`: replaces the value at `path`
    /// inside `target`, leaving sibling keys untouched.
    #[sql_name = "jsonb_set"]
    fn jsonb_set_path(target: Jsonb, path: Array<Text>, new_value: Jsonb) -> Jsonb;
}
