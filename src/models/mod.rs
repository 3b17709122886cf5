//! Persistent models.
//!
//! Nested document parts (`color`, `display`, `logo`, `v_card`) live in JSONB
//! columns and keep their JSON field names, so the stored shape is the same
//! shape the API serves.

/// Implements JSONB `FromSql`/`ToSql` through serde for document types that
/// derive `AsExpression` and `FromSqlRow` with `sql_type = Jsonb`.
macro_rules! jsonb_document {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl diesel::deserialize::FromSql<diesel::sql_types::Jsonb, diesel::pg::Pg> for $ty {
                fn from_sql(bytes: diesel::pg::PgValue<'_>) -> diesel::deserialize::Result<Self> {
                    let value = <serde_json::Value as diesel::deserialize::FromSql<
                        diesel::sql_types::Jsonb,
                        diesel::pg::Pg,
                    >>::from_sql(bytes)?;
                    Ok(serde_json::from_value(value)?)
                }
            }

            impl diesel::serialize::ToSql<diesel::sql_types::Jsonb, diesel::pg::Pg> for $ty {
                fn to_sql<'b>(
                    &'b self,
                    out: &mut diesel::serialize::Output<'b, '_, diesel::pg::Pg>,
                ) -> diesel::serialize::Result {
                    let value = serde_json::to_value(self)?;
                    <serde_json::Value as diesel::serialize::ToSql<
                        diesel::sql_types::Jsonb,
                        diesel::pg::Pg,
                    >>::to_sql(&value, &mut out.reborrow())
                }
            }
        )+
    };
}

mod theme;
mod user;

pub use theme::{
    FontColors, HEX_COLOR, LogoFormat, LogoOptionsUpdate, LogoSize, MAX_THEME_NAME_LEN, NewTheme,
    SocialIconColors, Theme, ThemeChangeset, ThemeColor, ThemeDisplay, ThemeLogo,
    ThemeOptionsUpdate, ThemeSummary, VCardButtonColors,
};
pub use user::{NewUser, UpdateUser, User, UserRole, VCard};
