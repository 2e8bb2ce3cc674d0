//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! User input is ALWAYS passed via `.bind()` parameters. Nothing in this module
//! interpolates request data into SQL text.

/// Filter expression for a case-insensitive username match.
///
/// Compares `LOWER(users.username)` with `LOWER($1)`, which is what the
/// `idx_users_username_lower` unique index covers.
///
/// # Safety
/// The username is passed via `.bind()`, not interpolated.
#[macro_export]
macro_rules! username_matches {
    ($username:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("LOWER(users.username) = LOWER(")
            .bind::<diesel::sql_types::Text, _>($username)
            .sql(")")
    };
}
