//! Query guard - safety layer in front of the database
//!
//! Validates that caller-supplied SQL is a single read statement and
//! injects a row limit when the statement does not carry one. The
//! checks are lexical: string-and-token inspection, no SQL parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::DbError;

/// Whole-word scan for operations that must never reach the database.
///
/// Runs over the entire query text, string literals and comments
/// included. Word boundaries mean `created_at` passes while a
/// standalone `create` is caught wherever it appears.
static FORBIDDEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(insert|update|delete|drop|alter|create|truncate|grant|revoke|copy|call|do)\b",
    )
    .expect("Invalid regex")
});

/// Shallow check for an existing LIMIT clause: the word `limit`
/// surrounded by whitespace, anywhere in the statement.
static HAS_LIMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\slimit\s").expect("Invalid regex"));

/// Validate caller-supplied query text.
///
/// Returns the trimmed statement on success. Checks run in a fixed
/// order and the first failure wins: empty input, statement separator,
/// leading keyword, forbidden-word scan.
pub fn validate(raw: &str) -> Result<&str, DbError> {
    let q = raw.trim();
    if q.is_empty() {
        return Err(DbError::EmptyQuery);
    }

    // Strict rejection of statement stacking, trailing ';' included.
    if q.contains(';') {
        return Err(DbError::MultipleStatements);
    }

    // A WITH prefix admits CTEs that end in a SELECT; the terminal
    // statement is not verified. Known gap, accepted.
    let first = q.split_whitespace().next().unwrap_or_default();
    if !first.eq_ignore_ascii_case("select") && !first.eq_ignore_ascii_case("with") {
        return Err(DbError::DisallowedStatementType);
    }

    if FORBIDDEN.is_match(q) {
        return Err(DbError::ForbiddenOperation);
    }

    Ok(q)
}

/// Ensure the statement carries a row limit.
///
/// If the query already contains a whitespace-delimited `limit`, the
/// caller's own clause is trusted and returned unchanged. Otherwise
/// `LIMIT <n>` is appended. The limit arrives as a typed integer, so
/// the appended clause never contains caller text.
pub fn apply_limit(q: &str, limit: u32) -> String {
    if HAS_LIMIT.is_match(q) {
        q.to_string()
    } else {
        format!("{} LIMIT {}", q.trim_end(), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_rejected() {
        assert!(matches!(validate(""), Err(DbError::EmptyQuery)));
        assert!(matches!(validate("   \n\t "), Err(DbError::EmptyQuery)));
    }

    #[test]
    fn test_semicolon_rejected_anywhere() {
        assert!(matches!(
            validate("select 1;"),
            Err(DbError::MultipleStatements)
        ));
        assert!(matches!(
            validate("select 1; select 2"),
            Err(DbError::MultipleStatements)
        ));
        assert!(matches!(
            validate(";select 1"),
            Err(DbError::MultipleStatements)
        ));
    }

    #[test]
    fn test_semicolon_checked_before_forbidden_words() {
        assert!(matches!(
            validate("select 1; create table x"),
            Err(DbError::MultipleStatements)
        ));
    }

    #[test]
    fn test_only_select_and_with_allowed() {
        assert!(matches!(
            validate("DELETE FROM film"),
            Err(DbError::DisallowedStatementType)
        ));
        assert!(matches!(
            validate("explain select 1"),
            Err(DbError::DisallowedStatementType)
        ));
        assert!(validate("SELECT 1").is_ok());
        assert!(validate("With t as (select 1) select * from t").is_ok());
    }

    #[test]
    fn test_accepted_query_is_trimmed() {
        assert_eq!(validate("  select 1  ").unwrap(), "select 1");
    }

    #[test]
    fn test_forbidden_word_rejected_case_insensitively() {
        assert!(matches!(
            validate("with t as (select 1) DELETE from film"),
            Err(DbError::ForbiddenOperation)
        ));
        assert!(matches!(
            validate("select * from t where Truncate = 1"),
            Err(DbError::ForbiddenOperation)
        ));
    }

    #[test]
    fn test_forbidden_word_inside_string_literal_still_rejected() {
        // Lexical scan, no literal parsing
        assert!(matches!(
            validate("select 'create' as x"),
            Err(DbError::ForbiddenOperation)
        ));
    }

    #[test]
    fn test_forbidden_word_embedded_in_identifier_tolerated() {
        assert!(validate("select created_at from payment").is_ok());
        assert!(validate("select last_update, dropped_frames from stats").is_ok());
    }

    #[test]
    fn test_apply_limit_appends_when_missing() {
        assert_eq!(apply_limit("select 1", 200), "select 1 LIMIT 200");
        assert_eq!(
            apply_limit("select * from film", 50),
            "select * from film LIMIT 50"
        );
    }

    #[test]
    fn test_apply_limit_keeps_existing_clause() {
        let q = "select * from film limit 5";
        assert_eq!(apply_limit(q, 200), q);

        let upper = "SELECT * FROM film LIMIT 5";
        assert_eq!(apply_limit(upper, 200), upper);

        let multiline = "select *\nfrom film\nlimit 5";
        assert_eq!(apply_limit(multiline, 200), multiline);
    }

    #[test]
    fn test_apply_limit_is_idempotent() {
        let once = apply_limit("select 1", 10);
        assert_eq!(apply_limit(&once, 99), once);
    }
}
