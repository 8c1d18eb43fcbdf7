//! SQL statement classification.
//!
//! Decides how a statement's outcome is materialized: as a row set or as an
//! affected-row count.

/// Classifies SQL statements by the shape of their result.
pub struct SqlClassifier;

/// Statement prefixes that produce a row set when executed.
const ROW_RETURNING_PREFIXES: [&str; 8] = [
    "SELECT", "WITH", "SHOW", "VALUES", "EXPLAIN", "DESCRIBE", "DESC", "TABLE",
];

impl SqlClassifier {
    /// Returns true if the statement is expected to produce a row set.
    ///
    /// Everything else (INSERT/UPDATE/DELETE, DDL) is executed for its
    /// affected-row count.
    pub fn returns_rows(sql: &str) -> bool {
        let head = sql
            .trim_start()
            .trim_start_matches('(')
            .trim_start()
            .to_uppercase();
        ROW_RETURNING_PREFIXES.iter().any(|prefix| {
            head.strip_prefix(prefix)
                .map_or(false, |rest| {
                    rest.chars().next().map_or(true, |c| !c.is_ascii_alphanumeric())
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_returns_rows() {
        assert!(SqlClassifier::returns_rows("SELECT 1"));
        assert!(SqlClassifier::returns_rows("  select * from users"));
        assert!(SqlClassifier::returns_rows("(SELECT 1) UNION (SELECT 2)"));
    }

    #[test]
    fn test_cte_and_show_return_rows() {
        assert!(SqlClassifier::returns_rows(
            "WITH t AS (SELECT 1) SELECT * FROM t"
        ));
        assert!(SqlClassifier::returns_rows("SHOW server_version"));
        assert!(SqlClassifier::returns_rows("EXPLAIN SELECT 1"));
    }

    #[test]
    fn test_dml_does_not_return_rows() {
        assert!(!SqlClassifier::returns_rows("INSERT INTO t VALUES (1)"));
        assert!(!SqlClassifier::returns_rows("UPDATE t SET a = 1"));
        assert!(!SqlClassifier::returns_rows("DELETE FROM t"));
        assert!(!SqlClassifier::returns_rows("CREATE TABLE t (a INT)"));
    }

    #[test]
    fn test_prefix_must_end_at_a_word_boundary() {
        assert!(!SqlClassifier::returns_rows("SELECTION_LOG"));
    }
}
