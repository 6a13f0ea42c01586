//! Type definitions for the Postgres MCP server

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

// ============================================================================
// Response Types
// ============================================================================

/// Result of a connectivity check
#[derive(Debug, Serialize)]
pub struct DbStatus {
    pub ok: bool,
    pub db: String,
    pub user: String,
    pub latency_ms: u64,
}

/// Base tables of a schema, ordered by name
#[derive(Debug, Serialize)]
pub struct TableList {
    pub schema: String,
    pub tables: Vec<String>,
}

/// One column as reported by information_schema
#[derive(Debug, Serialize)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    /// 'YES' or 'NO', verbatim from information_schema.columns
    pub is_nullable: String,
}

/// Columns of a table in physical (ordinal_position) order
#[derive(Debug, Serialize)]
pub struct ColumnList {
    pub schema: String,
    pub table: String,
    pub columns: Vec<ColumnInfo>,
}

/// Rows returned by a guarded query
///
/// Each row is an ordered column-name-to-value map; the column set
/// varies per query, so there is no fixed record type.
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub ok: bool,
    pub row_count: usize,
    pub rows: Vec<Map<String, Value>>,
    pub applied_limit: u32,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum DbError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("only one statement is allowed; remove the ';'")]
    MultipleStatements,

    #[error("only SELECT (or WITH ... SELECT) queries are allowed")]
    DisallowedStatementType,

    #[error("query rejected: contains a forbidden operation")]
    ForbiddenOperation,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("execution failed: {0}")]
    Execution(String),
}

impl DbError {
    /// Validation errors are caller mistakes caught before any I/O
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DbError::EmptyQuery
                | DbError::MultipleStatements
                | DbError::DisallowedStatementType
                | DbError::ForbiddenOperation
        )
    }
}
