//! Tool handlers
//!
//! Each handler runs the guard where caller SQL is involved, delegates
//! to the gateway, and shapes the JSON response. The catalog tools use
//! fixed parameterized SQL and bypass the guard entirely.

use rmcp::model::{CallToolResult, Content};
use rmcp::ErrorData as McpError;
use serde::Serialize;

use crate::db::DbGateway;
use crate::guard;
use crate::params::{ColumnsParams, QueryParams, TablesParams};
use crate::types::{ColumnList, DbError, QueryOutput, TableList};

fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn db_error_to_mcp(err: DbError) -> McpError {
    if err.is_validation() {
        McpError::invalid_params(err.to_string(), None)
    } else {
        McpError::internal_error(err.to_string(), None)
    }
}

pub async fn check_db_status(gateway: &DbGateway) -> Result<CallToolResult, McpError> {
    let status = gateway.ping().await.map_err(db_error_to_mcp)?;
    json_success(&status)
}

pub async fn list_tables(
    gateway: &DbGateway,
    params: TablesParams,
) -> Result<CallToolResult, McpError> {
    let tables = gateway
        .list_tables(&params.schema)
        .await
        .map_err(db_error_to_mcp)?;

    json_success(&TableList {
        schema: params.schema,
        tables,
    })
}

pub async fn list_columns(
    gateway: &DbGateway,
    params: ColumnsParams,
) -> Result<CallToolResult, McpError> {
    let columns = gateway
        .list_columns(&params.schema, &params.table)
        .await
        .map_err(db_error_to_mcp)?;

    json_success(&ColumnList {
        schema: params.schema,
        table: params.table,
        columns,
    })
}

pub async fn sql_query(
    gateway: &DbGateway,
    params: QueryParams,
) -> Result<CallToolResult, McpError> {
    // Validation happens before any connection is opened
    let validated = guard::validate(&params.query).map_err(db_error_to_mcp)?;
    let sql = guard::apply_limit(validated, params.limit);

    tracing::debug!(limit = params.limit, "executing guarded query");

    let rows = gateway.run_query(&sql).await.map_err(db_error_to_mcp)?;

    json_success(&QueryOutput {
        ok: true,
        row_count: rows.len(),
        rows,
        applied_limit: params.limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_map_to_invalid_params() {
        let err = db_error_to_mcp(DbError::MultipleStatements);
        assert!(err.message.contains("one statement"));

        let err = db_error_to_mcp(DbError::EmptyQuery);
        assert!(err.message.contains("empty"));
    }

    #[test]
    fn test_execution_errors_carry_database_message() {
        let err = db_error_to_mcp(DbError::Execution(
            "canceling statement due to statement timeout".to_string(),
        ));
        assert!(err.message.contains("statement timeout"));
    }
}
