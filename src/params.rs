//! Parameter types for the Postgres MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_schema() -> String {
    "public".to_string()
}

fn default_limit() -> u32 {
    200
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct QueryParams {
    #[schemars(description = "SQL query to execute: a single SELECT (or WITH ... SELECT) statement")]
    pub query: String,

    #[schemars(description = "Maximum rows to return when the query has no LIMIT clause (default 200)")]
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TablesParams {
    #[schemars(description = "Schema to list tables from (default 'public')")]
    #[serde(default = "default_schema")]
    pub schema: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ColumnsParams {
    #[schemars(description = "Name of the table to describe")]
    pub table: String,

    #[schemars(description = "Schema containing the table (default 'public')")]
    #[serde(default = "default_schema")]
    pub schema: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_default_limit() {
        let params: QueryParams = serde_json::from_str(r#"{"query": "select 1"}"#).unwrap();
        assert_eq!(params.limit, 200);
    }

    #[test]
    fn test_query_params_reject_non_integer_limit() {
        let result = serde_json::from_str::<QueryParams>(r#"{"query": "select 1", "limit": "20; drop"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_defaults_to_public() {
        let tables: TablesParams = serde_json::from_str("{}").unwrap();
        assert_eq!(tables.schema, "public");

        let columns: ColumnsParams = serde_json::from_str(r#"{"table": "payment"}"#).unwrap();
        assert_eq!(columns.schema, "public");
        assert_eq!(columns.table, "payment");
    }
}
