//! MCP Server implementation
//!
//! Exposes the guarded query gateway as MCP tools. Handler logic lives
//! in the handlers module.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};

use crate::config::DbConfig;
use crate::db::DbGateway;
use crate::handlers;
use crate::params::*;

/// The Postgres MCP Server
#[derive(Clone)]
pub struct PostgresMcpServer {
    gateway: DbGateway,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PostgresMcpServer {
    /// Create a new server with settings from the environment
    pub fn new() -> Self {
        Self::with_config(DbConfig::from_env())
    }

    /// Create a new server with explicit config
    pub fn with_config(config: DbConfig) -> Self {
        tracing::info!(
            host = %config.host,
            port = config.port,
            dbname = %config.dbname,
            "configured database target"
        );

        Self {
            gateway: DbGateway::new(config),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Check database connectivity. Returns the database name, current user, and round-trip latency in milliseconds."
    )]
    async fn check_db_status(&self) -> Result<CallToolResult, McpError> {
        handlers::check_db_status(&self.gateway).await
    }

    #[tool(description = "List base tables in a schema (default 'public'), ordered by name.")]
    async fn list_tables(
        &self,
        Parameters(params): Parameters<TablesParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::list_tables(&self.gateway, params).await
    }

    #[tool(
        description = "List the columns of a table in physical order, with data type and nullability."
    )]
    async fn list_columns(
        &self,
        Parameters(params): Parameters<ColumnsParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::list_columns(&self.gateway, params).await
    }

    #[tool(
        description = "Execute a read-only SQL query. Only a single SELECT (or WITH ... SELECT) statement is accepted; a LIMIT clause is appended when the query has none (default 200 rows)."
    )]
    async fn sql_query(
        &self,
        Parameters(params): Parameters<QueryParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::sql_query(&self.gateway, params).await
    }
}

#[tool_handler]
impl rmcp::ServerHandler for PostgresMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Read-only PostgreSQL query MCP server. \
                 Use check_db_status to verify connectivity, list_tables and \
                 list_columns to explore the schema, and sql_query to run a \
                 single guarded SELECT."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

impl Default for PostgresMcpServer {
    fn default() -> Self {
        Self::new()
    }
}
