//! Postgres MCP Library
//!
//! Guarded read-only query tools for PostgreSQL. Caller-supplied SQL
//! passes a lexical safety gate (single statement, SELECT/WITH only,
//! forbidden-operation scan) and picks up an implicit row limit before
//! it reaches the database. Each tool call runs on its own short-lived
//! session with a server-side statement timeout.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use postgres_mcp::PostgresMcpServer;
//!
//! let server = PostgresMcpServer::new();
//! // Use with in-memory transport or serve via stdio
//! ```

pub mod config;
pub mod db;
pub mod guard;
pub mod handlers;
pub mod params;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::PostgresMcpServer;

// Re-export parameter types for direct API usage
pub use params::*;
