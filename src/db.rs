//! Execution gateway for PostgreSQL
//!
//! Opens one short-lived session per call with a server-side
//! statement_timeout, so a runaway query is cancelled by the database
//! itself rather than abandoned by the caller. Sessions are owned by a
//! single call and never shared or reused; dropping the client closes
//! the connection on every exit path.

use std::time::Instant;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tokio_postgres::types::{FromSql, Kind, Type};
use tokio_postgres::{Client, NoTls, Row};

use crate::config::DbConfig;
use crate::types::{ColumnInfo, DbError, DbStatus};

const LIST_TABLES_SQL: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = $1 AND table_type = 'BASE TABLE' ORDER BY table_name";

const LIST_COLUMNS_SQL: &str = "SELECT column_name, data_type, is_nullable \
     FROM information_schema.columns \
     WHERE table_schema = $1 AND table_name = $2 ORDER BY ordinal_position";

/// Gateway that executes statements against the configured database
#[derive(Clone)]
pub struct DbGateway {
    config: DbConfig,
}

impl DbGateway {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    /// Open a session for a single call.
    ///
    /// Runs in autocommit mode; every operation here is a single
    /// read-only statement, so no transaction is opened.
    async fn connect(&self) -> Result<Client, DbError> {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.config.host)
            .port(self.config.port)
            .dbname(&self.config.dbname)
            .user(&self.config.user)
            .password(&self.config.password)
            .options(&format!(
                "-c statement_timeout={}",
                self.config.statement_timeout_ms
            ));

        let (client, connection) = pg
            .connect(NoTls)
            .await
            .map_err(|e| DbError::Connection(e.to_string()))?;

        // The connection task drives the socket and ends once the
        // client is dropped.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!("connection closed with error: {}", e);
            }
        });

        Ok(client)
    }

    /// Connectivity check: database name, current user, round-trip latency
    pub async fn ping(&self) -> Result<DbStatus, DbError> {
        let started = Instant::now();
        let client = self.connect().await?;
        let row = client
            .query_one("SELECT current_database(), current_user", &[])
            .await
            .map_err(|e| DbError::Execution(e.to_string()))?;

        Ok(DbStatus {
            ok: true,
            db: row.get(0),
            user: row.get(1),
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Base tables of a schema, via a fixed parameterized catalog query
    pub async fn list_tables(&self, schema: &str) -> Result<Vec<String>, DbError> {
        let client = self.connect().await?;
        let rows = client
            .query(LIST_TABLES_SQL, &[&schema])
            .await
            .map_err(|e| DbError::Execution(e.to_string()))?;

        Ok(rows.iter().map(|r| r.get(0)).collect())
    }

    /// Columns of a table in physical order, via a fixed parameterized
    /// catalog query
    pub async fn list_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnInfo>, DbError> {
        let client = self.connect().await?;
        let rows = client
            .query(LIST_COLUMNS_SQL, &[&schema, &table])
            .await
            .map_err(|e| DbError::Execution(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|r| ColumnInfo {
                column_name: r.get(0),
                data_type: r.get(1),
                is_nullable: r.get(2),
            })
            .collect())
    }

    /// Execute one validated, limit-bearing statement and collect the
    /// full result set as column-name-to-value maps.
    pub async fn run_query(&self, sql: &str) -> Result<Vec<Map<String, Value>>, DbError> {
        let client = self.connect().await?;
        let rows = client
            .query(sql, &[])
            .await
            .map_err(|e| DbError::Execution(e.to_string()))?;

        rows.iter().map(row_to_map).collect()
    }
}

/// Convert one row into an ordered column-name-to-value map
fn row_to_map(row: &Row) -> Result<Map<String, Value>, DbError> {
    let mut map = Map::new();
    for (idx, col) in row.columns().iter().enumerate() {
        map.insert(col.name().to_string(), cell_to_value(row, idx, col.type_())?);
    }
    Ok(map)
}

/// Decode a single cell into a JSON value.
///
/// Covers the shapes a read query can return: booleans, integers,
/// floats, text, numerics and temporal types (rendered as strings),
/// enum labels, and json passthrough. NULL in any column maps to JSON
/// null. A column of any other type is an execution error naming the
/// type.
fn cell_to_value(row: &Row, idx: usize, ty: &Type) -> Result<Value, DbError> {
    let value = match *ty {
        Type::BOOL => row
            .try_get::<_, Option<bool>>(idx)
            .map(|v| v.map(Value::Bool).unwrap_or(Value::Null)),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)
            .map(|v| v.map(|n| Value::from(n as i64)).unwrap_or(Value::Null)),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(idx)
            .map(|v| v.map(|n| Value::from(n as i64)).unwrap_or(Value::Null)),
        Type::INT8 => row
            .try_get::<_, Option<i64>>(idx)
            .map(|v| v.map(Value::from).unwrap_or(Value::Null)),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)
            .map(|v| v.map(|n| Value::from(n as f64)).unwrap_or(Value::Null)),
        Type::FLOAT8 => row
            .try_get::<_, Option<f64>>(idx)
            .map(|v| v.map(Value::from).unwrap_or(Value::Null)),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => row
            .try_get::<_, Option<String>>(idx)
            .map(|v| v.map(Value::String).unwrap_or(Value::Null)),
        Type::TIMESTAMP => row
            .try_get::<_, Option<chrono::NaiveDateTime>>(idx)
            .map(|v| v.map(|t| Value::String(t.to_string())).unwrap_or(Value::Null)),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)
            .map(|v| v.map(|t| Value::String(t.to_rfc3339())).unwrap_or(Value::Null)),
        Type::DATE => row
            .try_get::<_, Option<chrono::NaiveDate>>(idx)
            .map(|v| v.map(|d| Value::String(d.to_string())).unwrap_or(Value::Null)),
        Type::NUMERIC => row
            .try_get::<_, Option<Decimal>>(idx)
            .map(|v| v.map(|d| Value::String(d.to_string())).unwrap_or(Value::Null)),
        Type::JSON | Type::JSONB => row
            .try_get::<_, Option<Value>>(idx)
            .map(|v| v.unwrap_or(Value::Null)),
        // Enum labels are their text representation on the wire
        _ if matches!(ty.kind(), Kind::Enum(_)) => row
            .try_get::<_, Option<EnumLabel>>(idx)
            .map(|v| v.map(|l| Value::String(l.0)).unwrap_or(Value::Null)),
        // Last resort: anything with a text representation
        _ => row
            .try_get::<_, Option<String>>(idx)
            .map(|v| v.map(Value::String).unwrap_or(Value::Null)),
    }
    .map_err(|e| DbError::Execution(format!("unsupported column type {}: {}", ty, e)))?;

    Ok(value)
}

/// Text of an enum-typed cell; `String` itself only accepts the
/// text-family types, so user enums need their own decoder.
struct EnumLabel(String);

impl<'a> FromSql<'a> for EnumLabel {
    fn from_sql(
        _ty: &Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Ok(EnumLabel(std::str::from_utf8(raw)?.to_string()))
    }

    fn accepts(ty: &Type) -> bool {
        matches!(ty.kind(), Kind::Enum(_))
    }
}
