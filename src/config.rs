//! Database connection settings sourced from the environment

/// Connection settings for the target PostgreSQL database
///
/// Built once at startup and passed into the gateway; nothing in the
/// core reads the environment after that.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    /// Server-side statement timeout in milliseconds
    pub statement_timeout_ms: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            dbname: "pagila".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            statement_timeout_ms: 5000,
        }
    }
}

impl DbConfig {
    /// Create config from environment variables
    ///
    /// Recognized: `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`,
    /// `DB_PASSWORD`, `DB_STATEMENT_TIMEOUT_MS`. Unset or unparseable
    /// values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("DB_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("DB_PORT") {
            if let Ok(p) = port.parse() {
                config.port = p;
            }
        }
        if let Ok(dbname) = std::env::var("DB_NAME") {
            config.dbname = dbname;
        }
        if let Ok(user) = std::env::var("DB_USER") {
            config.user = user;
        }
        if let Ok(password) = std::env::var("DB_PASSWORD") {
            config.password = password;
        }
        if let Ok(timeout) = std::env::var("DB_STATEMENT_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                config.statement_timeout_ms = t;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "pagila");
        assert_eq!(config.user, "postgres");
        assert!(config.password.is_empty());
        assert_eq!(config.statement_timeout_ms, 5000);
    }
}
