//! SurrealDB connection management.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Connection settings for the Rentora database.
///
/// Built from `RENTORA_DB_*` environment variables in deployments; the
/// defaults point at a local development instance.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials for authentication.
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "rentora".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Read the configuration from `RENTORA_DB_*` environment variables,
    /// keeping the default for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: get("RENTORA_DB_URL").unwrap_or(defaults.url),
            namespace: get("RENTORA_DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: get("RENTORA_DB_NAME").unwrap_or(defaults.database),
            username: get("RENTORA_DB_USER").unwrap_or(defaults.username),
            password: get("RENTORA_DB_PASS").unwrap_or(defaults.password),
        }
    }
}

/// An authenticated SurrealDB connection scoped to the Rentora database.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, authenticate as root and select the configured namespace
    /// and database.
    pub async fn connect(config: DbConfig) -> Result<Self, DbError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username,
            password: config.password,
        })
        .await?;

        db.use_ns(config.namespace).use_db(config.database).await?;

        info!("Successfully connected to SurrealDB");

        Ok(Self { db })
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }

    /// Consumes the manager, handing the client to the repositories.
    pub fn into_client(self) -> Surreal<Client> {
        self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_overrides_defaults_per_variable() {
        let config = DbConfig::from_lookup(|key| match key {
            "RENTORA_DB_URL" => Some("db.internal:9000".into()),
            "RENTORA_DB_NAMESPACE" => Some("staging".into()),
            _ => None,
        });

        assert_eq!(config.url, "db.internal:9000");
        assert_eq!(config.namespace, "staging");
        assert_eq!(config.database, "main");
        assert_eq!(config.username, "root");
        assert_eq!(config.password, "root");
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = DbConfig::from_lookup(|_| None);
        assert_eq!(config.namespace, "rentora");
        assert_eq!(config.database, "main");
    }
}
