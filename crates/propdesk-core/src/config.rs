//! Configuration module
//!
//! Configuration is read from environment variables (a `.env` file is honoured via
//! `dotenvy`). Every setting has a default except the database URL and the settings
//! required by the selected storage backend; `validate()` enforces those.

use std::env;

use crate::constants::DEFAULT_CACHE_CONTROL;
use crate::storage_types::StorageBackend;

const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Settings shared by every entry point
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

/// Full application configuration
#[derive(Clone, Debug)]
pub struct PropdeskConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, Supabase, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload behaviour
    pub upload_cache_control: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PropdeskConfig>);

impl Config {
    fn inner(&self) -> &PropdeskConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = PropdeskConfig::from_vars(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn upload_cache_control(&self) -> &str {
        &self.inner().upload_cache_control
    }
}

impl PropdeskConfig {
    pub fn from_vars<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let database_url = non_empty("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let storage_backend = match non_empty("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let base = BaseConfig {
            db_max_connections: non_empty("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: non_empty("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
        };

        let config = PropdeskConfig {
            base,
            database_url,
            storage_backend,
            s3_bucket: non_empty("S3_BUCKET"),
            s3_region: non_empty("S3_REGION"),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            aws_region: non_empty("AWS_REGION"),
            local_storage_path: non_empty("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty("LOCAL_STORAGE_BASE_URL"),
            upload_cache_control: non_empty("UPLOAD_CACHE_CONTROL")
                .unwrap_or_else(|| DEFAULT_CACHE_CONTROL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgresql://")
            || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.base.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be at least 1"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn local_backend_defaults() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/propdesk"),
            ("LOCAL_STORAGE_PATH", "/tmp/propdesk"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:3000/files"),
        ]))
        .unwrap();

        assert_eq!(config.storage_backend(), StorageBackend::Local);
        assert_eq!(config.upload_cache_control(), "3600");
        assert_eq!(config.db_max_connections(), MAX_CONNECTIONS);
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let err = Config::from_vars(vars(&[("LOCAL_STORAGE_PATH", "/tmp")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        let err = Config::from_vars(vars(&[
            ("DATABASE_URL", "mysql://localhost/db"),
            ("LOCAL_STORAGE_PATH", "/tmp"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PostgreSQL"));
    }

    #[test]
    fn s3_backend_requires_bucket_and_region() {
        let err = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgresql://localhost/propdesk"),
            ("STORAGE_BACKEND", "s3"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));

        let err = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgresql://localhost/propdesk"),
            ("STORAGE_BACKEND", "s3"),
            ("S3_BUCKET", "files"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("S3_REGION"));

        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgresql://localhost/propdesk"),
            ("STORAGE_BACKEND", "s3"),
            ("S3_BUCKET", "files"),
            ("AWS_REGION", "eu-west-1"),
            ("UPLOAD_CACHE_CONTROL", "60"),
        ]))
        .unwrap();
        assert_eq!(config.s3_bucket(), Some("files"));
        assert_eq!(config.aws_region(), Some("eu-west-1"));
        assert_eq!(config.upload_cache_control(), "60");
    }
}
