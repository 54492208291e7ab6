//! Configuration management for Folio Server

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default multipart body limit: 100MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("S3_BUCKET must be set when STORAGE_PROVIDER is s3 (set STORAGE_PROVIDER=memory to run without S3)")]
    MissingBucket,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

/// Object storage settings.
///
/// Credentials are not configured here; the AWS default provider chain
/// resolves them from the hosting environment.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    S3,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversionConfig {
    /// Directory for transient upload files (OS temp dir when unset)
    pub temp_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Region to sign requests for
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Base URL that blob keys are appended to when building public links.
    pub fn public_base_url(&self) -> String {
        if let Some(url) = &self.public_url {
            return url.trim_end_matches('/').to_string();
        }

        if self.provider == StorageProvider::Memory {
            return format!("memory://{}", self.bucket);
        }

        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            storage: StorageConfig {
                provider: StorageProvider::S3,
                bucket: "documents".to_string(),
                endpoint: None,
                region: Some(DEFAULT_REGION.to_string()),
                public_url: None,
            },
            conversion: ConversionConfig { temp_dir: None },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    ///
    /// Empty values count as unset. Memory storage is only chosen when
    /// `STORAGE_PROVIDER=memory` is given explicitly.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let provider = match var("STORAGE_PROVIDER").map(|v| v.to_lowercase()).as_deref() {
            Some("memory") => StorageProvider::Memory,
            _ => StorageProvider::S3,
        };

        let bucket = match (provider, var("S3_BUCKET")) {
            (_, Some(bucket)) => bucket,
            (StorageProvider::Memory, None) => "documents".to_string(),
            (StorageProvider::S3, None) => return Err(ConfigError::MissingBucket),
        };

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: var("SERVER_PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(8000),
                max_upload_bytes: var("MAX_UPLOAD_BYTES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
            storage: StorageConfig {
                provider,
                bucket,
                endpoint: var("S3_ENDPOINT"),
                region: var("S3_REGION"),
                public_url: var("S3_PUBLIC_URL"),
            },
            conversion: ConversionConfig {
                temp_dir: var("CONVERT_TEMP_DIR").map(PathBuf::from),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    fn storage(endpoint: Option<&str>, public_url: Option<&str>) -> StorageConfig {
        StorageConfig {
            provider: StorageProvider::S3,
            bucket: "papers".to_string(),
            endpoint: endpoint.map(str::to_string),
            region: None,
            public_url: public_url.map(str::to_string),
        }
    }

    #[test]
    fn test_public_base_url_aws_default() {
        let config = storage(None, None);
        assert_eq!(config.public_base_url(), "https://papers.s3.us-east-1.amazonaws.com");
    }

    #[test]
    fn test_public_base_url_custom_endpoint() {
        let config = storage(Some("http://localhost:9000/"), None);
        assert_eq!(config.public_base_url(), "http://localhost:9000/papers");
    }

    #[test]
    fn test_public_base_url_override_wins() {
        let config = storage(Some("http://localhost:9000"), Some("https://cdn.example.com/"));
        assert_eq!(config.public_base_url(), "https://cdn.example.com");
    }

    #[test]
    fn test_default_config_uses_s3_storage() {
        let config = Config::default();
        assert_eq!(config.storage.provider, StorageProvider::S3);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_missing_bucket_is_an_error_not_memory_storage() {
        assert_eq!(from_vars(&[]).unwrap_err(), ConfigError::MissingBucket);
        assert_eq!(
            from_vars(&[("STORAGE_PROVIDER", "s3"), ("S3_BUCKET", "")]).unwrap_err(),
            ConfigError::MissingBucket
        );
    }

    #[test]
    fn test_memory_storage_only_when_requested() {
        let config = from_vars(&[("STORAGE_PROVIDER", "Memory")]).unwrap();
        assert_eq!(config.storage.provider, StorageProvider::Memory);
        assert_eq!(config.storage.public_base_url(), "memory://documents");

        let config = from_vars(&[("STORAGE_PROVIDER", "disk"), ("S3_BUCKET", "papers")]).unwrap();
        assert_eq!(config.storage.provider, StorageProvider::S3);
    }

    #[test]
    fn test_from_lookup_reads_server_settings() {
        let config = from_vars(&[
            ("S3_BUCKET", "papers"),
            ("SERVER_PORT", "9090"),
            ("MAX_UPLOAD_BYTES", "not-a-number"),
            ("S3_ENDPOINT", "http://localhost:9000"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.storage.bucket, "papers");
        assert_eq!(config.storage.public_base_url(), "http://localhost:9000/papers");
    }
}
