use crate::auth::jwt::JwtConfig;

/// Which blob storage backend to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Local filesystem (development / tests).
    Local,
    /// S3 bucket (production).
    S3,
}

/// Server configuration loaded from environment variables.
///
/// Secrets (JWT secret, encryption key) are required and fatal at startup
/// when absent; everything else has development defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`; renders can take a
    /// while under load).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// 64-character hex AES-256 key for substituted-value encryption.
    pub encryption_key_hex: String,
    /// Blob storage backend selection.
    pub storage_backend: StorageBackend,
    /// Root directory for the local blob store.
    pub blob_local_root: String,
    /// Public base URL blobs are served from (local backend).
    pub blob_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Required | Default                 |
    /// |------------------------|----------|-------------------------|
    /// | `HOST`                 | no       | `0.0.0.0`               |
    /// | `PORT`                 | no       | `3000`                  |
    /// | `CORS_ORIGINS`         | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `60`                    |
    /// | `JWT_SECRET`           | **yes**  | --                      |
    /// | `ENCRYPTION_KEY`       | **yes**  | --                      |
    /// | `STORAGE_BACKEND`      | no       | `local`                 |
    /// | `BLOB_LOCAL_ROOT`      | no       | `./blobs`               |
    /// | `BLOB_BASE_URL`        | no       | `http://localhost:3000/blobs` |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or malformed -- a server
    /// without its secrets must not come up.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let encryption_key_hex =
            std::env::var("ENCRYPTION_KEY").expect("ENCRYPTION_KEY must be set (64 hex chars)");

        let storage_backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .as_str()
        {
            "s3" => StorageBackend::S3,
            "local" => StorageBackend::Local,
            other => panic!("STORAGE_BACKEND must be \"local\" or \"s3\", got {other:?}"),
        };

        let blob_local_root =
            std::env::var("BLOB_LOCAL_ROOT").unwrap_or_else(|_| "./blobs".into());
        let blob_base_url = std::env::var("BLOB_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/blobs".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            encryption_key_hex,
            storage_backend,
            blob_local_root,
            blob_base_url,
        }
    }
}
