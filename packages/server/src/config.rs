use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Username of the admin account seeded on startup.
    pub admin_username: String,
    /// Initial admin password. Seeding is skipped when empty.
    pub admin_password: String,
}

/// Which media storage backend to use.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory uploads are written to (local backend).
    pub local_root: PathBuf,
    /// URL prefix recorded on media references, e.g. `/uploads` or a bucket
    /// endpoint for the S3 backend.
    pub public_base_url: String,
    /// Maximum size of a single uploaded file in bytes.
    pub max_upload_size: u64,
    pub s3_bucket: String,
    pub s3_region: String,
    /// Custom S3 endpoint for S3-compatible stores (MinIO etc.).
    pub s3_endpoint: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.admin_username", "admin")?
            .set_default("auth.admin_password", "")?
            .set_default("storage.backend", "local")?
            .set_default("storage.local_root", "./uploads")?
            .set_default("storage.public_base_url", "/uploads")?
            .set_default("storage.max_upload_size", 50 * 1024 * 1024)?
            .set_default("storage.s3_bucket", "")?
            .set_default("storage.s3_region", "us-east-1")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., CAMPUS__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("CAMPUS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
