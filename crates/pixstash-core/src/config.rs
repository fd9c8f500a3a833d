//! Configuration module
//!
//! Static service configuration read once at startup: listen address, storage
//! directory, bearer token, upload ceiling and the delivery-format settings used
//! by the ingest pipeline.

use std::env;
use std::path::PathBuf;

// Common constants
const SERVER_PORT: u16 = 4000;
const UPLOAD_DIR: &str = "./uploads";
const MAX_FILE_SIZE_MB: u64 = 50;
const WEBP_QUALITY: u8 = 80;
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Extra room allowed on top of the file ceiling for multipart framing.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 10 * 1024 * 1024;

/// Delivery format extension written for every converted image.
pub const DELIVERY_EXTENSION: &str = ".webp";

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Public prefix for object URLs, without trailing slash
    pub base_url: String,
    pub upload_dir: PathBuf,
    pub auth_token: String,
    pub max_file_size_bytes: u64,
    /// Lossy WebP quality, 0-100
    pub webp_quality: u8,
    pub convert_to_webp: bool,
    pub request_timeout_secs: u64,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: SERVER_PORT,
            base_url: format!("http://localhost:{}", SERVER_PORT),
            upload_dir: PathBuf::from(UPLOAD_DIR),
            auth_token: String::new(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            webp_quality: WEBP_QUALITY,
            convert_to_webp: true,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let base_url = lookup("BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        let webp_quality = match lookup("WEBP_QUALITY") {
            Some(q) => q
                .trim()
                .parse::<u8>()
                .map_err(|_| anyhow::anyhow!("WEBP_QUALITY must be an integer between 0 and 100"))?,
            None => WEBP_QUALITY,
        };

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port,
            base_url,
            upload_dir: PathBuf::from(lookup("UPLOAD_DIR").unwrap_or_else(|| UPLOAD_DIR.to_string())),
            auth_token: lookup("AUTH_TOKEN")
                .ok_or_else(|| anyhow::anyhow!("AUTH_TOKEN must be set for authentication"))?,
            max_file_size_bytes: max_file_size_mb
                .checked_mul(1024 * 1024)
                .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?,
            webp_quality,
            convert_to_webp: lookup("CONVERT_TO_WEBP")
                .map(|s| s.trim().to_lowercase())
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS)
                .max(1),
            cors_origins,
            environment,
            log_format: lookup("LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on settings the service cannot run with.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.auth_token.trim().is_empty() {
            return Err(anyhow::anyhow!("AUTH_TOKEN must not be empty"));
        }
        if self.webp_quality > 100 {
            return Err(anyhow::anyhow!(
                "WEBP_QUALITY must be between 0 and 100 (got {})",
                self.webp_quality
            ));
        }
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }
        // The request ceiling adds multipart framing and must fit the body limiter
        let request_ceiling = self
            .max_file_size_bytes
            .checked_add(MULTIPART_OVERHEAD_BYTES)
            .and_then(|total| usize::try_from(total).ok());
        if request_ceiling.is_none() {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB is too large ({} bytes)",
                self.max_file_size_bytes
            ));
        }
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Hard ceiling on the whole request body, file plus multipart framing.
    pub fn max_request_bytes(&self) -> u64 {
        self.max_file_size_bytes
            .saturating_add(MULTIPART_OVERHEAD_BYTES)
    }

    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size_bytes / 1024 / 1024
    }

    /// Public URL of a stored object.
    pub fn object_url(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.base_url, filename)
    }
}
