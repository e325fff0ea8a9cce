use crate::auth::JwtConfig;
use crate::utils::{AppError, AppResult};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/banquet | Database, uploaded images, logs |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | APP_BASE_URL | http://localhost:3000 | Public base URL used in links and media attachments |
/// | JWT_SECRET | (required in production) | Admin token signing secret |
/// | JWT_EXPIRATION_MINUTES | 1440 | Admin token lifetime |
/// | CLICKSEND_USERNAME | (unset) | SMS/MMS gateway account |
/// | CLICKSEND_API_KEY | (unset) | SMS/MMS gateway key |
/// | CLICKSEND_API_URL | https://rest.clicksend.com/v3 | Gateway endpoint, overridable for tests |
/// | ENVIRONMENT | development | development \| production |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// Public base URL guests see in QR links and MMS media URLs
    pub app_base_url: String,
    pub jwt: JwtConfig,
    pub environment: String,

    pub clicksend_username: Option<String>,
    pub clicksend_api_key: Option<String>,
    pub clicksend_api_url: String,
}

impl Config {
    /// Load configuration from the environment, using defaults where unset
    pub fn from_env() -> AppResult<Self> {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= 32 => secret,
            Ok(_) => {
                return Err(AppError::config(
                    "JWT_SECRET must be at least 32 characters long",
                ));
            }
            Err(_) if environment == "production" => {
                return Err(AppError::config("JWT_SECRET must be set in production"));
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, using a development-only default");
                "banquet-server-development-only-secret!".to_string()
            }
        };

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/banquet".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into())
                .trim_end_matches('/')
                .to_string(),
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1440),
            },
            environment,
            clicksend_username: std::env::var("CLICKSEND_USERNAME").ok(),
            clicksend_api_key: std::env::var("CLICKSEND_API_KEY").ok(),
            clicksend_api_url: std::env::var("CLICKSEND_API_URL")
                .unwrap_or_else(|_| "https://rest.clicksend.com/v3".into()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Directory uploaded and generated images are served from
    pub fn images_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("images")
    }

    /// Directory the embedded database lives in
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("banquet.db")
    }
}
