use anyhow::Result;
use chrono::Duration as TokenTtl;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::repositories::{SeaOrmMovieRepository, SeaOrmUserRepository};
use crate::schemas::{AppState, HttpLimits};
use crate::security::{JwtService, PasswordHasher};
use crate::uploader::{CloudinaryCredentials, CloudinaryUploader, PosterUploader};
use crate::usecases::{MovieUsecase, UserUsecase};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://movieshelf.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_JWT_TTL_HOURS: i64 = 24;
const DEFAULT_CLOUDINARY_FOLDER: &str = "movie-posters";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Error types for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration could not be loaded: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub bind_address: Option<String>,
}

/// Process configuration, loaded once at startup.
#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    pub cloudinary_folder: String,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_ttl_hours", &self.jwt_ttl_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("cloudinary_cloud_name", &self.cloudinary_cloud_name)
            .field("cloudinary_api_key", &self.cloudinary_api_key)
            .field(
                "cloudinary_api_secret",
                &self.cloudinary_api_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("cloudinary_folder", &self.cloudinary_folder)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl AppConfig {
    /// Loads `.env`, then layers defaults, an optional `movieshelf.toml`,
    /// environment variables and finally the CLI overrides.
    pub fn load_with(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("jwt_ttl_hours", DEFAULT_JWT_TTL_HOURS)?
            .set_default("bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .set_default("cloudinary_folder", DEFAULT_CLOUDINARY_FOLDER)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .set_default("max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as u64)?
            .add_source(config::File::with_name("movieshelf").required(false))
            .add_source(config::Environment::default().try_parsing(true))
            .set_override_option("database_url", overrides.database_url)?
            .set_override_option("bind_address", overrides.bind_address)?
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Defaults plus the given secret, without reading any external source.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_ttl_hours: DEFAULT_JWT_TTL_HOURS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cloudinary_cloud_name: None,
            cloudinary_api_key: None,
            cloudinary_api_secret: None,
            cloudinary_folder: DEFAULT_CLOUDINARY_FOLDER.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("jwt_secret must not be empty".to_string()));
        }
        if self.jwt_ttl_hours <= 0 {
            return Err(ConfigError::Invalid("jwt_ttl_hours must be positive".to_string()));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid(
                "bcrypt_cost must be between 4 and 31".to_string(),
            ));
        }
        Ok(())
    }

    /// Credentials for the image host, present only when all three keys are set.
    pub fn cloudinary(&self) -> Option<CloudinaryCredentials> {
        Some(CloudinaryCredentials {
            cloud_name: self.cloudinary_cloud_name.clone()?,
            api_key: self.cloudinary_api_key.clone()?,
            api_secret: self.cloudinary_api_secret.clone()?,
            folder: self.cloudinary_folder.clone(),
        })
    }

    pub fn limits(&self) -> HttpLimits {
        HttpLimits {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// Wires repositories, security services and use cases around a connection,
/// uploading posters to Cloudinary.
pub fn build_app_state(db: DatabaseConnection, config: &AppConfig) -> AppState {
    let credentials = config.cloudinary();
    if credentials.is_none() {
        info!("Cloudinary credentials not set, poster uploads will fail");
    }
    build_app_state_with_uploader(db, config, Arc::new(CloudinaryUploader::new(credentials)))
}

pub fn build_app_state_with_uploader(
    db: DatabaseConnection,
    config: &AppConfig,
    uploader: Arc<dyn PosterUploader>,
) -> AppState {
    let tokens = Arc::new(JwtService::new(
        &config.jwt_secret,
        TokenTtl::hours(config.jwt_ttl_hours),
    ));

    let users = UserUsecase::new(
        Arc::new(SeaOrmUserRepository::new(db.clone())),
        PasswordHasher::new(config.bcrypt_cost),
        tokens.clone(),
    );
    let movies = MovieUsecase::new(
        Arc::new(SeaOrmMovieRepository::new(db.clone())),
        uploader,
    );

    AppState {
        db,
        users: Arc::new(users),
        movies: Arc::new(movies),
        tokens,
        limits: config.limits(),
    }
}

/// Connects, applies pending migrations and builds the application state.
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    info!("Applying database migrations");
    Migrator::up(&db, None).await?;

    Ok(build_app_state(db, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::with_secret("secret");

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.jwt_ttl_hours, 24);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.validate().is_ok());
        assert!(config.cloudinary().is_none());
    }

    #[test]
    fn test_validation() {
        let empty_secret = AppConfig::with_secret("  ");
        let bad_ttl = AppConfig {
            jwt_ttl_hours: 0,
            ..AppConfig::with_secret("secret")
        };
        let bad_cost = AppConfig {
            bcrypt_cost: 2,
            ..AppConfig::with_secret("secret")
        };

        assert!(matches!(empty_secret.validate(), Err(ConfigError::Invalid(_))));
        assert!(matches!(bad_ttl.validate(), Err(ConfigError::Invalid(_))));
        assert!(matches!(bad_cost.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_cloudinary_requires_all_credentials() {
        let partial = AppConfig {
            cloudinary_cloud_name: Some("demo".to_string()),
            cloudinary_api_key: Some("123".to_string()),
            ..AppConfig::with_secret("secret")
        };
        assert!(partial.cloudinary().is_none());

        let full = AppConfig {
            cloudinary_api_secret: Some("shh".to_string()),
            ..partial
        };
        let credentials = full.cloudinary().unwrap();
        assert_eq!(credentials.cloud_name, "demo");
        assert_eq!(credentials.folder, "movie-posters");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AppConfig {
            cloudinary_api_secret: Some("cloud-secret".to_string()),
            ..AppConfig::with_secret("jwt-secret")
        };
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("jwt-secret"));
        assert!(!rendered.contains("cloud-secret"));
    }
}
