//! Application configuration, resolved once at startup from the environment.

use std::path::PathBuf;

/// How portfolio data is persisted for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    InMemory,
    File,
    Postgres,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,

    pub admin_username: String,
    pub admin_password: String,
    pub jwt_secret: String,

    pub storage_mode: StorageMode,
    pub database_url: Option<String>,
    /// Legacy JSON data file, also the file-backend store.
    pub data_file: PathBuf,
    /// Deadline for the startup database connectivity probe.
    pub db_probe_timeout_secs: u64,

    pub upload_dir: PathBuf,
    pub s3_bucket: Option<String>,
    pub s3_public_base: Option<String>,

    pub resend_api_key: Option<String>,
    pub contact_from: String,
    pub contact_to: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3001,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            admin_username: "admin".to_string(),
            admin_password: "password".to_string(),
            jwt_secret: "default-jwt-secret-change-in-production".to_string(),
            storage_mode: StorageMode::File,
            database_url: None,
            data_file: PathBuf::from("data/portfolio.json"),
            db_probe_timeout_secs: 5,
            upload_dir: PathBuf::from("public/uploads"),
            s3_bucket: None,
            s3_public_base: None,
            resend_api_key: None,
            contact_from: "Agency Website <onboarding@resend.dev>".to_string(),
            contact_to: "hello@example.com".to_string(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(fallback)
}

impl AppConfig {
    /// Build configuration from the environment, falling back to the
    /// development defaults above.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database_url = std::env::var("DATABASE_URL").ok();
        let storage_mode = match std::env::var("STORAGE_MODE").ok().as_deref() {
            Some("memory") => StorageMode::InMemory,
            Some("file") => StorageMode::File,
            Some("postgres") => StorageMode::Postgres,
            Some(other) => {
                tracing::warn!("Unknown STORAGE_MODE '{}', selecting from DATABASE_URL", other);
                Self::auto_mode(database_url.as_deref())
            }
            None => Self::auto_mode(database_url.as_deref()),
        };

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .or_else(|| std::env::var("FRONTEND_ORIGIN").ok().map(|o| vec![o]))
            .unwrap_or(defaults.allowed_origins);

        Self {
            environment: env_or("ENVIRONMENT", defaults.environment),
            host: env_or("HOST", defaults.host),
            port: env_or("PORT", defaults.port),
            allowed_origins,
            admin_username: env_or("ADMIN_USERNAME", defaults.admin_username),
            admin_password: env_or("ADMIN_PASSWORD", defaults.admin_password),
            jwt_secret: env_or("JWT_SECRET", defaults.jwt_secret),
            storage_mode,
            database_url,
            data_file: env_or("DATA_FILE", defaults.data_file),
            db_probe_timeout_secs: env_or("DB_PROBE_TIMEOUT", defaults.db_probe_timeout_secs),
            upload_dir: env_or("UPLOAD_DIR", defaults.upload_dir),
            s3_bucket: std::env::var("S3_BUCKET").ok(),
            s3_public_base: std::env::var("S3_PUBLIC_BASE").ok(),
            resend_api_key: std::env::var("RESEND_API_KEY").ok(),
            contact_from: env_or("CONTACT_FROM", defaults.contact_from),
            contact_to: env_or("CONTACT_TO", defaults.contact_to),
        }
    }

    fn auto_mode(database_url: Option<&str>) -> StorageMode {
        if database_url.is_some() {
            StorageMode::Postgres
        } else {
            StorageMode::File
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Refuse insecure defaults in production; warn about weak admin
    /// credentials without blocking startup.
    pub fn enforce_production_safety(&self) {
        if !self.is_production() {
            return;
        }

        if self.jwt_secret.is_empty()
            || self.jwt_secret == "default-jwt-secret-change-in-production"
        {
            panic!(
                "FATAL: JWT_SECRET must be set to a secure, unique value in production. \
                 Refusing to start with the default secret."
            );
        }

        if self.admin_username == "admin" && self.admin_password == "password" {
            tracing::warn!(
                "SECURITY: ADMIN_USERNAME/ADMIN_PASSWORD are using insecure defaults. \
                 Set both env vars before exposing the admin API."
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_development_values() {
        let config = AppConfig::default();
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
        assert_eq!(config.port, 3001);
        assert_eq!(config.storage_mode, StorageMode::File);
        assert_eq!(config.data_file, PathBuf::from("data/portfolio.json"));
    }

    #[test]
    fn test_auto_mode_prefers_postgres_when_url_present() {
        assert_eq!(
            AppConfig::auto_mode(Some("postgresql://localhost/agency")),
            StorageMode::Postgres
        );
        assert_eq!(AppConfig::auto_mode(None), StorageMode::File);
    }

    #[test]
    fn test_production_safety_passes_with_real_secret() {
        let config = AppConfig {
            environment: "production".to_string(),
            jwt_secret: "a-long-unique-secret".to_string(),
            ..AppConfig::default()
        };
        config.enforce_production_safety();
    }

    #[test]
    #[should_panic(expected = "JWT_SECRET must be set")]
    fn test_production_safety_rejects_default_secret() {
        let config = AppConfig {
            environment: "production".to_string(),
            ..AppConfig::default()
        };
        config.enforce_production_safety();
    }
}
