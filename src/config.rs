//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection options, from `DATABASE_URL` or the `DB_*` parts
    pub database: PgConnectOptions,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// SendGrid API key. Notifications are only logged when absent.
    pub sendgrid_api_key: Option<String>,

    /// Sender address for notification emails
    pub mail_from: Option<String>,

    /// Secret used to derive the bank detail encryption key
    pub bank_details_key: String,

    /// Full VocaLink weight table (valacdos.txt); the embedded seed is used otherwise
    pub modulus_weights_path: Option<PathBuf>,

    /// VocaLink sort code substitution table (scsubtab.txt)
    pub modulus_substitutions_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = match env::var("DATABASE_URL") {
            Ok(url) => PgConnectOptions::from_str(&url)
                .map_err(|_| ConfigError::InvalidValue("DATABASE_URL"))?,
            Err(_) => database_options_from_parts()?,
        };

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let sendgrid_api_key = non_empty_var("SENDGRID_API_KEY");
        let mail_from = non_empty_var("MAIL_FROM");
        if sendgrid_api_key.is_some() && mail_from.is_none() {
            return Err(ConfigError::MissingEnv("MAIL_FROM"));
        }

        let bank_details_key = non_empty_var("BANK_DETAILS_KEY")
            .ok_or(ConfigError::MissingEnv("BANK_DETAILS_KEY"))?;

        let config = Self {
            database,
            database_max_connections,
            host,
            port,
            environment,
            sendgrid_api_key,
            mail_from,
            bank_details_key,
            modulus_weights_path: non_empty_var("MODULUS_WEIGHTS_PATH").map(PathBuf::from),
            modulus_substitutions_path: non_empty_var("MODULUS_SUBSTITUTIONS_PATH")
                .map(PathBuf::from),
        };

        config.check_production_requirements()?;
        Ok(config)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Production must validate against the full published weight table
    fn check_production_requirements(&self) -> Result<(), ConfigError> {
        if self.is_production() && self.modulus_weights_path.is_none() {
            return Err(ConfigError::MissingEnv("MODULUS_WEIGHTS_PATH"));
        }
        Ok(())
    }
}

/// Build connection options from the discrete DB_* variables
fn database_options_from_parts() -> Result<PgConnectOptions, ConfigError> {
    let host = env::var("DB_HOST").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;
    let user = env::var("DB_USER").map_err(|_| ConfigError::MissingEnv("DB_USER"))?;
    let password = env::var("DB_PASSWORD").unwrap_or_default();
    let database = env::var("DB_DATABASE").map_err(|_| ConfigError::MissingEnv("DB_DATABASE"))?;
    let port: u16 = env::var("DB_PORT")
        .unwrap_or_else(|_| "5432".to_string())
        .parse()
        .map_err(|_| ConfigError::InvalidValue("DB_PORT"))?;

    Ok(connect_options(&host, port, &user, &password, &database))
}

fn connect_options(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    database: &str,
) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(host)
        .port(port)
        .username(user)
        .database(database);

    if password.is_empty() {
        options
    } else {
        options.password(password)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
