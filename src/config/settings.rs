//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_MAIL_FROM, DEFAULT_REDIS_URL,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SITE_URL, MIN_JWT_SECRET_LENGTH,
};

/// How outbound email is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailDelivery {
    /// Push onto the background job queue
    Queue,
    /// Only write the email to the log
    Log,
}

impl From<&str> for EmailDelivery {
    fn from(s: &str) -> Self {
        match s {
            "queue" => EmailDelivery::Queue,
            _ => EmailDelivery::Log,
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Public base URL used when building links in email
    pub site_url: String,
    pub mail_from: String,
    pub email_delivery: EmailDelivery,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("site_url", &self.site_url)
            .field("mail_from", &self.mail_from)
            .field("email_delivery", &self.email_delivery)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            site_url: env::var("SITE_URL").unwrap_or_else(|_| DEFAULT_SITE_URL.to_string()),
            mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string()),
            email_delivery: env::var("EMAIL_DELIVERY")
                .map(|v| EmailDelivery::from(v.as_str()))
                .unwrap_or(EmailDelivery::Log),
        }
    }

    /// Build a configuration with explicit values (tests, embedding).
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            site_url: DEFAULT_SITE_URL.to_string(),
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            email_delivery: EmailDelivery::Log,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Bind address, with command-line overrides taking precedence.
    pub fn server_addr(&self, host: Option<String>, port: Option<u16>) -> String {
        format!(
            "{}:{}",
            host.unwrap_or_else(|| self.server_host.clone()),
            port.unwrap_or(self.server_port)
        )
    }

    /// Absolute URL for a site path.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://user:pw@db/app", "x".repeat(40));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("pw@db"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_server_addr_prefers_overrides() {
        let config = Config::new("sqlite::memory:", "x".repeat(40));
        assert_eq!(config.server_addr(None, None), "0.0.0.0:3000");
        assert_eq!(
            config.server_addr(Some("127.0.0.1".into()), Some(8080)),
            "127.0.0.1:8080"
        );
    }

    #[test]
    fn test_absolute_url_joins_without_double_slash() {
        let mut config = Config::new("sqlite::memory:", "x".repeat(40));
        config.site_url = "https://market.example.com/".to_string();
        assert_eq!(
            config.absolute_url("/dashboard"),
            "https://market.example.com/dashboard"
        );
    }

    #[test]
    fn test_email_delivery_parsing() {
        assert_eq!(EmailDelivery::from("queue"), EmailDelivery::Queue);
        assert_eq!(EmailDelivery::from("log"), EmailDelivery::Log);
        assert_eq!(EmailDelivery::from("anything"), EmailDelivery::Log);
    }
}
