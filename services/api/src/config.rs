//! Service configuration loaded from environment variables

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

/// Settings for the SkillSync API service
///
/// # Environment Variables
/// - `HOST` / `PORT`: listen address (default: `0.0.0.0:3001`)
/// - `ALLOWED_EMAIL_DOMAIN`: only callers with an e-mail in this domain are accepted
/// - `JWT_PUBLIC_KEY`: RS256 public key (PEM) or path to a PEM file
/// - `GRAPHRAG_URL`: base URL of the matching microservice
/// - `GROQ_API_URL`, `GROQ_API_KEY`, `GROQ_MODEL`: text-generation service
/// - `UPSTREAM_TIMEOUT_SECS`: timeout for outbound calls (default: 30)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub allowed_email_domain: String,
    pub jwt_public_key: String,
    pub graphrag_url: String,
    pub groq_api_url: String,
    pub groq_api_key: String,
    pub groq_model: String,
    pub upstream_timeout_secs: u64,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001)?
            .set_default("allowed_email_domain", "srmap.edu.in")?
            .set_default("graphrag_url", "http://localhost:8000")?
            .set_default("groq_api_url", "https://api.groq.com/openai/v1")?
            .set_default("groq_api_key", "")?
            .set_default("groq_model", "llama-3.3-70b-versatile")?
            .set_default("upstream_timeout_secs", 30)?
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Invalid service configuration: {}", e))?;

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 9] = [
        "HOST",
        "PORT",
        "ALLOWED_EMAIL_DOMAIN",
        "JWT_PUBLIC_KEY",
        "GRAPHRAG_URL",
        "GROQ_API_URL",
        "GROQ_API_KEY",
        "GROQ_MODEL",
        "UPSTREAM_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_defaults_apply() {
        clear_env();
        unsafe {
            std::env::set_var("JWT_PUBLIC_KEY", "fixtures/jwt_public.pem");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.allowed_email_domain, "srmap.edu.in");
        assert_eq!(config.graphrag_url, "http://localhost:8000");
        assert_eq!(config.groq_model, "llama-3.3-70b-versatile");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_environment_overrides_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("JWT_PUBLIC_KEY", "fixtures/jwt_public.pem");
            std::env::set_var("PORT", "8088");
            std::env::set_var("GRAPHRAG_URL", "http://graphrag:8000");
            std::env::set_var("UPSTREAM_TIMEOUT_SECS", "5");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 8088);
        assert_eq!(config.graphrag_url, "http://graphrag:8000");
        assert_eq!(config.upstream_timeout_secs, 5);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_public_key_is_required() {
        clear_env();
        assert!(AppConfig::from_env().is_err());
    }
}
