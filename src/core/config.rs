use crate::core::types::BodyEncoding;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

pub const DEFAULT_API_URL: &str = "https://anypay.io/api";
pub const DEFAULT_MERCHANT_URL: &str = "https://anypay.io/merchant";

#[derive(Debug, Clone)]
pub struct AnyPayConfig {
    pub api_id: String,
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub project_id: i64,
    pub api_url: String,
    pub merchant_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub body_encoding: BodyEncoding,
    /// Apply the 15-digit pay id bound to payment and payout creation too
    pub enforce_pay_id_bound: bool,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for AnyPayConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("AnyPayConfig", 10)?;
        state.serialize_field("api_id", &self.api_id)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("project_id", &self.project_id)?;
        state.serialize_field("api_url", &self.api_url)?;
        state.serialize_field("merchant_url", &self.merchant_url)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.serialize_field("user_agent", &self.user_agent)?;
        state.serialize_field("body_encoding", &self.body_encoding)?;
        state.serialize_field("enforce_pay_id_bound", &self.enforce_pay_id_bound)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for AnyPayConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct AnyPayConfigHelper {
            api_id: String,
            api_key: String,
            secret_key: String,
            project_id: i64,
            api_url: Option<String>,
            merchant_url: Option<String>,
            timeout_seconds: Option<u64>,
            user_agent: Option<String>,
            #[serde(default)]
            body_encoding: BodyEncoding,
            #[serde(default)]
            enforce_pay_id_bound: bool,
        }

        let helper = AnyPayConfigHelper::deserialize(deserializer)?;
        let defaults = Self::new(helper.api_id, helper.api_key, helper.secret_key, helper.project_id);
        Ok(Self {
            api_url: helper.api_url.unwrap_or(defaults.api_url.clone()),
            merchant_url: helper.merchant_url.unwrap_or(defaults.merchant_url.clone()),
            timeout_seconds: helper.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            user_agent: helper.user_agent.unwrap_or(defaults.user_agent.clone()),
            body_encoding: helper.body_encoding,
            enforce_pay_id_bound: helper.enforce_pay_id_bound,
            ..defaults
        })
    }
}

impl AnyPayConfig {
    /// Create a new configuration with API credentials and default endpoints
    #[must_use]
    pub fn new(api_id: String, api_key: String, secret_key: String, project_id: i64) -> Self {
        Self {
            api_id,
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            project_id,
            api_url: DEFAULT_API_URL.to_string(),
            merchant_url: DEFAULT_MERCHANT_URL.to_string(),
            timeout_seconds: 30,
            user_agent: format!("anypay-rs/{}", env!("CARGO_PKG_VERSION")),
            body_encoding: BodyEncoding::Form,
            enforce_pay_id_bound: false,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_ID`
    /// - `{PREFIX}_API_KEY`
    /// - `{PREFIX}_SECRET_KEY`
    /// - `{PREFIX}_PROJECT_ID`
    /// - `{PREFIX}_API_URL` (optional)
    /// - `{PREFIX}_MERCHANT_URL` (optional)
    /// - `{PREFIX}_TIMEOUT_SECONDS` (optional, defaults to 30)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let var = |name: &str| -> Result<String, ConfigError> {
            let key = format!("{}_{}", prefix, name);
            env::var(&key).map_err(|_| ConfigError::MissingEnvironmentVariable(key))
        };

        let project_id_raw = var("PROJECT_ID")?;
        let project_id = project_id_raw.trim().parse::<i64>().map_err(|e| {
            ConfigError::InvalidConfiguration(format!(
                "{}_PROJECT_ID must be an integer, got '{}': {}",
                prefix, project_id_raw, e
            ))
        })?;

        let mut config = Self::new(var("API_ID")?, var("API_KEY")?, var("SECRET_KEY")?, project_id);

        if let Ok(api_url) = var("API_URL") {
            config.api_url = api_url;
        }
        if let Ok(merchant_url) = var("MERCHANT_URL") {
            config.merchant_url = merchant_url;
        }
        if let Ok(timeout) = var("TIMEOUT_SECONDS") {
            config.timeout_seconds = timeout.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidConfiguration(format!(
                    "{}_TIMEOUT_SECONDS must be a whole number of seconds, got '{}': {}",
                    prefix, timeout, e
                ))
            })?;
        }

        Ok(config)
    }

    /// Create configuration from .env file and environment variables
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            // A missing file is fine, system env vars still apply
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Check if this configuration has credentials for signed operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_id.is_empty()
            && !self.api_key.expose_secret().is_empty()
            && !self.secret_key.expose_secret().is_empty()
    }

    #[must_use]
    pub fn api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }

    #[must_use]
    pub fn merchant_url(mut self, merchant_url: String) -> Self {
        self.merchant_url = merchant_url;
        self
    }

    #[must_use]
    pub const fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub const fn body_encoding(mut self, body_encoding: BodyEncoding) -> Self {
        self.body_encoding = body_encoding;
        self
    }

    #[must_use]
    pub const fn enforce_pay_id_bound(mut self, enforce: bool) -> Self {
        self.enforce_pay_id_bound = enforce;
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
