use crate::api::connector::AnyPayClient;
use crate::core::config::{AnyPayConfig, ConfigError};
use crate::core::errors::AnyPayError;
use crate::core::kernel::{ReqwestTransport, TransportConfig};

fn transport_config(config: &AnyPayConfig) -> TransportConfig {
    TransportConfig::default()
        .with_timeout(config.timeout_seconds)
        .with_user_agent(config.user_agent.clone())
}

/// Create an AnyPay client backed by reqwest
pub fn build_client(config: AnyPayConfig) -> Result<AnyPayClient<ReqwestTransport>, AnyPayError> {
    if !config.has_credentials() {
        return Err(ConfigError::InvalidConfiguration(
            "api_id, api_key and secret_key must all be set".to_string(),
        )
        .into());
    }

    let transport = ReqwestTransport::new(transport_config(&config))?;
    Ok(AnyPayClient::with_transport(&config, transport))
}

/// Create an AnyPay client over an existing reqwest client
pub fn build_client_with_http(
    config: AnyPayConfig,
    http: reqwest::Client,
) -> AnyPayClient<ReqwestTransport> {
    let transport = ReqwestTransport::with_client(http, transport_config(&config));
    AnyPayClient::with_transport(&config, transport)
}
