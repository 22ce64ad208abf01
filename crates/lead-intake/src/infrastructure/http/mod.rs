//! HTTP lead gateway
//!
//! Posts the flat payload to the lead service with a bearer token.

use async_trait::async_trait;
use url::Url;

use crate::application::dto::{interpret_response, LeadCreated, LeadPayload};
use crate::config::{ConfigError, IntakeConfig};
use crate::error::IntakeError;
use crate::ports::outbound::LeadGateway;

/// `reqwest`-backed [`LeadGateway`]
#[derive(Clone, Debug)]
pub struct HttpLeadGateway {
    endpoint: Result<Url, ConfigError>,
    client: reqwest::Client,
}

impl HttpLeadGateway {
    /// Build from configuration. A missing base URL is kept and reported on
    /// every submission instead of failing here.
    pub fn new(config: &IntakeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("lead-intake/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            endpoint: config.leads_endpoint(),
            client,
        }
    }

    /// Gateway for the process-wide configuration
    pub fn from_global() -> Self {
        Self::new(IntakeConfig::global())
    }

    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref().ok()
    }
}

#[async_trait]
impl LeadGateway for HttpLeadGateway {
    async fn create_lead(&self, payload: &LeadPayload, auth_token: &str) -> Result<LeadCreated, IntakeError> {
        let url = self
            .endpoint
            .clone()
            .map_err(|e| IntakeError::Configuration(e.to_string()))?;

        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .bearer_auth(auth_token)
            .json(payload)
            .send()
            .await
            .map_err(|e| IntakeError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| IntakeError::Network(e.to_string()))?;
        tracing::debug!("Lead service answered {} ({} bytes)", status, body.len());

        interpret_response(&payload.lead_id, status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let config = IntakeConfig::default().with_api_base("https://crm.example.com").unwrap();
        let gateway = HttpLeadGateway::new(&config);
        assert_eq!(
            gateway.endpoint().map(Url::as_str),
            Some("https://crm.example.com/api/commerce/workflow/revenue/leads")
        );
    }

    #[test]
    fn test_unconfigured_gateway_has_no_endpoint() {
        let gateway = HttpLeadGateway::new(&IntakeConfig::default());
        assert!(gateway.endpoint().is_none());
    }
}
