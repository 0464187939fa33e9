//! SMS Activate [`Provider`] implementation.

use super::client::SmsActivateClient;
use super::errors::{Result, SmsActivateError};
use super::types::ActivationStatus;
use crate::providers::traits::Provider;
use crate::types::{FullNumber, LeaseId, SmsCode};
use isocountry::CountryCode;

#[cfg(feature = "tracing")]
use tracing::debug;

/// [`Provider`] backed by the SMS Activate API.
///
/// Thin translation layer over [`SmsActivateClient`]: maps the lease
/// operations onto `getNumberV2` / `setStatus` / `getStatusV2` calls.
#[derive(Debug, Clone)]
pub struct SmsActivateProvider {
    client: SmsActivateClient,
}

impl SmsActivateProvider {
    /// Create a provider over an existing client.
    pub fn new(client: SmsActivateClient) -> Self {
        Self { client }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &SmsActivateClient {
        &self.client
    }
}

impl Provider for SmsActivateProvider {
    type Error = SmsActivateError;

    async fn acquire_number(&self, country: CountryCode) -> Result<(LeaseId, FullNumber)> {
        let lease = self.client.acquire_number(country).await?;
        Ok((lease.lease_id, FullNumber::from(lease.phone_number)))
    }

    async fn mark_ready(&self, lease_id: &LeaseId) -> Result<()> {
        self.client
            .set_status(lease_id, ActivationStatus::ReadyToReceive)
            .await?;

        #[cfg(feature = "tracing")]
        debug!(lease_id = %lease_id, "Lease marked ready to receive SMS");

        Ok(())
    }

    async fn poll_code(&self, lease_id: &LeaseId) -> Result<Option<SmsCode>> {
        let status = self.client.sms_status(lease_id).await?;

        if let Some(sms) = &status.sms
            && !sms.code.is_empty()
        {
            return Ok(Some(SmsCode::new(&sms.code)));
        }

        Ok(None)
    }

    async fn finish(&self, lease_id: &LeaseId) -> Result<()> {
        self.client
            .set_status(lease_id, ActivationStatus::Finish)
            .await?;

        #[cfg(feature = "tracing")]
        debug!(lease_id = %lease_id, "Activation finished");

        Ok(())
    }

    async fn cancel(&self, lease_id: &LeaseId) -> Result<()> {
        self.client
            .set_status(lease_id, ActivationStatus::Cancel)
            .await?;

        #[cfg(feature = "tracing")]
        debug!(lease_id = %lease_id, "Activation cancelled");

        Ok(())
    }

    fn available_countries(&self) -> Vec<CountryCode> {
        super::countries::COUNTRY_IDS.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(mock_server: &MockServer) -> SmsActivateProvider {
        let client = SmsActivateClient::new(mock_server.uri(), "test_key").unwrap();
        SmsActivateProvider::new(client)
    }

    #[tokio::test]
    async fn test_acquire_number() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("action", "getNumberV2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "activationId": "42",
                "phoneNumber": "33700900123",
                "countryCode": "33"
            })))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let (lease_id, number) = provider.acquire_number(CountryCode::FRA).await.unwrap();
        assert_eq!(lease_id.as_ref(), "42");
        assert_eq!(number.as_str(), "33700900123");
    }

    #[tokio::test]
    async fn test_poll_code_pending_then_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("action", "getStatusV2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let code = provider.poll_code(&LeaseId::from("42")).await.unwrap();
        assert!(code.is_none());
    }

    #[tokio::test]
    async fn test_mark_ready_uses_status_one() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("action", "setStatus"))
            .and(query_param("status", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_READY"))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        assert!(provider.mark_ready(&LeaseId::from("42")).await.is_ok());
    }

    #[test]
    fn test_available_countries() {
        let client = SmsActivateClient::with_api_key("test_key").unwrap();
        let provider = SmsActivateProvider::new(client);
        let countries = provider.available_countries();
        assert!(countries.contains(&CountryCode::GBR));
        assert!(countries.contains(&CountryCode::USA));
    }
}
