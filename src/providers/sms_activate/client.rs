//! SMS Activate HTTP client.

use super::countries::sms_activate_id;
use super::errors::{Result, SmsActivateError, parse_service_error};
use super::types::{ActivationStatus, LeaseResponse, SmsStatusResponse, StatusAck};
use crate::types::LeaseId;
use isocountry::CountryCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use url::Url;

#[cfg(feature = "tracing")]
use opentelemetry::trace::Status;
#[cfg(feature = "tracing")]
use tracing::Span;
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Default SMS Activate API URL.
pub const DEFAULT_API_URL: &str = "https://api.sms-activate.org/stubs/handler_api.php";

/// Service code for the messaging app being provisioned.
const DEFAULT_SERVICE_CODE: &str = "wa";

/// HTTP client for the SMS Activate API.
///
/// Speaks the `handler_api.php` protocol: every call is a GET with an
/// `action` query parameter; errors come back as plain-text codes,
/// successes as JSON (`getNumberV2`, `getStatusV2`) or as `ACCESS_*`
/// acknowledgements (`setStatus`).
#[derive(Clone)]
pub struct SmsActivateClient {
    http_client: ClientWithMiddleware,
    api_key: SecretString,
    endpoint: Url,
    service_code: String,
}

impl std::fmt::Debug for SmsActivateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsActivateClient")
            .field("endpoint", &self.endpoint)
            .field("service_code", &self.service_code)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Builder for configuring a [`SmsActivateClient`].
pub struct SmsActivateClientBuilder {
    api_key: String,
    endpoint: Option<Url>,
    http_client: Option<ClientWithMiddleware>,
    service_code: Option<String>,
}

impl SmsActivateClientBuilder {
    /// Create a new builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: None,
            http_client: None,
            service_code: None,
        }
    }

    /// Set a custom API endpoint.
    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Set a custom HTTP client with middleware.
    pub fn http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Override the target service code (default: "wa").
    pub fn service_code(mut self, code: impl Into<String>) -> Self {
        self.service_code = Some(code.into());
        self
    }

    /// Build the [`SmsActivateClient`].
    pub fn build(self) -> Result<SmsActivateClient> {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| Url::parse(DEFAULT_API_URL).expect("default URL is valid"));

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let client = reqwest::Client::builder()
                    .build()
                    .map_err(SmsActivateError::BuildHttpClient)?;
                ClientBuilder::new(client).build()
            }
        };

        Ok(SmsActivateClient {
            http_client,
            api_key: SecretString::from(self.api_key),
            endpoint,
            service_code: self
                .service_code
                .unwrap_or_else(|| DEFAULT_SERVICE_CODE.to_string()),
        })
    }
}

impl SmsActivateClient {
    /// Create a client against a custom endpoint.
    pub fn new(endpoint: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let url = Url::parse(endpoint.as_ref()).map_err(|e| {
            SmsActivateError::BuildRequestUrl(serde_urlencoded::ser::Error::Custom(
                std::borrow::Cow::Owned(e.to_string()),
            ))
        })?;

        Self::builder(api_key).endpoint(url).build()
    }

    /// Create a client against the default API URL.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Create a builder for configuring the client.
    pub fn builder(api_key: impl Into<String>) -> SmsActivateClientBuilder {
        SmsActivateClientBuilder::new(api_key)
    }

    fn build_request_url(&self, action: &str, additional: Vec<(&str, String)>) -> Result<Url> {
        let mut endpoint = self.endpoint.clone();

        let mut params = HashMap::new();
        params.insert("api_key", self.api_key.expose_secret().to_string());
        params.insert("action", action.to_string());
        for (key, value) in additional {
            params.insert(key, value);
        }

        endpoint.set_query(Some(
            &serde_urlencoded::to_string(&params).map_err(SmsActivateError::BuildRequestUrl)?,
        ));

        Ok(endpoint)
    }

    async fn send_request(&self, url: Url) -> Result<String> {
        let response = self.http_client.get(url).send().await?;

        response
            .text()
            .await
            .map_err(SmsActivateError::ReadResponse)
    }

    /// Decode a body that is either a plain-text error code or JSON.
    fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
        if let Some(error) = parse_service_error(text) {
            return Err(SmsActivateError::Service(error));
        }
        serde_json::from_str(text).map_err(SmsActivateError::DeserializeJson)
    }

    /// Reserve a number for the configured service in the given country.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsActivateClient::acquire_number",
            skip_all,
            fields(country = %country.alpha2())
        )
    )]
    pub async fn acquire_number(&self, country: CountryCode) -> Result<LeaseResponse> {
        let country_id = sms_activate_id(country)
            .ok_or(SmsActivateError::CountryMapping { country })?;

        let url = self.build_request_url(
            "getNumberV2",
            vec![
                ("service", self.service_code.clone()),
                ("country", country_id.to_string()),
            ],
        )?;

        let text = self.send_request(url).await?;
        let lease = Self::decode::<LeaseResponse>(&text)?;

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("lease_id", lease.lease_id.as_ref())
                .record("phone_number", lease.phone_number.as_str())
                .set_status(Status::Ok);
        }

        Ok(lease)
    }

    /// Poll the activation status for a received SMS.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsActivateClient::sms_status",
            skip_all,
            fields(lease_id = %lease_id)
        )
    )]
    pub async fn sms_status(&self, lease_id: &LeaseId) -> Result<SmsStatusResponse> {
        let url = self.build_request_url("getStatusV2", vec![("id", lease_id.to_string())])?;

        let text = self.send_request(url).await?;
        let status = Self::decode::<SmsStatusResponse>(&text)?;

        #[cfg(feature = "tracing")]
        if let Some(sms) = &status.sms
            && !sms.code.is_empty()
        {
            Span::current()
                .record("sms_code", sms.code.as_str())
                .set_status(Status::Ok);
        }

        Ok(status)
    }

    /// Move an activation to a new status (ready / finish / cancel).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsActivateClient::set_status",
            skip_all,
            fields(lease_id = %lease_id, status = %status)
        )
    )]
    pub async fn set_status(
        &self,
        lease_id: &LeaseId,
        status: ActivationStatus,
    ) -> Result<StatusAck> {
        let url = self.build_request_url(
            "setStatus",
            vec![
                ("id", lease_id.to_string()),
                ("status", status.code().to_string()),
            ],
        )?;

        let text = self.send_request(url).await?;

        if let Some(error) = parse_service_error(&text) {
            return Err(SmsActivateError::Service(error));
        }

        StatusAck::from_raw(&text).ok_or(SmsActivateError::UnexpectedStatusResponse { raw: text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::sms_activate::errors::SmsActivateErrorCode;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_acquire_number_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("action", "getNumberV2"))
            .and(query_param("service", "wa"))
            .and(query_param("country", "16"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "activationId": "123456789",
                "phoneNumber": "447700900123",
                "activationCost": 10.5,
                "countryCode": "44",
                "activationOperator": "vodafone"
            })))
            .mount(&mock_server)
            .await;

        let client = SmsActivateClient::new(mock_server.uri(), "test_key").unwrap();
        let lease = client.acquire_number(CountryCode::GBR).await.unwrap();

        assert_eq!(lease.lease_id.as_ref(), "123456789");
        assert_eq!(lease.phone_number, "447700900123");
    }

    #[tokio::test]
    async fn test_acquire_number_no_numbers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("action", "getNumberV2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("NO_NUMBERS"))
            .mount(&mock_server)
            .await;

        let client = SmsActivateClient::new(mock_server.uri(), "test_key").unwrap();
        let result = client.acquire_number(CountryCode::GBR).await;

        match result.unwrap_err() {
            SmsActivateError::Service(error) => {
                assert_eq!(error.code, SmsActivateErrorCode::NoNumbers);
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_acquire_number_unmapped_country() {
        let client = SmsActivateClient::with_api_key("test_key").unwrap();
        let result = client.acquire_number(CountryCode::JPN).await;
        assert!(matches!(
            result,
            Err(SmsActivateError::CountryMapping { .. })
        ));
    }

    #[tokio::test]
    async fn test_sms_status_with_code() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("action", "getStatusV2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sms": {"code": "482913", "text": "Your code is 482913"}
            })))
            .mount(&mock_server)
            .await;

        let client = SmsActivateClient::new(mock_server.uri(), "test_key").unwrap();
        let status = client.sms_status(&LeaseId::from("1")).await.unwrap();
        assert_eq!(status.sms.unwrap().code, "482913");
    }

    #[tokio::test]
    async fn test_set_status_cancel_ack() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("action", "setStatus"))
            .and(query_param("status", "8"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_CANCEL"))
            .mount(&mock_server)
            .await;

        let client = SmsActivateClient::new(mock_server.uri(), "test_key").unwrap();
        let ack = client
            .set_status(&LeaseId::from("1"), ActivationStatus::Cancel)
            .await
            .unwrap();
        assert_eq!(ack, StatusAck::Cancel);
    }
}
