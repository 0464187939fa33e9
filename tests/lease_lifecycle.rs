//! Lease lifecycle tests against a mocked SMS Activate endpoint.
//!
//! Exercises the real `SmsLeaseClient` over the real provider with
//! wiremock standing in for the remote service.

use account_provisioner::providers::sms_activate::{SmsActivateClient, SmsActivateProvider};
use account_provisioner::{
    FullNumber, LeaseClientError, LeaseId, LeaseState, PhoneLease, SmsLeaseClient,
    SmsLeaseClientTrait,
};
use isocountry::CountryCode;
use std::time::Duration;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(mock_server: &MockServer) -> SmsLeaseClient<SmsActivateProvider> {
    let provider = SmsActivateProvider::new(
        SmsActivateClient::new(mock_server.uri(), "test_key").unwrap(),
    );
    SmsLeaseClient::builder(provider)
        .code_wait_timeout(Duration::from_secs(2))
        .poll_interval(Duration::from_millis(50))
        .acquire_attempts(3)
        .build()
}

fn lease_json(id: &str, number: &str) -> serde_json::Value {
    serde_json::json!({
        "activationId": id,
        "phoneNumber": number,
        "countryCode": "33"
    })
}

#[tokio::test]
async fn acquire_returns_lease_for_requested_country() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "getNumberV2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lease_json("42", "33700900123")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let lease = client.acquire_number(CountryCode::FRA).await.unwrap();

    assert_eq!(lease.country(), CountryCode::FRA);
    assert_eq!(lease.lease_id().as_ref(), "42");
    assert_eq!(lease.state(), LeaseState::Leased);
}

#[tokio::test]
async fn no_numbers_fails_on_the_first_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "getNumberV2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("NO_NUMBERS"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.acquire_number(CountryCode::FRA).await.unwrap_err();

    assert!(matches!(
        err,
        LeaseClientError::NoNumbersAvailable {
            country: CountryCode::FRA
        }
    ));
}

#[tokio::test]
async fn transient_service_error_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "getNumberV2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ERROR_SQL"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("action", "getNumberV2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lease_json("43", "33700900124")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let lease = client.acquire_number(CountryCode::FRA).await.unwrap();

    assert_eq!(lease.lease_id().as_ref(), "43");
}

#[tokio::test]
async fn empty_number_is_cancelled_and_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "getNumberV2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lease_json("44", "")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("action", "setStatus"))
        .and(query_param("status", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_CANCEL"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.acquire_number(CountryCode::FRA).await.unwrap_err();

    assert!(matches!(err, LeaseClientError::EmptyNumber { .. }));
}

#[tokio::test]
async fn zero_timeout_wait_fails_without_polling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "getStatusV2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("action", "setStatus"))
        .and(query_param("status", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_CANCEL"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = SmsActivateProvider::new(
        SmsActivateClient::new(mock_server.uri(), "test_key").unwrap(),
    );
    let client = SmsLeaseClient::builder(provider)
        .code_wait_timeout(Duration::ZERO)
        .build();

    let mut lease = PhoneLease::new(
        LeaseId::from("45"),
        FullNumber::from("33700900125"),
        CountryCode::FRA,
    );

    let err = client.wait_for_code(&mut lease).await.unwrap_err();

    match err {
        LeaseClientError::SmsTimeout { poll_count, .. } => assert_eq!(poll_count, 0),
        other => panic!("expected SmsTimeout, got {other:?}"),
    }
    assert_eq!(lease.state(), LeaseState::Cancelled);
}

#[tokio::test]
async fn cancel_lease_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "setStatus"))
        .and(query_param("status", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_CANCEL"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut lease = PhoneLease::new(
        LeaseId::from("46"),
        FullNumber::from("33700900126"),
        CountryCode::FRA,
    );

    client.cancel_lease(&mut lease).await;
    client.cancel_lease(&mut lease).await;

    assert_eq!(lease.state(), LeaseState::Cancelled);
}

#[tokio::test]
async fn full_lifecycle_reaches_consumed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "getNumberV2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lease_json("47", "33700900127")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("action", "setStatus"))
        .and(query_param("status", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_READY"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("action", "getStatusV2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sms": { "code": "482913", "text": "Your code is 482913" }
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("action", "setStatus"))
        .and(query_param("status", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_ACTIVATION"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let mut lease = client.acquire_number(CountryCode::FRA).await.unwrap();
    client.request_code(&mut lease).await.unwrap();
    assert_eq!(lease.state(), LeaseState::CodeRequested);

    let code = client.wait_for_code(&mut lease).await.unwrap();
    assert_eq!(code.as_str(), "482913");
    assert_eq!(lease.state(), LeaseState::CodeReceived);

    client.consume(&mut lease).await.unwrap();
    assert_eq!(lease.state(), LeaseState::Consumed);
}

#[tokio::test]
async fn double_request_code_is_a_state_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("action", "setStatus"))
        .and(query_param("status", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_READY"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut lease = PhoneLease::new(
        LeaseId::from("48"),
        FullNumber::from("33700900128"),
        CountryCode::FRA,
    );

    client.request_code(&mut lease).await.unwrap();
    let err = client.request_code(&mut lease).await.unwrap_err();

    assert!(matches!(err, LeaseClientError::LeaseState(_)));
}
