use anypay::core::kernel::{
    sha256_hex, HttpRequest, ReqwestTransport, Transport, TransportConfig,
};
use anypay::{build_client, AccountApi, AnyPayConfig, AnyPayError, TransportError};
use std::time::Duration;
use wiremock::matchers::{body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AnyPayConfig {
    AnyPayConfig::new(
        "1234".to_string(),
        "apikey".to_string(),
        "secret".to_string(),
        77,
    )
    .api_url(format!("{}/api", server.uri()))
    .timeout_seconds(5)
}

#[tokio::test]
async fn test_balance_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/balance/1234"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string(format!("sign={}", sha256_hex("balance1234apikey"))))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result":{"balance":"321.40"}}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_client(config_for(&mock_server)).unwrap();
    let balance = client.get_balance().await.unwrap();

    assert!((balance.balance - 321.4).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_commissions_form_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/commissions/1234"))
        .and(body_string_contains("project_id=77&sign="))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": {"qiwi": 4.0}})),
        )
        .mount(&mock_server)
        .await;

    let client = build_client(config_for(&mock_server)).unwrap();
    let commissions = client.get_commissions().await.unwrap();

    assert_eq!(commissions.len(), 1);
}

#[tokio::test]
async fn test_server_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rates/1234"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let client = build_client(config_for(&mock_server)).unwrap();
    let err = client.get_rates().await.unwrap_err();

    assert!(
        matches!(err, AnyPayError::HttpStatus { code: 500, ref message } if message == "Response error: 500")
    );
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"result":{"balance":1}}"#)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let transport = ReqwestTransport::new(TransportConfig::default().with_timeout(1)).unwrap();
    let request = HttpRequest::post_form(
        format!("{}/api/balance/1234", mock_server.uri()),
        vec![("sign".to_string(), "abc".to_string())],
    )
    .unwrap();

    let err = transport.send(request).await.unwrap_err();
    assert_eq!(err, TransportError::TimedOut);
}

#[tokio::test]
async fn test_unreachable_host_is_a_transport_failure() {
    let transport = ReqwestTransport::new(TransportConfig::default().with_timeout(2)).unwrap();
    let request = HttpRequest::post_form(
        "http://127.0.0.1:9/api/balance/1234".to_string(),
        vec![("sign".to_string(), "abc".to_string())],
    )
    .unwrap();

    let err = transport.send(request).await.unwrap_err();
    assert!(matches!(err, TransportError::Failed(_)));
}
