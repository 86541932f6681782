//! End-to-end tests of the gateway client against a mock gateway.
//!
//! Identifiers are fixed so the signed payload, and therefore the expected
//! `X-VERIFY` header, is known in advance.

use std::sync::Arc;
use std::time::Duration;

use paygate_client::{GatewayConfig, PhonePeClient};
use paygate_types::{IdGenerator, PaymentError, PaymentGateway, PaymentState};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MERCHANT_ID: &str = "PGTESTPAYUAT";
const SALT_KEY: &str = "099eb0cd-02cf-4e2a-8aca-3e6c6aff0399";

const EXPECTED_PAYLOAD: &str = "eyJtZXJjaGFudElkIjoiUEdURVNUUEFZVUFUIiwibWVyY2hhbnRUcmFuc2FjdGlvbklkIjoiTVQxMDAxIiwibWVyY2hhbnRVc2VySWQiOiJNVUlEMTAwMSIsImFtb3VudCI6NDk5MDAsInJlZGlyZWN0VXJsIjoiaHR0cHM6Ly9zaG9wLmV4YW1wbGUvcGF5bWVudC1zdGF0dXMiLCJyZWRpcmVjdE1vZGUiOiJQT1NUIiwiY2FsbGJhY2tVcmwiOiJodHRwczovL3Nob3AuZXhhbXBsZS9hcGkvcGF5bWVudC1jYWxsYmFjayIsIm1vYmlsZU51bWJlciI6Ijk5OTk5OTk5OTkiLCJwYXltZW50SW5zdHJ1bWVudCI6eyJ0eXBlIjoiUEFZX1BBR0UifX0=";
const EXPECTED_CHECKSUM: &str =
    "3b7db13cb1ad1e8ed8f1f2463f2dd744ad0977eaa0665c2c654a39cbd2796f5a###1";

struct FixedIds;

impl IdGenerator for FixedIds {
    fn transaction_id(&self) -> String {
        "MT1001".into()
    }

    fn user_id(&self) -> String {
        "MUID1001".into()
    }
}

fn config_for(server: &MockServer) -> GatewayConfig {
    GatewayConfig::new(MERCHANT_ID, SALT_KEY, 1)
        .with_api_base_url(server.uri())
        .with_app_base_url("https://shop.example")
}

fn client_for(server: &MockServer) -> PhonePeClient {
    PhonePeClient::with_id_generator(config_for(server), Arc::new(FixedIds)).unwrap()
}

fn success_body(url: &str) -> serde_json::Value {
    json!({
        "success": true,
        "code": "PAYMENT_INITIATED",
        "message": "Payment initiated",
        "data": {
            "merchantId": MERCHANT_ID,
            "merchantTransactionId": "MT1001",
            "instrumentResponse": {
                "type": "PAY_PAGE",
                "redirectInfo": { "url": url, "method": "GET" }
            }
        }
    })
}

#[tokio::test]
async fn test_initiate_payment_returns_redirect_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .and(header("Content-Type", "application/json"))
        .and(header("X-VERIFY", EXPECTED_CHECKSUM))
        .and(header("X-MERCHANT-ID", MERCHANT_ID))
        .and(body_json(json!({ "request": EXPECTED_PAYLOAD })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("https://pay.example/x")))
        .expect(1)
        .mount(&server)
        .await;

    let url = client_for(&server)
        .initiate_payment(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap();

    assert_eq!(url, "https://pay.example/x");
}

#[tokio::test]
async fn test_create_checkout_returns_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("https://pay.example/x")))
        .mount(&server)
        .await;

    let session = client_for(&server)
        .create_checkout(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap();

    assert_eq!(session.merchant_transaction_id, "MT1001");
    assert_eq!(session.merchant_user_id, "MUID1001");
    assert_eq!(session.amount.get(), 49_900);
    assert_eq!(session.formatted_amount(), "₹499.00");
    assert_eq!(session.redirect_url, "https://pay.example/x");
}

#[tokio::test]
async fn test_gateway_rejection_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "insufficient limit" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .initiate_payment(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::GatewayRejected(_)));
    assert!(err.to_string().contains("insufficient limit"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_gateway_rejection_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .initiate_payment(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Payment failed: Payment initiation failed");
}

#[tokio::test]
async fn test_missing_redirect_url_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "instrumentResponse": { "redirectInfo": {} } }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .initiate_payment(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_non_json_success_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .initiate_payment(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_invalid_amount_fails_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("https://pay.example/x")))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for amount in [f64::NAN, 0.0, -1.0, f64::INFINITY] {
        let err = client
            .initiate_payment(amount, "", "asha@example.com", "Asha")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Validation(_)), "amount {amount}");
    }
}

#[tokio::test]
async fn test_error_status_with_message_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "code": "BAD_REQUEST",
            "message": "Please check the inputs you have provided."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .initiate_payment(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Payment failed: Please check the inputs you have provided."
    );
}

#[tokio::test]
async fn test_error_status_without_body_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .initiate_payment(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::GatewayUnreachable(_)));
    assert!(err.is_retryable());
    assert!(err.to_string().starts_with("Failed to initiate payment. Please try again."));
}

#[tokio::test]
async fn test_connection_failure_is_unreachable() {
    let config = GatewayConfig::new(MERCHANT_ID, SALT_KEY, 1)
        .with_api_base_url("http://127.0.0.1:9")
        .with_timeout(Duration::from_secs(2));
    let client = PhonePeClient::with_id_generator(config, Arc::new(FixedIds)).unwrap();

    let err = client
        .initiate_payment(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::GatewayUnreachable(_)));
}

#[tokio::test]
async fn test_timeout_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(success_body("https://pay.example/x"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server).with_timeout(Duration::from_millis(200));
    let client = PhonePeClient::with_id_generator(config, Arc::new(FixedIds)).unwrap();

    let err = client
        .initiate_payment(499.0, "", "asha@example.com", "Asha")
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentError::GatewayUnreachable(_)));
}

#[tokio::test]
async fn test_check_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pg/v1/status/PGTESTPAYUAT/MT1001"))
        .and(header(
            "X-VERIFY",
            "2a3a619717349c8766ec56857d9e4e88f140529951b05d8ff8e019e02ea7b6c6###1",
        ))
        .and(header("X-MERCHANT-ID", MERCHANT_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "code": "PAYMENT_SUCCESS",
            "message": "Your payment is successful.",
            "data": {
                "merchantId": MERCHANT_ID,
                "merchantTransactionId": "MT1001",
                "transactionId": "T2401011200",
                "amount": 49900,
                "state": "COMPLETED",
                "responseCode": "SUCCESS"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client_for(&server).check_status("MT1001").await.unwrap();

    assert_eq!(status.state, PaymentState::Completed);
    assert_eq!(status.amount, 49_900);
    assert_eq!(status.transaction_id.as_deref(), Some("T2401011200"));
}

#[tokio::test]
async fn test_check_status_pending_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pg/v1/status/PGTESTPAYUAT/MT1001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "code": "PAYMENT_PENDING",
            "message": "Your payment is in pending state.",
            "data": {
                "merchantId": MERCHANT_ID,
                "merchantTransactionId": "MT1001",
                "amount": 49900,
                "state": "PENDING"
            }
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).check_status("MT1001").await.unwrap();

    assert_eq!(status.state, PaymentState::Pending);
    assert!(!status.state.is_final());
    assert_eq!(status.transaction_id, None);
}

#[tokio::test]
async fn test_check_status_unknown_transaction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pg/v1/status/PGTESTPAYUAT/MT404"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "code": "TRANSACTION_NOT_FOUND",
            "message": "No Transaction found with the given details."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).check_status("MT404").await.unwrap_err();

    assert!(matches!(err, PaymentError::GatewayRejected(msg) if msg.contains("No Transaction found")));
}

#[tokio::test]
async fn test_check_status_rejects_bad_id_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.check_status("  ").await,
        Err(PaymentError::Validation(_))
    ));
    assert!(matches!(
        client.check_status("MT1/../admin").await,
        Err(PaymentError::Validation(_))
    ));
}

#[tokio::test]
async fn test_gateway_port_delegates_to_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pg/v1/pay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("https://pay.example/y")))
        .mount(&server)
        .await;

    let gateway: Box<dyn PaymentGateway> = Box::new(client_for(&server));
    let url = gateway
        .initiate_payment(10.0, "9876543210", "asha@example.com", "Asha")
        .await
        .unwrap();

    assert_eq!(url, "https://pay.example/y");
}

#[test]
fn test_verify_callback() {
    let response = "eyJzdWNjZXNzIjp0cnVlLCJjb2RlIjoiUEFZTUVOVF9TVUNDRVNTIiwibWVzc2FnZSI6IllvdXIgcGF5bWVudCBpcyBzdWNjZXNzZnVsLiIsImRhdGEiOnsibWVyY2hhbnRJZCI6IlBHVEVTVFBBWVVBVCIsIm1lcmNoYW50VHJhbnNhY3Rpb25JZCI6Ik1UMTAwMSIsInRyYW5zYWN0aW9uSWQiOiJUMjQwMTAxMTIwMCIsImFtb3VudCI6NDk5MDAsInN0YXRlIjoiQ09NUExFVEVEIiwicmVzcG9uc2VDb2RlIjoiU1VDQ0VTUyJ9fQ==";
    let x_verify = "6ad95f960f4d3973e9d9416165c46f86d725901761518ea57a30dcaf0c9cbf7d###1";

    let client =
        PhonePeClient::with_id_generator(GatewayConfig::new(MERCHANT_ID, SALT_KEY, 1), Arc::new(FixedIds))
            .unwrap();

    let payload = client.verify_callback(response, x_verify).unwrap();
    assert!(payload.success);
    let data = payload.data.unwrap();
    assert_eq!(data.merchant_transaction_id, "MT1001");
    assert_eq!(data.state, PaymentState::Completed);

    assert!(matches!(
        client.verify_callback(response, "deadbeef###1"),
        Err(PaymentError::InvalidChecksum)
    ));
}

#[test]
fn test_verify_callback_rejects_undecodable_payload() {
    let client =
        PhonePeClient::with_id_generator(GatewayConfig::new(MERCHANT_ID, "s", 1), Arc::new(FixedIds))
            .unwrap();
    let response = "not base64!";
    let x_verify = paygate_client::checksum::checksum(response, "s", 1);

    assert!(matches!(
        client.verify_callback(response, &x_verify),
        Err(PaymentError::MalformedResponse(_))
    ));
}

#[test]
fn test_verify_callback_body() {
    let body = r#"{"response":"eyJzdWNjZXNzIjp0cnVlLCJjb2RlIjoiUEFZTUVOVF9TVUNDRVNTIiwibWVzc2FnZSI6IllvdXIgcGF5bWVudCBpcyBzdWNjZXNzZnVsLiIsImRhdGEiOnsibWVyY2hhbnRJZCI6IlBHVEVTVFBBWVVBVCIsIm1lcmNoYW50VHJhbnNhY3Rpb25JZCI6Ik1UMTAwMSIsInRyYW5zYWN0aW9uSWQiOiJUMjQwMTAxMTIwMCIsImFtb3VudCI6NDk5MDAsInN0YXRlIjoiQ09NUExFVEVEIiwicmVzcG9uc2VDb2RlIjoiU1VDQ0VTUyJ9fQ=="}"#;
    let x_verify = "6ad95f960f4d3973e9d9416165c46f86d725901761518ea57a30dcaf0c9cbf7d###1";

    let client =
        PhonePeClient::with_id_generator(GatewayConfig::new(MERCHANT_ID, SALT_KEY, 1), Arc::new(FixedIds))
            .unwrap();

    let payload = client.verify_callback_body(body, x_verify).unwrap();
    assert_eq!(payload.code.as_deref(), Some("PAYMENT_SUCCESS"));
    assert_eq!(payload.data.unwrap().amount, 49_900);

    assert!(matches!(
        client.verify_callback_body("not json", x_verify),
        Err(PaymentError::Validation(_))
    ));
}
