//! Integration Test: 決済APIプローブ
//!
//! 合成トランザクションの送信内容と応答の分類を検証する。

use paylink_checker::health::CheckResult;
use paylink_checker::probe::{PaymentProbe, Probe};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{pay_url_response, payment_config, respond_payment, PAYMENT_PATH};

/// 固定項目付きの合成トランザクションをPOSTする
#[tokio::test]
async fn test_probe_posts_synthetic_transaction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PAYMENT_PATH))
        .and(body_partial_json(json!({
            "amount": "100.00",
            "comment": "🚀 Health Check",
            "redirect_url": "https://shop.example/success",
            "token": "bank-token"
        })))
        .respond_with(pay_url_response("https://pay.example/x"))
        .expect(1)
        .mount(&server)
        .await;

    let probe = PaymentProbe::new(&payment_config(&server)).unwrap();
    let id = Uuid::new_v4();
    let result = probe.check_with_id(id).await;

    assert_eq!(
        result,
        CheckResult::Healthy {
            pay_url: "https://pay.example/x".to_string()
        }
    );
    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["transaction_id"], id.to_string());
}

/// 毎回新しいトランザクションIDを使う
#[tokio::test]
async fn test_probe_generates_fresh_transaction_ids() {
    let server = MockServer::start().await;
    respond_payment(&server, pay_url_response("https://pay.example/x")).await;

    let probe = PaymentProbe::new(&payment_config(&server)).unwrap();
    probe.check().await;
    probe.check().await;

    let requests = server.received_requests().await.unwrap();
    let ids: Vec<String> = requests
        .iter()
        .map(|request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            body["transaction_id"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(ids.iter().all(|id| Uuid::parse_str(id).is_ok()));
}

/// 200以外はHttpError（ステータスと本文を保持）
#[tokio::test]
async fn test_probe_http_error() {
    let server = MockServer::start().await;
    respond_payment(
        &server,
        ResponseTemplate::new(502).set_body_json(json!({"detail": "Bank is temporarily unavailable"})),
    )
    .await;

    let probe = PaymentProbe::new(&payment_config(&server)).unwrap();
    match probe.check().await {
        CheckResult::HttpError {
            status_code,
            raw_body,
        } => {
            assert_eq!(status_code, 502);
            assert!(raw_body.contains("Bank is temporarily unavailable"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

/// 200で`pay_url`が無ければMissingPayUrl
#[tokio::test]
async fn test_probe_missing_pay_url() {
    let server = MockServer::start().await;
    respond_payment(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"status": "created"})),
    )
    .await;

    let probe = PaymentProbe::new(&payment_config(&server)).unwrap();
    assert_eq!(
        probe.check().await,
        CheckResult::MissingPayUrl {
            status_code: 200,
            raw_body: r#"{"status":"created"}"#.to_string()
        }
    );
}

/// タイムアウトはNetworkError
#[tokio::test]
async fn test_probe_timeout_is_network_error() {
    let server = MockServer::start().await;
    respond_payment(
        &server,
        pay_url_response("https://pay.example/x").set_delay(Duration::from_secs(4)),
    )
    .await;

    let probe = PaymentProbe::new(&payment_config(&server)).unwrap();
    match probe.check().await {
        CheckResult::NetworkError { cause } => {
            assert!(cause.contains("timed out after 2s"), "{cause}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    // 1回のチェックで再試行しない
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
