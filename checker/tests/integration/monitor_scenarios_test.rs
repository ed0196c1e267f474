//! Integration Test: ヘルスモニターのシナリオ
//!
//! 決済APIとTelegram Bot APIをモックし、障害→復旧の一連の流れで
//! 通知が遷移時にだけ送られることを検証する。

use std::time::Duration;

use paylink_checker::health::{CheckResult, Transition};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paylink_checker::probe::PaymentProbe;
use paylink_checker_common::config::PaymentProbeConfig;

use crate::support::{
    monitor, monitor_with_probe, pay_url_response, respond_payment, send_message_path, sent_texts,
};

async fn telegram_ok() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;
    server
}

/// シナリオ1: 初回から正常 → 状態はHealthyのまま、通知なし
#[tokio::test]
async fn test_scenario_healthy_first_poll() {
    let payment = MockServer::start().await;
    let telegram = telegram_ok().await;
    respond_payment(&payment, pay_url_response("https://pay/x")).await;

    let mut monitor = monitor(&payment, &telegram);
    let report = monitor.poll_once().await;

    assert_eq!(
        report.result,
        CheckResult::Healthy {
            pay_url: "https://pay/x".to_string()
        }
    );
    assert_eq!(report.transition, Transition::StayedHealthy);
    assert!(!monitor.state().is_broken());
    assert!(sent_texts(&telegram).await.is_empty());
}

/// シナリオ2・3: 500で障害通知1回、継続中は通知なし、復旧で復旧通知1回
#[tokio::test]
async fn test_scenario_incident_and_recovery() {
    let payment = MockServer::start().await;
    let telegram = telegram_ok().await;
    let mut monitor = monitor(&payment, &telegram);

    respond_payment(
        &payment,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let first = monitor.poll_once().await;
    assert_eq!(first.transition, Transition::BecameBroken);
    assert_eq!(first.notified, Some(true));
    assert_eq!(first.next_poll, Duration::from_secs(60));

    for _ in 0..3 {
        let repeat = monitor.poll_once().await;
        assert_eq!(repeat.transition, Transition::StayedBroken);
        assert_eq!(repeat.notified, None);
    }

    let texts = sent_texts(&telegram).await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("⚠️ "));
    assert!(texts[0].contains("500"));
    assert!(texts[0].contains("Internal Server Error"));

    respond_payment(&payment, pay_url_response("https://pay/x")).await;
    let recovered = monitor.poll_once().await;
    assert_eq!(recovered.transition, Transition::Recovered);
    assert_eq!(recovered.notified, Some(true));
    assert_eq!(recovered.next_poll, Duration::from_secs(300));
    assert!(!monitor.state().is_broken());

    let texts = sent_texts(&telegram).await;
    assert_eq!(texts.len(), 2);
    assert!(texts[1].contains("recovered"));
}

/// シナリオ4: 200で`pay_url`無し → HTTPエラーと同じくBrokenへ
#[tokio::test]
async fn test_scenario_missing_pay_url_breaks() {
    let payment = MockServer::start().await;
    let telegram = telegram_ok().await;
    respond_payment(
        &payment,
        ResponseTemplate::new(200).set_body_json(json!({"detail": "ok"})),
    )
    .await;

    let mut monitor = monitor(&payment, &telegram);
    let report = monitor.poll_once().await;

    assert!(matches!(report.result, CheckResult::MissingPayUrl { .. }));
    assert_eq!(report.transition, Transition::BecameBroken);
    assert_eq!(report.next_poll, Duration::from_secs(60));

    let texts = sent_texts(&telegram).await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("pay_url"));
}

/// シナリオ5: Telegram停止中 → 再試行を使い切っても落ちず、短い間隔で次のチェックへ
#[tokio::test]
async fn test_scenario_messaging_outage() {
    let payment = MockServer::start().await;
    let telegram = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&telegram)
        .await;
    respond_payment(&payment, ResponseTemplate::new(500)).await;

    let mut monitor = monitor(&payment, &telegram);
    let report = monitor.poll_once().await;

    assert_eq!(report.transition, Transition::BecameBroken);
    assert_eq!(report.notified, Some(false));
    assert_eq!(report.next_poll, Duration::from_secs(60));
    assert!(monitor.state().is_broken());

    // 次のサイクルも通常通り実行され、再送はしない
    let next = monitor.poll_once().await;
    assert_eq!(next.transition, Transition::StayedBroken);
    assert_eq!(next.notified, None);
}

/// 接続不能な決済APIもBrokenとして扱う
#[tokio::test]
async fn test_unreachable_payment_api_breaks() {
    let telegram = telegram_ok().await;
    // ポート1は通常リッスンされていない
    let probe = PaymentProbe::new(&PaymentProbeConfig {
        api_url: "http://127.0.0.1:1/make-payment-link/".to_string(),
        api_token: "bank-token".to_string(),
        request_timeout_secs: 2,
        ..Default::default()
    })
    .unwrap();
    let mut monitor = monitor_with_probe(probe, &telegram);

    let report = monitor.poll_once().await;
    assert!(matches!(report.result, CheckResult::NetworkError { .. }));
    assert_eq!(report.transition, Transition::BecameBroken);

    let texts = sent_texts(&telegram).await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Could not connect"));
}
