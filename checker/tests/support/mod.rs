//! 統合テスト用の共通ユーティリティ

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use paylink_checker::health::{HealthMonitor, PollIntervals};
use paylink_checker::notify::{RetryPolicy, TelegramNotifier};
use paylink_checker::probe::PaymentProbe;
use paylink_checker_common::config::{PaymentProbeConfig, TelegramConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 決済APIモックのパス
pub const PAYMENT_PATH: &str = "/api/v1/payments/make-payment-link/";

/// テスト用Botトークン
pub const BOT_TOKEN: &str = "123456:test-token";

/// Telegram `sendMessage` モックのパス
pub fn send_message_path() -> String {
    format!("/bot{}/sendMessage", BOT_TOKEN)
}

/// モック決済APIを向いたプローブ設定
pub fn payment_config(server: &MockServer) -> PaymentProbeConfig {
    PaymentProbeConfig {
        api_url: format!("{}{}", server.uri(), PAYMENT_PATH),
        api_token: "bank-token".to_string(),
        redirect_url: "https://shop.example/success".to_string(),
        request_timeout_secs: 2,
    }
}

/// モックTelegramを向いた通知設定
pub fn telegram_config(server: &MockServer) -> TelegramConfig {
    let mut config = TelegramConfig::new(BOT_TOKEN, "-100500");
    config.api_base_url = server.uri();
    config
}

/// 短い再試行間隔のTelegram通知
pub fn fast_notifier(server: &MockServer) -> TelegramNotifier {
    TelegramNotifier::new(&telegram_config(server))
        .expect("notifier should build")
        .with_retry_policy(RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(20),
        })
}

/// 決済APIとTelegramのモックに接続したモニター（通常300s・障害中60s）
pub fn monitor(payment: &MockServer, telegram: &MockServer) -> HealthMonitor {
    let probe = PaymentProbe::new(&payment_config(payment)).expect("probe should build");
    monitor_with_probe(probe, telegram)
}

/// 任意のプローブでモニターを作成
pub fn monitor_with_probe(probe: PaymentProbe, telegram: &MockServer) -> HealthMonitor {
    HealthMonitor::new(
        Arc::new(probe),
        Arc::new(fast_notifier(telegram)),
        PollIntervals {
            normal: Duration::from_secs(300),
            fast: Duration::from_secs(60),
            adaptive: true,
        },
        Duration::ZERO,
    )
}

/// 決済APIの応答を差し替える
pub async fn respond_payment(server: &MockServer, response: ResponseTemplate) {
    server.reset().await;
    Mock::given(method("POST"))
        .and(path(PAYMENT_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

/// 正常な決済リンク応答
pub fn pay_url_response(url: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "pay_url": url }))
}

/// Telegramへ届いたメッセージ本文
pub async fn sent_texts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| {
            serde_urlencoded::from_bytes::<Vec<(String, String)>>(&request.body)
                .ok()?
                .into_iter()
                .find(|(key, _)| key == "text")
                .map(|(_, value)| value)
        })
        .collect()
}
