//! Telegram Bot APIによる通知

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use paylink_checker_common::config::TelegramConfig;
use paylink_checker_common::protocol::{TelegramApiResponse, TelegramSendMessage};
use reqwest::Client;
use tracing::{error, info, warn};

use super::Notifier;
use crate::error::MonitorError;

/// 本文の先頭に付ける警告記号
const WARNING_PREFIX: &str = "⚠️";

/// 再試行ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大試行回数（1以上）
    pub max_attempts: u32,
    /// 試行間の待機
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// `attempt`を成功するまで最大`max_attempts`回、`delay`間隔で実行する
    ///
    /// 0回指定でも1回は実行する。
    pub async fn run<F, Fut>(&self, mut attempt: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), String>>,
    {
        let max_attempts = self.max_attempts.max(1);

        for n in 1..=max_attempts {
            match attempt().await {
                Ok(()) => {
                    info!(attempt = n, "📬 Notification sent to Telegram");
                    return true;
                }
                Err(reason) => {
                    warn!(
                        attempt = n,
                        max_attempts,
                        reason = %reason,
                        "Failed to send Telegram notification"
                    );
                }
            }

            if n < max_attempts {
                tokio::time::sleep(self.delay).await;
            }
        }

        error!(attempts = max_attempts, "Giving up on Telegram notification");
        false
    }
}

/// Telegramへの通知
pub struct TelegramNotifier {
    client: Client,
    send_url: String,
    chat_id: String,
    topic_id: Option<String>,
    retry: RetryPolicy,
}

impl TelegramNotifier {
    /// 設定から作成（1回の送信に`timeout_secs`のタイムアウト）
    pub fn new(config: &TelegramConfig) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            send_url: format!(
                "{}/bot{}/sendMessage",
                config.api_base_url.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
            topic_id: config.topic_id.clone(),
            retry: RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                delay: Duration::from_secs(config.retry_delay_secs),
            },
        })
    }

    /// 再試行ポリシーを差し替える
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = RetryPolicy {
            max_attempts: retry.max_attempts.max(1),
            ..retry
        };
        self
    }

    fn build_message(&self, message: &str) -> TelegramSendMessage {
        TelegramSendMessage {
            chat_id: self.chat_id.clone(),
            text: format!("{WARNING_PREFIX} {message}"),
            message_thread_id: self.topic_id.clone(),
        }
    }

    /// 1回だけ送信する。失敗理由を返す（URLにはトークンが含まれるため出さない）
    async fn try_send(&self, form: &TelegramSendMessage) -> Result<(), String> {
        let response = self
            .client
            .post(&self.send_url)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "request timed out".to_string()
                } else if e.is_connect() {
                    "connection failed".to_string()
                } else {
                    e.without_url().to_string()
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let description = response
            .json::<TelegramApiResponse>()
            .await
            .ok()
            .and_then(|body| body.description)
            .unwrap_or_default();
        Err(format!("HTTP {} {}", status.as_u16(), description)
            .trim_end()
            .to_string())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> bool {
        let form = self.build_message(message);

        self.retry.run(|| self.try_send(&form)).await
    }
}
