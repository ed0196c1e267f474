//! 設定管理
//!
//! MonitorConfig, TelegramConfig等の設定構造体

use serde::{Deserialize, Serialize};

use crate::error::CommonError;

/// ヘルスチェッカー全体の設定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 決済APIプローブ設定
    pub payment: PaymentProbeConfig,

    /// ポーリングスケジュール設定
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Telegram通知設定（未設定なら通知不可）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<TelegramConfig>,

    /// 決済リンク検証設定
    #[serde(default)]
    pub link_verification: LinkVerificationConfig,
}

impl MonitorConfig {
    /// 必須項目と数値範囲を検証
    pub fn validate(&self) -> Result<(), CommonError> {
        if self.payment.api_url.trim().is_empty() {
            return Err(CommonError::Config(
                "payment API URL is not set (CHECKER_PAYMENT_API_URL)".to_string(),
            ));
        }
        if self.payment.api_token.trim().is_empty() {
            return Err(CommonError::Config(
                "payment API token is not set (CHECKER_PAYMENT_API_TOKEN)".to_string(),
            ));
        }
        if self.schedule.poll_interval_secs == 0 || self.schedule.fast_poll_interval_secs == 0 {
            return Err(CommonError::Validation(
                "poll intervals must be greater than zero".to_string(),
            ));
        }
        if self.payment.request_timeout_secs == 0 {
            return Err(CommonError::Validation(
                "payment request timeout must be greater than zero".to_string(),
            ));
        }
        if self.link_verification.navigation_timeout_secs == 0 {
            return Err(CommonError::Validation(
                "link verification navigation timeout must be greater than zero".to_string(),
            ));
        }
        if let Some(telegram) = &self.telegram {
            if telegram.max_attempts == 0 {
                return Err(CommonError::Validation(
                    "notification max_attempts must be greater than zero".to_string(),
                ));
            }
            if telegram.timeout_secs == 0 {
                return Err(CommonError::Validation(
                    "notification timeout must be greater than zero".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// 決済APIプローブ設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentProbeConfig {
    /// 決済リンク生成APIのURL
    #[serde(default)]
    pub api_url: String,

    /// 銀行APIトークン
    #[serde(default)]
    pub api_token: String,

    /// リダイレクトURL (デフォルト: "https://example.com/success")
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,

    /// リクエストタイムアウト（秒）(デフォルト: 10)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_redirect_url() -> String {
    "https://example.com/success".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for PaymentProbeConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_token: String::new(),
            redirect_url: default_redirect_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// ポーリングスケジュール設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// 起動後の初回チェックまでの待機（秒）(デフォルト: 10)
    #[serde(default = "default_startup_delay")]
    pub startup_delay_secs: u64,

    /// 通常時のチェック間隔（秒）(デフォルト: 300)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// 障害中のチェック間隔（秒）(デフォルト: 60)
    #[serde(default = "default_fast_poll_interval")]
    pub fast_poll_interval_secs: u64,

    /// 障害中にチェック間隔を短縮するか (デフォルト: true)
    #[serde(default = "default_adaptive_interval")]
    pub adaptive_interval: bool,
}

fn default_startup_delay() -> u64 {
    10
}

fn default_poll_interval() -> u64 {
    300
}

fn default_fast_poll_interval() -> u64 {
    60
}

fn default_adaptive_interval() -> bool {
    true
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            startup_delay_secs: default_startup_delay(),
            poll_interval_secs: default_poll_interval(),
            fast_poll_interval_secs: default_fast_poll_interval(),
            adaptive_interval: default_adaptive_interval(),
        }
    }
}

/// Telegram通知設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Botトークン
    pub bot_token: String,

    /// 送信先チャットID
    pub chat_id: String,

    /// フォーラムのトピックID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,

    /// Bot APIのベースURL (デフォルト: "https://api.telegram.org")
    #[serde(default = "default_telegram_api_base_url")]
    pub api_base_url: String,

    /// 送信試行回数 (デフォルト: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// 再試行までの待機（秒）(デフォルト: 3)
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    /// 1回の送信のタイムアウト（秒）(デフォルト: 30)
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

fn default_telegram_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    3
}

fn default_notify_timeout() -> u64 {
    30
}

impl TelegramConfig {
    /// トークンとチャットIDからデフォルト値付きの設定を作成
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            topic_id: None,
            api_base_url: default_telegram_api_base_url(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay(),
            timeout_secs: default_notify_timeout(),
        }
    }
}

/// 決済リンク検証設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkVerificationConfig {
    /// 検証を行うか (デフォルト: false)
    #[serde(default)]
    pub enabled: bool,

    /// ページ遷移のタイムアウト（秒）(デフォルト: 30)
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// 描画待ち時間（秒）(デフォルト: 3)
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,

    /// 「見つかりません」ページを示す文字列（大文字小文字を区別しない）
    #[serde(default = "default_not_found_markers")]
    pub not_found_markers: Vec<String>,

    /// Chromeのサンドボックスを有効にするか (デフォルト: true)
    #[serde(default = "default_browser_sandbox")]
    pub browser_sandbox: bool,
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_settle_delay() -> u64 {
    3
}

fn default_browser_sandbox() -> bool {
    true
}

/// デフォルトの「見つかりません」マーカー
pub fn default_not_found_markers() -> Vec<String> {
    ["404 not found", "page not found", "страница не найдена", "not-found.svg"]
        .iter()
        .map(|marker| marker.to_string())
        .collect()
}

impl Default for LinkVerificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            navigation_timeout_secs: default_navigation_timeout(),
            settle_delay_secs: default_settle_delay(),
            not_found_markers: default_not_found_markers(),
            browser_sandbox: default_browser_sandbox(),
        }
    }
}
