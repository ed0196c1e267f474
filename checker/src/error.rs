//! エラー型定義
//!
//! 起動時の構築エラーとブラウザ検証のエラー。
//! ポーリング1回分の失敗は`CheckResult`で表現し、このエラー型では伝播しない。

use paylink_checker_common::error::CommonError;
use thiserror::Error;

/// checker error type
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Headless browser error
    #[error("Browser error: {0}")]
    Browser(String),

    /// Telegram settings are required but missing
    #[error("Telegram is not configured (set CHECKER_TELEGRAM_TOKEN and CHECKER_TELEGRAM_CHAT_ID)")]
    MissingTelegramConfig,
}
