//! Paylink Checker 共通ライブラリ
//!
//! ヘルスチェッカーが外部APIとやり取りする通信メッセージ、設定構造体、エラー型

#![warn(missing_docs)]

/// 設定構造体
pub mod config;

/// エラー型
pub mod error;

/// 通信プロトコル定義（決済API・Telegram Bot API）
pub mod protocol;
