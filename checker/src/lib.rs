//! Paylink Checker
//!
//! 決済リンク生成APIを定期的に合成トランザクションで確認し、
//! 障害と復旧をTelegramへ通知するヘルスチェッカー

#![warn(missing_docs)]

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// エラー型
pub mod error;

/// ヘルスチェック監視（ステートマシンとポーリングループ）
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 障害・復旧通知
pub mod notify;

/// 決済APIプローブ
pub mod probe;

/// 決済リンク検証
pub mod verify;
