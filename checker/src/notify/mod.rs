//! 障害・復旧通知
//!
//! 送信はベストエフォート。送れなかった場合もポーリングループは止めない。

pub mod telegram;

pub use telegram::{RetryPolicy, TelegramNotifier};

use async_trait::async_trait;

/// 通知チャネル
#[async_trait]
pub trait Notifier: Send + Sync {
    /// メッセージを送信し、届いたら`true`を返す
    ///
    /// 送信エラーは内部で吸収し、呼び出し元には返さない。
    async fn send(&self, message: &str) -> bool;
}
