//! 決済APIプローブ
//!
//! 合成トランザクションで決済リンク生成APIを1回呼び出し、結果を分類する。

pub mod payment;

pub use payment::PaymentProbe;

use async_trait::async_trait;

use crate::health::CheckResult;

/// 1回のヘルスチェックを実行する
///
/// 失敗はすべて`CheckResult`の値として返し、エラーとして伝播しない。
#[async_trait]
pub trait Probe: Send + Sync {
    /// チェックを1回実行
    async fn check(&self) -> CheckResult;
}
