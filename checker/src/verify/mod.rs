//! 決済リンク検証
//!
//! 生成された決済ページをヘッドレスブラウザで開き、描画結果に
//! 「見つかりません」マーカーが含まれていないかを確認する。

#[cfg(feature = "browser")]
pub mod chrome;

#[cfg(feature = "browser")]
pub use chrome::HeadlessChromeRenderer;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use paylink_checker_common::config::LinkVerificationConfig;
use tracing::debug;

use crate::error::MonitorError;

/// 外側タイムアウトに加える猶予
const RENDER_GRACE: Duration = Duration::from_secs(5);

/// URLを開いて描画後のHTMLを返す
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// `url`へ遷移し、`settle_delay`待ってから描画済みHTMLを返す
    ///
    /// 呼び出し中に確保したブラウザはどの経路でも解放すること。
    async fn render(
        &self,
        url: &str,
        navigation_timeout: Duration,
        settle_delay: Duration,
    ) -> Result<String, MonitorError>;
}

/// 決済リンク検証器
#[derive(Clone)]
pub struct LinkVerifier {
    renderer: Arc<dyn PageRenderer>,
    markers: Vec<String>,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl LinkVerifier {
    /// 検証器を作成（マーカーは小文字化して保持）
    pub fn new(renderer: Arc<dyn PageRenderer>, config: &LinkVerificationConfig) -> Self {
        Self {
            renderer,
            markers: config
                .not_found_markers
                .iter()
                .map(|marker| marker.to_lowercase())
                .collect(),
            navigation_timeout: Duration::from_secs(config.navigation_timeout_secs),
            settle_delay: Duration::from_secs(config.settle_delay_secs),
        }
    }

    /// 決済リンクを検証する。無効なら理由を返す
    ///
    /// 描画の失敗・タイムアウトも無効として扱う。
    pub async fn verify(&self, url: &str) -> Result<(), String> {
        let budget = self
            .navigation_timeout
            .saturating_add(self.settle_delay)
            .saturating_add(RENDER_GRACE);
        let rendered = tokio::time::timeout(
            budget,
            self.renderer
                .render(url, self.navigation_timeout, self.settle_delay),
        )
        .await;

        let html = match rendered {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => return Err(format!("page could not be loaded: {e}")),
            Err(_) => {
                return Err(format!(
                    "page did not load within {}s",
                    budget.as_secs()
                ))
            }
        };

        match find_marker(&html, &self.markers) {
            Some(marker) => Err(format!("page contains not-found marker '{marker}'")),
            None => {
                debug!(url = %url, bytes = html.len(), "Payment link page rendered");
                Ok(())
            }
        }
    }
}

/// 小文字化済みマーカーのうち最初に見つかったものを返す
fn find_marker<'a>(html: &str, markers: &'a [String]) -> Option<&'a str> {
    let haystack = html.to_lowercase();
    markers
        .iter()
        .find(|marker| haystack.contains(marker.as_str()))
        .map(String::as_str)
}
