//! headless_chromeによるページ描画

use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use tracing::debug;

use super::PageRenderer;
use crate::error::MonitorError;

/// チェックごとにChromeを起動して描画するレンダラー
///
/// ブラウザはプールせず、1回の`render`の中で起動・終了する。
#[derive(Debug, Clone, Default)]
pub struct HeadlessChromeRenderer {
    sandbox: bool,
}

impl HeadlessChromeRenderer {
    /// レンダラーを作成
    ///
    /// コンテナ内でrootとして動かす場合は`sandbox = false`が必要になる。
    pub fn new(sandbox: bool) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl PageRenderer for HeadlessChromeRenderer {
    async fn render(
        &self,
        url: &str,
        navigation_timeout: Duration,
        settle_delay: Duration,
    ) -> Result<String, MonitorError> {
        let url = url.to_string();
        let sandbox = self.sandbox;

        tokio::task::spawn_blocking(move || render_blocking(&url, sandbox, navigation_timeout, settle_delay))
            .await
            .map_err(|e| MonitorError::Browser(format!("render task failed: {e}")))?
    }
}

/// ブロッキングAPIで描画する
///
/// `browser`はこの関数のスコープで破棄され、Chromeプロセスも終了する。
fn render_blocking(
    url: &str,
    sandbox: bool,
    navigation_timeout: Duration,
    settle_delay: Duration,
) -> Result<String, MonitorError> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(sandbox)
        .idle_browser_timeout(navigation_timeout.saturating_add(settle_delay))
        .build()
        .map_err(|e| MonitorError::Browser(format!("invalid launch options: {e}")))?;

    let browser = Browser::new(options).map_err(browser_error)?;
    let tab = browser.new_tab().map_err(browser_error)?;
    tab.set_default_timeout(navigation_timeout);

    let content = tab
        .navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(browser_error)
        .and_then(|tab| {
            std::thread::sleep(settle_delay);
            tab.get_content().map_err(browser_error)
        });

    if let Err(e) = tab.close(true) {
        debug!(error = %e, "Failed to close browser tab");
    }
    drop(browser);

    content
}

fn browser_error(e: impl std::fmt::Display) -> MonitorError {
    MonitorError::Browser(e.to_string())
}
