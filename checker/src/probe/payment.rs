//! 決済リンク生成APIのプローブ

use std::time::{Duration, Instant};

#[cfg(feature = "browser")]
use std::sync::Arc;

use async_trait::async_trait;
use paylink_checker_common::config::{MonitorConfig, PaymentProbeConfig};
use paylink_checker_common::protocol::{PaymentLinkRequest, PaymentLinkResponse};
use reqwest::{Client, StatusCode};
#[cfg(feature = "browser")]
use tracing::info;
use tracing::{debug, warn};
use uuid::Uuid;

use super::Probe;
use crate::error::MonitorError;
use crate::health::CheckResult;
#[cfg(feature = "browser")]
use crate::verify::HeadlessChromeRenderer;
use crate::verify::LinkVerifier;

/// 決済リンク生成APIのプローブ
///
/// 1回のチェックにつきPOSTは1回だけ。再試行は次のポーリングに任せる。
#[derive(Clone)]
pub struct PaymentProbe {
    client: Client,
    api_url: String,
    api_token: String,
    redirect_url: String,
    timeout: Duration,
    verifier: Option<LinkVerifier>,
}

impl PaymentProbe {
    /// 設定からプローブを作成
    pub fn new(config: &PaymentProbeConfig) -> Result<Self, MonitorError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
            redirect_url: config.redirect_url.clone(),
            timeout,
            verifier: None,
        })
    }

    /// 全体設定から作成し、有効ならヘッドレスChromeによる検証を付ける
    pub fn from_config(config: &MonitorConfig) -> Result<Self, MonitorError> {
        let probe = Self::new(&config.payment)?;
        if !config.link_verification.enabled {
            return Ok(probe);
        }

        #[cfg(feature = "browser")]
        {
            let renderer = HeadlessChromeRenderer::new(config.link_verification.browser_sandbox);
            info!("Payment link verification via headless Chrome enabled");
            Ok(probe.with_verifier(LinkVerifier::new(
                Arc::new(renderer),
                &config.link_verification,
            )))
        }

        #[cfg(not(feature = "browser"))]
        {
            warn!("CHECKER_VERIFY_LINK is set but this build has no `browser` feature; skipping link verification");
            Ok(probe)
        }
    }

    /// 決済リンク検証を有効化
    pub fn with_verifier(mut self, verifier: LinkVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// トランザクションIDを指定してチェック
    pub async fn check_with_id(&self, transaction_id: Uuid) -> CheckResult {
        let start = Instant::now();
        let result = self.request_pay_url(transaction_id).await;

        debug!(
            transaction_id = %transaction_id,
            outcome = result.kind(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Payment endpoint responded"
        );

        match (result, &self.verifier) {
            (CheckResult::Healthy { pay_url }, Some(verifier)) => {
                match verifier.verify(&pay_url).await {
                    Ok(()) => CheckResult::Healthy { pay_url },
                    Err(reason) => {
                        warn!(pay_url = %pay_url, reason = %reason, "Payment link verification failed");
                        CheckResult::LinkInvalid {
                            url: pay_url,
                            reason,
                        }
                    }
                }
            }
            (result, _) => result,
        }
    }

    /// 合成トランザクションをPOSTし、応答を分類する
    async fn request_pay_url(&self, transaction_id: Uuid) -> CheckResult {
        let payload =
            PaymentLinkRequest::health_check(transaction_id, &self.redirect_url, &self.api_token);

        let response = match self.client.post(&self.api_url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                return CheckResult::NetworkError {
                    cause: self.describe_transport_error(&e),
                }
            }
        };

        let status = response.status();
        let raw_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return CheckResult::NetworkError {
                    cause: format!("failed to read response body: {}", self.describe_transport_error(&e)),
                }
            }
        };

        classify_response(status, raw_body)
    }

    fn describe_transport_error(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else if e.is_connect() {
            format!("connection failed: {}", error_chain(e))
        } else {
            error_chain(e)
        }
    }
}

#[async_trait]
impl Probe for PaymentProbe {
    async fn check(&self) -> CheckResult {
        self.check_with_id(Uuid::new_v4()).await
    }
}

/// ステータスと本文から結果を決める
fn classify_response(status: StatusCode, raw_body: String) -> CheckResult {
    if status != StatusCode::OK {
        return CheckResult::HttpError {
            status_code: status.as_u16(),
            raw_body,
        };
    }

    let pay_url = serde_json::from_str::<PaymentLinkResponse>(&raw_body)
        .ok()
        .and_then(|body| body.pay_url().map(str::to_string));

    match pay_url {
        Some(pay_url) => CheckResult::Healthy { pay_url },
        None => CheckResult::MissingPayUrl {
            status_code: status.as_u16(),
            raw_body,
        },
    }
}

/// reqwestのエラーは原因が`source()`側にあるので連結して表示する
fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
