//! ヘルスチェック結果
//!
//! 1回のポーリングで得られる結果。状態遷移の判定には`is_healthy()`のみを使い、
//! 失敗の種類は通知文面にだけ影響する。

use serde::Serialize;

/// 診断メッセージに含めるレスポンス本文の最大文字数
///
/// Telegramのメッセージ上限は4096文字。
pub const MAX_BODY_PREVIEW_CHARS: usize = 1000;

/// 障害通知の接頭辞
const FAILURE_TAG: &str = "[💳 Payment link error]";

/// 復旧通知の文面
pub const RECOVERY_MESSAGE: &str =
    "[💳 Payment link] ✅ Payment API has recovered and is working correctly!";

/// 1回のチェック結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckResult {
    /// 決済リンクが正常に生成された
    Healthy {
        /// 生成された決済ページURL
        pay_url: String,
    },
    /// HTTP 200だが`pay_url`が無い
    MissingPayUrl {
        /// HTTPステータス
        status_code: u16,
        /// レスポンス本文
        raw_body: String,
    },
    /// HTTP 200以外
    HttpError {
        /// HTTPステータス
        status_code: u16,
        /// レスポンス本文
        raw_body: String,
    },
    /// 接続失敗・DNS失敗・タイムアウト
    NetworkError {
        /// エラー内容
        cause: String,
    },
    /// 決済リンク自体がエラーページを返す
    LinkInvalid {
        /// 検証した決済ページURL
        url: String,
        /// 無効と判定した理由
        reason: String,
    },
}

impl CheckResult {
    /// 正常かどうか
    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckResult::Healthy { .. })
    }

    /// ログ用の種別名
    pub fn kind(&self) -> &'static str {
        match self {
            CheckResult::Healthy { .. } => "healthy",
            CheckResult::MissingPayUrl { .. } => "missing_pay_url",
            CheckResult::HttpError { .. } => "http_error",
            CheckResult::NetworkError { .. } => "network_error",
            CheckResult::LinkInvalid { .. } => "link_invalid",
        }
    }

    /// HTTPステータス（応答を受け取れた場合のみ）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CheckResult::MissingPayUrl { status_code, .. }
            | CheckResult::HttpError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// 障害時の診断メッセージ。正常時は`None`
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            CheckResult::Healthy { .. } => None,
            CheckResult::MissingPayUrl {
                status_code,
                raw_body,
            } => Some(format!(
                "{FAILURE_TAG} ❗ API response has no 'pay_url'. Status: {status_code}, response: {}",
                preview_body(raw_body)
            )),
            CheckResult::HttpError {
                status_code,
                raw_body,
            } => Some(format!(
                "{FAILURE_TAG} ❌ API returned HTTP {status_code}. Response: {}",
                preview_body(raw_body)
            )),
            CheckResult::NetworkError { cause } => Some(format!(
                "{FAILURE_TAG} ❌ Could not connect to the API: {cause}"
            )),
            CheckResult::LinkInvalid { url, reason } => Some(format!(
                "{FAILURE_TAG} 🔗 Payment link does not open ({url}): {reason}"
            )),
        }
    }
}

/// 本文を文字境界で切り詰める。空本文は`<empty>`
fn preview_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty>".to_string();
    }
    match body.char_indices().nth(MAX_BODY_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}… (truncated)", &body[..cut]),
        None => body.to_string(),
    }
}
