//! 通信プロトコル定義
//!
//! ヘルスチェッカー↔決済API、ヘルスチェッカー↔Telegram Bot API間の通信メッセージ

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ヘルスチェック用の固定金額
pub const HEALTH_CHECK_AMOUNT: &str = "100.00";

/// ヘルスチェック用の固定コメント
pub const HEALTH_CHECK_COMMENT: &str = "🚀 Health Check";

/// 決済リンク生成リクエスト
///
/// ヘルスチェックでは毎回新しい`transaction_id`で合成トランザクションを作成する。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentLinkRequest {
    /// 金額（文字列のまま送信する）
    pub amount: String,
    /// トランザクションID
    pub transaction_id: String,
    /// コメント
    pub comment: String,
    /// 決済完了後のリダイレクト先
    pub redirect_url: String,
    /// 銀行APIのBearerトークン
    pub token: String,
}

impl PaymentLinkRequest {
    /// ヘルスチェック用の合成トランザクションを作成
    pub fn health_check(transaction_id: Uuid, redirect_url: &str, token: &str) -> Self {
        Self {
            amount: HEALTH_CHECK_AMOUNT.to_string(),
            transaction_id: transaction_id.to_string(),
            comment: HEALTH_CHECK_COMMENT.to_string(),
            redirect_url: redirect_url.to_string(),
            token: token.to_string(),
        }
    }
}

/// 決済リンク生成レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentLinkResponse {
    /// 決済ページURL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_url: Option<String>,
}

impl PaymentLinkResponse {
    /// 空でない`pay_url`のみを返す
    pub fn pay_url(&self) -> Option<&str> {
        self.pay_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Telegram `sendMessage` のフォームパラメータ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelegramSendMessage {
    /// 送信先チャットID
    pub chat_id: String,
    /// メッセージ本文
    pub text: String,
    /// フォーラムのトピックID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<String>,
}

/// Telegram Bot APIの応答エンベロープ
///
/// 失敗時の`description`をログに残すためだけに使う。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TelegramApiResponse {
    /// 成功フラグ
    #[serde(default)]
    pub ok: bool,
    /// エラー内容
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
