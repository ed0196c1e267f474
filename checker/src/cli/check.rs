//! check サブコマンド
//!
//! ヘルスチェックを1回だけ実行して結果を表示します。通知は送りません。

use clap::Args;
use paylink_checker_common::config::MonitorConfig;
use paylink_checker_common::error::CommonError;

use crate::error::MonitorError;
use crate::health::CheckResult;
use crate::probe::{PaymentProbe, Probe};

/// check サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// 結果を表示用の文字列にする
pub fn render(result: &CheckResult, json: bool) -> Result<String, CommonError> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }
    Ok(match result {
        CheckResult::Healthy { pay_url } => {
            format!("[💳 Payment link] ✅ API is working. Link: {pay_url}")
        }
        failure => failure.diagnostic().unwrap_or_default(),
    })
}

/// 1回チェックして表示し、正常なら`true`を返す
pub async fn execute(args: &CheckArgs, config: &MonitorConfig) -> Result<bool, MonitorError> {
    let probe = PaymentProbe::from_config(config)?;
    let result = probe.check().await;
    println!("{}", render(&result, args.json)?);
    Ok(result.is_healthy())
}
