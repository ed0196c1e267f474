//! run サブコマンド
//!
//! ヘルスチェックループを起動します。

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use paylink_checker_common::config::MonitorConfig;
use tokio_util::sync::CancellationToken;

use crate::error::MonitorError;
use crate::health::{HealthMonitor, PollIntervals};
use crate::notify::TelegramNotifier;
use crate::probe::PaymentProbe;

/// run サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Start checking immediately instead of waiting for the backend to boot
    #[arg(long, default_value_t = false)]
    pub skip_startup_delay: bool,
}

/// 起動時の待機時間
fn startup_delay(args: &RunArgs, config: &MonitorConfig) -> Duration {
    if args.skip_startup_delay {
        Duration::ZERO
    } else {
        Duration::from_secs(config.schedule.startup_delay_secs)
    }
}

/// ヘルスモニターを組み立てる（Telegram設定が必須）
pub fn build_monitor(args: &RunArgs, config: &MonitorConfig) -> Result<HealthMonitor, MonitorError> {
    let telegram = config
        .telegram
        .as_ref()
        .ok_or(MonitorError::MissingTelegramConfig)?;

    let probe = PaymentProbe::from_config(config)?;
    let notifier = TelegramNotifier::new(telegram)?;

    Ok(HealthMonitor::new(
        Arc::new(probe),
        Arc::new(notifier),
        PollIntervals::from(&config.schedule),
        startup_delay(args, config),
    ))
}

/// `cancel`がキャンセルされるまでモニターを実行する
pub async fn execute(
    args: &RunArgs,
    config: &MonitorConfig,
    cancel: CancellationToken,
) -> Result<(), MonitorError> {
    let monitor = build_monitor(args, config)?;
    monitor.run(cancel).await;
    Ok(())
}
