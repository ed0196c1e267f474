//! ヘルスチェックモニター
//!
//! 決済リンク生成APIを定期的に合成トランザクションで確認し、
//! Healthy ⇄ Broken の遷移時だけTelegramへ通知する。

pub mod monitor;
pub mod result;
pub mod state;

pub use monitor::{CycleReport, HealthMonitor};
pub use result::CheckResult;
pub use state::{HealthState, PollIntervals, Transition};
