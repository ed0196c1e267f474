//! ポーリングループ
//!
//! チェック → 分類 → (遷移時のみ)通知 → 待機 を1本のタスクで逐次実行する。
//! 状態は`HealthMonitor`が専有し、`&mut self`経由でのみ更新される。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::result::{CheckResult, RECOVERY_MESSAGE};
use super::state::{HealthState, PollIntervals, Transition};
use crate::notify::Notifier;
use crate::probe::Probe;

/// 1サイクルの結果
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// チェック時刻
    pub checked_at: DateTime<Utc>,
    /// チェック結果
    pub result: CheckResult,
    /// 状態遷移
    #[serde(serialize_with = "serialize_transition")]
    pub transition: Transition,
    /// 通知した場合の送信成否
    pub notified: Option<bool>,
    /// 次のチェックまでの待機
    #[serde(serialize_with = "serialize_secs")]
    pub next_poll: Duration,
}

fn serialize_transition<S: serde::Serializer>(t: &Transition, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(t.as_str())
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

/// ヘルスモニター
pub struct HealthMonitor {
    probe: Arc<dyn Probe>,
    notifier: Arc<dyn Notifier>,
    state: HealthState,
    startup_delay: Duration,
}

impl HealthMonitor {
    /// 新しいモニターを作成（Healthy・通常間隔から開始）
    pub fn new(
        probe: Arc<dyn Probe>,
        notifier: Arc<dyn Notifier>,
        intervals: PollIntervals,
        startup_delay: Duration,
    ) -> Self {
        Self {
            probe,
            notifier,
            state: HealthState::new(intervals),
            startup_delay,
        }
    }

    /// 現在の状態
    pub fn state(&self) -> &HealthState {
        &self.state
    }

    /// 1サイクル実行する
    pub async fn poll_once(&mut self) -> CycleReport {
        let checked_at = Utc::now();
        let result = self.probe.check().await;
        let transition = self.state.apply(&result);
        let next_poll = self.state.poll_interval();

        match &result {
            CheckResult::Healthy { pay_url } => info!(
                outcome = result.kind(),
                transition = transition.as_str(),
                next_poll_secs = next_poll.as_secs(),
                pay_url = %pay_url,
                "[💳 Payment link] ✅ API is working"
            ),
            failure => error!(
                outcome = failure.kind(),
                transition = transition.as_str(),
                status_code = ?failure.status_code(),
                next_poll_secs = next_poll.as_secs(),
                "{}",
                failure.diagnostic().unwrap_or_default()
            ),
        }

        let notified = match transition {
            Transition::BecameBroken => {
                let message = result.diagnostic().unwrap_or_default();
                Some(self.notify(&message).await)
            }
            Transition::Recovered => Some(self.notify(RECOVERY_MESSAGE).await),
            Transition::StayedBroken | Transition::StayedHealthy => None,
        };

        CycleReport {
            checked_at,
            result,
            transition,
            notified,
            next_poll,
        }
    }

    async fn notify(&self, message: &str) -> bool {
        let delivered = self.notifier.send(message).await;
        if !delivered {
            warn!("Notification could not be delivered; continuing to poll");
        }
        delivered
    }

    /// 起動待機の後、キャンセルされるまでポーリングを続ける
    pub async fn run(mut self, cancel: CancellationToken) {
        let intervals = self.state.intervals();
        info!(
            startup_delay_secs = self.startup_delay.as_secs(),
            "⏳ Waiting for the backend to start..."
        );
        if !sleep_or_cancel(self.startup_delay, &cancel).await {
            info!("Health monitor cancelled during startup delay");
            return;
        }

        info!(
            poll_interval_secs = intervals.normal.as_secs(),
            fast_poll_interval_secs = intervals.fast.as_secs(),
            adaptive = intervals.adaptive,
            "🔁 Payment link health check started"
        );

        loop {
            let report = self.poll_once().await;
            if !sleep_or_cancel(report.next_poll, &cancel).await {
                break;
            }
        }

        info!("Health monitor stopped");
    }
}

/// 待機する。キャンセルされたら`false`
async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = cancel.cancelled() => false,
    }
}
