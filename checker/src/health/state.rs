//! 健全性ステートマシン
//!
//! Healthy ⇄ Broken の2状態。通知は状態が変わった時だけ送る（1インシデント1通知）。

use std::time::Duration;

use paylink_checker_common::config::ScheduleConfig;

use super::result::CheckResult;

/// ポーリング間隔
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// 通常時の間隔
    pub normal: Duration,
    /// 障害中の間隔
    pub fast: Duration,
    /// 障害中に`fast`を使うか
    pub adaptive: bool,
}

impl PollIntervals {
    /// 障害中に使う間隔
    fn broken(&self) -> Duration {
        if self.adaptive {
            self.fast
        } else {
            self.normal
        }
    }
}

impl From<&ScheduleConfig> for PollIntervals {
    fn from(config: &ScheduleConfig) -> Self {
        Self {
            normal: Duration::from_secs(config.poll_interval_secs),
            fast: Duration::from_secs(config.fast_poll_interval_secs),
            adaptive: config.adaptive_interval,
        }
    }
}

/// チェック結果による状態遷移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Healthy → Healthy
    StayedHealthy,
    /// Healthy → Broken（障害通知を送る）
    BecameBroken,
    /// Broken → Broken（通知しない）
    StayedBroken,
    /// Broken → Healthy（復旧通知を送る）
    Recovered,
}

impl Transition {
    /// 通知が必要な遷移か
    pub fn should_notify(self) -> bool {
        matches!(self, Transition::BecameBroken | Transition::Recovered)
    }

    /// ログ用の名前
    pub fn as_str(self) -> &'static str {
        match self {
            Transition::StayedHealthy => "stayed_healthy",
            Transition::BecameBroken => "became_broken",
            Transition::StayedBroken => "stayed_broken",
            Transition::Recovered => "recovered",
        }
    }
}

/// モニターが専有する健全性状態
///
/// プロセス起動ごとにHealthy・通常間隔で初期化され、永続化しない。
#[derive(Debug, Clone)]
pub struct HealthState {
    broken: bool,
    poll_interval: Duration,
    intervals: PollIntervals,
}

impl HealthState {
    /// Healthy・通常間隔で作成
    pub fn new(intervals: PollIntervals) -> Self {
        Self {
            broken: false,
            poll_interval: intervals.normal,
            intervals,
        }
    }

    /// 障害中かどうか
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// 次のチェックまでの待機時間（直近の結果を反映済み）
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// 設定された間隔
    pub fn intervals(&self) -> PollIntervals {
        self.intervals
    }

    /// チェック結果を適用し、遷移を返す
    ///
    /// 失敗の種類は区別しない。
    pub fn apply(&mut self, result: &CheckResult) -> Transition {
        let transition = match (self.broken, result.is_healthy()) {
            (false, true) => Transition::StayedHealthy,
            (false, false) => Transition::BecameBroken,
            (true, false) => Transition::StayedBroken,
            (true, true) => Transition::Recovered,
        };

        self.broken = !result.is_healthy();
        self.poll_interval = if self.broken {
            self.intervals.broken()
        } else {
            self.intervals.normal
        };
        transition
    }
}
