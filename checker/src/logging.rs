//! ロギング初期化
//!
//! 標準出力へのfmtレイヤーと、`CHECKER_LOG_DIR`指定時の日次ローテーションファイルレイヤー。

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{get_env_with_fallback, get_env_with_fallback_or};

/// ログファイル名のプレフィックス
pub const LOG_FILE_PREFIX: &str = "paylink-checker.log";

/// ログレベル（`CHECKER_LOG_LEVEL`、旧: `LOG_LEVEL`）
fn log_level() -> String {
    get_env_with_fallback_or("CHECKER_LOG_LEVEL", "LOG_LEVEL", "info")
}

/// ログ出力ディレクトリ（`CHECKER_LOG_DIR`）
fn log_dir() -> Option<PathBuf> {
    get_env_with_fallback("CHECKER_LOG_DIR", "CHECKER_LOG_DIR")
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

/// フィルタ文字列を解釈する。不正な指定は`info`にフォールバック
pub fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// ディレクトリを作成し、日次ローテーションのノンブロッキングライターを返す
pub fn file_writer(dir: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

/// グローバルsubscriberを初期化する
///
/// ファイル出力を有効にした場合、返された`WorkerGuard`をプロセス終了まで保持すること。
pub fn init() -> anyhow::Result<Option<WorkerGuard>> {
    let filter = build_filter(&log_level());
    let stdout_layer = fmt::layer().with_target(false);

    match log_dir() {
        Some(dir) => {
            let (writer, guard) = file_writer(&dir)?;
            let file_layer = fmt::layer().with_ansi(false).with_writer(writer);
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(file_layer)
                .try_init()?;
            tracing::info!(log_dir = %dir.display(), "File logging enabled");
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .try_init()?;
            Ok(None)
        }
    }
}
