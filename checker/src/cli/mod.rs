//! CLI module for paylink-checker
//!
//! Provides the command-line interface for the payment link health checker.

pub mod check;
pub mod run;

use clap::{Parser, Subcommand};

/// Paylink checker - periodic health check of the payment link API with Telegram alerts
#[derive(Parser, Debug)]
#[command(name = "paylink-checker")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    CHECKER_PAYMENT_API_URL       Payment link endpoint (legacy: PAYMENT_API_URL, required)
    CHECKER_PAYMENT_API_TOKEN     Bank API token sent in the request (legacy: PAYMENT_API_TOKEN, required)
    CHECKER_REDIRECT_URL          Redirect URL (legacy: REDIRECT_URL, default: https://example.com/success)
    CHECKER_REQUEST_TIMEOUT_SECS  Payment request timeout (default: 10)
    CHECKER_TELEGRAM_TOKEN        Telegram bot token (legacy: TELEGRAM_TOKEN, required for run)
    CHECKER_TELEGRAM_CHAT_ID      Telegram chat id (legacy: TELEGRAM_CHAT_ID, required for run)
    CHECKER_TELEGRAM_TOPIC_ID     Telegram forum topic id (legacy: TELEGRAM_TOPIC_ID)
    CHECKER_TELEGRAM_API_URL      Telegram Bot API base URL (default: https://api.telegram.org)
    CHECKER_NOTIFY_MAX_ATTEMPTS   Notification attempts (default: 3)
    CHECKER_NOTIFY_RETRY_DELAY_SECS  Delay between attempts (default: 3)
    CHECKER_NOTIFY_TIMEOUT_SECS   Per-attempt timeout (default: 30)
    CHECKER_STARTUP_DELAY_SECS    Delay before the first check (default: 10)
    CHECKER_POLL_INTERVAL_SECS    Interval while healthy (default: 300)
    CHECKER_FAST_POLL_INTERVAL_SECS  Interval while broken (default: 60)
    CHECKER_ADAPTIVE_INTERVAL     Use the fast interval while broken (default: true)
    CHECKER_VERIFY_LINK           Open the payment link in headless Chrome (default: false)
    CHECKER_VERIFY_NAVIGATION_TIMEOUT_SECS  Navigation timeout (default: 30)
    CHECKER_VERIFY_SETTLE_DELAY_SECS        Render settle delay (default: 3)
    CHECKER_VERIFY_NOT_FOUND_MARKERS        Comma separated not-found markers
    CHECKER_VERIFY_BROWSER_SANDBOX          Run Chrome with its sandbox (default: true)
    CHECKER_LOG_LEVEL             Log level (legacy: LOG_LEVEL, default: info)
    CHECKER_LOG_DIR               Also write daily rotated log files here
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the health check loop (default)
    Run(run::RunArgs),
    /// Perform a single check and exit (0 = healthy, 1 = failing)
    Check(check::CheckArgs),
}
