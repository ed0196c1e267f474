//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to the deprecated unprefixed names used by the first checker deployment,
//! and assembles a [`MonitorConfig`] from them.

use paylink_checker_common::config::{
    LinkVerificationConfig, MonitorConfig, PaymentProbeConfig, ScheduleConfig, TelegramConfig,
};
use paylink_checker_common::error::CommonError;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use paylink_checker::config::get_env_with_fallback;
///
/// let url = get_env_with_fallback("CHECKER_PAYMENT_API_URL", "PAYMENT_API_URL");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if new_name == old_name {
        return None;
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Get a boolean flag (`1/true/yes/on`, case-insensitive)
pub fn get_env_flag(name: &str, default: bool) -> bool {
    get_env_with_fallback(name, name)
        .map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(default)
}

/// 空文字列を未設定として扱う
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 環境変数から決済APIプローブ設定を読み込む
fn payment_from_env() -> PaymentProbeConfig {
    let defaults = PaymentProbeConfig::default();
    PaymentProbeConfig {
        api_url: get_env_with_fallback_or("CHECKER_PAYMENT_API_URL", "PAYMENT_API_URL", ""),
        api_token: get_env_with_fallback_or("CHECKER_PAYMENT_API_TOKEN", "PAYMENT_API_TOKEN", ""),
        redirect_url: get_env_with_fallback_or(
            "CHECKER_REDIRECT_URL",
            "REDIRECT_URL",
            &defaults.redirect_url,
        ),
        request_timeout_secs: get_env_with_fallback_parse(
            "CHECKER_REQUEST_TIMEOUT_SECS",
            "CHECKER_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout_secs,
        ),
    }
}

/// 環境変数からスケジュール設定を読み込む
fn schedule_from_env() -> ScheduleConfig {
    let defaults = ScheduleConfig::default();
    ScheduleConfig {
        startup_delay_secs: get_env_with_fallback_parse(
            "CHECKER_STARTUP_DELAY_SECS",
            "CHECKER_STARTUP_DELAY_SECS",
            defaults.startup_delay_secs,
        ),
        poll_interval_secs: get_env_with_fallback_parse(
            "CHECKER_POLL_INTERVAL_SECS",
            "CHECKER_POLL_INTERVAL_SECS",
            defaults.poll_interval_secs,
        ),
        fast_poll_interval_secs: get_env_with_fallback_parse(
            "CHECKER_FAST_POLL_INTERVAL_SECS",
            "CHECKER_FAST_POLL_INTERVAL_SECS",
            defaults.fast_poll_interval_secs,
        ),
        adaptive_interval: get_env_flag("CHECKER_ADAPTIVE_INTERVAL", defaults.adaptive_interval),
    }
}

/// 環境変数からTelegram設定を読み込む
///
/// トークンとチャットIDの両方が揃っている場合のみ`Some`。
fn telegram_from_env() -> Option<TelegramConfig> {
    let bot_token = non_empty(get_env_with_fallback("CHECKER_TELEGRAM_TOKEN", "TELEGRAM_TOKEN"))?;
    let chat_id = non_empty(get_env_with_fallback(
        "CHECKER_TELEGRAM_CHAT_ID",
        "TELEGRAM_CHAT_ID",
    ))?;

    let mut config = TelegramConfig::new(bot_token, chat_id);
    config.topic_id = non_empty(get_env_with_fallback(
        "CHECKER_TELEGRAM_TOPIC_ID",
        "TELEGRAM_TOPIC_ID",
    ));
    config.api_base_url = get_env_with_fallback_or(
        "CHECKER_TELEGRAM_API_URL",
        "CHECKER_TELEGRAM_API_URL",
        &config.api_base_url,
    );
    config.max_attempts = get_env_with_fallback_parse(
        "CHECKER_NOTIFY_MAX_ATTEMPTS",
        "CHECKER_NOTIFY_MAX_ATTEMPTS",
        config.max_attempts,
    );
    config.retry_delay_secs = get_env_with_fallback_parse(
        "CHECKER_NOTIFY_RETRY_DELAY_SECS",
        "CHECKER_NOTIFY_RETRY_DELAY_SECS",
        config.retry_delay_secs,
    );
    config.timeout_secs = get_env_with_fallback_parse(
        "CHECKER_NOTIFY_TIMEOUT_SECS",
        "CHECKER_NOTIFY_TIMEOUT_SECS",
        config.timeout_secs,
    );
    Some(config)
}

/// 環境変数から決済リンク検証設定を読み込む
fn link_verification_from_env() -> LinkVerificationConfig {
    let defaults = LinkVerificationConfig::default();
    let not_found_markers = get_env_with_fallback(
        "CHECKER_VERIFY_NOT_FOUND_MARKERS",
        "CHECKER_VERIFY_NOT_FOUND_MARKERS",
    )
    .map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|marker| !marker.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
    })
    .filter(|markers| !markers.is_empty())
    .unwrap_or(defaults.not_found_markers);

    LinkVerificationConfig {
        enabled: get_env_flag("CHECKER_VERIFY_LINK", defaults.enabled),
        navigation_timeout_secs: get_env_with_fallback_parse(
            "CHECKER_VERIFY_NAVIGATION_TIMEOUT_SECS",
            "CHECKER_VERIFY_NAVIGATION_TIMEOUT_SECS",
            defaults.navigation_timeout_secs,
        ),
        settle_delay_secs: get_env_with_fallback_parse(
            "CHECKER_VERIFY_SETTLE_DELAY_SECS",
            "CHECKER_VERIFY_SETTLE_DELAY_SECS",
            defaults.settle_delay_secs,
        ),
        not_found_markers,
        browser_sandbox: get_env_flag("CHECKER_VERIFY_BROWSER_SANDBOX", defaults.browser_sandbox),
    }
}

/// Load and validate the full checker configuration from environment variables.
pub fn load_from_env() -> Result<MonitorConfig, CommonError> {
    let config = MonitorConfig {
        payment: payment_from_env(),
        schedule: schedule_from_env(),
        telegram: telegram_from_env(),
        link_verification: link_verification_from_env(),
    };
    config.validate()?;
    Ok(config)
}
