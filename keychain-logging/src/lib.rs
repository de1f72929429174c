//! Logging setup for the keychain tools

use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize JSON logging on stderr
///
/// This sets up:
/// - JSON formatted logs (for CI and log collectors)
/// - Environment-based log level filtering
/// - Tool name tagging
pub fn init_logging(tool_name: &str, default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    tracing::debug!(tool = tool_name, "Logging initialized");
}

/// Initialize human-readable logging on stderr
///
/// stdout is left to the command output.
pub fn init_console_logging(tool_name: &str, default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(tool = tool_name, "Console logging initialized");
}
