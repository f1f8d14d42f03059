//! Shared logging utilities for consistent tracing across both binaries

use crate::types::ServiceId;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Filter directives for the given service at the given base level
pub fn filter_directives(service: &ServiceId, log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");

    match service {
        ServiceId::Curator => {
            format!("curator={base_level},shared={base_level},reqwest=warn")
        }
        ServiceId::WebServer => {
            format!("webserver={base_level},curator={base_level},shared={base_level},tower_http=debug")
        }
    }
}

/// Initialize the tracing subscriber for the current service
/// Uses the global service ID, which must be initialized first
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let directives = filter_directives(ServiceId::current(), log_level);

    fmt()
        .with_env_filter(EnvFilter::new(&directives))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for service-aware info logging
#[macro_export]
macro_rules! service_info {
    ($service:expr, $($arg:tt)*) => {
        tracing::info!(
            service = %$service,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for service-aware warning logging
#[macro_export]
macro_rules! service_warn {
    ($service:expr, $($arg:tt)*) => {
        tracing::warn!(
            service = %$service,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for service-aware error logging
#[macro_export]
macro_rules! service_error {
    ($service:expr, $($arg:tt)*) => {
        tracing::error!(
            service = %$service,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for service-aware debug logging
#[macro_export]
macro_rules! service_debug {
    ($service:expr, $($arg:tt)*) => {
        tracing::debug!(
            service = %$service,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(service: &ServiceId, details: &str) {
    info!(
        service = %service,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(service: &ServiceId, reason: &str) {
    info!(
        service = %service,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(service: &ServiceId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        service = %service,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(service: &ServiceId, message: &str) {
    info!(
        service = %service,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}

/// Contextual logging helper for progress updates
pub fn log_progress(service: &ServiceId, action: &str, details: &str) {
    info!(
        service = %service,
        timestamp = format_timestamp(),
        "📋 {}: {}",
        action,
        details
    );
}
