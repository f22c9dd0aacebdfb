//! Prometheus metrics
//!
//! Counter names are stable; labels carry the variable parts.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder; idempotent
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

/// Render the current metrics snapshot
pub async fn metrics_handler() -> String {
    match HANDLE.get() {
        Some(handle) => handle.render(),
        None => String::new(),
    }
}

/// A visitor began an assessment
pub fn record_funnel_started() {
    metrics::counter!("funnel_started_total").increment(1);
}

/// A funnel reached its result
pub fn record_funnel_completed(category: &'static str) {
    metrics::counter!("funnel_completed_total", "category" => category).increment(1);
}

/// A simulated OTP dispatch was requested
pub fn record_otp_dispatch() {
    metrics::counter!("otp_dispatch_total").increment(1);
}

/// An admin login attempt finished
pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("admin_login_total", "outcome" => outcome).increment(1);
}
