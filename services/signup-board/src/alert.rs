//! Alerter trait for blocking user-facing alerts

/// Surfaces a message the user must acknowledge
#[cfg_attr(test, mockall::automock)]
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

/// Alerter that only writes to the log; the dashboard relays the text itself
#[derive(Debug, Default)]
pub struct LogAlerter;

impl Alerter for LogAlerter {
    fn alert(&self, message: &str) {
        tracing::warn!("Alert: {}", message);
    }
}
