use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing the current moment across
/// the application. This allows tests to control id assignment and the
/// default heatmap range.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
