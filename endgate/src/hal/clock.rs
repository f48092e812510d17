use chrono::NaiveDateTime;

/// Local calendar time as seen by the host.
pub type Timestamp = NaiveDateTime;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
