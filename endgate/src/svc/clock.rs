use std::sync::{Arc, Mutex};

use chrono::{Duration, Local};

use crate::hal::clock::{Clock, Timestamp};

#[derive(Default, Debug, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Clone, Debug)]
pub struct ManualClock {
    time: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            time: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, t: Timestamp) {
        *self.time.lock().unwrap_or_else(|e| e.into_inner()) = t;
    }

    pub fn advance(&self, by: Duration) -> Timestamp {
        let mut time = self.time.lock().unwrap_or_else(|e| e.into_inner());
        *time += by;
        *time
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.time.lock().unwrap_or_else(|e| e.into_inner())
    }
}
