use std::sync::Arc;

pub use bus::StdEventBus;
pub use clock::{ManualClock, SystemClock};

use crate::hal::clock::Clock;
use crate::hal::event::PortalActivation;
use crate::hal::listener::EventDispatcher;
use crate::hal::Host;

mod bus;
mod clock;

/// In-process host made of a [`StdEventBus`] and any [`Clock`].
pub struct StdHost {
    clock: Arc<dyn Clock>,
    portal_events: StdEventBus<PortalActivation>,
}

impl StdHost {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            portal_events: StdEventBus::new(),
        }
    }
}

impl Default for StdHost {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Host for StdHost {
    fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    fn portal_events(&self) -> &(dyn EventDispatcher<PortalActivation> + '_) {
        &self.portal_events
    }
}
