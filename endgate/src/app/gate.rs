use std::sync::Arc;

use crate::hal::clock::{Clock, Timestamp};
use crate::hal::event::{Cancellable, EventOutcome, PortalActivation};
use crate::hal::listener::Listener;

/// Blocks portal activation until `allowed_from`.
///
/// Both fields are fixed for the lifetime of the gate; toggling the module
/// builds a new one.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Gate {
    enabled: bool,
    allowed_from: Timestamp,
}

impl Gate {
    pub fn new(allowed_from: Timestamp, enabled: bool) -> Self {
        Self {
            enabled,
            allowed_from,
        }
    }

    pub fn allowed_from(&self) -> Timestamp {
        self.allowed_from
    }

    pub fn should_allow(&self, now: Timestamp) -> bool {
        !self.enabled || now >= self.allowed_from
    }

    pub fn check(&self, now: Timestamp) -> EventOutcome {
        if self.should_allow(now) {
            EventOutcome::Allowed
        } else {
            EventOutcome::Cancelled
        }
    }
}

pub struct GateListener {
    gate: Gate,
    clock: Arc<dyn Clock>,
}

impl GateListener {
    pub fn new(gate: Gate, clock: Arc<dyn Clock>) -> Self {
        Self { gate, clock }
    }
}

impl Listener<PortalActivation> for GateListener {
    fn on_event(&self, event: &mut PortalActivation) {
        if event.is_cancelled() {
            return;
        }

        let now = self.clock.now();

        if self.gate.check(now) == EventOutcome::Cancelled {
            log::info!(
                "{} tried to activate the end portal at {:?}, it opens at {}",
                event.player,
                event.frame,
                self.gate.allowed_from
            );
            event.set_cancelled(true);
        }
    }

    fn name(&self) -> &str {
        "end-portal-gate"
    }
}
