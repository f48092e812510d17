use std::sync::Arc;

use crate::hal::clock::Clock;
use crate::hal::event::PortalActivation;
use crate::hal::listener::EventDispatcher;

pub mod clock;
pub mod event;
pub mod listener;

pub trait Host {
    fn clock(&self) -> Arc<dyn Clock>;
    fn portal_events(&self) -> &(dyn EventDispatcher<PortalActivation> + '_);
}
