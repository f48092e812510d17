use std::sync::Arc;

use crate::app::gate::{Gate, GateListener};
use crate::config::EndPortalConfig;
use crate::hal::listener::ListenerHandle;
use crate::hal::Host;

pub trait Module {
    fn start(&mut self) -> anyhow::Result<()>;

    fn stop(&mut self);

    fn is_enabled(&self) -> bool;

    /// True between a successful `start` and the next `stop`.
    fn is_running(&self) -> bool;

    /// Does nothing when `enabled` matches the current state; otherwise
    /// starts or stops the module.
    fn set_enabled(&mut self, enabled: bool) -> anyhow::Result<()>;

    fn name(&self) -> &str;
}

struct Registered {
    handle: ListenerHandle,
    gate: Gate,
}

pub struct EndPortalModule<'a> {
    host: &'a dyn Host,
    config: EndPortalConfig,
    enabled: bool,
    registered: Option<Registered>,
}

impl<'a> EndPortalModule<'a> {
    pub const NAME: &'static str = "End Portal Module";

    pub fn new(host: &'a dyn Host, config: EndPortalConfig) -> Self {
        let enabled = config.enabled;
        Self {
            host,
            config,
            enabled,
            registered: None,
        }
    }

    /// The gate currently listening, if the module is started.
    pub fn gate(&self) -> Option<&Gate> {
        self.registered.as_ref().map(|x| &x.gate)
    }
}

impl Module for EndPortalModule<'_> {
    fn start(&mut self) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.registered.is_some() {
            log::debug!("{} already started", Self::NAME);
            return Ok(());
        }

        let allowed_from = self.config.allowed_from()?;
        let gate = Gate::new(allowed_from, self.enabled);
        let listener = GateListener::new(gate, self.host.clock());
        let handle = self.host.portal_events().register(Arc::new(listener));

        log::info!("{} started, end portal opens at {allowed_from}", Self::NAME);

        self.registered = Some(Registered { handle, gate });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(Registered { handle, .. }) = self.registered.take() {
            let removed = self.host.portal_events().unregister_all(handle);
            log::info!("{} stopped, {removed} listener(s) removed", Self::NAME);
        } else {
            log::warn!("{} stopped before it was started", Self::NAME);
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_running(&self) -> bool {
        self.registered.is_some()
    }

    fn set_enabled(&mut self, enabled: bool) -> anyhow::Result<()> {
        if self.enabled == enabled {
            return Ok(());
        }

        self.enabled = enabled;

        if enabled {
            self.start()
        } else {
            if self.is_running() {
                self.stop();
            }
            Ok(())
        }
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

impl Drop for EndPortalModule<'_> {
    fn drop(&mut self) {
        if self.registered.is_some() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::hal::clock::Timestamp;
    use crate::hal::event::{BlockPos, Cancellable, EventOutcome, PortalActivation};
    use crate::svc::{ManualClock, StdHost};

    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn host_at(t: &str) -> (StdHost, ManualClock) {
        let clock = ManualClock::new(ts(t));
        (StdHost::new(Arc::new(clock.clone())), clock)
    }

    fn activate(host: &StdHost) -> EventOutcome {
        host.portal_events()
            .dispatch(PortalActivation::new("steve", BlockPos::new(3, 40, 7)))
            .outcome()
    }

    #[test_log::test]
    fn test_started_module_blocks_until_opening() {
        let (host, clock) = host_at("2025-04-27T23:59:59");
        let mut module = EndPortalModule::new(&host, EndPortalConfig::default());
        module.start().unwrap();

        assert_eq!(module.gate().unwrap().allowed_from(), ts("2025-04-28T00:00:00"));
        assert_eq!(activate(&host), EventOutcome::Cancelled);

        clock.advance(Duration::seconds(1));
        assert_eq!(activate(&host), EventOutcome::Allowed);
    }

    #[test_log::test]
    fn test_disabled_module_registers_nothing() {
        let (host, _clock) = host_at("2025-01-01T00:00:00");
        let config = EndPortalConfig {
            enabled: false,
            ..Default::default()
        };
        let mut module = EndPortalModule::new(&host, config);
        module.start().unwrap();

        assert!(!module.is_enabled());
        assert!(module.gate().is_none());
        assert_eq!(host.portal_events().listener_count(), 0);
        assert_eq!(activate(&host), EventOutcome::Allowed);
    }

    #[test_log::test]
    fn test_start_twice_registers_once() {
        let (host, _clock) = host_at("2025-01-01T00:00:00");
        let mut module = EndPortalModule::new(&host, EndPortalConfig::default());
        module.start().unwrap();
        module.start().unwrap();

        assert_eq!(host.portal_events().listener_count(), 1);
    }

    #[test_log::test]
    fn test_stop_unregisters() {
        let (host, _clock) = host_at("2025-01-01T00:00:00");
        let mut module = EndPortalModule::new(&host, EndPortalConfig::default());
        module.start().unwrap();
        module.stop();

        assert!(module.is_enabled());
        assert!(!module.is_running());
        assert_eq!(host.portal_events().listener_count(), 0);
        assert_eq!(activate(&host), EventOutcome::Allowed);

        module.stop();
        assert_eq!(host.portal_events().listener_count(), 0);
    }

    #[test_log::test]
    fn test_toggle_restores_gating() {
        let (host, clock) = host_at("2025-04-27T12:00:00");
        let mut module = EndPortalModule::new(&host, EndPortalConfig::default());
        module.start().unwrap();
        let before = *module.gate().unwrap();

        module.set_enabled(false).unwrap();
        assert!(!module.is_enabled());
        assert!(module.gate().is_none());
        assert_eq!(activate(&host), EventOutcome::Allowed);

        module.set_enabled(true).unwrap();
        assert!(module.is_enabled());
        assert_eq!(*module.gate().unwrap(), before);
        assert_eq!(activate(&host), EventOutcome::Cancelled);

        clock.set(ts("2025-04-28T00:00:00"));
        assert_eq!(activate(&host), EventOutcome::Allowed);
    }

    #[test_log::test]
    fn test_set_enabled_same_value_is_noop() {
        let (host, _clock) = host_at("2025-01-01T00:00:00");
        let mut module = EndPortalModule::new(&host, EndPortalConfig::default());
        module.start().unwrap();

        module.set_enabled(true).unwrap();
        module.set_enabled(true).unwrap();
        assert_eq!(host.portal_events().listener_count(), 1);

        module.set_enabled(false).unwrap();
        module.set_enabled(false).unwrap();
        assert_eq!(host.portal_events().listener_count(), 0);
    }

    #[test_log::test]
    fn test_enabling_a_disabled_module_starts_it() {
        let (host, _clock) = host_at("2025-01-01T00:00:00");
        let config = EndPortalConfig {
            enabled: false,
            ..Default::default()
        };
        let mut module = EndPortalModule::new(&host, config);
        module.start().unwrap();
        module.set_enabled(true).unwrap();

        assert_eq!(host.portal_events().listener_count(), 1);
        assert_eq!(activate(&host), EventOutcome::Cancelled);
    }

    #[test]
    fn test_bad_config_fails_to_start() {
        let (host, _clock) = host_at("2025-01-01T00:00:00");
        let config = EndPortalConfig {
            delay_months: u32::MAX,
            ..Default::default()
        };
        let mut module = EndPortalModule::new(&host, config);

        assert!(module.start().is_err());
        assert_eq!(host.portal_events().listener_count(), 0);
    }

    #[test]
    fn test_drop_unregisters() {
        let (host, _clock) = host_at("2025-01-01T00:00:00");
        {
            let mut module = EndPortalModule::new(&host, EndPortalConfig::default());
            module.start().unwrap();
            assert_eq!(host.portal_events().listener_count(), 1);
        }
        assert_eq!(host.portal_events().listener_count(), 0);
    }

    #[test]
    fn test_name() {
        let (host, _clock) = host_at("2025-01-01T00:00:00");
        let module = EndPortalModule::new(&host, EndPortalConfig::default());
        assert_eq!(module.name(), "End Portal Module");
    }
}
