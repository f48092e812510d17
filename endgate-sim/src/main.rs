use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;

use endgate::app::module::EndPortalModule;
use endgate::app::ModuleRegistry;
use endgate::config::EndPortalConfig;
use endgate::hal::clock::{Clock, Timestamp};
use endgate::hal::event::{BlockPos, Cancellable, EventOutcome, PortalActivation};
use endgate::hal::Host;
use endgate::svc::{ManualClock, StdHost};

const TASK_WAKEUP_PERIOD: Duration = Duration::from_millis(20);

/// Simulated time between two activation attempts.
fn sim_step() -> chrono::Duration {
    chrono::Duration::hours(1)
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(s) => s.parse().with_context(|| format!("Invalid {name}")),
        Err(_) => Ok(default),
    }
}

/// Fires one activation per tick, advancing the clock by [`sim_step`] after
/// each, and returns what the host saw.
fn simulate(
    config: EndPortalConfig,
    start: Timestamp,
    ticks: u32,
    period: Duration,
) -> anyhow::Result<Vec<(Timestamp, EventOutcome)>> {
    log::info!("Create host");
    let clock = ManualClock::new(start);
    let host = StdHost::new(Arc::new(clock.clone()));

    log::info!("Create modules");
    let mut modules = ModuleRegistry::new();
    modules.register(Box::new(EndPortalModule::new(&host, config)));
    modules.start_all()?;

    log::info!("Start loop");

    let frame = BlockPos::new(1_024, 28, -612);
    let mut outcomes = Vec::new();

    for tick in 0..ticks {
        let next_wakeup = Instant::now() + period;

        {
            let start = Instant::now();

            let now = clock.now();
            let event = host
                .portal_events()
                .dispatch(PortalActivation::new(format!("player{tick}"), frame));
            log::info!("{} -> {:?}", now, event.outcome());
            outcomes.push((now, event.outcome()));

            log::trace!("tick took {}ms", (Instant::now() - start).as_millis());
        }

        clock.advance(sim_step());

        if let Some(delay) = next_wakeup.checked_duration_since(Instant::now()) {
            std::thread::sleep(delay);
        } else if !period.is_zero() {
            log::error!("no delay");
        }
    }

    modules.stop_all();

    Ok(outcomes)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EndPortalConfig::from_env_var()?.unwrap_or_default();
    log::info!("{:?}", config);

    let allowed_from = config.allowed_from()?;
    let start: Timestamp = env_or("ENDGATE_SIM_START", allowed_from - sim_step() * 3)?;
    let ticks: u32 = env_or("ENDGATE_SIM_TICKS", 6)?;

    simulate(config, start, ticks, TASK_WAKEUP_PERIOD)?;

    Ok(())
}
