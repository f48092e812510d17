use anyhow::{anyhow, Context};
use chrono::{Months, NaiveDate, NaiveDateTime};

use crate::hal::clock::Timestamp;

pub const CONFIG_ENV_VAR: &str = "ENDGATE_CONFIG";

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EndPortalConfig {
    pub enabled: bool,
    pub baseline: NaiveDateTime,
    pub delay_months: u32,
}

impl EndPortalConfig {
    /// First moment at which portal activation is allowed: `baseline` plus
    /// `delay_months` calendar months, clamped to the end of shorter months.
    pub fn allowed_from(&self) -> anyhow::Result<Timestamp> {
        self.baseline
            .checked_add_months(Months::new(self.delay_months))
            .ok_or_else(|| {
                anyhow!(
                    "{} + {} months is out of range",
                    self.baseline,
                    self.delay_months
                )
            })
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("Cannot parse end portal config")
    }

    /// Parses `enabled,baseline,delay_months`,
    /// e.g. `true,2025-03-28T00:00:00,1`.
    fn try_from_str(s: &str) -> anyhow::Result<Self> {
        let mut iter = s.split(',').map(str::trim);
        let enabled: bool = iter
            .next()
            .ok_or_else(|| anyhow!("Missing enabled flag"))?
            .parse()?;
        let baseline: NaiveDateTime = iter
            .next()
            .ok_or_else(|| anyhow!("Missing baseline"))?
            .parse()?;
        let delay_months: u32 = iter
            .next()
            .ok_or_else(|| anyhow!("Missing delay"))?
            .parse()?;
        if iter.next().is_some() {
            return Err(anyhow!("Too many fields in {s:?}"));
        }
        Ok(EndPortalConfig {
            enabled,
            baseline,
            delay_months,
        })
    }

    /// Returns `Ok(None)` when the variable is not set.
    pub fn from_env_var() -> anyhow::Result<Option<Self>> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(s) => EndPortalConfig::try_from_str(&s)
                .with_context(|| format!("Invalid {CONFIG_ENV_VAR}"))
                .map(Some),
            Err(_) => Ok(None),
        }
    }
}

impl Default for EndPortalConfig {
    fn default() -> Self {
        EndPortalConfig {
            enabled: true,
            baseline: NaiveDate::from_ymd_opt(2025, 3, 28)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            delay_months: 1,
        }
    }
}
