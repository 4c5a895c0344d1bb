//! The externally owned oath record.
//!
//! An oath accrues four currencies with elapsed real time. The hero game
//! reads it exactly once, through [`OathRecord`], to seed the hero's base
//! level from willpower.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Seconds of elapsed time per unit of wellness.
const WELLNESS_PERIOD_SECS: f64 = 30.0;
/// Seconds of elapsed time per unit of wisdom.
const WISDOM_PERIOD_SECS: f64 = 60.0;
/// Seconds of elapsed time per unit of gold.
const GOLD_PERIOD_SECS: f64 = 900.0;

/// What the hero game needs from an oath.
pub trait OathRecord {
    /// Stable identifier used to scope saves.
    fn id(&self) -> &str;
    /// Currency value that grows monotonically with elapsed time.
    fn currency(&self) -> f64;
}

/// Currency balances of an oath.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Currencies {
    /// One per second.
    pub willpower: f64,
    /// One per 30 seconds.
    pub wellness: f64,
    /// One per minute.
    pub wisdom: f64,
    /// One per 15 minutes.
    pub gold: f64,
}

/// How long an oath lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OathLength {
    /// No end date.
    Forever,
    /// A fixed number of days.
    Days(u32),
}

/// A habit commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Oath {
    /// Stable identifier.
    pub id: String,
    /// The habit being kept or broken.
    pub habit: String,
    /// When the oath began.
    pub start_date: DateTime<Utc>,
    /// Duration.
    pub length: OathLength,
    /// Accrued balances.
    pub currencies: Currencies,
    /// When `currencies` were last brought up to date.
    pub last_updated: DateTime<Utc>,
}

impl Oath {
    /// Create an oath starting at `start_date` with empty balances.
    pub fn new(
        id: impl Into<String>,
        habit: impl Into<String>,
        start_date: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let id = id.into();
        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidOathId(id));
        }
        Ok(Self {
            id,
            habit: habit.into(),
            start_date,
            length: OathLength::Forever,
            currencies: Currencies::default(),
            last_updated: start_date,
        })
    }

    /// Set the oath length (builder style).
    pub fn with_length(mut self, length: OathLength) -> Self {
        self.length = length;
        self
    }

    /// Set the willpower balance directly (builder style).
    pub fn with_willpower(mut self, willpower: f64) -> CoreResult<Self> {
        if !willpower.is_finite() || willpower < 0.0 {
            return Err(CoreError::OutOfRange {
                field: "willpower",
                value: willpower.to_string(),
            });
        }
        self.currencies.willpower = willpower;
        Ok(self)
    }

    /// Bring balances up to `now`. Time running backwards accrues nothing.
    pub fn accrue(&mut self, now: DateTime<Utc>) {
        let elapsed_ms = (now - self.last_updated).num_milliseconds();
        if elapsed_ms <= 0 {
            return;
        }
        let secs = elapsed_ms as f64 / 1000.0;
        self.currencies.willpower += secs;
        self.currencies.wellness += secs / WELLNESS_PERIOD_SECS;
        self.currencies.wisdom += secs / WISDOM_PERIOD_SECS;
        self.currencies.gold += secs / GOLD_PERIOD_SECS;
        self.last_updated = now;
    }
}

impl OathRecord for Oath {
    fn id(&self) -> &str {
        &self.id
    }

    fn currency(&self) -> f64 {
        self.currencies.willpower
    }
}
