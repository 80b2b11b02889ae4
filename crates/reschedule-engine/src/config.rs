//! TOML-loadable engine policy.
//!
//! Every constant the scheduling components depend on lives here with a default
//! matching the engine's built-in behavior, so an empty TOML document yields
//! [`EngineConfig::default`]. Example:
//!
//! ```toml
//! timezone = "Europe/Berlin"
//! search_days = 7
//!
//! [working_hours]
//! start_hour = 9
//! end_hour = 17
//!
//! [scoring]
//! conflict_penalty = 40.0
//! ```

use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Hour-of-day band treated as working time (both ends inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
}

impl WorkingHours {
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
        }
    }
}

/// Bonuses and penalties applied by the slot scorer, in score points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_conflict_penalty")]
    pub conflict_penalty: f64,
    #[serde(default = "default_distance_penalty_per_day")]
    pub distance_penalty_per_day: f64,
    #[serde(default = "default_max_distance_penalty")]
    pub max_distance_penalty: f64,
    #[serde(default = "default_preferred_time_bonus")]
    pub preferred_time_bonus: f64,
    #[serde(default = "default_same_weekday_bonus")]
    pub same_weekday_bonus: f64,
    #[serde(default = "default_outside_working_hours_penalty")]
    pub outside_working_hours_penalty: f64,
    #[serde(default = "default_buffer_bonus")]
    pub buffer_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            conflict_penalty: default_conflict_penalty(),
            distance_penalty_per_day: default_distance_penalty_per_day(),
            max_distance_penalty: default_max_distance_penalty(),
            preferred_time_bonus: default_preferred_time_bonus(),
            same_weekday_bonus: default_same_weekday_bonus(),
            outside_working_hours_penalty: default_outside_working_hours_penalty(),
            buffer_bonus: default_buffer_bonus(),
        }
    }
}

/// Thresholds for the default conflict severity bands.
///
/// Full containment of the shorter event is always `Critical`; otherwise an
/// overlap shorter than `low_below_minutes` is `Low`, and the overlap/shorter
/// ratio decides between `Medium`, `High`, and `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityBands {
    #[serde(default = "default_low_below_minutes")]
    pub low_below_minutes: i64,
    #[serde(default = "default_medium_below_ratio")]
    pub medium_below_ratio: f64,
    #[serde(default = "default_high_below_ratio")]
    pub high_below_ratio: f64,
}

impl Default for SeverityBands {
    fn default() -> Self {
        Self {
            low_below_minutes: default_low_below_minutes(),
            medium_below_ratio: default_medium_below_ratio(),
            high_below_ratio: default_high_below_ratio(),
        }
    }
}

/// Complete engine policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Zone in which hour-of-day, weekday, and calendar days are evaluated.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    #[serde(default)]
    pub working_hours: WorkingHours,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub severity: SeverityBands,
    /// Default slot-search horizon in days.
    #[serde(default = "default_search_days")]
    pub search_days: u32,
    /// Number of ranked slots the finder keeps.
    #[serde(default = "default_max_slots")]
    pub max_slots: usize,
    /// Horizon used by the compact and spread bulk strategies.
    #[serde(default = "default_bulk_horizon_days")]
    pub bulk_horizon_days: u32,
    /// Gap left after the longer event when suggesting a reschedule.
    #[serde(default = "default_reschedule_gap_minutes")]
    pub reschedule_gap_minutes: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            working_hours: WorkingHours::default(),
            scoring: ScoringWeights::default(),
            severity: SeverityBands::default(),
            search_days: default_search_days(),
            max_slots: default_max_slots(),
            bulk_horizon_days: default_bulk_horizon_days(),
            reschedule_gap_minutes: default_reschedule_gap_minutes(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}

fn default_timezone() -> Tz {
    Tz::UTC
}
fn default_start_hour() -> u32 {
    8
}
fn default_end_hour() -> u32 {
    18
}
fn default_conflict_penalty() -> f64 {
    30.0
}
fn default_distance_penalty_per_day() -> f64 {
    5.0
}
fn default_max_distance_penalty() -> f64 {
    30.0
}
fn default_preferred_time_bonus() -> f64 {
    10.0
}
fn default_same_weekday_bonus() -> f64 {
    5.0
}
fn default_outside_working_hours_penalty() -> f64 {
    20.0
}
fn default_buffer_bonus() -> f64 {
    10.0
}
fn default_low_below_minutes() -> i64 {
    15
}
fn default_medium_below_ratio() -> f64 {
    0.5
}
fn default_high_below_ratio() -> f64 {
    0.9
}
fn default_search_days() -> u32 {
    14
}
fn default_max_slots() -> usize {
    20
}
fn default_bulk_horizon_days() -> u32 {
    7
}
fn default_reschedule_gap_minutes() -> i64 {
    15
}
