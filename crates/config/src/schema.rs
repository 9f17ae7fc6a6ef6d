use chrono::FixedOffset;
use resonance_core::{Labeler, ResonanceError, Result, TimeWindow};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure parsed from `resonance.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source:    SourceConfig,
    pub scheduler: SchedulerConfig,
    pub history:   HistoryConfig,
    pub chart:     ChartConfig,
}

impl DashboardConfig {
    /// Reject values that would stall or starve the dashboard.
    pub fn validate(&self) -> Result<()> {
        if self.scheduler.poll_interval_ms == 0 || self.scheduler.refresh_interval_ms == 0 {
            return Err(ResonanceError::Config("intervals must be greater than zero".into()));
        }
        if self.source.request_timeout_ms == 0 {
            return Err(ResonanceError::Config("request_timeout_ms must be greater than zero".into()));
        }
        if self.history.capacity == 0 || self.chart.components_capacity == 0 {
            return Err(ResonanceError::Config("capacities must be greater than zero".into()));
        }
        if self.source.primary.trim().is_empty() {
            return Err(ResonanceError::Config("source.primary must not be empty".into()));
        }
        for (key, pattern) in [
            ("time_format", &self.chart.time_format),
            ("date_time_format", &self.chart.date_time_format),
        ] {
            if !Labeler::is_valid_pattern(pattern) {
                return Err(ResonanceError::Config(format!(
                    "chart.{key} '{pattern}' is not a valid strftime pattern"
                )));
            }
        }
        if let Some(minutes) = self.chart.utc_offset_minutes {
            if FixedOffset::east_opt(minutes * 60).is_none() {
                return Err(ResonanceError::Config(format!(
                    "utc_offset_minutes {minutes} is out of range"
                )));
            }
        }
        Ok(())
    }
}

/// Where metrics come from, in fallback order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Live endpoint (URL).
    pub primary: String,
    /// Static snapshot: URL or filesystem path.  Empty disables the tier.
    pub fallback: String,
    /// Upper bound on each tier fetch.
    pub request_timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            primary:            "https://resonance.syncscript.app/api/metrics".to_string(),
            fallback:           "data/metrics.json".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl SourceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// How overlapping polls are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PollOrdering {
    /// Apply every poll as it resolves, even if an earlier-issued one lands late.
    #[default]
    LastResolved,
    /// Drop results issued before the last applied poll.
    Sequenced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub poll_interval_ms:    u64,
    pub refresh_interval_ms: u64,
    pub ordering:            PollOrdering,
    /// Window active at start-up.
    pub window:              TimeWindow,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms:    5_000,
            refresh_interval_ms: 5_000,
            ordering:            PollOrdering::default(),
            window:              TimeWindow::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum retained samples; the oldest is evicted beyond this.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 1_000 }
    }
}

/// Chart retention and label formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Points kept per metric in the components chart.
    pub components_capacity: usize,
    /// `strftime` pattern for point-per-sample labels.
    pub time_format:         String,
    /// `strftime` pattern for bucket labels and timestamps.
    pub date_time_format:    String,
    /// Fixed UTC offset for labels; unset = local time.
    pub utc_offset_minutes:  Option<i32>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            components_capacity: 100,
            time_format:         "%H:%M:%S".to_string(),
            date_time_format:    "%Y-%m-%d %H:%M".to_string(),
            utc_offset_minutes:  None,
        }
    }
}

impl ChartConfig {
    pub fn labeler(&self) -> Labeler {
        Labeler {
            time_format:      self.time_format.clone(),
            date_time_format: self.date_time_format.clone(),
            offset:           self
                .utc_offset_minutes
                .and_then(|m| FixedOffset::east_opt(m * 60)),
        }
    }
}
