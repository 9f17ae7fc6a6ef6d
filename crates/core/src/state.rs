use crate::field::Field;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::fmt;

/// Which kind of tier produced a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    /// Live endpoint; carries agent connectivity.
    Live,
    /// Static snapshot; no live-status semantics.
    Static,
}

/// Connectivity of the monitored agent as far as the dashboard knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Link {
    Online,
    Offline,
    /// Live tier did not say.
    #[default]
    Unknown,
    /// Data came from the static fallback.
    Static,
}

/// Generalized Pareto tail-fit parameters, passed through opaquely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpdParams {
    pub xi:        Field<f64>,
    pub sigma:     Field<f64>,
    pub threshold: Field<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TailQuantiles {
    pub q99:   Field<f64>,
    pub q99_9: Field<f64>,
}

/// Test coverage is reported either as a number or as preformatted text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coverage {
    Percent(f64),
    Text(String),
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub tests_passed: Field<u32>,
    pub total_tests:  Field<u32>,
    pub coverage:     Field<Coverage>,
}

/// Canonical, normalized metrics record produced by one successful poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    pub r:                 Field<f64>,
    pub k:                 Field<f64>,
    pub spectral_entropy:  Field<f64>,
    pub mode:              Field<String>,
    pub coherence_score:   Field<f64>,
    pub tail_health_score: Field<f64>,
    pub timing_score:      Field<f64>,
    pub lambda_res:        Field<f64>,
    pub gpd:               GpdParams,
    pub tail_quantiles:    TailQuantiles,
    pub p50_latency:       Field<f64>,
    pub p95_latency:       Field<f64>,
    pub p99_latency:       Field<f64>,
    pub p99_9_latency:     Field<f64>,
    pub p99_improvement:   Field<f64>,
    /// 100 when the reported R sits in the optimal band, else 0.
    pub band_compliance:   Field<f64>,
    pub validation:        Validation,
    pub link:              Link,
    /// Producer-side timestamp of the payload.
    pub reported_at:       Field<DateTime<FixedOffset>>,
}

/// One point of the R(t) history, stamped with its receive time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Epoch milliseconds.
    pub timestamp:         i64,
    pub r:                 f64,
    pub coherence_score:   Option<f64>,
    pub tail_health_score: Option<f64>,
    pub timing_score:      Option<f64>,
}

impl Sample {
    /// Plain sample carrying only R; component scores absent.
    pub fn new(timestamp: i64, r: f64) -> Self {
        Self {
            timestamp,
            r,
            coherence_score: None,
            tail_health_score: None,
            timing_score: None,
        }
    }
}

/// A successful acquisition from one tier.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquired {
    pub tier:    String,
    pub kind:    TierKind,
    pub metrics: Metrics,
    pub sample:  Sample,
}

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Live(Box<Acquired>),
    /// Every tier failed.  Never replaced by synthetic values.
    NoData,
}

impl Reading {
    pub fn metrics(&self) -> Option<&Metrics> {
        match self {
            Self::Live(acquired) => Some(&acquired.metrics),
            Self::NoData => None,
        }
    }

    pub fn sample(&self) -> Option<&Sample> {
        match self {
            Self::Live(acquired) => Some(&acquired.sample),
            Self::NoData => None,
        }
    }
}

/// What the readout widgets get to see.
#[derive(Debug, Clone, Copy)]
pub struct DisplayState<'a> {
    pub reading:      &'a Reading,
    /// Receive time of the last successful poll, epoch ms.
    pub last_updated: Option<i64>,
}

impl DisplayState<'_> {
    pub fn metrics(&self) -> Option<&Metrics> {
        self.reading.metrics()
    }
}
