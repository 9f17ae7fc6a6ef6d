//! Metrics acquisition: an ordered chain of tiers with graceful degradation.
//!
//! `poll()` tries each tier in order and normalizes the first payload that
//! arrives.  When every tier fails it yields [`Reading::NoData`]; nothing is
//! ever synthesized to fill the gap.

pub mod payload;
pub mod tier;
pub mod transform;

pub use payload::RawMetrics;
pub use tier::{FileTier, HttpTier, Location, Tier};

use resonance_config::SourceConfig;
use resonance_core::{Acquired, Clock, Reading, Result, TierKind};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

const NEVER: i64 = i64::MIN;

/// Polls the configured tiers in rank order.
#[derive(Debug)]
pub struct MetricsSource {
    tiers:        Vec<Box<dyn Tier>>,
    clock:        Arc<dyn Clock>,
    last_success: AtomicI64,
}

impl MetricsSource {
    /// An empty chain; add tiers with [`MetricsSource::with_tier`].
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tiers: Vec::new(),
            clock,
            last_success: AtomicI64::new(NEVER),
        }
    }

    /// Append a tier below the existing ones.
    pub fn with_tier(mut self, tier: Box<dyn Tier>) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Primary endpoint as a live tier, then the fallback snapshot (if set)
    /// as a static tier.
    pub fn from_config(config: &SourceConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let timeout = config.request_timeout();
        let mut source = Self::new(clock).with_tier(tier::for_location(
            "primary",
            Location::parse(&config.primary),
            TierKind::Live,
            timeout,
        )?);

        if !config.fallback.trim().is_empty() {
            source = source.with_tier(tier::for_location(
                "fallback",
                Location::parse(&config.fallback),
                TierKind::Static,
                timeout,
            )?);
        }

        Ok(source)
    }

    pub fn tier_names(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|t| t.name())
    }

    /// Acquire one reading.  Never fails: exhaustion becomes `NoData`.
    ///
    /// There is no retry here; the next scheduled poll is the retry.
    pub async fn poll(&self) -> Reading {
        for tier in &self.tiers {
            match tier.fetch().await {
                Ok(raw) => {
                    let received_at = self.clock.now_ms();
                    self.last_success.store(received_at, Ordering::SeqCst);

                    let metrics = transform::normalize(raw, tier.kind());
                    let sample = transform::to_sample(&metrics, received_at);
                    debug!(tier = tier.name(), r = sample.r, "metrics acquired");

                    return Reading::Live(Box::new(Acquired {
                        tier: tier.name().to_string(),
                        kind: tier.kind(),
                        metrics,
                        sample,
                    }));
                }
                Err(e) => warn!("{e}; trying next source"),
            }
        }

        error!("All metrics sources failed; no data this poll");
        Reading::NoData
    }

    /// Receive time of the last successful poll, epoch ms.
    pub fn last_success(&self) -> Option<i64> {
        match self.last_success.load(Ordering::SeqCst) {
            NEVER => None,
            at => Some(at),
        }
    }
}
