//! Pure normalization of a raw payload into the canonical [`Metrics`] record.

use crate::payload::RawMetrics;
use chrono::DateTime;
use resonance_core::{
    Field, GpdParams, Link, Metrics, Sample, TailQuantiles, TierKind, Validation,
};
use tracing::warn;

pub const DEFAULT_R: f64 = 0.5;
pub const DEFAULT_K: f64 = 0.35;
pub const DEFAULT_SPECTRAL_ENTROPY: f64 = 0.5;
pub const DEFAULT_MODE: &str = "adaptive";

/// Inclusive bounds of the optimal R band.
pub const BAND_LOW: f64 = 0.35;
pub const BAND_HIGH: f64 = 0.65;

/// Single-sample band indicator: 100 inside `[0.35, 0.65]`, 0 outside.
///
/// Not a running average over history.
pub fn band_compliance(r: f64) -> f64 {
    if (BAND_LOW..=BAND_HIGH).contains(&r) {
        100.0
    } else {
        0.0
    }
}

/// Turn a successful payload into [`Metrics`].
///
/// R, K, spectral entropy and mode are substituted with their documented
/// constants only when missing or null; everything else keeps its tri-state.
pub fn normalize(raw: RawMetrics, kind: TierKind) -> Metrics {
    let gpd = raw.gpd.unwrap_or_default();
    let quantiles = raw.tail_quantiles.unwrap_or_default();
    let validation = raw.validation.unwrap_or_default();

    let link = match kind {
        TierKind::Static => Link::Static,
        TierKind::Live => match raw.agent_connected {
            Field::Value(true) => Link::Online,
            Field::Value(false) => Link::Offline,
            _ => Link::Unknown,
        },
    };

    let reported_at = match raw.timestamp {
        Field::Value(text) => match DateTime::parse_from_rfc3339(&text) {
            Ok(at) => Field::Value(at),
            Err(e) => {
                warn!("Ignoring unparseable payload timestamp '{text}': {e}");
                Field::Null
            }
        },
        Field::Absent => Field::Absent,
        _ => Field::Null,
    };

    Metrics {
        band_compliance:   raw.r.map(band_compliance),
        r:                 raw.r.or_default_to(DEFAULT_R),
        k:                 raw.k.or_default_to(DEFAULT_K),
        spectral_entropy:  raw.spectral_entropy.or_default_to(DEFAULT_SPECTRAL_ENTROPY),
        mode:              raw.mode.or_default_to(DEFAULT_MODE.to_string()),
        coherence_score:   raw.coherence_score,
        tail_health_score: raw.tail_health_score,
        timing_score:      raw.timing_score,
        lambda_res:        raw.lambda_res,
        p50_latency:       raw.p50_latency,
        p95_latency:       raw.p95_latency.or(raw.p99_latency),
        p99_latency:       raw.p99_latency,
        p99_9_latency:     raw.p99_9_latency.or(quantiles.q99_9),
        p99_improvement:   raw.p99_improvement,
        gpd: GpdParams {
            xi:        gpd.xi,
            sigma:     gpd.sigma,
            threshold: gpd.threshold,
        },
        tail_quantiles: TailQuantiles {
            q99:   quantiles.q99,
            q99_9: quantiles.q99_9,
        },
        validation: Validation {
            tests_passed: validation.tests_passed,
            total_tests:  validation.total_tests,
            coverage:     validation.coverage,
        },
        link,
        reported_at,
    }
}

/// History point for a normalized record received at `received_at` (epoch ms).
pub fn to_sample(metrics: &Metrics, received_at: i64) -> Sample {
    Sample {
        timestamp:         received_at,
        r:                 metrics.r.get().unwrap_or(DEFAULT_R),
        coherence_score:   metrics.coherence_score.get(),
        tail_health_score: metrics.tail_health_score.get(),
        timing_score:      metrics.timing_score.get(),
    }
}
