use crate::{blank, fixed};
use resonance_core::{Cell, DisplayState, Field, Labeler, Tone, Widget};

const IDS: [&str; 7] = [
    "p50Latency",
    "p95Latency",
    "p99Latency",
    "p99_9Latency",
    "spectralEntropy",
    "couplingK",
    "p99Improvement",
];

/// Latency percentiles, spectral entropy, coupling K and the p99 improvement.
#[derive(Debug, Default)]
pub struct LatencyWidget;

impl LatencyWidget {
    pub fn new() -> Self {
        Self
    }
}

/// Latencies are shown as whole numbers, rounding halves up.
fn rounded(id: &'static str, field: &Field<f64>) -> Cell {
    match field.get() {
        Some(v) => Cell::new(id, format!("{}", v.round() as i64)).with_defaulted(field.is_defaulted()),
        None => Cell::no_data(id),
    }
}

fn improvement(field: &Field<f64>) -> Cell {
    match field.get() {
        Some(v) => {
            let sign = if v > 0.0 { "+" } else { "" };
            let tone = if v > 0.0 { Tone::Success } else { Tone::Danger };
            Cell::new("p99Improvement", format!("{sign}{v:.1}%"))
                .with_tone(tone)
                .with_defaulted(field.is_defaulted())
        }
        None => Cell::no_data("p99Improvement"),
    }
}

impl Widget for LatencyWidget {
    fn id(&self) -> &str {
        "latency"
    }

    fn view(&self, state: &DisplayState<'_>, _labeler: &Labeler) -> Vec<Cell> {
        let Some(m) = state.metrics() else {
            return blank(&IDS);
        };
        vec![
            rounded("p50Latency", &m.p50_latency),
            rounded("p95Latency", &m.p95_latency),
            rounded("p99Latency", &m.p99_latency),
            rounded("p99_9Latency", &m.p99_9_latency),
            fixed("spectralEntropy", &m.spectral_entropy, 3),
            fixed("couplingK", &m.k, 3),
            improvement(&m.p99_improvement),
        ]
    }
}
