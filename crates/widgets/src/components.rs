use crate::{blank, fixed, score};
use resonance_core::{Cell, DisplayState, Labeler, Widget};

const IDS: [&str; 4] = ["coherenceScore", "tailHealthScore", "timingScore", "lambdaRes"];

/// Component scores as percentages with bar gauges, plus λ_res.
#[derive(Debug, Default)]
pub struct ComponentsWidget;

impl ComponentsWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for ComponentsWidget {
    fn id(&self) -> &str {
        "components"
    }

    fn view(&self, state: &DisplayState<'_>, _labeler: &Labeler) -> Vec<Cell> {
        let Some(m) = state.metrics() else {
            return blank(&IDS);
        };
        vec![
            score("coherenceScore", &m.coherence_score),
            score("tailHealthScore", &m.tail_health_score),
            score("timingScore", &m.timing_score),
            fixed("lambdaRes", &m.lambda_res, 3),
        ]
    }
}
