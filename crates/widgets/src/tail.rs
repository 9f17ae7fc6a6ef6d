use crate::{blank, fixed};
use resonance_core::{Cell, DisplayState, Labeler, Widget};

const IDS: [&str; 5] = ["gpdXi", "gpdSigma", "gpdThreshold", "tailQ99", "tailQ99_9"];

/// GPD fit parameters and tail quantiles, shown as received.
#[derive(Debug, Default)]
pub struct TailWidget;

impl TailWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for TailWidget {
    fn id(&self) -> &str {
        "tail"
    }

    fn view(&self, state: &DisplayState<'_>, _labeler: &Labeler) -> Vec<Cell> {
        let Some(m) = state.metrics() else {
            return blank(&IDS);
        };
        vec![
            fixed("gpdXi", &m.gpd.xi, 4),
            fixed("gpdSigma", &m.gpd.sigma, 2),
            fixed("gpdThreshold", &m.gpd.threshold, 2),
            fixed("tailQ99", &m.tail_quantiles.q99, 2),
            fixed("tailQ99_9", &m.tail_quantiles.q99_9, 2),
        ]
    }
}
