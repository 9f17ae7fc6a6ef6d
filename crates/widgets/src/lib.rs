//! Readout widgets: the latest reading turned into display text.
//!
//! Every field without a value shows [`NO_DATA`]; a genuine zero shows as
//! zero.  Under [`resonance_core::Reading::NoData`] every metric field is the
//! placeholder.

pub mod components;
pub mod latency;
pub mod resonance;
pub mod status;
pub mod tail;

pub use components::ComponentsWidget;
pub use latency::LatencyWidget;
pub use resonance::ResonanceWidget;
pub use status::StatusWidget;
pub use tail::TailWidget;

use resonance_core::{Cell, DisplayState, Field, Labeler, Widget, NO_DATA};

/// Flat list of cells produced by one readout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readout {
    pub cells: Vec<Cell>,
}

impl Readout {
    pub fn get(&self, id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    /// Text of field `id`, or the placeholder if the field is unknown.
    pub fn text(&self, id: &str) -> &str {
        self.get(id).map_or(NO_DATA, |c| c.text.as_str())
    }
}

/// The full set of readout widgets in display order.
#[derive(Debug)]
pub struct ReadoutBoard {
    widgets: Vec<Box<dyn Widget>>,
}

impl Default for ReadoutBoard {
    fn default() -> Self {
        Self {
            widgets: vec![
                Box::new(ResonanceWidget::new()),
                Box::new(ComponentsWidget::new()),
                Box::new(TailWidget::new()),
                Box::new(LatencyWidget::new()),
                Box::new(StatusWidget::new()),
            ],
        }
    }
}

impl ReadoutBoard {
    pub fn render(&self, state: &DisplayState<'_>, labeler: &Labeler) -> Readout {
        Readout {
            cells: self
                .widgets
                .iter()
                .flat_map(|w| w.view(state, labeler))
                .collect(),
        }
    }
}

/// `value` with `dp` decimals, or the placeholder.
pub(crate) fn fixed(id: &'static str, field: &Field<f64>, dp: usize) -> Cell {
    match field.get() {
        Some(v) => Cell::new(id, format!("{v:.dp$}")).with_defaulted(field.is_defaulted()),
        None => Cell::no_data(id),
    }
}

/// A `[0, 1]` score as a one-decimal percentage with a bar gauge.
pub(crate) fn score(id: &'static str, field: &Field<f64>) -> Cell {
    match field.get() {
        Some(v) => Cell::new(id, format!("{:.1}%", v * 100.0))
            .with_gauge(v * 100.0)
            .with_defaulted(field.is_defaulted()),
        None => Cell::no_data(id),
    }
}

/// Placeholder cells for every id.
pub(crate) fn blank(ids: &[&'static str]) -> Vec<Cell> {
    ids.iter().copied().map(Cell::no_data).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_core::{Reading, Tone};

    #[test]
    fn no_data_renders_placeholder_everywhere() {
        let reading = Reading::NoData;
        let state = DisplayState { reading: &reading, last_updated: None };
        let readout = ReadoutBoard::default().render(&state, &Labeler::utc());

        assert!(readout.cells.len() > 20);
        for cell in &readout.cells {
            assert!(cell.is_no_data(), "{} showed {:?}", cell.id, cell.text);
            assert_eq!(cell.tone, Tone::Neutral);
            assert_eq!(cell.gauge, None);
        }
    }

    #[test]
    fn ids_are_unique() {
        let reading = Reading::NoData;
        let state = DisplayState { reading: &reading, last_updated: None };
        let readout = ReadoutBoard::default().render(&state, &Labeler::utc());
        let mut ids: Vec<&str> = readout.cells.iter().map(|c| c.id).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn fixed_keeps_zero() {
        assert_eq!(fixed("x", &Field::Value(0.0), 3).text, "0.000");
        assert!(fixed("x", &Field::Null, 3).is_no_data());
        assert!(!fixed("x", &Field::Value(0.5), 3).defaulted);
        assert!(fixed("x", &Field::Defaulted(0.5), 3).defaulted);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use resonance_core::{Acquired, Metrics, Reading, Sample, TierKind};

    pub fn live(metrics: Metrics) -> Reading {
        Reading::Live(Box::new(Acquired {
            tier: "test".into(),
            kind: TierKind::Live,
            metrics,
            sample: Sample::new(0, 0.5),
        }))
    }
}
