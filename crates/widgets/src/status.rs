use crate::blank;
use resonance_core::{Cell, DisplayState, Field, Labeler, Link, Tone, Widget};

const METRIC_IDS: [&str; 9] = [
    "validationStatus",
    "validationDetails",
    "testsPassed",
    "totalTests",
    "testCoverage",
    "agentStatus",
    "metricsStatus",
    "dataQuality",
    "lastValidation",
];

/// Validation results, agent link health and timestamps.
#[derive(Debug, Default)]
pub struct StatusWidget;

impl StatusWidget {
    pub fn new() -> Self {
        Self
    }
}

type LinkTexts = (&'static str, &'static str, &'static str, &'static str);

/// `(agent, metrics, quality, details)` texts for a link state.
///
/// `None` for a link the source never described.
fn link_texts(link: Link) -> Option<LinkTexts> {
    match link {
        Link::Online => Some(("Online", "Active", "Live", "Connected to Resonance agent")),
        Link::Offline => Some(("Offline", "Inactive", "Degraded", "Agent not connected")),
        Link::Static => Some(("Static", "Snapshot", "Static", "Static snapshot, no live agent status")),
        Link::Unknown => None,
    }
}

fn link_tone(link: Link) -> Tone {
    match link {
        Link::Online => Tone::Success,
        Link::Offline => Tone::Danger,
        Link::Static => Tone::Warning,
        Link::Unknown => Tone::Neutral,
    }
}

fn count(id: &'static str, field: &Field<u32>) -> Cell {
    match field.get() {
        Some(n) => Cell::new(id, n.to_string()),
        None => Cell::no_data(id),
    }
}

impl Widget for StatusWidget {
    fn id(&self) -> &str {
        "status"
    }

    fn view(&self, state: &DisplayState<'_>, labeler: &Labeler) -> Vec<Cell> {
        let last_updated = match state.last_updated {
            Some(ms) => Cell::new("lastUpdated", labeler.date_time(ms)),
            None => Cell::no_data("lastUpdated"),
        };

        let Some(m) = state.metrics() else {
            let mut cells = blank(&METRIC_IDS);
            cells.push(last_updated);
            return cells;
        };

        let tone = link_tone(m.link);
        let texts = link_texts(m.link);
        let linked = |id: &'static str, pick: fn(LinkTexts) -> &'static str| match texts {
            Some(t) => Cell::new(id, pick(t)).with_tone(tone),
            None => Cell::no_data(id),
        };

        let mut cells = vec![
            linked("validationStatus", |t| t.0),
            linked("validationDetails", |t| t.3).with_tone(Tone::Neutral),
            count("testsPassed", &m.validation.tests_passed),
            count("totalTests", &m.validation.total_tests),
            match m.validation.coverage.value() {
                Some(c) => Cell::new("testCoverage", c.to_string()),
                None => Cell::no_data("testCoverage"),
            },
            linked("agentStatus", |t| t.0),
            linked("metricsStatus", |t| t.1).with_tone(Tone::Neutral),
            linked("dataQuality", |t| t.2).with_tone(Tone::Neutral),
        ];

        cells.push(match m.reported_at.value() {
            Some(at) => Cell::new("lastValidation", labeler.date_time(at.timestamp_millis())),
            None => Cell::no_data("lastValidation"),
        });
        cells.push(last_updated);
        cells
    }
}
