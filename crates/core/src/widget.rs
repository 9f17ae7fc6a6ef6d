use crate::{label::Labeler, state::DisplayState};

/// Placeholder shown for every field that has no value.
pub const NO_DATA: &str = "—";

/// Semantic colour of a readout cell; the renderer picks actual colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Warning,
    Danger,
}

/// One rendered readout field.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Stable field identifier, e.g. `"globalR"`.
    pub id:    &'static str,
    pub text:  String,
    pub tone:  Tone,
    /// Fill level in percent for bar-style fields.
    pub gauge: Option<f64>,
    /// Shows a substituted constant rather than a reported value.
    pub defaulted: bool,
}

impl Cell {
    pub fn new(id: &'static str, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            tone: Tone::Neutral,
            gauge: None,
            defaulted: false,
        }
    }

    pub fn no_data(id: &'static str) -> Self {
        Self::new(id, NO_DATA)
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_gauge(mut self, percent: f64) -> Self {
        self.gauge = Some(percent);
        self
    }

    pub fn with_defaulted(mut self, defaulted: bool) -> Self {
        self.defaulted = defaulted;
        self
    }

    pub fn is_no_data(&self) -> bool {
        self.text == NO_DATA
    }
}

/// Every readout widget implements this trait.
///
/// Widgets are purely reactive: they get a read-only view of the latest
/// reading and return the cells they own.  Rendering happens elsewhere.
pub trait Widget: Send + Sync + std::fmt::Debug {
    /// Unique identifier, e.g. `"resonance"`.
    fn id(&self) -> &str;

    fn view(&self, state: &DisplayState<'_>, labeler: &Labeler) -> Vec<Cell>;
}
