//! Chart state handed to the rendering collaborator.
//!
//! Two independent views: the primary R(t) series, replaced wholesale on
//! every refresh, and the components series, extended one sample at a time.

pub mod components;
pub mod primary;

pub use components::{ComponentMetric, ComponentsChart, DEFAULT_POINTS};
pub use primary::PrimaryChart;

/// Both charts of the dashboard.
#[derive(Debug, Clone, Default)]
pub struct ChartSink {
    pub primary:    PrimaryChart,
    pub components: ComponentsChart,
}

impl ChartSink {
    pub fn new(components_capacity: usize) -> Self {
        Self {
            primary:    PrimaryChart::default(),
            components: ComponentsChart::new(components_capacity),
        }
    }
}
