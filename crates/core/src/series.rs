use serde::Serialize;

/// Chart-ready series handed to the rendering collaborator.
///
/// `labels` and `values` always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: String, value: f64) {
        self.labels.push(label);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One named line of the components chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label:  &'static str,
    pub values: Vec<f64>,
}

/// Snapshot of the multi-metric components chart: one shared label axis and
/// one dataset per tracked metric.  Datasets may be shorter than `labels`
/// (see `ComponentsChart` for the alignment rules).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentsSeries {
    pub labels:   Vec<String>,
    pub datasets: Vec<Dataset>,
}
