use resonance_core::{ComponentsSeries, Dataset, Sample};
use std::collections::VecDeque;

/// Points kept per metric by default.
pub const DEFAULT_POINTS: usize = 100;

/// The three scores tracked by the components chart, in dataset order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentMetric {
    Coherence,
    TailHealth,
    Timing,
}

impl ComponentMetric {
    pub const ALL: [ComponentMetric; 3] = [Self::Coherence, Self::TailHealth, Self::Timing];

    pub fn label(self) -> &'static str {
        match self {
            Self::Coherence => "Coherence Score",
            Self::TailHealth => "Tail Health Score",
            Self::Timing => "Timing Score",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Coherence => 0,
            Self::TailHealth => 1,
            Self::Timing => 2,
        }
    }

    fn read(self, sample: &Sample) -> Option<f64> {
        match self {
            Self::Coherence => sample.coherence_score,
            Self::TailHealth => sample.tail_health_score,
            Self::Timing => sample.timing_score,
        }
    }
}

/// Rolling multi-metric chart.
///
/// Each metric keeps its own series capped at `capacity`; a metric absent
/// from a sample is simply not extended.  Labels share one axis: a label is
/// added only when it differs from the last one, and the axis is trimmed
/// from the front to the longest metric series.  When metrics arrive with
/// different presence patterns their points drift against the labels; this
/// compact layout is what the chart exposes.
#[derive(Debug, Clone)]
pub struct ComponentsChart {
    labels:   VecDeque<String>,
    series:   [VecDeque<f64>; 3],
    capacity: usize,
}

impl Default for ComponentsChart {
    fn default() -> Self {
        Self::new(DEFAULT_POINTS)
    }
}

impl ComponentsChart {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            labels: VecDeque::with_capacity(capacity + 1),
            series: std::array::from_fn(|_| VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    /// Extend the chart with one sample labelled `label`.
    pub fn push(&mut self, sample: &Sample, label: String) {
        if self.labels.back() != Some(&label) {
            self.labels.push_back(label);
        }

        for metric in ComponentMetric::ALL {
            if let Some(value) = metric.read(sample) {
                let series = &mut self.series[metric.index()];
                series.push_back(value);
                while series.len() > self.capacity {
                    series.pop_front();
                }
            }
        }

        let longest = self.series.iter().map(VecDeque::len).max().unwrap_or(0);
        while self.labels.len() > longest {
            self.labels.pop_front();
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }

    pub fn values(&self, metric: ComponentMetric) -> impl Iterator<Item = f64> + '_ {
        self.series[metric.index()].iter().copied()
    }

    pub fn len(&self, metric: ComponentMetric) -> usize {
        self.series[metric.index()].len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current state in the outbound chart contract.
    pub fn snapshot(&self) -> ComponentsSeries {
        ComponentsSeries {
            labels:   self.labels.iter().cloned().collect(),
            datasets: ComponentMetric::ALL
                .into_iter()
                .map(|metric| Dataset {
                    label:  metric.label(),
                    values: self.values(metric).collect(),
                })
                .collect(),
        }
    }
}
