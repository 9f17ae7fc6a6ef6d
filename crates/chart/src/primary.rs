use resonance_core::ChartSeries;

/// The windowed R(t) chart.  Holds no incremental state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryChart {
    series: ChartSeries,
}

impl PrimaryChart {
    /// Swap in a freshly computed series.  Returns `false` when it was
    /// identical to the current one, so callers can skip a redraw.
    pub fn replace(&mut self, series: ChartSeries) -> bool {
        if self.series == series {
            return false;
        }
        self.series = series;
        true
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }
}
