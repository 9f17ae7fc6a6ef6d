//! Hand-off to the rendering collaborator.

use resonance_chart::ComponentsChart;
use resonance_core::{ChartSeries, TimeWindow};
use resonance_widgets::Readout;
use tracing::{debug, info};

/// Why a frame is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCause {
    /// Periodic refresh of the primary chart.
    Refresh,
    /// A poll resolved.
    Sample,
    /// The user picked a different window.
    WindowChanged,
}

/// Everything a renderer needs for one frame.  Borrowed from the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub cause:      RenderCause,
    pub window:     TimeWindow,
    /// Status line for the primary chart, `None` when it has data.
    pub status:     Option<&'a str>,
    pub primary:    &'a ChartSeries,
    pub components: &'a ComponentsChart,
    pub readout:    &'a Readout,
}

/// Draws frames.  Pixel rendering is entirely up to the implementation.
pub trait Renderer: Send + 'static {
    fn render(&mut self, frame: &Frame<'_>);
}

/// Renders to the log: a summary line per frame at `info`, the chart
/// contract as JSON at `debug`.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &Frame<'_>) {
        let r = frame.readout.text("globalR");
        let r_defaulted = frame.readout.get("globalR").is_some_and(|c| c.defaulted);
        match frame.status {
            Some(status) => info!(window = %frame.window, r, r_defaulted, "{status}"),
            None => info!(
                window = %frame.window,
                points = frame.primary.len(),
                r,
                r_defaulted,
                r_status = frame.readout.text("rStatus"),
                compliance = frame.readout.text("bandCompliance"),
                "R(t) updated"
            ),
        }

        if frame.cause != RenderCause::WindowChanged {
            if let Ok(json) = serde_json::to_string(frame.primary) {
                debug!(target: "resonance::chart", "primary {json}");
            }
            if let Ok(json) = serde_json::to_string(&frame.components.snapshot()) {
                debug!(target: "resonance::chart", "components {json}");
            }
        }
    }
}
