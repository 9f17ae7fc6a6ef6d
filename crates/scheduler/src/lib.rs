//! Dashboard scheduler.
//!
//! Owns every piece of dashboard state and wires together:
//! - the poller task (MetricsSource → `Message::Polled`)
//! - the refresh timer (HistoryStore → RangeAggregator → primary chart)
//! - window selections (immediate recompute)
//!
//! All state lives in one event-loop task; poll results arrive over a
//! channel, so appends are applied strictly one at a time.

pub mod poller;
pub mod render;

pub use render::{Frame, LogRenderer, RenderCause, Renderer};

use resonance_chart::ChartSink;
use resonance_config::{DashboardConfig, PollOrdering, SchedulerConfig};
use resonance_core::{
    Clock, DisplayState, Message, Reading, ResonanceError, Result, SystemClock, TimeWindow,
};
use resonance_history::{HistoryStore, RangeAggregator, RangeStatus};
use resonance_source::MetricsSource;
use resonance_widgets::{Readout, ReadoutBoard};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Event-bus depth between the poller / handle and the loop.
const CHANNEL_DEPTH: usize = 32;

/// Explicitly constructed components handed to [`Dashboard::new`].
pub struct DashboardParts<R> {
    pub source:     Arc<MetricsSource>,
    pub store:      HistoryStore,
    pub aggregator: RangeAggregator,
    pub charts:     ChartSink,
    pub board:      ReadoutBoard,
    pub clock:      Arc<dyn Clock>,
    pub renderer:   R,
}

// ── State ─────────────────────────────────────────────────────────────────────

pub struct Dashboard<R: Renderer> {
    source:       Arc<MetricsSource>,
    store:        HistoryStore,
    aggregator:   RangeAggregator,
    charts:       ChartSink,
    board:        ReadoutBoard,
    clock:        Arc<dyn Clock>,
    renderer:     R,
    config:       SchedulerConfig,
    window:       TimeWindow,
    status:       RangeStatus,
    latest:       Reading,
    readout:      Readout,
    last_applied: u64,
}

impl<R: Renderer> Dashboard<R> {
    pub fn new(parts: DashboardParts<R>, config: SchedulerConfig) -> Self {
        let window = config.window;
        let mut dashboard = Self {
            source:       parts.source,
            store:        parts.store,
            aggregator:   parts.aggregator,
            charts:       parts.charts,
            board:        parts.board,
            clock:        parts.clock,
            renderer:     parts.renderer,
            config,
            window,
            status:       RangeStatus::AwaitingData,
            latest:       Reading::NoData,
            readout:      Readout::default(),
            last_applied: 0,
        };
        dashboard.rebuild_readout();
        dashboard.recompute();
        dashboard
    }

    /// Build every component from configuration, on the wall clock.
    pub fn from_config(config: &DashboardConfig, renderer: R) -> Result<Self> {
        config.validate()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let source = MetricsSource::from_config(&config.source, Arc::clone(&clock))?;

        let parts = DashboardParts {
            source: Arc::new(source),
            store: HistoryStore::new(config.history.capacity),
            aggregator: RangeAggregator::new(config.chart.labeler()),
            charts: ChartSink::new(config.chart.components_capacity),
            board: ReadoutBoard::default(),
            clock,
            renderer,
        };
        Ok(Self::new(parts, config.scheduler.clone()))
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn status(&self) -> RangeStatus {
        self.status
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn charts(&self) -> &ChartSink {
        &self.charts
    }

    pub fn latest(&self) -> &Reading {
        &self.latest
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    // ── Update ────────────────────────────────────────────────────────────────

    /// Apply a resolved poll.  Returns `false` if it was discarded as stale
    /// under [`PollOrdering::Sequenced`].
    pub fn apply(&mut self, seq: u64, reading: Reading) -> bool {
        if self.config.ordering == PollOrdering::Sequenced && seq < self.last_applied {
            debug!(seq, last = self.last_applied, "discarding stale poll");
            return false;
        }
        self.last_applied = self.last_applied.max(seq);

        if let Some(sample) = reading.sample().copied() {
            self.store.append(sample);
            let label = self.aggregator.labeler().time_of_day(sample.timestamp);
            self.charts.components.push(&sample, label);
        }

        self.latest = reading;
        self.rebuild_readout();
        self.render(RenderCause::Sample);
        true
    }

    /// Periodic recompute of the primary chart.
    pub fn refresh(&mut self) {
        self.recompute();
        self.render(RenderCause::Refresh);
    }

    /// Switch the active window and recompute right away.
    pub fn select_window(&mut self, window: TimeWindow) {
        if window != self.window {
            info!(%window, "time window selected");
        }
        self.window = window;
        self.recompute();
        self.render(RenderCause::WindowChanged);
    }

    fn recompute(&mut self) {
        let now = self.clock.now_ms();
        let view = self.aggregator.compute(self.window, &self.store, now);
        self.status = view.status;
        self.charts.primary.replace(view.series);
    }

    fn rebuild_readout(&mut self) {
        let state = DisplayState {
            reading:      &self.latest,
            last_updated: self.source.last_success(),
        };
        self.readout = self.board.render(&state, self.aggregator.labeler());
    }

    fn render(&mut self, cause: RenderCause) {
        let status = self.status.message();
        let frame = Frame {
            cause,
            window: self.window,
            status: status.as_deref(),
            primary: self.charts.primary.series(),
            components: &self.charts.components,
            readout: &self.readout,
        };
        self.renderer.render(&frame);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Spawn the event loop and the poller.  Must be called inside a Tokio
    /// runtime.
    pub fn start(self) -> DashboardHandle<R> {
        let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
        let task = tokio::spawn(self.run(rx, tx.downgrade()));
        DashboardHandle { tx, task }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<Message>, tx: mpsc::WeakSender<Message>) -> Self {
        let poller = poller::spawn(Arc::clone(&self.source), self.config.poll_interval(), tx);
        let mut refresh = time::interval(self.config.refresh_interval());
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poll_ms = self.config.poll_interval_ms,
            refresh_ms = self.config.refresh_interval_ms,
            window = %self.window,
            "dashboard started"
        );

        loop {
            tokio::select! {
                _ = refresh.tick() => self.refresh(),
                message = rx.recv() => match message {
                    Some(Message::Polled { seq, reading }) => {
                        self.apply(seq, reading);
                    }
                    Some(Message::SelectWindow(window)) => self.select_window(window),
                    Some(Message::Shutdown) | None => break,
                },
            }
        }

        poller.abort();
        info!(samples = self.store.len(), "dashboard stopped");
        self
    }
}

/// Control handle for a running dashboard.
///
/// Dropping the handle without [`DashboardHandle::stop`] also ends the loop
/// once in-flight polls have resolved.
pub struct DashboardHandle<R: Renderer> {
    tx:   mpsc::Sender<Message>,
    task: JoinHandle<Dashboard<R>>,
}

impl<R: Renderer> DashboardHandle<R> {
    pub async fn select_window(&self, window: TimeWindow) -> Result<()> {
        self.tx
            .send(Message::SelectWindow(window))
            .await
            .map_err(|_| ResonanceError::Scheduler("dashboard is not running".into()))
    }

    /// Stop polling and refreshing, and hand back the final state.
    pub async fn stop(self) -> Result<Dashboard<R>> {
        // a closed channel means the loop already exited
        let _ = self.tx.send(Message::Shutdown).await;
        self.task
            .await
            .map_err(|e| ResonanceError::Scheduler(format!("dashboard task failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{BoxFuture, FutureExt};
    use resonance_chart::ComponentMetric;
    use resonance_core::{Acquired, Field, Labeler, ManualClock, Metrics, Sample, TierKind};
    use resonance_source::{RawMetrics, Tier};
    use std::time::Duration;

    const HOUR: i64 = 3_600_000;

    #[derive(Debug, Clone, PartialEq)]
    struct Recorded {
        cause:  RenderCause,
        window: TimeWindow,
        status: Option<String>,
        values: Vec<f64>,
        r:      String,
    }

    #[derive(Debug, Default)]
    struct Recorder {
        frames: Vec<Recorded>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, frame: &Frame<'_>) {
            self.frames.push(Recorded {
                cause:  frame.cause,
                window: frame.window,
                status: frame.status.map(str::to_string),
                values: frame.primary.values.clone(),
                r:      frame.readout.text("globalR").to_string(),
            });
        }
    }

    #[derive(Debug)]
    struct Scripted(Option<&'static str>);

    impl Tier for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn kind(&self) -> TierKind {
            TierKind::Live
        }

        fn fetch(&self) -> BoxFuture<'_, Result<RawMetrics>> {
            let result = match self.0 {
                Some(json) => Ok(serde_json::from_str(json).unwrap()),
                None => Err(ResonanceError::unavailable("scripted", "down")),
            };
            async move { result }.boxed()
        }
    }

    fn dashboard(
        tier: Scripted,
        clock: Arc<ManualClock>,
        config: SchedulerConfig,
    ) -> Dashboard<Recorder> {
        let parts = DashboardParts {
            source: Arc::new(MetricsSource::new(clock.clone()).with_tier(Box::new(tier))),
            store: HistoryStore::default(),
            aggregator: RangeAggregator::new(Labeler::utc()),
            charts: ChartSink::new(100),
            board: ReadoutBoard::default(),
            clock,
            renderer: Recorder::default(),
        };
        Dashboard::new(parts, config)
    }

    fn live(timestamp: i64, r: f64) -> Reading {
        Reading::Live(Box::new(Acquired {
            tier: "test".into(),
            kind: TierKind::Live,
            metrics: Metrics {
                r: Field::Value(r),
                ..Metrics::default()
            },
            sample: Sample {
                coherence_score: Some(r),
                ..Sample::new(timestamp, r)
            },
        }))
    }

    #[test]
    fn hour_window_scenario() {
        let clock = Arc::new(ManualClock::new(0));
        let mut dash = dashboard(Scripted(None), clock.clone(), SchedulerConfig::default());
        for (seq, (t, r)) in [(0, 0.2), (HOUR, 0.5), (2 * HOUR, 0.8)].into_iter().enumerate() {
            clock.set(t);
            assert!(dash.apply(seq as u64 + 1, live(t, r)));
        }

        dash.refresh();
        let last = dash.renderer().frames.last().unwrap();
        assert_eq!(last.cause, RenderCause::Refresh);
        assert_eq!(last.values, [0.5, 0.8]);
        assert_eq!(last.status, None);
        assert_eq!(last.r, "0.800");
    }

    #[test]
    fn empty_history_waits_for_live_data() {
        let clock = Arc::new(ManualClock::new(HOUR));
        let mut dash = dashboard(Scripted(None), clock, SchedulerConfig::default());
        dash.refresh();
        let last = dash.renderer().frames.last().unwrap();
        assert!(last.values.is_empty());
        assert_eq!(last.status.as_deref(), Some("Waiting for live data..."));
    }

    #[test]
    fn window_change_recomputes_immediately() {
        let clock = Arc::new(ManualClock::new(0));
        let mut dash = dashboard(Scripted(None), clock.clone(), SchedulerConfig::default());
        dash.apply(1, live(0, 0.4));
        clock.set(3 * HOUR);

        dash.select_window(TimeWindow::Hour);
        let last = dash.renderer().frames.last().unwrap();
        assert_eq!(last.cause, RenderCause::WindowChanged);
        assert_eq!(
            last.status.as_deref(),
            Some("Not enough data collected yet to display the last hour.")
        );

        dash.select_window(TimeWindow::Week);
        let last = dash.renderer().frames.last().unwrap();
        assert_eq!(last.window, TimeWindow::Week);
        assert_eq!(last.values, [0.4]);
        assert_eq!(dash.status(), RangeStatus::Ready);
    }

    #[test]
    fn no_data_is_not_recorded() {
        let clock = Arc::new(ManualClock::new(0));
        let mut dash = dashboard(Scripted(None), clock, SchedulerConfig::default());
        dash.apply(1, live(0, 0.5));
        dash.apply(2, Reading::NoData);

        assert_eq!(dash.store().len(), 1);
        assert_eq!(dash.charts().components.len(ComponentMetric::Coherence), 1);
        assert!(dash.readout().cells.iter().all(|c| c.is_no_data()));
    }

    #[test]
    fn sequenced_ordering_drops_late_polls() {
        let clock = Arc::new(ManualClock::new(0));
        let config = SchedulerConfig {
            ordering: PollOrdering::Sequenced,
            ..SchedulerConfig::default()
        };
        let mut dash = dashboard(Scripted(None), clock, config);
        assert!(dash.apply(2, live(10, 0.6)));
        assert!(!dash.apply(1, live(20, 0.1)));
        assert_eq!(dash.store().len(), 1);
        assert_eq!(dash.readout().text("globalR"), "0.600");
    }

    #[test]
    fn last_resolved_ordering_applies_late_polls() {
        let clock = Arc::new(ManualClock::new(0));
        let mut dash = dashboard(Scripted(None), clock, SchedulerConfig::default());
        assert!(dash.apply(2, live(10, 0.6)));
        assert!(dash.apply(1, live(20, 0.1)));
        assert_eq!(dash.store().len(), 2);
        assert_eq!(dash.readout().text("globalR"), "0.100");
    }

    fn fast() -> SchedulerConfig {
        SchedulerConfig {
            poll_interval_ms: 10,
            refresh_interval_ms: 10,
            ..SchedulerConfig::default()
        }
    }

    #[tokio::test]
    async fn running_dashboard_polls_and_refreshes() {
        let clock = Arc::new(ManualClock::new(HOUR));
        let dash = dashboard(
            Scripted(Some(r#"{"R": 0.55, "coherenceScore": 0.9, "agentConnected": true}"#)),
            clock,
            fast(),
        );

        let handle = dash.start();
        tokio::time::sleep(Duration::from_millis(120)).await;
        handle.select_window(TimeWindow::Day).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        let dash = handle.stop().await.unwrap();

        assert!(!dash.store().is_empty());
        assert!(dash.store().iter().all(|s| s.r == 0.55));
        assert_eq!(dash.window(), TimeWindow::Day);
        assert_eq!(dash.readout().text("agentStatus"), "Online");
        let causes: Vec<RenderCause> = dash.renderer().frames.iter().map(|f| f.cause).collect();
        assert!(causes.contains(&RenderCause::Refresh));
        assert!(causes.contains(&RenderCause::Sample));
        assert!(causes.contains(&RenderCause::WindowChanged));
    }

    /// Renderer that raises a flag when the dashboard owning it is dropped.
    #[derive(Debug)]
    struct DropFlag(Arc<std::sync::atomic::AtomicBool>);

    impl Renderer for DropFlag {
        fn render(&mut self, _frame: &Frame<'_>) {}
    }

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, std::sync::atomic::Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn dropping_the_handle_ends_the_loop() {
        let dropped = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let clock = Arc::new(ManualClock::new(HOUR));
        let parts = DashboardParts {
            source: Arc::new(
                MetricsSource::new(clock.clone())
                    .with_tier(Box::new(Scripted(Some(r#"{"R": 0.5}"#)))),
            ),
            store: HistoryStore::default(),
            aggregator: RangeAggregator::new(Labeler::utc()),
            charts: ChartSink::new(100),
            board: ReadoutBoard::default(),
            clock,
            renderer: DropFlag(dropped.clone()),
        };

        let handle = Dashboard::new(parts, fast()).start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(handle);

        for _ in 0..100 {
            if dropped.load(std::sync::atomic::Ordering::SeqCst) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("event loop kept running after its handle was dropped");
    }

    #[tokio::test]
    async fn failing_sources_keep_the_loop_alive() {
        let clock = Arc::new(ManualClock::new(HOUR));
        let dash = dashboard(Scripted(None), clock, fast());

        let handle = dash.start();
        tokio::time::sleep(Duration::from_millis(80)).await;
        let dash = handle.stop().await.unwrap();

        assert!(dash.store().is_empty());
        assert_eq!(dash.latest(), &Reading::NoData);
        assert!(dash.readout().cells.iter().all(|c| c.is_no_data()));
        let samples = dash
            .renderer()
            .frames
            .iter()
            .filter(|f| f.cause == RenderCause::Sample)
            .count();
        assert!(samples >= 2, "expected repeated polls, got {samples}");
        assert_eq!(dash.status(), RangeStatus::AwaitingData);
    }
}
