use crate::state::Reading;
use crate::window::TimeWindow;

/// All messages that flow into the dashboard event loop.
///
/// Sources:
/// - Poller task        → `Polled`
/// - Window selector    → `SelectWindow`
/// - Handle / signals   → `Shutdown`
#[derive(Debug, Clone)]
pub enum Message {
    /// A poll resolved.  `seq` is the issue order of the poll, starting at 1.
    Polled { seq: u64, reading: Reading },
    /// User picked a different chart range; recompute immediately.
    SelectWindow(TimeWindow),
    /// Stop polling and hand the dashboard back.
    Shutdown,
}
