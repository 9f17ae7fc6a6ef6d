use resonance_core::Message;
use resonance_source::MetricsSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Spawn a background Tokio task that polls `source` every `interval` and
/// forwards each resolved reading as [`Message::Polled`].
///
/// Each poll runs in its own task, so a slow poll never delays the next
/// tick; polls may resolve out of issue order.  `seq` records issue order.
/// Only a weak sender is held: the loop stops once every strong sender or
/// the receiver is gone.
pub fn spawn(
    source: Arc<MetricsSource>,
    interval: Duration,
    tx: mpsc::WeakSender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut seq: u64 = 0;

        loop {
            ticker.tick().await;
            let Some(tx) = tx.upgrade().filter(|tx| !tx.is_closed()) else {
                break; // dashboard stopped
            };

            seq += 1;
            let source = Arc::clone(&source);
            tokio::spawn(async move {
                let reading = source.poll().await;
                if tx.send(Message::Polled { seq, reading }).await.is_err() {
                    debug!(seq, "poll resolved after shutdown; dropped");
                }
            });
        }
    })
}
