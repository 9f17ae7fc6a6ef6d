//! Time-range selection and bucketed aggregation.
//!
//! Short windows (`1h`, `24h`) yield one point per sample.  Long windows
//! (`7d`, `30d`) average R over fixed-width buckets keyed by
//! `floor(timestamp / width) * width`; empty buckets are never emitted.

use crate::store::HistoryStore;
use resonance_core::{ChartSeries, Labeler, Sample, TimeWindow};
use std::collections::BTreeMap;

/// Why a computed series is (or isn't) empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStatus {
    Ready,
    /// Nothing has ever been recorded.
    AwaitingData,
    /// History exists but none of it falls in the window.
    EmptyWindow(TimeWindow),
}

impl RangeStatus {
    /// User-facing status line; `None` when there is nothing to say.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Ready => None,
            Self::AwaitingData => Some("Waiting for live data...".to_string()),
            Self::EmptyWindow(window) => Some(format!(
                "Not enough data collected yet to display {}.",
                window.describe()
            )),
        }
    }
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeView {
    pub window: TimeWindow,
    pub series: ChartSeries,
    pub status: RangeStatus,
}

/// One averaged bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketPoint {
    /// Bucket start, a multiple of the bucket width.
    pub start: i64,
    pub mean:  f64,
    pub count: usize,
}

#[derive(Default)]
struct Accumulator {
    sum:   f64,
    count: usize,
}

/// Mean R per bucket of `width_ms`, ascending by bucket start.
pub fn bucket_means<'a>(
    samples: impl IntoIterator<Item = &'a Sample>,
    width_ms: i64,
) -> Vec<BucketPoint> {
    let mut buckets: BTreeMap<i64, Accumulator> = BTreeMap::new();
    for sample in samples {
        // div_euclid floors for pre-epoch timestamps too
        let start = sample.timestamp.div_euclid(width_ms) * width_ms;
        let acc = buckets.entry(start).or_default();
        acc.sum += sample.r;
        acc.count += 1;
    }

    buckets
        .into_iter()
        .map(|(start, acc)| BucketPoint {
            start,
            mean: acc.sum / acc.count as f64,
            count: acc.count,
        })
        .collect()
}

/// Turns history into the primary chart's series.
///
/// Pure given `(window, store contents, now)`; labels come from the labeler.
#[derive(Debug, Clone, Default)]
pub struct RangeAggregator {
    labeler: Labeler,
}

impl RangeAggregator {
    pub fn new(labeler: Labeler) -> Self {
        Self { labeler }
    }

    pub fn labeler(&self) -> &Labeler {
        &self.labeler
    }

    pub fn compute(&self, window: TimeWindow, store: &HistoryStore, now: i64) -> RangeView {
        let cutoff = now - window.duration_ms();
        let mut series = ChartSeries::new();

        match window.bucket_ms() {
            None => {
                for sample in store.query(cutoff) {
                    series.push(self.labeler.time_of_day(sample.timestamp), sample.r);
                }
            }
            Some(width) => {
                for bucket in bucket_means(store.query(cutoff), width) {
                    series.push(self.labeler.date_time(bucket.start), bucket.mean);
                }
            }
        }

        let status = if !series.is_empty() {
            RangeStatus::Ready
        } else if store.is_empty() {
            RangeStatus::AwaitingData
        } else {
            RangeStatus::EmptyWindow(window)
        };

        RangeView { window, series, status }
    }
}
