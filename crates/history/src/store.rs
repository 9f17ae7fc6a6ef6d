use resonance_core::Sample;
use std::collections::VecDeque;
use tracing::warn;

pub const DEFAULT_CAPACITY: usize = 1_000;

/// Rolling history of samples, oldest first.
///
/// Holds at most `capacity` samples; each append past that evicts exactly
/// the single oldest one.  Stored samples are never reordered or mutated.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    samples:  VecDeque<Sample>,
    capacity: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStore {
    /// A zero capacity is bumped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, returning the evicted oldest one when at capacity.
    pub fn append(&mut self, sample: Sample) -> Option<Sample> {
        if let Some(last) = self.samples.back() {
            if sample.timestamp < last.timestamp {
                warn!(
                    last = last.timestamp,
                    incoming = sample.timestamp,
                    "sample timestamp went backwards; keeping arrival order"
                );
            }
        }

        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        evicted
    }

    /// Samples with `timestamp >= since`, in store order.
    pub fn query(&self, since: i64) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter().filter(move |s| s.timestamp >= since)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
