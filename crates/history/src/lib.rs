pub mod aggregate;
pub mod store;

pub use aggregate::{bucket_means, BucketPoint, RangeAggregator, RangeStatus, RangeView};
pub use store::{HistoryStore, DEFAULT_CAPACITY};
