pub mod clock;
pub mod error;
pub mod event;
pub mod field;
pub mod label;
pub mod series;
pub mod state;
pub mod widget;
pub mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ResonanceError, Result};
pub use event::Message;
pub use field::Field;
pub use label::Labeler;
pub use series::{ChartSeries, ComponentsSeries, Dataset};
pub use state::{
    Acquired, Coverage, DisplayState, GpdParams, Link, Metrics, Reading, Sample, TailQuantiles,
    TierKind, Validation,
};
pub use widget::{Cell, Tone, Widget, NO_DATA};
pub use window::TimeWindow;
