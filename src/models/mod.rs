pub mod phase;
pub mod shift;
pub mod weekly_summary;

pub use phase::Phase;
pub use shift::{NewShift, ShiftRecord};
pub use weekly_summary::WeeklySummary;
