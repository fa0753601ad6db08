pub mod clock;
pub mod history;
pub mod log;
pub mod recorder;
pub mod session;
pub mod timer;
pub mod watch;
pub mod writer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use history::{WeeklyHistory, summarize};
pub use recorder::{ShiftRecorder, SqliteRecorder};
pub use session::{SessionOptions, ShiftSession};
pub use timer::{ShiftTimer, TimerDisplay};
pub use watch::{Notice, Waiter, notice_cell};
pub use writer::{RetryPolicy, ShiftWriter};
