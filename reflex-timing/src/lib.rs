pub mod timer;

pub use timer::{HighPrecisionTimer, PollStats, Timer};
