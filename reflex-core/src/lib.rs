pub mod color;
pub mod phase;
pub mod round;

pub use color::Rgb;
pub use phase::RoundPhase;
pub use round::{RoundResult, SessionReport};
