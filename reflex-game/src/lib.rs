pub mod board;
pub mod config;
pub mod round;
pub mod score;
pub mod session;
pub mod simple;

pub use board::{Board, Indicator, InputSource};
pub use config::{GameConfig, GameMode};
pub use round::{RoundRunner, SessionState};
pub use score::{FileScoreStore, ScoreStore};
pub use session::{average, export_report, update_high_score};
pub use simple::SimpleReactionTest;
