use anyhow::{Context, Result};
use std::path::PathBuf;

/// Persistence for the best session average
pub trait ScoreStore {
    /// `None` when there is no usable stored score
    fn load(&self) -> Option<f64>;
    fn save(&mut self, value: f64) -> Result<()>;
}

/// One number in a text file. Last write wins.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Option<f64> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                log::debug!("no high score at {}: {}", self.path.display(), e);
                return None;
            }
        };
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
            _ => {
                log::debug!("ignoring unusable high score file {}", self.path.display());
                None
            }
        }
    }

    fn save(&mut self, value: f64) -> Result<()> {
        std::fs::write(&self.path, value.to_string())
            .with_context(|| format!("writing high score to {}", self.path.display()))
    }
}
