use serde::{Deserialize, Serialize};

/// Recorded result of one counted round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based, counted rounds only
    pub round: usize,
    pub reaction_ms: f64,
    /// Attempts thrown away before this one counted
    pub false_starts: usize,
    /// Pre-go delay drawn for the counted attempt
    pub delay_ms: f64,
}

/// Summary of a completed multi-round session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub results: Vec<RoundResult>,
    pub average_ms: f64,
    pub previous_best_ms: Option<f64>,
    pub best_ms: f64,
    pub improved: bool,
}

impl SessionReport {
    pub fn rounds(&self) -> usize {
        self.results.len()
    }

    pub fn total_false_starts(&self) -> usize {
        self.results.iter().map(|r| r.false_starts).sum()
    }
}
