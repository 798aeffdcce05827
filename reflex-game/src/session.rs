use crate::board::{Indicator, InputSource};
use crate::round::RoundRunner;
use crate::score::ScoreStore;
use anyhow::{Context, Result, bail};
use log::{info, warn};
use rand::Rng;
use reflex_core::{Rgb, RoundResult, SessionReport};
use reflex_timing::Timer;
use std::path::Path;

/// Mean reaction time, `None` for an empty session
pub fn average(results: &[RoundResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let sum: f64 = results.iter().map(|r| r.reaction_ms).sum();
    Some(sum / results.len() as f64)
}

/// Lower is better. Returns the new best and whether `candidate` took it.
pub fn update_high_score(current: Option<f64>, candidate: f64) -> (f64, bool) {
    match current {
        Some(best) if candidate >= best => (best, false),
        _ => (candidate, true),
    }
}

pub fn export_report(path: &Path, report: &SessionReport) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating results file {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("writing results to {}", path.display()))?;
    Ok(())
}

impl<I, B, T, R> RoundRunner<I, B, T, R>
where
    I: Indicator,
    B: InputSource,
    T: Timer,
    R: Rng,
{
    /// Full game: announce the stored best, play the configured rounds,
    /// then score the session and persist an improvement.
    pub fn play<S: ScoreStore>(&mut self, store: &mut S) -> Result<SessionReport> {
        let previous_best = store.load();
        match previous_best {
            Some(best) => info!("Current best score: {:.0} ms", best),
            None => info!("No high score yet, try playing!"),
        }

        let results = self.run_session(self.config.num_rounds);
        let Some(average_ms) = average(&results) else {
            bail!("session finished without a counted round");
        };
        info!(
            "Average reaction time over {} rounds: {:.0} ms",
            results.len(),
            average_ms
        );

        let (best_ms, improved) = update_high_score(previous_best, average_ms);
        if improved {
            info!("Congratulations! You scored a new best!");
            if let Err(e) = store.save(best_ms) {
                warn!("could not save high score: {:#}", e);
            }
        } else {
            info!("Best score remains: {:.0} ms", best_ms);
        }

        let report = SessionReport {
            results,
            average_ms,
            previous_best_ms: previous_best,
            best_ms,
            improved,
        };
        if let Some(path) = &self.config.results_path {
            if let Err(e) = export_report(path, &report) {
                warn!("could not export results: {:#}", e);
            }
        }

        self.board.fill(Rgb::CYAN);
        self.board.sleep(self.config.final_display());
        self.board.fill(Rgb::OFF);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(reaction_ms: f64) -> RoundResult {
        RoundResult {
            round: 1,
            reaction_ms,
            false_starts: 0,
            delay_ms: 2500.0,
        }
    }

    #[test]
    fn average_is_the_mean() {
        let results: Vec<_> = [200.0, 300.0, 250.0, 410.0, 340.0]
            .into_iter()
            .map(result)
            .collect();
        assert_eq!(average(&results), Some(300.0));
        assert_eq!(average(&results[..1]), Some(200.0));
    }

    #[test]
    fn average_of_nothing_is_none() {
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn first_score_is_a_best() {
        assert_eq!(update_high_score(None, 350.0), (350.0, true));
    }

    #[test]
    fn slower_average_keeps_the_best() {
        assert_eq!(update_high_score(Some(300.0), 350.0), (300.0, false));
        // a tie is not an improvement
        assert_eq!(update_high_score(Some(300.0), 300.0), (300.0, false));
    }

    #[test]
    fn faster_average_takes_the_best() {
        assert_eq!(update_high_score(Some(300.0), 250.0), (250.0, true));
    }
}
