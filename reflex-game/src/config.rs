use anyhow::{Context, Result, bail};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Multi-round game with false-start detection and a persisted best score
    #[default]
    Session,
    /// One round, no false-start detection, nothing persisted
    Simple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    pub num_rounds: usize,
    pub prepare_ms: u64,
    /// Half-open range the pre-go delay is drawn from
    pub delay_range_ms: (u64, u64),
    pub round_pause_ms: u64,
    pub cooldown_ms: u64,
    pub penalty_blinks: usize,
    pub penalty_tone_hz: u32,
    pub penalty_step_ms: u64,
    pub final_display_ms: u64,
    pub simple_hold_ms: u64,
    pub led_count: usize,
    pub high_score_path: PathBuf,
    pub results_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Session,
            num_rounds: 5,
            prepare_ms: 1000,
            delay_range_ms: (2000, 5000),
            round_pause_ms: 1000,
            cooldown_ms: 500,
            penalty_blinks: 3,
            penalty_tone_hz: 262,
            penalty_step_ms: 200,
            final_display_ms: 2000,
            simple_hold_ms: 2000,
            led_count: 10,
            high_score_path: PathBuf::from("highscore.txt"),
            results_path: None,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config. A missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_rounds == 0 {
            bail!("num_rounds must be at least 1");
        }
        let (lo, hi) = self.delay_range_ms;
        if lo >= hi {
            bail!("delay_range_ms must be a non-empty range, got [{lo}, {hi})");
        }
        if self.led_count == 0 {
            bail!("led_count must be at least 1");
        }
        Ok(())
    }

    /// Pre-go delay drawn uniformly from `delay_range_ms`
    pub fn draw_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let (lo, hi) = self.delay_range_ms;
        let ms = rng.random_range(lo as f64..hi as f64);
        Duration::from_secs_f64(ms / 1000.0)
    }

    pub fn prepare(&self) -> Duration {
        Duration::from_millis(self.prepare_ms)
    }

    pub fn round_pause(&self) -> Duration {
        Duration::from_millis(self.round_pause_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn penalty_step(&self) -> Duration {
        Duration::from_millis(self.penalty_step_ms)
    }

    pub fn final_display(&self) -> Duration {
        Duration::from_millis(self.final_display_ms)
    }

    pub fn simple_hold(&self) -> Duration {
        Duration::from_millis(self.simple_hold_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_board_game() {
        let config = GameConfig::default();
        assert_eq!(config.num_rounds, 5);
        assert_eq!(config.delay_range_ms, (2000, 5000));
        assert_eq!(config.penalty_tone_hz, 262);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "num_rounds": 3, "mode": "simple" }"#).unwrap();
        assert_eq!(config.num_rounds, 3);
        assert_eq!(config.mode, GameMode::Simple);
        assert_eq!(config.prepare(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_empty_delay_range() {
        let config = GameConfig {
            delay_range_ms: (3000, 3000),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            num_rounds: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn delays_stay_inside_the_range() {
        use rand::SeedableRng;
        let config = GameConfig::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let delay = config.draw_delay(&mut rng);
            assert!(delay >= Duration::from_secs(2));
            assert!(delay < Duration::from_secs(5));
        }
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("reflex-config-that-does-not-exist.json");
        assert_eq!(GameConfig::load(&path).unwrap(), GameConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("reflex-bad-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        assert!(GameConfig::load(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
