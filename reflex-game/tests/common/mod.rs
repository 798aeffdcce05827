#![allow(dead_code)]

use anyhow::{Result, bail};
use reflex_core::Rgb;
use reflex_game::{Board, GameConfig, Indicator, InputSource, ScoreStore};
use reflex_timing::{PollStats, Timer};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Virtual time one button sample costs
pub const TICK: Duration = Duration::from_millis(1);

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// How the simulated player handles the button
#[derive(Debug, Clone, Default)]
pub struct Player {
    /// Press this long after the indicator turns green
    pub react_after: Option<Duration>,
    pub hold: Duration,
    /// Attempts (1-based, counted by fresh blue cues) on which the player
    /// jumps the gun `jump_after` into the blue cue
    pub jump_attempts: HashSet<usize>,
    pub jump_after: Duration,
    /// Button already down when green appears, held this long
    pub go_hold: Option<Duration>,
    /// Absolute press windows on the virtual clock
    pub windows: Vec<(Duration, Duration)>,
}

impl Player {
    pub fn reacting(after_ms: u64) -> Self {
        Self {
            react_after: Some(Duration::from_millis(after_ms)),
            hold: Duration::from_millis(80),
            jump_after: Duration::from_millis(1200),
            ..Self::default()
        }
    }

    pub fn jumping_on(mut self, attempts: &[usize]) -> Self {
        self.jump_attempts = attempts.iter().copied().collect();
        self
    }

    pub fn holding_through_go(mut self, hold_ms: u64) -> Self {
        self.go_hold = Some(Duration::from_millis(hold_ms));
        self
    }

    pub fn holding(mut self, from_ms: u64, to_ms: u64) -> Self {
        self.windows
            .push((Duration::from_millis(from_ms), Duration::from_millis(to_ms)));
        self
    }
}

#[derive(Debug, Default)]
pub struct SimState {
    pub now: Duration,
    pub fills: Vec<(Duration, Rgb)>,
    pub tones: Vec<(Duration, u32, Duration)>,
    pub samples: usize,
    attempt: usize,
    last_blue: Option<Duration>,
    last_green: Option<Duration>,
    player: Player,
}

impl SimState {
    fn pressed(&self) -> bool {
        let now = self.now;
        let within = |from: Duration, len: Duration| now >= from && now < from + len;

        if self.player.windows.iter().any(|&(a, b)| now >= a && now < b) {
            return true;
        }
        if let (Some(after), Some(green)) = (self.player.react_after, self.last_green) {
            if within(green + after, self.player.hold) {
                return true;
            }
        }
        if let (Some(hold), Some(green)) = (self.player.go_hold, self.last_green) {
            if within(green, hold) {
                return true;
            }
        }
        if let Some(blue) = self.last_blue {
            if self.player.jump_attempts.contains(&self.attempt)
                && within(blue + self.player.jump_after, self.player.hold)
            {
                return true;
            }
        }
        false
    }

    pub fn colors(&self) -> Vec<Rgb> {
        self.fills.iter().map(|&(_, c)| c).collect()
    }

    pub fn fill_times(&self, color: Rgb) -> Vec<Duration> {
        self.fills
            .iter()
            .filter(|&&(_, c)| c == color)
            .map(|&(t, _)| t)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Sim(Arc<Mutex<SimState>>);

impl Sim {
    pub fn new(player: Player) -> Self {
        Sim(Arc::new(Mutex::new(SimState {
            player,
            ..SimState::default()
        })))
    }

    pub fn state(&self) -> MutexGuard<'_, SimState> {
        self.0.lock().unwrap()
    }

    pub fn board(&self) -> Board<SimIndicator, SimButton, SimTimer> {
        Board::new(
            SimIndicator(self.clone()),
            SimButton(self.clone()),
            SimTimer {
                sim: self.clone(),
                gaps: Vec::new(),
            },
        )
    }
}

pub struct SimIndicator(Sim);

impl Indicator for SimIndicator {
    fn fill(&mut self, color: Rgb) {
        let mut s = self.0.state();
        let now = s.now;
        if color == Rgb::BLUE && s.fills.last().map(|&(_, c)| c) != Some(Rgb::BLUE) {
            s.attempt += 1;
        }
        if color == Rgb::BLUE {
            s.last_blue = Some(now);
        }
        if color == Rgb::GREEN {
            s.last_green = Some(now);
        }
        s.fills.push((now, color));
    }

    fn play_tone(&mut self, frequency_hz: u32, duration: Duration) {
        let mut s = self.0.state();
        let now = s.now;
        s.tones.push((now, frequency_hz, duration));
        s.now += duration;
    }
}

pub struct SimButton(Sim);

impl InputSource for SimButton {
    fn is_pressed(&mut self) -> bool {
        let mut s = self.0.state();
        let pressed = s.pressed();
        s.samples += 1;
        s.now += TICK;
        pressed
    }
}

#[derive(Debug, Clone)]
pub struct SimTimer {
    sim: Sim,
    gaps: Vec<Duration>,
}

impl Timer for SimTimer {
    type Timestamp = Duration;

    fn now(&self) -> Duration {
        self.sim.state().now
    }

    fn elapsed(&self, ts: Duration) -> Duration {
        self.now().saturating_sub(ts)
    }

    fn sleep(&self, d: Duration) {
        self.sim.state().now += d;
    }

    fn record_sample(&mut self, gap: Duration) {
        self.gaps.push(gap);
    }

    fn reset_samples(&mut self) {
        self.gaps.clear();
    }

    fn poll_stats(&self) -> PollStats {
        PollStats::from_gaps(&self.gaps)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub value: Option<f64>,
    pub saves: Vec<f64>,
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn with_best(best: f64) -> Self {
        Self {
            value: Some(best),
            ..Self::default()
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Option<f64> {
        self.value
    }

    fn save(&mut self, value: f64) -> Result<()> {
        if self.fail_saves {
            bail!("storage is read-only");
        }
        self.saves.push(value);
        self.value = Some(value);
        Ok(())
    }
}

pub fn config() -> GameConfig {
    GameConfig::default()
}

pub fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
