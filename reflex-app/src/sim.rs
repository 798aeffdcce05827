use anyhow::{Context, Result};
use log::{debug, error, info};
use reflex_core::Rgb;
use reflex_game::{
    Board, FileScoreStore, GameConfig, GameMode, Indicator, InputSource, RoundRunner,
    SimpleReactionTest,
};
use reflex_render::PanelSnapshot;
use reflex_timing::{HighPrecisionTimer, Timer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

#[derive(Debug)]
struct PanelInner {
    leds: Mutex<Vec<Rgb>>,
    tone_hz: Mutex<Option<u32>>,
    pressed: AtomicBool,
    finished: AtomicBool,
}

/// Board peripherals shared between the window (which draws them and feeds
/// the button) and the board thread (which runs the game against them)
#[derive(Debug, Clone)]
pub struct SharedPanel {
    inner: Arc<PanelInner>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // a panicked board thread leaves plain data behind, still fine to read
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SharedPanel {
    pub fn new(led_count: usize) -> Self {
        Self {
            inner: Arc::new(PanelInner {
                leds: Mutex::new(vec![Rgb::OFF; led_count]),
                tone_hz: Mutex::new(None),
                pressed: AtomicBool::new(false),
                finished: AtomicBool::new(false),
            }),
        }
    }

    pub fn set_pressed(&self, pressed: bool) {
        self.inner.pressed.store(pressed, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.inner.finished.load(Ordering::Acquire)
    }

    fn finish(&self) {
        self.inner.finished.store(true, Ordering::Release);
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            leds: lock(&self.inner.leds).clone(),
            pressed: self.inner.pressed.load(Ordering::Acquire),
            tone_hz: *lock(&self.inner.tone_hz),
        }
    }
}

pub struct PanelIndicator {
    panel: SharedPanel,
    timer: HighPrecisionTimer,
}

impl Indicator for PanelIndicator {
    fn fill(&mut self, color: Rgb) {
        lock(&self.panel.inner.leds).fill(color);
    }

    fn play_tone(&mut self, frequency_hz: u32, duration: Duration) {
        debug!("tone {} Hz for {:?}", frequency_hz, duration);
        *lock(&self.panel.inner.tone_hz) = Some(frequency_hz);
        self.timer.sleep(duration);
        *lock(&self.panel.inner.tone_hz) = None;
    }
}

pub struct PanelButton {
    panel: SharedPanel,
}

impl InputSource for PanelButton {
    fn is_pressed(&mut self) -> bool {
        self.panel.inner.pressed.load(Ordering::Acquire)
    }
}

fn board(panel: &SharedPanel) -> Board<PanelIndicator, PanelButton, HighPrecisionTimer> {
    Board::new(
        PanelIndicator {
            panel: panel.clone(),
            timer: HighPrecisionTimer::new(),
        },
        PanelButton {
            panel: panel.clone(),
        },
        HighPrecisionTimer::new(),
    )
}

/// Runs the configured game mode on its own thread, standing in for the
/// board's firmware loop.
pub fn spawn_game(config: GameConfig, panel: SharedPanel) -> Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("board".into())
        .spawn(move || {
            match config.mode {
                GameMode::Session => {
                    let mut store = FileScoreStore::new(config.high_score_path.clone());
                    let mut runner = RoundRunner::new(config, board(&panel), rand::rng());
                    match runner.play(&mut store) {
                        Ok(report) => info!(
                            "session over: {} rounds, {} false starts",
                            report.rounds(),
                            report.total_false_starts()
                        ),
                        Err(e) => error!("session failed: {:#}", e),
                    }
                }
                GameMode::Simple => {
                    let mut test = SimpleReactionTest::new(config, board(&panel), rand::rng());
                    test.run();
                }
            }
            panel.finish();
        })
        .context("spawning board thread")
}
