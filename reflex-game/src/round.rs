use crate::board::{Board, Indicator, InputSource};
use crate::config::GameConfig;
use log::{debug, info, warn};
use rand::Rng;
use reflex_core::{Rgb, RoundPhase, RoundResult};
use reflex_timing::Timer;
use std::time::Duration;

/// Results gathered during one program run
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub results: Vec<RoundResult>,
    /// Number of the round to play next, 1-based
    pub round: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
            round: 1,
        }
    }

    pub fn record(&mut self, result: RoundResult) {
        self.results.push(result);
        self.round += 1;
    }

    pub fn rounds_completed(&self) -> usize {
        self.results.len()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives rounds through [`RoundPhase`] against a board
pub struct RoundRunner<I, B, T, R>
where
    I: Indicator,
    B: InputSource,
    T: Timer,
    R: Rng,
{
    pub board: Board<I, B, T>,
    pub rng: R,
    pub config: GameConfig,
    phase: RoundPhase,
    state: SessionState,
}

impl<I, B, T, R> RoundRunner<I, B, T, R>
where
    I: Indicator,
    B: InputSource,
    T: Timer,
    R: Rng,
{
    pub fn new(config: GameConfig, board: Board<I, B, T>, rng: R) -> Self {
        Self {
            board,
            rng,
            config,
            phase: RoundPhase::default(),
            state: SessionState::new(),
        }
    }

    fn advance(&mut self, false_start: bool) {
        if let Some(next) = self.phase.next(false_start) {
            debug!("phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    /// Plays one round, retrying through false starts until a press after
    /// the go signal is measured.
    pub fn run_round(&mut self, round: usize) -> RoundResult {
        self.phase = RoundPhase::Armed;
        let mut false_starts = 0;
        let mut delay = Duration::ZERO;
        let mut reaction = Duration::ZERO;

        // a press carried over from the previous round must not count
        self.board.wait_for_release();

        while !self.phase.is_done() {
            match self.phase {
                // entered with the button up, at round start or after a penalty
                RoundPhase::Armed => {
                    self.board.fill(self.phase.color());
                    info!("Round {}: Get ready...", round);
                    self.board.sleep(self.config.prepare());
                    self.advance(false);
                }
                RoundPhase::Waiting => {
                    delay = self.config.draw_delay(&mut self.rng);
                    debug!("round {} delay {:.0} ms", round, delay.as_secs_f64() * 1e3);
                    let pressed = self.board.poll_for_press(Some(delay));
                    self.advance(pressed);
                }
                RoundPhase::FalseStart => {
                    false_starts += 1;
                    warn!("False start! Try again");
                    self.board.blink_penalty(
                        self.config.penalty_blinks,
                        self.config.penalty_tone_hz,
                        self.config.penalty_step(),
                    );
                    self.board.fill(Rgb::BLUE);
                    self.board.wait_for_release();
                    self.advance(false);
                }
                RoundPhase::Go => {
                    self.board.fill(self.phase.color());
                    info!("GO!");
                    // a press landing on the same tick as the delay boundary
                    self.board.wait_for_release();
                    self.advance(false);
                }
                RoundPhase::Measuring => {
                    self.board.timer.reset_samples();
                    let start = self.board.timer.now();
                    self.board.poll_for_press(None);
                    reaction = self.board.timer.elapsed(start);

                    let stats = self.board.timer.poll_stats();
                    debug!(
                        "poll: {} samples, avg gap {:.3} ms, jitter {:.3} ms, resolution {:.3} ms",
                        stats.samples,
                        stats.average_gap_ns / 1_000_000.0,
                        stats.jitter_ns / 1_000_000.0,
                        stats.resolution_ms(),
                    );
                    info!("Reaction time: {:.0} ms", reaction.as_secs_f64() * 1000.0);

                    self.board.fill(Rgb::OFF);
                    self.board.sleep(self.config.cooldown());
                    self.board.wait_for_release();
                    self.advance(false);
                }
                RoundPhase::Done => {}
            }
        }

        RoundResult {
            round,
            reaction_ms: reaction.as_secs_f64() * 1000.0,
            false_starts,
            delay_ms: delay.as_secs_f64() * 1000.0,
        }
    }

    /// Plays `num_rounds` counted rounds with a pause after each
    pub fn run_session(&mut self, num_rounds: usize) -> Vec<RoundResult> {
        self.state = SessionState::new();
        while self.state.rounds_completed() < num_rounds {
            let result = self.run_round(self.state.round);
            self.state.record(result);
            self.board.sleep(self.config.round_pause());
        }
        self.state.results.clone()
    }

    pub fn current_phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.state
    }
}
