use crate::board::{Board, Indicator, InputSource};
use crate::config::GameConfig;
use log::{debug, info};
use rand::Rng;
use reflex_core::{Rgb, RoundResult};
use reflex_timing::Timer;

/// Single round with no false-start detection and no scoring
pub struct SimpleReactionTest<I, B, T, R>
where
    I: Indicator,
    B: InputSource,
    T: Timer,
    R: Rng,
{
    pub board: Board<I, B, T>,
    pub rng: R,
    pub config: GameConfig,
}

impl<I, B, T, R> SimpleReactionTest<I, B, T, R>
where
    I: Indicator,
    B: InputSource,
    T: Timer,
    R: Rng,
{
    pub fn new(config: GameConfig, board: Board<I, B, T>, rng: R) -> Self {
        Self { board, rng, config }
    }

    pub fn run(&mut self) -> RoundResult {
        self.board.fill(Rgb::BLUE);
        info!("Get ready...");
        self.board.sleep(self.config.prepare());

        // presses during the delay are not watched here
        let delay = self.config.draw_delay(&mut self.rng);
        debug!("delay {:.0} ms", delay.as_secs_f64() * 1e3);
        self.board.sleep(delay);

        self.board.fill(Rgb::GREEN);
        info!("GO!");
        let start = self.board.timer.now();
        self.board.poll_for_press(None);
        let reaction = self.board.timer.elapsed(start);
        let reaction_ms = reaction.as_secs_f64() * 1000.0;
        info!("Reaction time: {:.0} ms", reaction_ms);

        self.board.fill(Rgb::RED);
        self.board.sleep(self.config.simple_hold());
        self.board.fill(Rgb::OFF);

        RoundResult {
            round: 1,
            reaction_ms,
            false_starts: 0,
            delay_ms: delay.as_secs_f64() * 1000.0,
        }
    }
}
