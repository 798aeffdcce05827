use reflex_core::Rgb;
use reflex_timing::Timer;
use std::time::Duration;

/// LED array plus speaker
pub trait Indicator {
    /// Sets every pixel to `color`
    fn fill(&mut self, color: Rgb);
    /// Blocks for `duration` while the tone plays
    fn play_tone(&mut self, frequency_hz: u32, duration: Duration);
}

/// The button line. The monotonic clock half of the input lives in [`Timer`].
pub trait InputSource {
    fn is_pressed(&mut self) -> bool;
}

/// Peripherals of one board, with the polling loops every game mode shares
pub struct Board<I, B, T>
where
    I: Indicator,
    B: InputSource,
    T: Timer,
{
    pub indicator: I,
    pub input: B,
    pub timer: T,
}

impl<I, B, T> Board<I, B, T>
where
    I: Indicator,
    B: InputSource,
    T: Timer,
{
    pub fn new(indicator: I, input: B, timer: T) -> Self {
        Self {
            indicator,
            input,
            timer,
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.indicator.fill(color);
    }

    pub fn sleep(&self, d: Duration) {
        self.timer.sleep(d);
    }

    /// Spins until the button is up
    pub fn wait_for_release(&mut self) {
        while self.input.is_pressed() {
            std::hint::spin_loop();
        }
    }

    /// Spins until the button goes down. With a `window` the wait gives up
    /// once that much time has passed; returns whether a press was seen.
    pub fn poll_for_press(&mut self, window: Option<Duration>) -> bool {
        let start = self.timer.now();
        let mut last = start;
        loop {
            if let Some(limit) = window {
                if self.timer.elapsed(start) >= limit {
                    return false;
                }
            }
            if self.input.is_pressed() {
                return true;
            }
            let gap = self.timer.elapsed(last);
            self.timer.record_sample(gap);
            last = self.timer.now();
            std::hint::spin_loop();
        }
    }

    /// Red blink with a tone, repeated `blinks` times
    pub fn blink_penalty(&mut self, blinks: usize, tone_hz: u32, step: Duration) {
        for _ in 0..blinks {
            self.indicator.fill(Rgb::RED);
            self.indicator.play_tone(tone_hz, step);
            self.timer.sleep(step);
            self.indicator.fill(Rgb::OFF);
            self.timer.sleep(step);
        }
    }
}
