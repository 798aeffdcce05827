use anyhow::{Result, anyhow};
use reflex_core::Rgb;
use reflex_timing::Timer;
use std::f32::consts::TAU;
use std::time::Duration;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Transform};

const BACKGROUND: Rgb = Rgb::new(12, 12, 16);
const BOARD: Rgb = Rgb::new(30, 30, 36);
/// Unlit LEDs stay faintly visible
const LED_DARK: Rgb = Rgb::new(40, 40, 40);
const BUTTON_UP: Rgb = Rgb::new(90, 90, 90);
const BUTTON_DOWN: Rgb = Rgb::new(230, 230, 230);
const SPEAKER_IDLE: Rgb = Rgb::new(50, 50, 50);
const SPEAKER_ON: Rgb = Rgb::new(255, 200, 0);

/// What the board looks like at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSnapshot {
    pub leds: Vec<Rgb>,
    pub pressed: bool,
    pub tone_hz: Option<u32>,
}

impl PanelSnapshot {
    pub fn dark(led_count: usize) -> Self {
        Self {
            leds: vec![Rgb::OFF; led_count],
            pressed: false,
            tone_hz: None,
        }
    }
}

pub struct FrameStats {
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
    /// False when the snapshot matched the previous frame and nothing was drawn
    pub redrawn: bool,
}

/// LED centres evenly spaced on a ring, the first at twelve o'clock
pub fn led_positions(count: usize, center: (f32, f32), radius: f32) -> Vec<(f32, f32)> {
    (0..count)
        .map(|i| {
            let angle = -TAU / 4.0 + TAU * i as f32 / count as f32;
            (
                center.0 + radius * angle.cos(),
                center.1 + radius * angle.sin(),
            )
        })
        .collect()
}

/// Draws the simulated board: LED ring, button in the middle, speaker dot
pub struct BoardRenderer {
    width: u32,
    height: u32,
    center: (f32, f32),
    canvas: Pixmap,
    last: Option<PanelSnapshot>,
    frames_drawn: u64,
}

impl BoardRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("invalid canvas size {}x{}", width, height))?;
        Ok(Self {
            width,
            height,
            center: (width as f32 / 2.0, height as f32 / 2.0),
            canvas,
            last: None,
            frames_drawn: 0,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let frames_drawn = self.frames_drawn;
        *self = Self::new(width, height)?;
        self.frames_drawn = frames_drawn;
        Ok(())
    }

    /// Frames actually redrawn since creation, skipped ones not counted
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    fn unit(&self) -> f32 {
        self.width.min(self.height) as f32
    }

    pub fn ring_radius(&self) -> f32 {
        self.unit() * 0.34
    }

    pub fn led_radius(&self, count: usize) -> f32 {
        // neighbours must not overlap on small rings
        let spacing = TAU * self.ring_radius() / count.max(1) as f32;
        (self.unit() * 0.06).min(spacing * 0.4)
    }

    pub fn button_radius(&self) -> f32 {
        self.unit() * 0.12
    }

    pub fn speaker_center(&self) -> (f32, f32) {
        let margin = self.unit() * 0.08;
        (self.width as f32 - margin, margin)
    }

    fn circle(&mut self, center: (f32, f32), radius: f32, color: Rgb) {
        let Some(path) = PathBuilder::from_circle(center.0, center.1, radius) else {
            return;
        };
        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color_rgba8(color.r, color.g, color.b, 255);
        self.canvas
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn draw(&mut self, snapshot: &PanelSnapshot) {
        self.canvas
            .fill(Color::from_rgba8(BACKGROUND.r, BACKGROUND.g, BACKGROUND.b, 255));

        let ring = self.ring_radius();
        let led_r = self.led_radius(snapshot.leds.len());
        self.circle(self.center, ring + led_r * 2.0, BOARD);

        let positions = led_positions(snapshot.leds.len(), self.center, ring);
        for (pos, &color) in positions.into_iter().zip(&snapshot.leds) {
            let shown = if color.is_off() { LED_DARK } else { color };
            self.circle(pos, led_r, shown);
        }

        let button = if snapshot.pressed {
            BUTTON_DOWN
        } else {
            BUTTON_UP
        };
        self.circle(self.center, self.button_radius(), button);

        let speaker = if snapshot.tone_hz.is_some() {
            SPEAKER_ON
        } else {
            SPEAKER_IDLE
        };
        self.circle(self.speaker_center(), self.unit() * 0.03, speaker);
    }

    /// Draws `snapshot` and copies it into an RGBA `frame_buffer` of the
    /// renderer's size. An unchanged snapshot leaves the buffer alone.
    pub fn render_frame<T: Timer>(
        &mut self,
        snapshot: &PanelSnapshot,
        frame_buffer: &mut [u8],
        timer: &mut T,
    ) -> Result<FrameStats> {
        let expected = self.canvas.data().len();
        if frame_buffer.len() != expected {
            return Err(anyhow!(
                "frame buffer is {} bytes, canvas needs {}",
                frame_buffer.len(),
                expected
            ));
        }

        if self.last.as_ref() == Some(snapshot) {
            return Ok(FrameStats {
                draw: Duration::ZERO,
                copy: Duration::ZERO,
                total: Duration::ZERO,
                redrawn: false,
            });
        }

        let t_draw = {
            let t = timer.now();
            self.draw(snapshot);
            timer.elapsed(t)
        };
        let t_copy = {
            let t = timer.now();
            frame_buffer.copy_from_slice(self.canvas.data());
            timer.elapsed(t)
        };
        let total = t_draw + t_copy;
        timer.record_sample(total);

        self.last = Some(snapshot.clone());
        self.frames_drawn += 1;
        Ok(FrameStats {
            draw: t_draw,
            copy: t_copy,
            total,
            redrawn: true,
        })
    }
}
