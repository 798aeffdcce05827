use crate::sim::{SharedPanel, spawn_game};
use anyhow::Result;
use log::{info, trace, warn};
use pixels::{Pixels, SurfaceTexture};
use reflex_game::GameConfig;
use reflex_render::{BoardRenderer, FrameStats, led_positions};
use reflex_timing::{HighPrecisionTimer, Timer};
use std::sync::Arc;
use std::thread::JoinHandle;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Icon, Window, WindowId},
};

const WINDOW_SIZE: f64 = 480.0;

pub struct App {
    config: GameConfig,
    panel: SharedPanel,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<BoardRenderer>,
    timer: HighPrecisionTimer,
    game: Option<JoinHandle<()>>,
    finished_shown: bool,
    should_exit: bool,
}

impl App {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let panel = SharedPanel::new(config.led_count);
        Ok(Self {
            config,
            panel,
            window: None,
            pixels: None,
            renderer: None,
            timer: HighPrecisionTimer::new(),
            game: None,
            finished_shown: false,
            should_exit: false,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        info!("=== REFLEX BOARD SIMULATOR ===");
        info!("Platform: {} {}", std::env::consts::OS, std::env::consts::ARCH);
        info!(
            "Mode: {:?}, {} rounds. SPACE is the button, ESC quits.",
            self.config.mode, self.config.num_rounds
        );

        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Reflex")
            .with_inner_size(LogicalSize::new(WINDOW_SIZE, WINDOW_SIZE))
            .with_resizable(false)
            .with_window_icon(Some(Self::board_icon(self.config.led_count)?));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let physical_size = window.inner_size();
        info!(
            "Window: {}×{} (scale {:.2})",
            physical_size.width,
            physical_size.height,
            window.scale_factor()
        );

        let surface_texture =
            SurfaceTexture::new(physical_size.width, physical_size.height, window.clone());
        self.pixels = Some(Pixels::new(
            physical_size.width,
            physical_size.height,
            surface_texture,
        )?);
        self.renderer = Some(BoardRenderer::new(
            physical_size.width,
            physical_size.height,
        )?);

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn start_game(&mut self) -> Result<()> {
        if self.game.is_none() {
            self.game = Some(spawn_game(self.config.clone(), self.panel.clone())?);
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pixels), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };

        let snapshot = self.panel.snapshot();
        let stats: FrameStats =
            renderer.render_frame(&snapshot, pixels.frame_mut(), &mut self.timer)?;
        if stats.redrawn {
            trace!(
                "frame: draw {:.3}ms, copy {:.3}ms, total {:.3}ms",
                stats.draw.as_secs_f64() * 1e3,
                stats.copy.as_secs_f64() * 1e3,
                stats.total.as_secs_f64() * 1e3,
            );
        }
        pixels.render()?;
        Ok(())
    }

    fn update(&mut self) {
        if self.panel.is_finished() && !self.finished_shown {
            self.finished_shown = true;
            let frames = self.renderer.as_ref().map_or(0, |r| r.frames_drawn());
            let stats = self.timer.poll_stats();
            info!(
                "Game over ({} redraws, last {} avg {:.3} ms each). Press ESC to close.",
                frames,
                stats.samples,
                stats.average_gap_ns / 1_000_000.0
            );
            if let Some(window) = &self.window {
                window.set_title("Reflex (finished, ESC to close)");
            }
        }
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState, event_loop: &ActiveEventLoop) {
        if let PhysicalKey::Code(code) = key {
            match code {
                KeyCode::Space => self.panel.set_pressed(state.is_pressed()),
                KeyCode::Escape if state.is_pressed() => self.cleanup_and_exit(event_loop),
                _ => {}
            }
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                warn!("Failed to resize surface: {}", e);
            }
            if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                warn!("Failed to resize buffer: {}", e);
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(new_size.width, new_size.height) {
                warn!("Failed to resize renderer: {:#}", e);
            }
        }
    }

    fn cleanup_and_exit(&mut self, event_loop: &ActiveEventLoop) {
        if !self.panel.is_finished() {
            info!("Closing before the game finished");
        }
        self.should_exit = true;
        event_loop.exit();
    }

    /// The LED ring, drawn small
    fn board_icon(led_count: usize) -> Result<Icon> {
        const SIZE: u32 = 32;
        let mut pm = Pixmap::new(SIZE, SIZE).ok_or_else(|| anyhow::anyhow!("icon pixmap"))?;
        let mut paint = Paint::default();
        paint.anti_alias = true;
        paint.set_color_rgba8(0, 0, 255, 255);
        let c = SIZE as f32 / 2.0;
        for (x, y) in led_positions(led_count, (c, c), c * 0.7) {
            if let Some(path) = PathBuilder::from_circle(x, y, 2.5) {
                pm.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        Ok(Icon::from_rgba(pm.take(), SIZE, SIZE)?)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self
                .create_window_and_surface(event_loop)
                .and_then(|_| self.start_game())
            {
                log::error!("Failed to start simulator: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.cleanup_and_exit(event_loop),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    warn!("Render error: {:#}", e);
                }
                self.update();
                if let Some(win) = &self.window {
                    win.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                self.handle_key(event.physical_key, event.state, event_loop);
            }
            WindowEvent::Resized(sz) => self.handle_resize(sz),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.handle_resize(size);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_exit {
            event_loop.exit();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // the board thread may be parked in a polling loop; it dies with the process
        if let Some(game) = self.game.take() {
            if game.is_finished() {
                let _ = game.join();
            }
        }
        info!("Simulator resources cleaned up");
    }
}
