pub mod render;

pub use render::{BoardRenderer, FrameStats, PanelSnapshot, led_positions};
