pub mod hud;

pub use hud::{GameHud, HudStats};
