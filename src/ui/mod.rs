//! UI module - HUD, health bars and menus.

mod health_bar;
mod hud;
mod plugin;

pub use health_bar::{bar_color, bar_width, EnemyHealthBar, EnemyHealthFill};
pub use plugin::UiPlugin;
