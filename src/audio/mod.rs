//! Audio module - one-shot sound effects.

mod plugin;

pub use plugin::GameAudioPlugin;
