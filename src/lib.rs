pub mod app;
pub mod audio;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::game::{GamePlugin, SimulationPlugin};
pub use app::state::AppState;
pub use core::config::{ConfigOverrides, GameConfig, TrackerSource, WindowConfig};
pub use core::viewport::Viewport;
pub use gameplay::session::high_score::{FileHighScore, HighScoreStore, MemoryHighScore};
pub use gameplay::session::{GameSession, GameStateChanged, GameStateSnapshot, ResetGame, StateJsonOutput};
