pub mod game;
pub mod shutdown;
pub mod state;
