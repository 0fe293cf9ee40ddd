pub mod config;

pub use config::{
    BlockConfig, ConfigOverrides, GameConfig, GestureConfig, PhysicsConfig, PlatformConfig,
    ScoringConfig, StorageConfig, TrackerConfig, TrackerSource, WindowConfig,
};
