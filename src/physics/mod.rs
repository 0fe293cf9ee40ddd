pub mod rapier;
pub mod world;
