pub mod cues;

pub use cues::{AudioGate, SoundCue, SoundCuePlugin, ToneCue};
