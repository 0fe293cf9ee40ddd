//! Random block selection: shape and palette colour, both uniform.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::components::BlockShape;
use crate::core::config::GameConfig;

/// Palette parsed from `blocks.palette`. Unparseable entries are skipped.
#[derive(Resource, Debug, Clone, Default)]
pub struct BlockPalette(pub Vec<Color>);

impl BlockPalette {
    pub fn from_hex(entries: &[String]) -> Self {
        Self(
            entries
                .iter()
                .filter_map(|hex| Srgba::hex(hex).ok().map(Color::from))
                .collect(),
        )
    }

    /// White when the palette is empty.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.0.choose(rng).copied().unwrap_or(Color::WHITE)
    }
}

pub fn random_shape<R: Rng + ?Sized>(rng: &mut R) -> BlockShape {
    BlockShape::ALL
        .choose(rng)
        .copied()
        .unwrap_or(BlockShape::Brick)
}

/// Rebuilds the palette whenever the config resource changes (startup and hot reload).
pub fn refresh_palette(cfg: Res<GameConfig>, mut palette: ResMut<BlockPalette>) {
    if !cfg.is_changed() {
        return;
    }
    *palette = BlockPalette::from_hex(&cfg.blocks.palette);
    debug!(target: "gripper", "block palette: {} colours", palette.0.len());
}
