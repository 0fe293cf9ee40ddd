use bevy::prelude::*;

/// Shape variants a block can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockShape {
    Plank,
    Brick,
    Square,
    Triangle,
    /// Compound of a horizontal bar and a vertical bar hanging off its left end.
    LShape,
}

impl BlockShape {
    pub const ALL: [BlockShape; 5] = [
        BlockShape::Plank,
        BlockShape::Brick,
        BlockShape::Square,
        BlockShape::Triangle,
        BlockShape::LShape,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plank => "plank",
            Self::Brick => "brick",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::LShape => "l-shape",
        }
    }
}

/// Root entity of a block body. Compound shapes carry all their parts on this one entity,
/// so every block is counted exactly once.
#[derive(Component, Debug, Clone, Copy)]
pub struct Block {
    pub shape: BlockShape,
}

/// Render colour picked from the palette at spawn time.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct BlockColor(pub Color);

/// Marker on the block currently pinned to the pinch anchor.
#[derive(Component, Debug, Default)]
pub struct Held;

/// The static base platform. Exactly one exists once the world is initialized.
#[derive(Component, Debug, Clone, Copy)]
pub struct Platform {
    pub size: Vec2,
}

/// Tag for mesh children spawned by the renderer (never counted as bodies).
#[derive(Component)]
pub struct BlockVisual;
