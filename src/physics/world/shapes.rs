//! Fixed block geometry. Parts are given in body-local world units (y up), shared by
//! the collider builder and the renderer.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::components::BlockShape;

/// Circumradius of the triangle block.
pub const TRIANGLE_RADIUS: f32 = 55.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapePart {
    Rect { center: Vec2, size: Vec2 },
    Triangle { a: Vec2, b: Vec2, c: Vec2 },
}

pub fn shape_parts(shape: BlockShape) -> Vec<ShapePart> {
    let rect = |center: Vec2, w: f32, h: f32| ShapePart::Rect {
        center,
        size: Vec2::new(w, h),
    };
    match shape {
        BlockShape::Plank => vec![rect(Vec2::ZERO, 180.0, 20.0)],
        BlockShape::Brick => vec![rect(Vec2::ZERO, 100.0, 50.0)],
        BlockShape::Square => vec![rect(Vec2::ZERO, 60.0, 60.0)],
        BlockShape::Triangle => {
            // Point up, vertices on a circle around the body origin.
            let v = |deg: f32| Vec2::from_angle(deg.to_radians()) * TRIANGLE_RADIUS;
            vec![ShapePart::Triangle {
                a: v(90.0),
                b: v(210.0),
                c: v(330.0),
            }]
        }
        // Origin at the bar centre, not the centroid of the two parts.
        BlockShape::LShape => vec![
            rect(Vec2::ZERO, 100.0, 30.0),
            rect(Vec2::new(-35.0, -35.0), 30.0, 100.0),
        ],
    }
}

fn part_collider(part: &ShapePart) -> Collider {
    match *part {
        ShapePart::Rect { size, .. } => Collider::cuboid(size.x * 0.5, size.y * 0.5),
        ShapePart::Triangle { a, b, c } => Collider::triangle(a, b, c),
    }
}

fn part_offset(part: &ShapePart) -> Vec2 {
    match *part {
        ShapePart::Rect { center, .. } => center,
        ShapePart::Triangle { .. } => Vec2::ZERO,
    }
}

/// One collider per block; multi-part shapes become a compound on the same body.
pub fn block_collider(shape: BlockShape) -> Collider {
    let parts = shape_parts(shape);
    match parts.as_slice() {
        [single] if part_offset(single) == Vec2::ZERO => part_collider(single),
        _ => Collider::compound(
            parts
                .iter()
                .map(|p| (part_offset(p), 0.0, part_collider(p)))
                .collect(),
        ),
    }
}

/// Axis-aligned extent of the shape around its origin.
pub fn shape_bounds(shape: BlockShape) -> Rect {
    let mut bounds: Option<Rect> = None;
    for part in shape_parts(shape) {
        let r = match part {
            ShapePart::Rect { center, size } => Rect::from_center_size(center, size),
            ShapePart::Triangle { a, b, c } => Rect::from_corners(a.min(b).min(c), a.max(b).max(c)),
        };
        bounds = Some(bounds.map_or(r, |acc| acc.union(r)));
    }
    bounds.unwrap_or_default()
}
