//! Meshes for blocks and the platform, built from the same parts as the colliders.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::core::components::{Block, BlockColor, BlockShape, BlockVisual, Platform};
use crate::physics::world::shapes::{shape_parts, ShapePart};

const PLATFORM_FILL: Color = Color::srgba(0.118, 0.161, 0.231, 0.8);
const PLATFORM_EDGE: Color = Color::srgb(0.278, 0.333, 0.412);
const PLATFORM_EDGE_WIDTH: f32 = 4.0;

/// One mesh per shape part, built on first use.
#[derive(Resource, Default)]
pub struct BlockMeshCache(HashMap<BlockShape, Vec<(Handle<Mesh>, Vec2)>>);

fn part_mesh(part: &ShapePart) -> (Mesh, Vec2) {
    match *part {
        ShapePart::Rect { center, size } => (Rectangle::new(size.x, size.y).into(), center),
        ShapePart::Triangle { a, b, c } => (Triangle2d::new(a, b, c).into(), Vec2::ZERO),
    }
}

pub fn attach_block_meshes(
    mut commands: Commands,
    q_new: Query<(Entity, &Block, &BlockColor), Added<Block>>,
    mut cache: ResMut<BlockMeshCache>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, block, color) in q_new.iter() {
        let parts = cache.0.entry(block.shape).or_insert_with(|| {
            shape_parts(block.shape)
                .iter()
                .map(|p| {
                    let (mesh, offset) = part_mesh(p);
                    (meshes.add(mesh), offset)
                })
                .collect()
        });
        let material = materials.add(**color);
        commands.entity(entity).with_children(|c| {
            for (mesh, offset) in parts.iter() {
                c.spawn((
                    BlockVisual,
                    Mesh2d(mesh.clone()),
                    MeshMaterial2d(material.clone()),
                    Transform::from_translation(offset.extend(0.0)),
                ));
            }
        });
    }
}

pub fn attach_platform_mesh(
    mut commands: Commands,
    q_new: Query<(Entity, &Platform), Added<Platform>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, platform) in q_new.iter() {
        let edge = platform.size + Vec2::splat(PLATFORM_EDGE_WIDTH);
        let edge_mesh = meshes.add(Rectangle::new(edge.x, edge.y));
        let fill_mesh = meshes.add(Rectangle::new(platform.size.x, platform.size.y));
        let edge_mat = materials.add(PLATFORM_EDGE);
        let fill_mat = materials.add(PLATFORM_FILL);
        commands.entity(entity).with_children(|c| {
            c.spawn((
                BlockVisual,
                Mesh2d(edge_mesh),
                MeshMaterial2d(edge_mat),
                Transform::from_xyz(0.0, 0.0, -0.1),
            ));
            c.spawn((
                BlockVisual,
                Mesh2d(fill_mesh),
                MeshMaterial2d(fill_mat),
                Transform::default(),
            ));
        });
    }
}
