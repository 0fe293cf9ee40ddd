//! Owner of the simulated tower: the static platform and every block body.
//!
//! All positions crossing this API are screen-space pixels; the conversion to Bevy world
//! space happens here and nowhere else.

use std::fmt;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::shapes::block_collider;
use crate::core::components::{Block, BlockColor, BlockShape, Held, Platform};
use crate::core::config::{GameConfig, PlatformConfig};
use crate::core::viewport::Viewport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// No platform yet; `initialize` has not run.
    NotInitialized,
    UnknownBody(Entity),
    /// Positions can only be driven while the body is kinematic.
    NotKinematic(Entity),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "tower world not initialized"),
            Self::UnknownBody(e) => write!(f, "no block body {e}"),
            Self::NotKinematic(e) => write!(f, "block {e} is dynamic; position is owned by the simulation"),
        }
    }
}

impl std::error::Error for WorldError {}

/// Platform rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformGeometry {
    pub center: Vec2,
    pub size: Vec2,
}

impl PlatformGeometry {
    /// Centred horizontally, `bottom_offset` above the bottom edge.
    pub fn for_viewport(cfg: &PlatformConfig, viewport: Viewport) -> Self {
        Self {
            center: Vec2::new(viewport.width * 0.5, viewport.height - cfg.bottom_offset),
            size: Vec2::new(cfg.width, cfg.height),
        }
    }

    pub fn top_y(&self) -> f32 {
        self.center.y - self.size.y * 0.5
    }
}

/// How a new body enters the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Externally positioned, ignores gravity and contacts.
    Kinematic,
    Dynamic,
}

/// One root body as seen by the scoring sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub entity: Entity,
    /// Screen-space position of the body origin.
    pub position: Vec2,
}

type PlatformItem = (Entity, &'static mut Transform, &'static Platform);
type BlockItem = (
    Entity,
    &'static mut Transform,
    &'static mut RigidBody,
    Option<&'static mut Velocity>,
);

#[derive(SystemParam)]
pub struct TowerWorld<'w, 's> {
    commands: Commands<'w, 's>,
    viewport: Res<'w, Viewport>,
    cfg: Res<'w, GameConfig>,
    platforms: Query<'w, 's, PlatformItem, Without<Block>>,
    blocks: Query<'w, 's, BlockItem, (With<Block>, Without<Platform>)>,
}

impl TowerWorld<'_, '_> {
    pub fn is_initialized(&self) -> bool {
        !self.platforms.is_empty()
    }

    /// Clear every body and (re)create the platform for the current viewport.
    /// Gravity and the rest of the Rapier configuration are untouched.
    pub fn initialize(&mut self) -> Entity {
        let mut cleared = 0usize;
        for (e, ..) in self.blocks.iter() {
            self.commands.entity(e).despawn();
            cleared += 1;
        }
        for (e, ..) in self.platforms.iter() {
            self.commands.entity(e).despawn();
        }
        let (platform, geometry) = self.spawn_platform();
        info!(
            target: "tower_world",
            "world initialized: platform {platform} at ({:.0}, {:.0}), cleared {cleared} blocks",
            geometry.center.x,
            geometry.center.y
        );
        platform
    }

    fn spawn_platform(&mut self) -> (Entity, PlatformGeometry) {
        let geometry = PlatformGeometry::for_viewport(&self.cfg.platform, *self.viewport);
        let world_pos = self.viewport.screen_to_world(geometry.center);
        let platform = self
            .commands
            .spawn((
                Platform {
                    size: geometry.size,
                },
                Transform::from_translation(world_pos.extend(0.0)),
                Visibility::default(),
                RigidBody::Fixed,
                Collider::cuboid(geometry.size.x * 0.5, geometry.size.y * 0.5),
                Friction::coefficient(self.cfg.blocks.friction),
            ))
            .id();
        (platform, geometry)
    }

    /// Same as [`initialize`](Self::initialize); kept separate for call-site intent.
    pub fn reset(&mut self) -> Entity {
        self.initialize()
    }

    /// Insert a new block at a screen position.
    pub fn add_body(
        &mut self,
        shape: BlockShape,
        color: Color,
        position: Vec2,
        mode: BodyMode,
    ) -> Result<Entity, WorldError> {
        if !self.is_initialized() {
            return Err(WorldError::NotInitialized);
        }
        let blocks = &self.cfg.blocks;
        let body = match mode {
            BodyMode::Kinematic => RigidBody::KinematicPositionBased,
            BodyMode::Dynamic => RigidBody::Dynamic,
        };
        let world_pos = self.viewport.screen_to_world(position);
        let mut entity = self.commands.spawn((
            Block { shape },
            BlockColor(color),
            Transform::from_translation(world_pos.extend(1.0)),
            Visibility::default(),
            body,
            block_collider(shape),
            Friction::coefficient(blocks.friction),
            Restitution::coefficient(blocks.restitution),
            ColliderMassProperties::Density(blocks.density),
            Velocity::zero(),
        ));
        if mode == BodyMode::Kinematic {
            entity.insert(Held);
        }
        Ok(entity.id())
    }

    /// Switch between externally driven and fully simulated. Going dynamic starts the
    /// body at rest, whatever motion the kinematic driver implied.
    pub fn set_kinematic(&mut self, entity: Entity, kinematic: bool) -> Result<(), WorldError> {
        let (_, _, mut body, velocity) = self
            .blocks
            .get_mut(entity)
            .map_err(|_| WorldError::UnknownBody(entity))?;
        if kinematic {
            *body = RigidBody::KinematicPositionBased;
            self.commands.entity(entity).insert(Held);
        } else {
            *body = RigidBody::Dynamic;
            if let Some(mut v) = velocity {
                *v = Velocity::zero();
            }
            self.commands.entity(entity).remove::<Held>();
        }
        Ok(())
    }

    pub fn set_position(&mut self, entity: Entity, position: Vec2) -> Result<(), WorldError> {
        let world_pos = self.viewport.screen_to_world(position);
        let (_, mut transform, body, _) = self
            .blocks
            .get_mut(entity)
            .map_err(|_| WorldError::UnknownBody(entity))?;
        if *body != RigidBody::KinematicPositionBased {
            return Err(WorldError::NotKinematic(entity));
        }
        transform.translation.x = world_pos.x;
        transform.translation.y = world_pos.y;
        Ok(())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.blocks.contains(entity)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.iter().count()
    }

    /// Root bodies under simulation (kinematic blocks and the platform excluded).
    pub fn all_dynamic_bodies(&self) -> Vec<BodySnapshot> {
        self.blocks
            .iter()
            .filter(|(_, _, body, _)| **body == RigidBody::Dynamic)
            .map(|(entity, transform, ..)| BodySnapshot {
                entity,
                position: self.viewport.world_to_screen(transform.translation.truncate()),
            })
            .collect()
    }

    /// Live platform rectangle in screen space.
    pub fn platform_geometry(&self) -> Option<PlatformGeometry> {
        let (_, transform, platform) = self.platforms.iter().next()?;
        Some(PlatformGeometry {
            center: self.viewport.world_to_screen(transform.translation.truncate()),
            size: platform.size,
        })
    }

    /// Keep the platform anchored to the (new) viewport and sized per config. A size
    /// change rebuilds the platform body; blocks stay where they are.
    /// Before initialization this is a no-op.
    pub fn on_resize(&mut self) -> bool {
        let geometry = PlatformGeometry::for_viewport(&self.cfg.platform, *self.viewport);
        let world_pos = self.viewport.screen_to_world(geometry.center);
        let mut stale = Vec::new();
        let mut moved = false;
        for (e, mut transform, platform) in self.platforms.iter_mut() {
            if platform.size != geometry.size {
                stale.push(e);
                continue;
            }
            transform.translation.x = world_pos.x;
            transform.translation.y = world_pos.y;
            moved = true;
        }
        if !stale.is_empty() {
            for e in stale {
                self.commands.entity(e).despawn();
            }
            self.spawn_platform();
            info!(
                target: "tower_world",
                "platform rebuilt at {:.0}x{:.0}",
                geometry.size.x,
                geometry.size.y
            );
            return true;
        }
        if moved {
            debug!(
                target: "tower_world",
                "platform repositioned for {}x{}",
                self.viewport.width,
                self.viewport.height
            );
        }
        moved
    }
}
