//! Tower world: platform + block bodies on top of Rapier.

pub mod shapes;
pub mod tower_world;

use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::core::viewport::{sync_viewport_from_window, Viewport, ViewportResized};
pub use tower_world::{BodyMode, BodySnapshot, PlatformGeometry, TowerWorld, WorldError};

pub struct TowerWorldPlugin;

impl Plugin for TowerWorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Viewport>()
            .add_event::<ViewportResized>()
            .add_systems(Startup, setup_tower_world)
            .add_systems(PreUpdate, (sync_viewport_from_window, refit_platform).chain());
    }
}

fn setup_tower_world(mut world: TowerWorld) {
    world.initialize();
}

/// Window resizes and platform config reloads both land here.
fn refit_platform(
    mut resized: EventReader<ViewportResized>,
    cfg: Res<GameConfig>,
    mut world: TowerWorld,
) {
    // Several resize events in one frame collapse into one refit.
    if resized.read().last().is_some() || cfg.is_changed() {
        world.on_resize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::{Block, BlockShape, Held, Platform};
    use crate::core::config::GameConfig;
    use bevy::ecs::system::RunSystemOnce;
    use bevy_rapier2d::prelude::{RigidBody, Velocity};

    fn app(width: f32, height: f32) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(GameConfig::default())
            .insert_resource(Viewport::new(width, height))
            .add_plugins(TowerWorldPlugin);
        app
    }

    fn spawn(app: &mut App, pos: Vec2, mode: BodyMode) -> Entity {
        app.world_mut()
            .run_system_once(move |mut w: TowerWorld| {
                w.add_body(BlockShape::Brick, Color::WHITE, pos, mode)
            })
            .unwrap()
            .unwrap()
    }

    fn platforms(app: &mut App) -> Vec<Vec3> {
        let world = app.world_mut();
        let mut q = world.query_filtered::<&Transform, With<Platform>>();
        q.iter(world).map(|t| t.translation).collect()
    }

    fn block_count(app: &mut App) -> usize {
        let world = app.world_mut();
        let mut q = world.query::<&Block>();
        q.iter(world).count()
    }

    #[test]
    fn add_body_before_initialize_fails() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(GameConfig::default())
            .insert_resource(Viewport::new(1000.0, 800.0));
        let res = app
            .world_mut()
            .run_system_once(|mut w: TowerWorld| {
                w.add_body(BlockShape::Square, Color::WHITE, Vec2::ZERO, BodyMode::Kinematic)
            })
            .unwrap();
        assert_eq!(res, Err(WorldError::NotInitialized));
    }

    #[test]
    fn startup_creates_single_platform() {
        let mut app = app(1000.0, 800.0);
        app.update();
        let p = platforms(&mut app);
        assert_eq!(p.len(), 1);
        // Screen (500, 760) -> world (0, -360).
        assert_eq!(p[0].truncate(), Vec2::new(0.0, -360.0));
        let geometry = app
            .world_mut()
            .run_system_once(|w: TowerWorld| w.platform_geometry())
            .unwrap()
            .unwrap();
        assert_eq!(geometry.center, Vec2::new(500.0, 760.0));
        assert_eq!(geometry.top_y(), 730.0);
    }

    #[test]
    fn reset_twice_leaves_only_fresh_platform() {
        let mut app = app(1000.0, 800.0);
        app.update();
        spawn(&mut app, Vec2::new(500.0, 300.0), BodyMode::Dynamic);
        spawn(&mut app, Vec2::new(400.0, 300.0), BodyMode::Kinematic);
        assert_eq!(block_count(&mut app), 2);
        for _ in 0..2 {
            app.world_mut()
                .run_system_once(|mut w: TowerWorld| {
                    w.reset();
                })
                .unwrap();
            assert_eq!(block_count(&mut app), 0);
            assert_eq!(platforms(&mut app).len(), 1);
        }
    }

    #[test]
    fn kinematic_position_and_release() {
        let mut app = app(1000.0, 800.0);
        app.update();
        let e = spawn(&mut app, Vec2::new(500.0, 400.0), BodyMode::Kinematic);
        assert!(app.world().get::<Held>(e).is_some());
        assert_eq!(
            *app.world().get::<RigidBody>(e).unwrap(),
            RigidBody::KinematicPositionBased
        );

        app.world_mut()
            .run_system_once(move |mut w: TowerWorld| w.set_position(e, Vec2::new(600.0, 200.0)))
            .unwrap()
            .unwrap();
        let t = app.world().get::<Transform>(e).unwrap().translation;
        assert_eq!(t.truncate(), Vec2::new(100.0, 200.0));

        app.world_mut().get_mut::<Velocity>(e).unwrap().linvel = Vec2::new(50.0, 0.0);
        app.world_mut()
            .run_system_once(move |mut w: TowerWorld| w.set_kinematic(e, false))
            .unwrap()
            .unwrap();
        assert_eq!(*app.world().get::<RigidBody>(e).unwrap(), RigidBody::Dynamic);
        assert_eq!(*app.world().get::<Velocity>(e).unwrap(), Velocity::zero());
        assert!(app.world().get::<Held>(e).is_none());

        let err = app
            .world_mut()
            .run_system_once(move |mut w: TowerWorld| w.set_position(e, Vec2::ZERO))
            .unwrap();
        assert_eq!(err, Err(WorldError::NotKinematic(e)));
    }

    #[test]
    fn snapshot_lists_dynamic_roots_only() {
        let mut app = app(1000.0, 800.0);
        app.update();
        let dynamic = spawn(&mut app, Vec2::new(500.0, 620.0), BodyMode::Dynamic);
        let _held = spawn(&mut app, Vec2::new(200.0, 100.0), BodyMode::Kinematic);
        let bodies = app
            .world_mut()
            .run_system_once(|w: TowerWorld| w.all_dynamic_bodies())
            .unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].entity, dynamic);
        assert_eq!(bodies[0].position, Vec2::new(500.0, 620.0));
    }

    #[test]
    fn unknown_body_is_reported() {
        let mut app = app(1000.0, 800.0);
        app.update();
        let ghost = app.world_mut().spawn_empty().id();
        let res = app
            .world_mut()
            .run_system_once(move |mut w: TowerWorld| w.set_kinematic(ghost, false))
            .unwrap();
        assert_eq!(res, Err(WorldError::UnknownBody(ghost)));
    }

    #[test]
    fn resize_moves_platform_not_blocks() {
        let mut app = app(1000.0, 800.0);
        // Not initialized yet: nothing to move.
        let moved = app
            .world_mut()
            .run_system_once(|mut w: TowerWorld| w.on_resize())
            .unwrap();
        assert!(!moved);

        app.update();
        let e = spawn(&mut app, Vec2::new(500.0, 300.0), BodyMode::Dynamic);
        let before = app.world().get::<Transform>(e).unwrap().translation;

        app.insert_resource(Viewport::new(1200.0, 1000.0));
        app.world_mut().send_event(ViewportResized(Viewport::new(1200.0, 1000.0)));
        app.update();

        // Screen (600, 960) in a 1200x1000 viewport -> world (0, -460).
        assert_eq!(platforms(&mut app)[0].truncate(), Vec2::new(0.0, -460.0));
        assert_eq!(app.world().get::<Transform>(e).unwrap().translation, before);
    }

    #[test]
    fn platform_config_reload_rebuilds_platform() {
        let mut app = app(1000.0, 800.0);
        app.update();
        let e = spawn(&mut app, Vec2::new(500.0, 300.0), BodyMode::Dynamic);
        let before = app.world().get::<Transform>(e).unwrap().translation;

        {
            let mut cfg = app.world_mut().resource_mut::<GameConfig>();
            cfg.platform.width = 600.0;
            cfg.platform.height = 80.0;
        }
        app.update();

        let world = app.world_mut();
        let mut q = world.query::<&Platform>();
        let sizes: Vec<Vec2> = q.iter(world).map(|p| p.size).collect();
        assert_eq!(sizes, vec![Vec2::new(600.0, 80.0)]);
        let geometry = app
            .world_mut()
            .run_system_once(|w: TowerWorld| w.platform_geometry())
            .unwrap()
            .unwrap();
        assert_eq!(geometry.center, Vec2::new(500.0, 760.0));
        assert_eq!(geometry.top_y(), 720.0);
        assert_eq!(block_count(&mut app), 1);
        assert_eq!(app.world().get::<Transform>(e).unwrap().translation, before);
    }
}
