pub mod block_meshes;
pub mod camera;
pub mod hud;

use bevy::prelude::*;

use block_meshes::{attach_block_meshes, attach_platform_mesh, BlockMeshCache};
use camera::CameraPlugin;
use hud::HudPlugin;

/// Everything that needs a window and a renderer. Gameplay runs without it.
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BlockMeshCache>()
            .add_plugins((CameraPlugin, HudPlugin))
            .add_systems(PostUpdate, (attach_block_meshes, attach_platform_mesh));
    }
}
