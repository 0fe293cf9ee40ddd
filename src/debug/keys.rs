#[cfg(feature = "debug")]
use bevy::prelude::*;
#[cfg(feature = "debug")]
use bevy_rapier2d::render::DebugRenderContext;

/// F1 toggles the Rapier wireframe (when the debug renderer is installed).
#[cfg(feature = "debug")]
pub fn debug_key_input_system(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    ctx: Option<ResMut<DebugRenderContext>>,
) {
    let (Some(keys), Some(mut ctx)) = (keys, ctx) else {
        return;
    };
    if keys.just_pressed(KeyCode::F1) {
        ctx.enabled = !ctx.enabled;
        info!(target: "debug", "rapier debug render {}", if ctx.enabled { "on" } else { "off" });
    }
}
