//! Keyboard entry points: reset and the mirror toggle.

use bevy::prelude::*;

use crate::core::config::{ConfigOverrides, GameConfig};
use crate::gameplay::session::{GameSession, ResetGame};

/// R resets at any time; Space only once the tower has collapsed.
pub fn reset_on_keys(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    session: Res<GameSession>,
    mut reset: EventWriter<ResetGame>,
) {
    let Some(keys) = keys else {
        return;
    };
    if keys.just_pressed(KeyCode::KeyR)
        || (session.is_game_over && keys.just_pressed(KeyCode::Space))
    {
        reset.write(ResetGame);
    }
}

/// M flips mirror mode. The choice is pinned as an override so a config hot reload
/// does not undo it.
pub fn toggle_mirror_on_key(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut cfg: ResMut<GameConfig>,
    mut overrides: ResMut<ConfigOverrides>,
) {
    if !keys.is_some_and(|k| k.just_pressed(KeyCode::KeyM)) {
        return;
    }
    let mirror = !cfg.gesture.mirror;
    cfg.gesture.mirror = mirror;
    overrides.mirror = Some(mirror);
    info!(target: "gesture", "mirror {}", if mirror { "on" } else { "off" });
}
