//! Text HUD and the pinch cursor.

use bevy::prelude::*;

use crate::app::state::{AppState, SessionFault};
use crate::core::config::GameConfig;
use crate::core::viewport::Viewport;
use crate::gameplay::session::GameSession;
use crate::interaction::gesture::pinch::CurrentPinch;

#[derive(Component)]
struct HudRoot;
#[derive(Component)]
struct HudText;
#[derive(Component)]
struct HudBanner;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, (update_hud_text, draw_pinch_cursor));
    }
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::FlexStart,
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
        ))
        .with_children(|p| {
            p.spawn((
                HudText,
                Text::new(""),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            p.spawn((
                HudBanner,
                Text::new(""),
                TextFont {
                    font_size: 40.0,
                    ..default()
                },
                TextColor(Color::srgb(0.973, 0.443, 0.443)),
            ));
        });
}

/// Status line and the centre banner for the current state.
pub fn hud_lines(
    state: AppState,
    session: &GameSession,
    fault: Option<&str>,
    mirror: bool,
) -> (String, String) {
    let mirror = if mirror { "on" } else { "off" };
    match state {
        AppState::Loading => ("Starting hand tracking...".into(), String::new()),
        AppState::Failed => (
            String::new(),
            format!(
                "Hand tracking unavailable\n{}\nPress Enter to reload",
                fault.unwrap_or("unknown error")
            ),
        ),
        AppState::Playing if session.is_game_over => (
            format!("Floors: {}   Best: {}", session.score, session.high_score),
            format!(
                "TOWER COLLAPSED\nFloors: {}\nPress R or Space to rebuild",
                session.score
            ),
        ),
        AppState::Playing => {
            let hint = if session.is_pinching {
                "Release to drop"
            } else {
                "Pinch to grab a block"
            };
            (
                format!(
                    "Floors: {}   Best: {}\n{hint}   (M: mirror {mirror}, R: reset)",
                    session.score, session.high_score
                ),
                String::new(),
            )
        }
    }
}

fn update_hud_text(
    state: Res<State<AppState>>,
    session: Res<GameSession>,
    fault: Option<Res<SessionFault>>,
    cfg: Res<GameConfig>,
    mut q_text: Query<&mut Text, (With<HudText>, Without<HudBanner>)>,
    mut q_banner: Query<&mut Text, (With<HudBanner>, Without<HudText>)>,
) {
    let (line, banner) = hud_lines(
        *state.get(),
        &session,
        fault.as_deref().map(|f| f.0.as_str()),
        cfg.gesture.mirror,
    );
    if let Ok(mut text) = q_text.single_mut() {
        if text.as_str() != line {
            *text = Text::new(line);
        }
    }
    if let Ok(mut text) = q_banner.single_mut() {
        if text.as_str() != banner {
            *text = Text::new(banner);
        }
    }
}

/// Ring at the thumb tip; filled while pinching.
fn draw_pinch_cursor(pinch: Res<CurrentPinch>, viewport: Res<Viewport>, mut gizmos: Gizmos) {
    let Some(signal) = pinch.0 else {
        return;
    };
    let p = viewport.screen_to_world(signal.anchor);
    if signal.is_pinching {
        gizmos.circle_2d(p, 10.0, Color::srgb(0.133, 0.827, 0.933));
        gizmos.circle_2d(p, 5.0, Color::srgb(0.133, 0.827, 0.933));
    } else {
        gizmos.circle_2d(p, 14.0, Color::srgba(1.0, 1.0, 1.0, 0.6));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_per_state() {
        let mut s = GameSession {
            score: 4,
            high_score: 11,
            ..default()
        };
        let (line, banner) = hud_lines(AppState::Playing, &s, None, true);
        assert!(line.starts_with("Floors: 4   Best: 11"));
        assert!(line.contains("Pinch to grab"));
        assert!(banner.is_empty());

        s.is_game_over = true;
        let (_, banner) = hud_lines(AppState::Playing, &s, None, true);
        assert!(banner.contains("COLLAPSED"));

        let (line, banner) = hud_lines(AppState::Failed, &s, Some("hand tracking: no camera"), true);
        assert!(line.is_empty());
        assert!(banner.contains("no camera"));
        assert!(banner.contains("Enter"));
    }
}
