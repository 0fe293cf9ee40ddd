//! Display surface size and the screen <-> world mapping.
//!
//! Core logic speaks screen space (pixels, origin top-left, y down). Bevy's 2D camera
//! puts the origin at the centre with y up and one world unit per logical pixel, so
//! the conversion is a translate plus a y flip.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x - self.width * 0.5, self.height * 0.5 - screen.y)
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x + self.width * 0.5, self.height * 0.5 - world.y)
    }
}

/// Fired when the display surface changes size (after `Viewport` is updated).
#[derive(Event, Debug, Clone, Copy)]
pub struct ViewportResized(pub Viewport);

/// Re-reads the primary window every frame; the window is the source of truth.
pub fn sync_viewport_from_window(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<Viewport>,
    mut resized: EventWriter<ViewportResized>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let (w, h) = (window.width(), window.height());
    if w <= 0.0 || h <= 0.0 {
        // Minimized.
        return;
    }
    if viewport.width != w || viewport.height != h {
        *viewport = Viewport::new(w, h);
        resized.write(ViewportResized(*viewport));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_world_roundtrip_corners() {
        let vp = Viewport::new(1000.0, 800.0);
        assert_eq!(vp.screen_to_world(Vec2::new(0.0, 0.0)), Vec2::new(-500.0, 400.0));
        assert_eq!(vp.screen_to_world(Vec2::new(500.0, 400.0)), Vec2::ZERO);
        assert_eq!(vp.screen_to_world(Vec2::new(1000.0, 800.0)), Vec2::new(500.0, -400.0));
        let p = Vec2::new(123.0, 456.0);
        assert_eq!(vp.world_to_screen(vp.screen_to_world(p)), p);
    }
}
