pub mod pinch;

use bevy::prelude::*;

use crate::core::system::system_order::GestureSet;
use pinch::{interpret_latest_frame, CurrentPinch};

pub struct GesturePlugin;

impl Plugin for GesturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentPinch>()
            .add_systems(Update, interpret_latest_frame.in_set(GestureSet));
    }
}
