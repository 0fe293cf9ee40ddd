//! Hand tracking input: tracker feed, mouse simulator and the latest-frame slot.

pub mod feed;
pub mod landmarks;
pub mod mouse_sim;

use bevy::prelude::*;

use crate::core::system::system_order::HandInputSet;
use feed::{poll_hand_feed, HandFeed, TrackerFault};
use landmarks::LatestHandFrame;
use mouse_sim::{simulate_hand_from_cursor, MouseHand};

pub struct HandInputPlugin;

impl Plugin for HandInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LatestHandFrame>()
            .init_resource::<HandFeed>()
            .add_event::<TrackerFault>()
            .add_systems(
                Update,
                (
                    poll_hand_feed,
                    simulate_hand_from_cursor.run_if(resource_exists::<MouseHand>),
                )
                    .chain()
                    .in_set(HandInputSet),
            );
    }
}
