//! Pending-spawn state and the spawn primitive.
//!
//! A tap on a tracked surface becomes a `PlacementIntent` (pose + ghost
//! preview) that outlives the menu animation; confirming a menu choice
//! hands the stored pose to the `ObjectSpawner`, which owns the registry
//! of everything it has placed.

/// Placement controller: intent lifecycle, preview, confirm/cancel.
pub mod controller;

/// Spawn primitive: catalog, view-cone check, placed-object registry.
pub mod spawner;

use bevy::prelude::*;

use crate::ui::radial_menu::{MenuRequestSet, MenuSelectionSet};
use controller::{handle_cancel, handle_open_menu_at, confirm_selection};

pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<controller::OpenMenuAt>()
            .add_event::<controller::CancelPlacement>()
            .init_resource::<controller::PlacementIntent>()
            .init_resource::<spawner::ObjectSpawner>()
            .add_systems(
                Update,
                (handle_open_menu_at, confirm_selection, handle_cancel)
                    .chain()
                    .after(MenuSelectionSet)
                    .before(MenuRequestSet),
            );
    }
}
