/// Tracked-surface bookkeeping: the surface/visual components, the change
/// notification, and the synchronizer that mirrors the tracked set.
pub mod tracker;
pub mod visual_sync;

use bevy::prelude::*;

pub use tracker::{SurfaceVisual, SurfacesChanged, TrackedSurface};
pub use visual_sync::{SetSurfaceVisibility, SurfaceVisualSync, SurfaceVisibilityToggle};

pub struct SurfacesPlugin;

impl Plugin for SurfacesPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SurfacesChanged>()
            .add_event::<SetSurfaceVisibility>()
            .init_resource::<SurfaceVisualSync>()
            .init_resource::<SurfaceVisibilityToggle>()
            .add_systems(
                Update,
                (
                    visual_sync::sync_surface_visuals,
                    visual_sync::apply_visibility_toggle,
                )
                    .chain(),
            );
    }
}
