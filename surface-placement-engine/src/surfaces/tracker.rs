use bevy::prelude::*;
use constants::surface_settings::DEMO_SURFACE_HALF_EXTENT;

/// A tracked flat physical region. The entity id is the surface identity.
#[derive(Component)]
pub struct TrackedSurface;

/// Renderable overlay attached to a tracked surface for debug
/// visualisation. Owned by the tracking side; the synchronizer only holds
/// the entity id.
#[derive(Component)]
pub struct SurfaceVisual {
    pub visible: bool,
}

/// Batched change notification from the tracking subsystem. Deltas may be
/// lossy; the synchronizer's reconciliation pass corrects drift.
#[derive(Event, Default)]
pub struct SurfacesChanged {
    pub added: Vec<Entity>,
    pub removed: Vec<Entity>,
}

/// Spawns a tracked surface with its companion visual at the given pose.
/// Demo stand-in for a real detection backend.
pub fn spawn_tracked_surface(
    commands: &mut Commands,
    transform: Transform,
    visible: bool,
) -> Entity {
    commands
        .spawn((
            TrackedSurface,
            SurfaceVisual { visible },
            Name::new("TrackedSurface"),
            transform,
            if visible { Visibility::Inherited } else { Visibility::Hidden },
        ))
        .id()
}

/// Half extents of the demo surfaces, used by the demo scene and the
/// tap-ray test.
pub fn demo_surface_half_extents() -> Vec2 {
    Vec2::splat(DEMO_SURFACE_HALF_EXTENT)
}
