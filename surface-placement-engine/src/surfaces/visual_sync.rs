use bevy::prelude::*;
use constants::surface_settings::SURFACE_VISUALS_DEFAULT_VISIBLE;

use super::tracker::{SurfaceVisual, SurfacesChanged, TrackedSurface};

/// One surface the synchronizer currently mirrors.
#[derive(Clone, Copy)]
pub struct SurfaceVisualEntry {
    pub surface: Entity,
    pub visible: bool,
}

/// Mirror of the tracked surface set. Incremental deltas keep it current;
/// a count check against the live query heals missed removals.
#[derive(Resource, Default)]
pub struct SurfaceVisualSync {
    entries: Vec<SurfaceVisualEntry>,
}

impl SurfaceVisualSync {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[SurfaceVisualEntry] {
        &self.entries
    }

    pub fn tracks(&self, surface: Entity) -> bool {
        self.entries.iter().any(|e| e.surface == surface)
    }
}

/// Global debug-visibility toggle for surface overlays. New entries adopt
/// the current value.
#[derive(Resource)]
pub struct SurfaceVisibilityToggle(pub bool);

impl Default for SurfaceVisibilityToggle {
    fn default() -> Self {
        Self(SURFACE_VISUALS_DEFAULT_VISIBLE)
    }
}

/// Request to show or hide every surface overlay at once.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetSurfaceVisibility(pub bool);

/// Applies tracked-surface change notifications to the mirror, then
/// reconciles against the live entity count. A count mismatch rebuilds the
/// whole entry list from the query, so a dropped removal only survives
/// until the next notification.
pub fn sync_surface_visuals(
    mut changes: EventReader<SurfacesChanged>,
    mut sync: ResMut<SurfaceVisualSync>,
    toggle: Res<SurfaceVisibilityToggle>,
    tracked: Query<Entity, With<TrackedSurface>>,
    mut visuals: Query<(&mut SurfaceVisual, &mut Visibility)>,
) {
    for change in changes.read() {
        for &surface in &change.added {
            if visuals.get(surface).is_err() {
                debug!("tracked surface {surface} has no companion visual, skipping");
                continue;
            }
            if !sync.tracks(surface) {
                sync.entries.push(SurfaceVisualEntry {
                    surface,
                    visible: toggle.0,
                });
            }
            apply_visibility(surface, toggle.0, &mut visuals);
        }

        sync.entries
            .retain(|entry| !change.removed.contains(&entry.surface));

        let live = tracked.iter().count();
        if sync.entries.len() != live {
            debug!(
                "surface mirror out of sync ({} entries, {} live), rebuilding",
                sync.entries.len(),
                live
            );
            sync.entries.clear();
            for surface in tracked.iter() {
                if visuals.get(surface).is_err() {
                    continue;
                }
                sync.entries.push(SurfaceVisualEntry {
                    surface,
                    visible: toggle.0,
                });
                apply_visibility(surface, toggle.0, &mut visuals);
            }
        }
    }
}

/// Pushes a visibility toggle to every mirrored overlay.
pub fn apply_visibility_toggle(
    mut requests: EventReader<SetSurfaceVisibility>,
    mut toggle: ResMut<SurfaceVisibilityToggle>,
    mut sync: ResMut<SurfaceVisualSync>,
    mut visuals: Query<(&mut SurfaceVisual, &mut Visibility)>,
) {
    let Some(&SetSurfaceVisibility(visible)) = requests.read().last() else {
        return;
    };
    toggle.0 = visible;
    for entry in &mut sync.entries {
        entry.visible = visible;
        apply_visibility(entry.surface, visible, &mut visuals);
    }
}

fn apply_visibility(
    surface: Entity,
    visible: bool,
    visuals: &mut Query<(&mut SurfaceVisual, &mut Visibility)>,
) {
    if let Ok((mut visual, mut visibility)) = visuals.get_mut(surface) {
        visual.visible = visible;
        *visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
