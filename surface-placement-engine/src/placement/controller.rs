use bevy::prelude::*;

use constants::placement_settings::PREVIEW_SCALE;

use crate::ui::radial_menu::{OptionSelected, RadialMenuRequest};

use super::spawner::{ObjectSpawner, facing_pose};

/// The single pending-spawn record: where the user tapped, the surface
/// normal there, and the live ghost preview, if one is configured.
/// Invariant: `preview` is `Some` only while `active`; whenever `active`
/// drops to false the preview is despawned in the same statement block.
#[derive(Resource, Default)]
pub struct PlacementIntent {
    point: Vec3,
    normal: Vec3,
    active: bool,
    preview: Option<Entity>,
}

impl PlacementIntent {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pose(&self) -> (Vec3, Vec3) {
        (self.point, self.normal)
    }

    pub fn preview(&self) -> Option<Entity> {
        self.preview
    }
}

/// Tap on a tracked surface: capture the pose, show the preview, open the
/// menu.
#[derive(Event, Debug, Clone, Copy)]
pub struct OpenMenuAt {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Menu dismissed without a selection: the pending pose and preview are
/// dropped unconditionally.
#[derive(Event, Default)]
pub struct CancelPlacement;

/// Ghost stand-in shown at the pending pose while the choice is open.
#[derive(Component)]
pub struct SpawnPreview;

pub fn handle_open_menu_at(
    mut requests: EventReader<OpenMenuAt>,
    mut intent: ResMut<PlacementIntent>,
    spawner: Res<ObjectSpawner>,
    cameras: Query<&GlobalTransform, With<Camera3d>>,
    mut commands: Commands,
    mut menu: EventWriter<RadialMenuRequest>,
) {
    for request in requests.read() {
        // Overwrite semantics: at most one intent, the old preview goes first.
        if let Some(previous) = intent.preview.take() {
            commands.entity(previous).despawn();
        }

        intent.point = request.point;
        intent.normal = request.normal;
        intent.active = true;

        if spawner.preview_enabled {
            let face_from = cameras
                .single()
                .map(|c| c.translation())
                .unwrap_or(Vec3::ZERO);
            let mut pose = facing_pose(request.point, request.normal, face_from);
            pose.scale = Vec3::splat(PREVIEW_SCALE);
            let preview = commands
                .spawn((SpawnPreview, Name::new("SpawnPreview"), pose))
                .id();
            intent.preview = Some(preview);
        }

        menu.write(RadialMenuRequest::Open);
    }
}

/// Confirms a menu choice against the pending pose. Configuration errors
/// abort before any spawn attempt and leave the intent untouched; a
/// transient pose rejection keeps intent, preview, and menu alive so the
/// user can retry.
pub fn confirm_selection(
    mut selections: EventReader<OptionSelected>,
    mut intent: ResMut<PlacementIntent>,
    mut spawner: ResMut<ObjectSpawner>,
    cameras: Query<&GlobalTransform, With<Camera3d>>,
    mut commands: Commands,
    mut menu: EventWriter<RadialMenuRequest>,
) {
    for selection in selections.read() {
        if spawner.option_count() == 0 {
            warn!("object spawner not configured: empty catalog");
            continue;
        }
        if selection.index >= spawner.option_count() {
            warn!(
                "object spawner not configured correctly: option index {} out of range ({} options)",
                selection.index,
                spawner.option_count()
            );
            continue;
        }

        spawner.select_option(selection.index);

        if !intent.active {
            // Manual invocation without a prior tap: nothing to place, but
            // still ask the menu to close.
            menu.write(RadialMenuRequest::Close);
            continue;
        }

        let camera = cameras.single().ok();
        if spawner.try_spawn(&mut commands, camera, intent.point, intent.normal) {
            if let Some(preview) = intent.preview.take() {
                commands.entity(preview).despawn();
            }
            intent.active = false;
            menu.write(RadialMenuRequest::Close);
        } else {
            warn!(
                "unable to spawn at stored pose (out of view or invalid); move the camera or retap the surface"
            );
        }
    }
}

pub fn handle_cancel(
    mut cancels: EventReader<CancelPlacement>,
    mut intent: ResMut<PlacementIntent>,
    mut commands: Commands,
    mut menu: EventWriter<RadialMenuRequest>,
) {
    if cancels.is_empty() {
        return;
    }
    cancels.clear();

    if let Some(preview) = intent.preview.take() {
        commands.entity(preview).despawn();
    }
    intent.active = false;
    menu.write(RadialMenuRequest::Close);
}
