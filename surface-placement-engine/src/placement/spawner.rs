use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::placement_settings::{MIN_FOOTPRINT, SPAWN_VIEW_COS_THRESHOLD};

/// One spawnable object description from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnOption {
    pub name: String,
    pub icon: [f32; 3],
    pub footprint: [f32; 3],
}

impl SpawnOption {
    pub fn icon_color(&self) -> Color {
        Color::srgb(self.icon[0], self.icon[1], self.icon[2])
    }

    /// Footprint with degenerate axes clamped, teacher-style.
    pub fn size(&self) -> Vec3 {
        let mut size = Vec3::from_array(self.footprint);
        if !size.is_finite() {
            size = Vec3::splat(MIN_FOOTPRINT);
        }
        size.max(Vec3::splat(MIN_FOOTPRINT))
    }
}

/// JSON payload listing the spawnable objects.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct ObjectCatalog {
    pub options: Vec<SpawnOption>,
}

/// Marker plus catalog index for every placed instance.
#[derive(Component)]
pub struct PlacedObject {
    pub option_index: usize,
}

/// The spawn primitive: holds the catalog, the currently selected option,
/// and an explicit owned registry of everything it has placed. Clearing and
/// deletion go through the registry, never through scene-graph walking.
#[derive(Resource)]
pub struct ObjectSpawner {
    options: Vec<SpawnOption>,
    selected: usize,
    placed: Vec<Entity>,
    /// Whether a ghost preview should be shown for a pending spawn.
    pub preview_enabled: bool,
    /// Reject poses outside the camera's view cone.
    pub require_in_view: bool,
}

impl Default for ObjectSpawner {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            selected: 0,
            placed: Vec::new(),
            preview_enabled: true,
            require_in_view: true,
        }
    }
}

impl ObjectSpawner {
    pub fn set_catalog(&mut self, options: Vec<SpawnOption>) {
        self.options = options;
        self.selected = 0;
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn options(&self) -> &[SpawnOption] {
        &self.options
    }

    pub fn select_option(&mut self, index: usize) {
        self.selected = index;
    }

    pub fn selected_option(&self) -> Option<&SpawnOption> {
        self.options.get(self.selected)
    }

    pub fn placed(&self) -> &[Entity] {
        &self.placed
    }

    /// Drops a registry entry for an instance despawned elsewhere.
    pub fn note_despawned(&mut self, entity: Entity) {
        self.placed.retain(|&e| e != entity);
    }

    /// Attempts to place the selected option at `point`/`normal`. Fails when
    /// the pose lies outside the camera's view cone (a transient condition:
    /// the caller keeps its pending state so the user can retry).
    pub fn try_spawn(
        &mut self,
        commands: &mut Commands,
        camera: Option<&GlobalTransform>,
        point: Vec3,
        normal: Vec3,
    ) -> bool {
        let Some(option) = self.options.get(self.selected) else {
            return false;
        };

        if self.require_in_view && !pose_in_view(camera, point) {
            return false;
        }

        let face_from = camera.map(|c| c.translation()).unwrap_or(Vec3::ZERO);
        let entity = commands
            .spawn((
                PlacedObject { option_index: self.selected },
                Name::new(option.name.clone()),
                facing_pose(point, normal, face_from),
            ))
            .id();
        self.placed.push(entity);
        true
    }

    /// Despawns every placed instance and empties the registry.
    pub fn clear_all(&mut self, commands: &mut Commands) {
        for entity in self.placed.drain(..) {
            commands.entity(entity).despawn();
        }
    }
}

fn pose_in_view(camera: Option<&GlobalTransform>, point: Vec3) -> bool {
    let Some(camera) = camera else {
        return false;
    };
    let to_point = point - camera.translation();
    let Some(direction) = to_point.try_normalize() else {
        // The camera sits on the point; treat as visible.
        return true;
    };
    direction.dot(camera.forward().as_vec3()) >= SPAWN_VIEW_COS_THRESHOLD
}

/// Pose at `point` with `normal` as up, facing `face_from` — the forward
/// axis is face_from − point projected onto the surface plane.
pub fn facing_pose(point: Vec3, normal: Vec3, face_from: Vec3) -> Transform {
    let up = normal.try_normalize().unwrap_or(Vec3::Y);
    let projected = (face_from - point).reject_from_normalized(up);
    let forward = projected
        .try_normalize()
        .unwrap_or_else(|| up.any_orthonormal_vector());
    Transform::from_translation(point).looking_to(forward, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_pose_keeps_normal_as_up() {
        let pose = facing_pose(Vec3::new(1.0, 0.0, 2.0), Vec3::Y, Vec3::new(0.0, 1.5, 8.0));
        let up = pose.rotation * Vec3::Y;
        assert!((up - Vec3::Y).length() < 1e-4);

        let forward = pose.forward().as_vec3();
        assert!(forward.dot(Vec3::Y).abs() < 1e-4, "forward must lie in the surface plane");
    }

    #[test]
    fn facing_pose_handles_degenerate_forward() {
        // Viewer directly above the point: projection collapses to zero.
        let pose = facing_pose(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 3.0, 0.0));
        assert!(pose.rotation.is_finite());
        let up = pose.rotation * Vec3::Y;
        assert!((up - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn pose_in_view_respects_the_cone() {
        let facing = GlobalTransform::from(
            Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        );
        assert!(pose_in_view(Some(&facing), Vec3::ZERO));

        let away = GlobalTransform::from(Transform::from_xyz(0.0, 0.0, -10.0));
        assert!(!pose_in_view(Some(&away), Vec3::ZERO));

        assert!(!pose_in_view(None, Vec3::ZERO));
    }

    #[test]
    fn catalog_json_deserializes() {
        let json = r#"{"options":[{"name":"Crate","icon":[0.75,0.55,0.25],"footprint":[0.4,0.4,0.4]}]}"#;
        let catalog: ObjectCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.options.len(), 1);
        assert_eq!(catalog.options[0].name, "Crate");
    }

    #[test]
    fn degenerate_footprints_are_clamped() {
        let option = SpawnOption {
            name: "flat".into(),
            icon: [1.0, 0.0, 0.0],
            footprint: [0.4, 0.0, f32::NAN],
        };
        let size = option.size();
        assert!(size.cmpgt(Vec3::ZERO).all());
    }
}
