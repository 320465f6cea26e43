use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::render::alpha::AlphaMode;
use bevy::window::{PresentMode, PrimaryWindow};
use bevy_common_assets::json::JsonAssetPlugin;

mod input;
mod orchestrator;
mod placement;
mod surfaces;
mod ui;

use constants::placement_settings::PREVIEW_ALPHA;
use constants::surface_settings::{DEMO_SURFACE_HALF_EXTENT, SURFACE_VISUAL_COLOR};

use input::{ScreenInput, ScreenInputPlugin};
use orchestrator::{DebugOverlay, OrchestratorPlugin, OrchestratorSet};
use placement::PlacementPlugin;
use placement::controller::{OpenMenuAt, SpawnPreview};
use placement::spawner::{ObjectCatalog, ObjectSpawner, PlacedObject, SpawnOption};
use surfaces::tracker::{SurfaceVisual, SurfacesChanged, TrackedSurface, spawn_tracked_surface};
use surfaces::SurfacesPlugin;
use ui::MenuUiPlugin;
use ui::radial_menu::{MenuOption, MenuOptions};

const CATALOG_PATH: &'static str = "menu_catalog.json";

#[derive(Resource, Default)]
struct CatalogLoader {
    handle: Option<Handle<ObjectCatalog>>,
    loaded: bool,
}

fn main() {
    create_app().run();
}

fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(JsonAssetPlugin::<ObjectCatalog>::new(&["json"]))
        .add_plugins(ScreenInputPlugin)
        .add_plugins(MenuUiPlugin)
        .add_plugins(PlacementPlugin)
        .add_plugins(SurfacesPlugin)
        .add_plugins(OrchestratorPlugin);

    app.init_resource::<CatalogLoader>()
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                load_catalog_system,
                fps_text_update_system,
                decorate_previews,
                decorate_placed_objects,
                decorate_surface_visuals,
            ),
        )
        .add_systems(Update, tap_on_surface.in_set(OrchestratorSet));

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    Window {
        title: "Surface Placement Engine".into(),
        present_mode: PresentMode::AutoVsync,
        ..default()
    }
}

/// Catalog shipped in the binary so the app works before (or without) the
/// JSON asset.
fn builtin_catalog() -> Vec<SpawnOption> {
    vec![
        SpawnOption { name: "Crate".into(), icon: [0.75, 0.55, 0.25], footprint: [0.4, 0.4, 0.4] },
        SpawnOption { name: "Lamp".into(), icon: [0.95, 0.90, 0.55], footprint: [0.2, 0.9, 0.2] },
        SpawnOption { name: "Plant".into(), icon: [0.30, 0.70, 0.35], footprint: [0.3, 0.5, 0.3] },
        SpawnOption { name: "Chair".into(), icon: [0.45, 0.45, 0.55], footprint: [0.5, 0.8, 0.5] },
    ]
}

fn menu_options_for(options: &[SpawnOption]) -> MenuOptions {
    MenuOptions(
        options
            .iter()
            .map(|o| MenuOption { name: o.name.clone(), icon: o.icon_color() })
            .collect(),
    )
}

fn setup(
    mut commands: Commands,
    mut spawner: ResMut<ObjectSpawner>,
    mut surface_changes: EventWriter<SurfacesChanged>,
) {
    let catalog = builtin_catalog();
    commands.insert_resource(menu_options_for(&catalog));
    spawner.set_catalog(catalog);

    spawn_camera(&mut commands);
    spawn_lighting(&mut commands);
    spawn_demo_surfaces(&mut commands, &mut surface_changes);
    spawn_overlay(&mut commands);
}

/// Load the object catalog JSON once it is available, replacing the
/// builtin set.
fn load_catalog_system(
    mut loader: ResMut<CatalogLoader>,
    mut spawner: ResMut<ObjectSpawner>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<ObjectCatalog>>,
) {
    if loader.handle.is_none() {
        info!("loading object catalog from: {CATALOG_PATH}");
        loader.handle = Some(asset_server.load(CATALOG_PATH));
        return;
    }

    if !loader.loaded {
        if let Some(ref handle) = loader.handle {
            if let Some(catalog) = catalogs.get(handle) {
                info!("object catalog loaded: {} options", catalog.options.len());
                commands.insert_resource(menu_options_for(&catalog.options));
                spawner.set_catalog(catalog.options.clone());
                loader.loaded = true;
            }
        }
    }
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 2.2, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

/// Stand-in for a detection backend: two flat regions, reported through
/// the same change notification a real tracker would emit.
fn spawn_demo_surfaces(
    commands: &mut Commands,
    surface_changes: &mut EventWriter<SurfacesChanged>,
) {
    let ground = spawn_tracked_surface(commands, Transform::from_xyz(0.0, 0.0, 0.0), false);
    let table = spawn_tracked_surface(commands, Transform::from_xyz(1.8, 0.7, -1.2), false);
    surface_changes.write(SurfacesChanged {
        added: vec![ground, table],
        removed: vec![],
    });
}

#[derive(Component)]
struct FpsText;

fn spawn_overlay(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            DebugOverlay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}

/// Casts this frame's tap into the scene; a hit on a tracked surface
/// becomes a placement request. Retapping while the menu is up simply
/// moves the pending pose.
fn tap_on_surface(
    input: Res<ScreenInput>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    surfaces: Query<&GlobalTransform, With<TrackedSurface>>,
    mut open: EventWriter<OpenMenuAt>,
) {
    if input.pointer_over_ui {
        return;
    }
    let Some(tap) = input.tap else {
        return;
    };
    let Ok(_window) = windows.single() else {
        return;
    };
    let Ok((camera, cam_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(cam_transform, tap) else {
        return;
    };

    let mut best: Option<(f32, Vec3, Vec3)> = None;
    for surface in surfaces.iter() {
        let normal = surface.up().as_vec3();
        let denom = ray.direction.dot(normal);
        if denom.abs() < 1e-6 {
            continue;
        }
        let t = (surface.translation() - ray.origin).dot(normal) / denom;
        if t <= 0.0 {
            continue;
        }
        let hit = ray.origin + ray.direction * t;
        let local = surface.affine().inverse().transform_point3(hit);
        if local.x.abs() > DEMO_SURFACE_HALF_EXTENT || local.z.abs() > DEMO_SURFACE_HALF_EXTENT {
            continue;
        }
        if best.is_none_or(|(closest, _, _)| t < closest) {
            best = Some((t, hit, normal));
        }
    }

    if let Some((_, point, normal)) = best {
        open.write(OpenMenuAt { point, normal });
    }
}

/// Gives a freshly created ghost preview its translucent mesh.
fn decorate_previews(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    spawner: Res<ObjectSpawner>,
    previews: Query<Entity, Added<SpawnPreview>>,
) {
    for preview in previews.iter() {
        let size = spawner
            .selected_option()
            .map(|o| o.size())
            .unwrap_or(Vec3::splat(0.3));
        let material = materials.add(StandardMaterial {
            base_color: Color::srgba(0.9, 0.9, 1.0, PREVIEW_ALPHA),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        commands.entity(preview).with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::from_size(size))),
                MeshMaterial3d(material),
                Transform::from_xyz(0.0, size.y * 0.5, 0.0),
            ));
        });
    }
}

fn decorate_placed_objects(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    spawner: Res<ObjectSpawner>,
    placed: Query<(Entity, &PlacedObject), Added<PlacedObject>>,
) {
    for (entity, object) in placed.iter() {
        let Some(option) = spawner.options().get(object.option_index) else {
            continue;
        };
        let size = option.size();
        let material = materials.add(StandardMaterial {
            base_color: option.icon_color(),
            ..default()
        });
        commands.entity(entity).with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::from_size(size))),
                MeshMaterial3d(material),
                Transform::from_xyz(0.0, size.y * 0.5, 0.0),
            ));
        });
    }
}

fn decorate_surface_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    visuals: Query<Entity, Added<SurfaceVisual>>,
) {
    for visual in visuals.iter() {
        let material = materials.add(StandardMaterial {
            base_color: SURFACE_VISUAL_COLOR,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        commands.entity(visual).insert((
            Mesh3d(
                meshes.add(
                    Plane3d::default()
                        .mesh()
                        .size(DEMO_SURFACE_HALF_EXTENT * 2.0, DEMO_SURFACE_HALF_EXTENT * 2.0),
                ),
            ),
            MeshMaterial3d(material),
        ));
    }
}
