//! Thin integration layer: toolbar, options modal, and the per-frame tick
//! that wires pointer input into the menu, placement, and surface
//! subsystems.

use bevy::prelude::*;

use constants::ui_settings::{
    DELETE_BUTTON_COLOR, DELETE_BUTTON_HOVER, MODAL_BACKGROUND, TOOLBAR_BUTTON_ACTIVE,
    TOOLBAR_BUTTON_COLOR, TOOLBAR_BUTTON_HOVER, TOOLBAR_BUTTON_PRESSED,
};

use crate::input::{InputSet, ScreenInput};
use crate::placement::controller::CancelPlacement;
use crate::placement::spawner::ObjectSpawner;
use crate::surfaces::SetSurfaceVisibility;
use crate::ui::radial_menu::{MenuOpenState, MenuSelectionSet, RadialMenu, RadialMenuRequest};

/// All interaction-loop state in one place, mutated only by the tick and
/// the toolbar handlers.
#[derive(Resource)]
pub struct OrchestratorState {
    pub show_object_menu: bool,
    pub show_options_modal: bool,
    pub delete_enabled: bool,
    pub surface_visuals: bool,
    pub show_overlay: bool,
}

impl Default for OrchestratorState {
    fn default() -> Self {
        Self {
            show_object_menu: false,
            show_options_modal: false,
            delete_enabled: false,
            surface_visuals: false,
            show_overlay: true,
        }
    }
}

/// Anything tagged with this follows the debug-overlay toggle.
#[derive(Component)]
pub struct DebugOverlay;

#[derive(Component)]
pub struct OptionsModal;

#[derive(Component)]
pub struct MenuToggleButton;

#[derive(Component)]
pub struct OptionsButton;

#[derive(Component)]
pub struct DeleteButton;

#[derive(Component)]
pub struct ClearAllButton;

#[derive(Component)]
pub struct SurfaceVisualsToggleButton;

#[derive(Component)]
pub struct OverlayToggleButton;

/// Runs after input sampling and before menu selection handling, so a
/// toolbar press takes effect in the same frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrchestratorSet;

pub struct OrchestratorPlugin;

impl Plugin for OrchestratorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrchestratorState>()
            .configure_sets(
                Update,
                OrchestratorSet.after(InputSet).before(MenuSelectionSet),
            )
            .add_systems(Startup, spawn_toolbar)
            .add_systems(
                Update,
                (
                    tick_orchestrator,
                    menu_toggle_button,
                    options_button,
                    delete_button,
                    clear_all_button,
                    surface_visuals_toggle_button,
                    overlay_toggle_button,
                )
                    .chain()
                    .in_set(OrchestratorSet),
            );
    }
}

/// Per-frame interaction tick. A tap outside the UI dismisses the options
/// modal only; the radial menu deliberately stays open (closing it here is
/// a product decision still pending). The delete affordance is forced off
/// while the menu is up, otherwise it tracks whether a focused placed
/// object exists.
pub fn tick_orchestrator(
    input: Res<ScreenInput>,
    menu: Res<RadialMenu>,
    spawner: Res<ObjectSpawner>,
    mut state: ResMut<OrchestratorState>,
    mut modals: Query<&mut Visibility, (With<OptionsModal>, Without<DebugOverlay>)>,
    mut overlays: Query<&mut Visibility, (With<DebugOverlay>, Without<OptionsModal>)>,
) {
    state.show_object_menu = menu.state() != MenuOpenState::Closed;

    if (state.show_object_menu || state.show_options_modal)
        && !input.pointer_over_ui
        && (input.tap.is_some() || input.drag_active)
    {
        state.show_options_modal = false;
    }

    state.delete_enabled = !state.show_object_menu && !spawner.placed().is_empty();

    for mut visibility in &mut modals {
        *visibility = if state.show_options_modal {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for mut visibility in &mut overlays {
        *visibility = if state.show_overlay {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Toggles the radial menu from the toolbar. Closing this way is a cancel:
/// the pending pose and preview go with it.
pub fn menu_toggle_button(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<MenuToggleButton>),
    >,
    state: Res<OrchestratorState>,
    mut menu: EventWriter<RadialMenuRequest>,
    mut cancel: EventWriter<CancelPlacement>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                if state.show_object_menu {
                    cancel.write(CancelPlacement);
                } else {
                    menu.write(RadialMenuRequest::Open);
                }
                *bg = BackgroundColor(TOOLBAR_BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(TOOLBAR_BUTTON_HOVER),
            Interaction::None => *bg = BackgroundColor(TOOLBAR_BUTTON_COLOR),
        }
    }
}

pub fn options_button(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<OptionsButton>),
    >,
    mut state: ResMut<OrchestratorState>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                state.show_options_modal = !state.show_options_modal;
                *bg = BackgroundColor(TOOLBAR_BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(TOOLBAR_BUTTON_HOVER),
            Interaction::None => *bg = BackgroundColor(TOOLBAR_BUTTON_COLOR),
        }
    }
}

/// Destroys the focused placed object (the most recent one). No undo.
pub fn delete_button(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<DeleteButton>),
    >,
    state: Res<OrchestratorState>,
    mut spawner: ResMut<ObjectSpawner>,
    mut commands: Commands,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                if state.delete_enabled {
                    if let Some(&focused) = spawner.placed().last() {
                        info!("deleting focused object {focused}");
                        commands.entity(focused).despawn();
                        spawner.note_despawned(focused);
                    }
                }
                *bg = BackgroundColor(DELETE_BUTTON_HOVER);
            }
            Interaction::Hovered => *bg = BackgroundColor(DELETE_BUTTON_HOVER),
            Interaction::None => *bg = BackgroundColor(DELETE_BUTTON_COLOR),
        }
    }
}

pub fn clear_all_button(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<ClearAllButton>),
    >,
    mut spawner: ResMut<ObjectSpawner>,
    mut commands: Commands,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                info!("clearing {} placed objects", spawner.placed().len());
                spawner.clear_all(&mut commands);
                *bg = BackgroundColor(DELETE_BUTTON_HOVER);
            }
            Interaction::Hovered => *bg = BackgroundColor(DELETE_BUTTON_HOVER),
            Interaction::None => *bg = BackgroundColor(DELETE_BUTTON_COLOR),
        }
    }
}

pub fn surface_visuals_toggle_button(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<SurfaceVisualsToggleButton>),
    >,
    mut state: ResMut<OrchestratorState>,
    mut visibility: EventWriter<SetSurfaceVisibility>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                state.surface_visuals = !state.surface_visuals;
                visibility.write(SetSurfaceVisibility(state.surface_visuals));
                *bg = BackgroundColor(TOOLBAR_BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(TOOLBAR_BUTTON_HOVER),
            Interaction::None => {
                *bg = BackgroundColor(if state.surface_visuals {
                    TOOLBAR_BUTTON_ACTIVE
                } else {
                    TOOLBAR_BUTTON_COLOR
                });
            }
        }
    }
}

pub fn overlay_toggle_button(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<OverlayToggleButton>),
    >,
    mut state: ResMut<OrchestratorState>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                state.show_overlay = !state.show_overlay;
                *bg = BackgroundColor(TOOLBAR_BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg = BackgroundColor(TOOLBAR_BUTTON_HOVER),
            Interaction::None => {
                *bg = BackgroundColor(if state.show_overlay {
                    TOOLBAR_BUTTON_ACTIVE
                } else {
                    TOOLBAR_BUTTON_COLOR
                });
            }
        }
    }
}

fn spawn_toolbar(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(16.0),
                left: Val::Px(16.0),
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(8.0),
                ..default()
            },
            Name::new("Toolbar"),
        ))
        .with_children(|parent| {
            toolbar_button(parent, "Objects", TOOLBAR_BUTTON_COLOR, MenuToggleButton);
            toolbar_button(parent, "Options", TOOLBAR_BUTTON_COLOR, OptionsButton);
            toolbar_button(parent, "Delete", DELETE_BUTTON_COLOR, DeleteButton);
            toolbar_button(parent, "Clear", DELETE_BUTTON_COLOR, ClearAllButton);
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(72.0),
                left: Val::Px(16.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(12.0)),
                ..default()
            },
            BackgroundColor(MODAL_BACKGROUND),
            Visibility::Hidden,
            OptionsModal,
            Name::new("OptionsModal"),
        ))
        .with_children(|parent| {
            toolbar_button(
                parent,
                "Surface visuals",
                TOOLBAR_BUTTON_COLOR,
                SurfaceVisualsToggleButton,
            );
            toolbar_button(parent, "Debug overlay", TOOLBAR_BUTTON_ACTIVE, OverlayToggleButton);
        });
}

fn toolbar_button(parent: &mut ChildSpawnerCommands, label: &str, color: Color, marker: impl Component) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(color),
            marker,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.92, 0.93, 0.95)),
            ));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementPlugin;
    use crate::placement::controller::OpenMenuAt;
    use crate::placement::spawner::{PlacedObject, SpawnOption};
    use crate::surfaces::SurfacesPlugin;
    use crate::ui::MenuUiPlugin;
    use crate::ui::radial_menu::{MenuOption, MenuOptions, OptionSelected};
    use bevy::input::touch::Touches;
    use bevy::time::TimePlugin;
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins.build().disable::<TimePlugin>());
        app.init_resource::<Time>();
        app.init_resource::<Touches>();
        app.init_resource::<ButtonInput<MouseButton>>();
        app.init_resource::<ScreenInput>();
        app.add_plugins((MenuUiPlugin, PlacementPlugin, SurfacesPlugin, OrchestratorPlugin));

        let options = vec![SpawnOption {
            name: "cube".into(),
            icon: [0.8, 0.8, 0.8],
            footprint: [0.3, 0.3, 0.3],
        }];
        app.insert_resource(MenuOptions(
            options
                .iter()
                .map(|o| MenuOption { name: o.name.clone(), icon: o.icon_color() })
                .collect(),
        ));
        app.world_mut()
            .resource_mut::<ObjectSpawner>()
            .set_catalog(options);

        let transform = Transform::from_xyz(0.0, 1.5, 8.0).looking_at(Vec3::ZERO, Vec3::Y);
        app.world_mut()
            .spawn((Camera3d::default(), transform, GlobalTransform::from(transform)));

        app.update();
        app
    }

    fn advance(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    fn press<M: Component>(app: &mut App) {
        let mut buttons = app.world_mut().query_filtered::<Entity, (With<Button>, With<M>)>();
        let entity = buttons.single(app.world()).unwrap();
        app.world_mut().entity_mut(entity).insert(Interaction::Pressed);
        advance(app, 0.0);
        app.world_mut().entity_mut(entity).insert(Interaction::None);
        advance(app, 0.0);
    }

    fn place_one(app: &mut App) {
        app.world_mut()
            .send_event(OpenMenuAt { point: Vec3::ZERO, normal: Vec3::Y });
        advance(app, 0.0);
        advance(app, 0.4);
        app.world_mut().send_event(OptionSelected { index: 0 });
        advance(app, 0.0);
        advance(app, 0.4);
    }

    #[test]
    fn tap_on_surface_then_confirm_places_an_object() {
        let mut app = test_app();
        place_one(&mut app);

        let intent = app.world().resource::<crate::placement::controller::PlacementIntent>();
        assert!(!intent.is_active());
        assert!(intent.preview().is_none());
        assert_eq!(app.world().resource::<RadialMenu>().state(), MenuOpenState::Closed);
        assert_eq!(app.world().resource::<ObjectSpawner>().placed().len(), 1);
    }

    #[test]
    fn tap_outside_closes_the_modal_but_not_the_menu() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<OrchestratorState>()
            .show_options_modal = true;
        app.world_mut()
            .send_event(OpenMenuAt { point: Vec3::ZERO, normal: Vec3::Y });
        advance(&mut app, 0.0);
        advance(&mut app, 0.4);

        {
            let mut input = app.world_mut().resource_mut::<ScreenInput>();
            input.tap = Some(Vec2::new(400.0, 300.0));
            input.pointer_over_ui = false;
        }
        advance(&mut app, 0.0);

        let state = app.world().resource::<OrchestratorState>();
        assert!(!state.show_options_modal);
        assert_eq!(app.world().resource::<RadialMenu>().state(), MenuOpenState::Open);
    }

    #[test]
    fn drag_outside_dismisses_the_modal_without_a_fresh_tap() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<OrchestratorState>()
            .show_options_modal = true;

        {
            let mut input = app.world_mut().resource_mut::<ScreenInput>();
            input.tap = None;
            input.drag_active = true;
            input.pointer_over_ui = false;
        }
        advance(&mut app, 0.0);

        assert!(!app.world().resource::<OrchestratorState>().show_options_modal);
    }

    #[test]
    fn tap_over_ui_leaves_the_modal_alone() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<OrchestratorState>()
            .show_options_modal = true;

        {
            let mut input = app.world_mut().resource_mut::<ScreenInput>();
            input.tap = Some(Vec2::new(40.0, 40.0));
            input.pointer_over_ui = true;
        }
        advance(&mut app, 0.0);

        assert!(app.world().resource::<OrchestratorState>().show_options_modal);
    }

    #[test]
    fn delete_is_disabled_while_the_menu_is_open() {
        let mut app = test_app();
        place_one(&mut app);
        assert!(app.world().resource::<OrchestratorState>().delete_enabled);

        app.world_mut().send_event(RadialMenuRequest::Open);
        advance(&mut app, 0.0);
        advance(&mut app, 0.0);
        assert!(!app.world().resource::<OrchestratorState>().delete_enabled);
    }

    #[test]
    fn delete_button_removes_the_focused_object() {
        let mut app = test_app();
        place_one(&mut app);
        let placed = app.world().resource::<ObjectSpawner>().placed()[0];

        press::<DeleteButton>(&mut app);

        assert!(app.world().get_entity(placed).is_err());
        assert!(app.world().resource::<ObjectSpawner>().placed().is_empty());
        assert!(!app.world().resource::<OrchestratorState>().delete_enabled);
    }

    #[test]
    fn clear_all_empties_the_registry() {
        let mut app = test_app();
        place_one(&mut app);
        place_one(&mut app);
        assert_eq!(app.world().resource::<ObjectSpawner>().placed().len(), 2);

        press::<ClearAllButton>(&mut app);

        assert!(app.world().resource::<ObjectSpawner>().placed().is_empty());
        let mut placed = app.world_mut().query::<&PlacedObject>();
        assert_eq!(placed.iter(app.world()).count(), 0);
    }

    #[test]
    fn menu_toggle_while_open_cancels_the_pending_placement() {
        let mut app = test_app();
        app.world_mut()
            .send_event(OpenMenuAt { point: Vec3::ZERO, normal: Vec3::Y });
        advance(&mut app, 0.0);
        advance(&mut app, 0.4);
        assert!(app.world().resource::<crate::placement::controller::PlacementIntent>().is_active());

        press::<MenuToggleButton>(&mut app);
        advance(&mut app, 0.4);

        let intent = app.world().resource::<crate::placement::controller::PlacementIntent>();
        assert!(!intent.is_active());
        assert!(intent.preview().is_none());
        assert_eq!(app.world().resource::<RadialMenu>().state(), MenuOpenState::Closed);
    }
}
