use bevy::prelude::*;
use constants::ui_settings::{
    BUTTON_ANIMATION_DURATION, MENU_BUTTON_BORDER, MENU_BUTTON_SIZE, MENU_PANEL_SIZE, MENU_RADIUS,
};

use super::panel::{MenuPanel, begin_panel_fade, spawn_menu_panel};
use super::radial_layout::radial_offsets;
use super::tween::{Easing, MoveTween, ScaleTween, TweenFinished, TweenKind, TweenSet, UiOffset};

/// A selectable entry in the circular menu. Order in `MenuOptions` is
/// significant: it fixes the angular position of the button.
#[derive(Debug, Clone)]
pub struct MenuOption {
    pub name: String,
    pub icon: Color,
}

#[derive(Resource, Default)]
pub struct MenuOptions(pub Vec<MenuOption>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuOpenState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// Transient per-option button. Created when the menu opens, despawned when
/// its own close animation completes (or force-despawned by a take-over
/// open). Owned exclusively by the menu controller.
#[derive(Component)]
pub struct RadialButton {
    pub index: usize,
    pub target: Vec2,
}

/// Marks a button whose disappear animation is running. Its scale tween
/// finishing is what despawns it, never a bulk destroy.
#[derive(Component)]
pub struct ClosingButton;

/// Open/close requests are idempotent per state: an open in `Open`/`Opening`
/// and a close in `Closed`/`Closing` are ignored.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialMenuRequest {
    Open,
    Close,
    Toggle,
}

/// Emitted when an option button is pressed while the menu is fully open.
/// Presses during `Opening`/`Closing` are dropped.
#[derive(Event, Debug, Clone, Copy)]
pub struct OptionSelected {
    pub index: usize,
}

/// The single menu state machine. Fields are private: every transition goes
/// through the request handler so the animation bookkeeping stays coherent.
#[derive(Resource)]
pub struct RadialMenu {
    state: MenuOpenState,
    buttons: Vec<Entity>,
    /// Appear-animation completions still outstanding before `Open`
    /// (two tweens per button plus the panel fade; join, not race).
    pending_open: usize,
    fade_out_done: bool,
    radius: f32,
}

impl Default for RadialMenu {
    fn default() -> Self {
        Self {
            state: MenuOpenState::Closed,
            buttons: Vec::new(),
            pending_open: 0,
            fade_out_done: false,
            radius: MENU_RADIUS,
        }
    }
}

impl RadialMenu {
    pub fn state(&self) -> MenuOpenState {
        self.state
    }

    pub fn live_button_count(&self) -> usize {
        self.buttons.len()
    }
}

/// Button presses are read here; consumers of `OptionSelected` should run
/// after this set and before `MenuRequestSet` to react within the same tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuSelectionSet;

/// Open/close requests are drained here, before the tween tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuRequestSet;

pub struct RadialMenuPlugin;

impl Plugin for RadialMenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RadialMenuRequest>()
            .add_event::<OptionSelected>()
            .init_resource::<RadialMenu>()
            .init_resource::<MenuOptions>()
            .configure_sets(
                Update,
                (MenuSelectionSet, MenuRequestSet).chain().before(TweenSet),
            )
            .add_systems(Startup, spawn_menu_panel)
            .add_systems(
                Update,
                (
                    button_selection.in_set(MenuSelectionSet),
                    handle_menu_requests.in_set(MenuRequestSet),
                    (track_menu_animations, apply_button_offsets).after(TweenSet),
                ),
            );
    }
}

fn handle_menu_requests(
    mut requests: EventReader<RadialMenuRequest>,
    mut menu: ResMut<RadialMenu>,
    options: Res<MenuOptions>,
    mut commands: Commands,
    panels: Query<(Entity, &BackgroundColor), With<MenuPanel>>,
    mut panel_vis: Query<&mut Visibility, With<MenuPanel>>,
    button_state: Query<(&UiOffset, &Transform), With<RadialButton>>,
) {
    if requests.is_empty() {
        return;
    }
    let Ok((panel, panel_bg)) = panels.single() else {
        return;
    };

    for request in requests.read() {
        let open = match (request, menu.state) {
            (RadialMenuRequest::Toggle, MenuOpenState::Closed | MenuOpenState::Closing) => true,
            (RadialMenuRequest::Toggle, _) => false,
            (RadialMenuRequest::Open, MenuOpenState::Closed | MenuOpenState::Closing) => true,
            (RadialMenuRequest::Open, _) => continue,
            (RadialMenuRequest::Close, MenuOpenState::Open | MenuOpenState::Opening) => false,
            (RadialMenuRequest::Close, _) => continue,
        };

        if open {
            begin_open(&mut menu, &options, &mut commands, panel, panel_bg);
            if let Ok(mut vis) = panel_vis.single_mut() {
                *vis = Visibility::Visible;
            }
        } else {
            begin_close(&mut menu, &mut commands, panel, panel_bg, &button_state);
        }
    }
}

/// `Closed`/`Closing` → `Opening`: force-despawn whatever is left of the old
/// button set, build a fresh one from the layout, and start every appear
/// animation plus the panel fade-in concurrently.
fn begin_open(
    menu: &mut RadialMenu,
    options: &MenuOptions,
    commands: &mut Commands,
    panel: Entity,
    panel_bg: &BackgroundColor,
) {
    for stale in menu.buttons.drain(..) {
        commands.entity(stale).despawn();
    }

    begin_panel_fade(commands, panel, panel_bg, 1.0);

    let offsets = radial_offsets(options.0.len(), menu.radius);
    for (index, (option, target)) in options.0.iter().zip(offsets).enumerate() {
        let button = spawn_button(commands, panel, index, option, target);
        menu.buttons.push(button);
    }

    // Join: two tweens per button plus the fade must all resolve.
    menu.pending_open = menu.buttons.len() * 2 + 1;
    menu.fade_out_done = false;
    menu.state = MenuOpenState::Opening;
}

/// `Open`/`Opening` → `Closing`: counter-animate every live button from its
/// current interpolated offset and scale. No snap back to the start point.
fn begin_close(
    menu: &mut RadialMenu,
    commands: &mut Commands,
    panel: Entity,
    panel_bg: &BackgroundColor,
    button_state: &Query<(&UiOffset, &Transform), With<RadialButton>>,
) {
    for &button in &menu.buttons {
        let Ok((offset, transform)) = button_state.get(button) else {
            continue;
        };
        commands.entity(button).insert((
            ClosingButton,
            MoveTween::new(offset.0, Vec2::ZERO, BUTTON_ANIMATION_DURATION, Easing::InBack),
            ScaleTween::new(transform.scale.x, 0.0, BUTTON_ANIMATION_DURATION, Easing::InBack),
        ));
    }

    begin_panel_fade(commands, panel, panel_bg, 0.0);
    menu.fade_out_done = false;
    menu.state = MenuOpenState::Closing;
}

fn spawn_button(
    commands: &mut Commands,
    panel: Entity,
    index: usize,
    option: &MenuOption,
    target: Vec2,
) -> Entity {
    let button = commands
        .spawn((
            RadialButton { index, target },
            Name::new(option.name.clone()),
            Button,
            BackgroundColor(option.icon),
            BorderColor(MENU_BUTTON_BORDER),
            UiOffset(Vec2::ZERO),
            Transform::from_scale(Vec3::ZERO),
            Node {
                width: Val::Px(MENU_BUTTON_SIZE),
                height: Val::Px(MENU_BUTTON_SIZE),
                position_type: PositionType::Absolute,
                display: Display::Flex,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            MoveTween::new(Vec2::ZERO, target, BUTTON_ANIMATION_DURATION, Easing::OutBack),
            ScaleTween::new(0.0, 1.0, BUTTON_ANIMATION_DURATION, Easing::OutBack),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(option.name.clone()),
                TextFont { font_size: 12.0, ..default() },
                TextColor(Color::srgb(1.0, 1.0, 1.0)),
            ));
        })
        .id();

    commands.entity(panel).add_child(button);
    button
}

/// Maps a button's logical centre offset to panel-local node coordinates.
fn apply_button_offsets(
    mut buttons: Query<(&UiOffset, &mut Node), (With<RadialButton>, Changed<UiOffset>)>,
) {
    let half_panel = MENU_PANEL_SIZE / 2.0;
    let half_button = MENU_BUTTON_SIZE / 2.0;
    for (offset, mut node) in &mut buttons {
        node.left = Val::Px(half_panel + offset.0.x - half_button);
        node.top = Val::Px(half_panel - offset.0.y - half_button);
    }
}

fn button_selection(
    menu: Res<RadialMenu>,
    interactions: Query<(&Interaction, &RadialButton), Changed<Interaction>>,
    mut selected: EventWriter<OptionSelected>,
) {
    // Input during Opening/Closing is ignored; only a fully open menu selects.
    if menu.state != MenuOpenState::Open {
        return;
    }

    for (interaction, button) in &interactions {
        if *interaction == Interaction::Pressed {
            selected.write(OptionSelected { index: button.index });
        }
    }
}

/// Consumes tween completions: advances `Opening` → `Open` once the full
/// join resolves, despawns each closing button exactly when its own scale
/// tween finishes, and deactivates the panel only if, at that moment, no
/// open request has superseded the close.
fn track_menu_animations(
    mut finished: EventReader<TweenFinished>,
    mut menu: ResMut<RadialMenu>,
    mut commands: Commands,
    closing: Query<(), With<ClosingButton>>,
    panels: Query<Entity, With<MenuPanel>>,
    mut panel_vis: Query<&mut Visibility, With<MenuPanel>>,
) {
    let panel = panels.single().ok();

    for event in finished.read() {
        if Some(event.entity) == panel {
            match menu.state {
                MenuOpenState::Opening => {
                    menu.pending_open = menu.pending_open.saturating_sub(1);
                }
                MenuOpenState::Closing => menu.fade_out_done = true,
                _ => {}
            }
            continue;
        }

        let Some(slot) = menu.buttons.iter().position(|&b| b == event.entity) else {
            // A tween that outlived its handle (force-destroyed during a
            // take-over). Nothing to do.
            continue;
        };

        if closing.contains(event.entity) {
            if event.kind == TweenKind::Scale {
                menu.buttons.remove(slot);
                commands.entity(event.entity).despawn();
            }
        } else if menu.state == MenuOpenState::Opening {
            menu.pending_open = menu.pending_open.saturating_sub(1);
        }
    }

    if menu.state == MenuOpenState::Opening && menu.pending_open == 0 {
        menu.state = MenuOpenState::Open;
    }

    // Read the state right before deactivating, not just before the fade
    // started: a take-over open in the interim skips this entirely.
    if menu.state == MenuOpenState::Closing && menu.fade_out_done && menu.buttons.is_empty() {
        if let Ok(mut vis) = panel_vis.single_mut() {
            *vis = Visibility::Hidden;
        }
        menu.state = MenuOpenState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::tween::TweenPlugin;
    use bevy::time::TimePlugin;
    use std::time::Duration;

    fn test_app(option_count: usize) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins.build().disable::<TimePlugin>());
        app.init_resource::<Time>();
        app.add_plugins((TweenPlugin, RadialMenuPlugin));
        app.insert_resource(MenuOptions(
            (0..option_count)
                .map(|i| MenuOption {
                    name: format!("option {i}"),
                    icon: Color::WHITE,
                })
                .collect(),
        ));
        // First update runs Startup and spawns the panel.
        app.update();
        app
    }

    fn advance(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    fn menu(app: &App) -> &RadialMenu {
        app.world().resource::<RadialMenu>()
    }

    #[test]
    fn open_joins_all_animations_before_open_state() {
        let mut app = test_app(4);
        app.world_mut().send_event(RadialMenuRequest::Open);
        advance(&mut app, 0.0);

        assert_eq!(menu(&app).state(), MenuOpenState::Opening);
        assert_eq!(menu(&app).live_button_count(), 4);

        // Fade (0.25s) alone finishing must not advance the state.
        advance(&mut app, 0.26);
        assert_eq!(menu(&app).state(), MenuOpenState::Opening);

        advance(&mut app, 0.1);
        assert_eq!(menu(&app).state(), MenuOpenState::Open);
    }

    #[test]
    fn close_before_open_completes_ends_closed_with_no_buttons() {
        let mut app = test_app(4);
        app.world_mut().send_event(RadialMenuRequest::Open);
        advance(&mut app, 0.0);
        advance(&mut app, 0.1); // mid appear animation

        app.world_mut().send_event(RadialMenuRequest::Close);
        advance(&mut app, 0.0);
        assert_eq!(menu(&app).state(), MenuOpenState::Closing);

        advance(&mut app, 0.35);
        assert_eq!(menu(&app).state(), MenuOpenState::Closed);
        assert_eq!(menu(&app).live_button_count(), 0);
        assert_eq!(live_button_entities(&mut app).len(), 0);
    }

    #[test]
    fn rapid_toggling_never_duplicates_the_button_set() {
        let mut app = test_app(5);
        for _ in 0..4 {
            app.world_mut().send_event(RadialMenuRequest::Toggle);
            advance(&mut app, 0.05);
            assert!(menu(&app).live_button_count() <= 5);
            let live = live_button_entities(&mut app).len();
            assert_eq!(live, menu(&app).live_button_count());
        }
    }

    #[test]
    fn reopen_while_closing_rebuilds_a_fresh_set_and_skips_deactivation() {
        let mut app = test_app(3);
        app.world_mut().send_event(RadialMenuRequest::Open);
        advance(&mut app, 0.0);
        advance(&mut app, 0.4); // fully open

        app.world_mut().send_event(RadialMenuRequest::Close);
        advance(&mut app, 0.0);
        advance(&mut app, 0.1);

        app.world_mut().send_event(RadialMenuRequest::Open);
        advance(&mut app, 0.0);
        assert_eq!(menu(&app).state(), MenuOpenState::Opening);
        assert_eq!(menu(&app).live_button_count(), 3);

        advance(&mut app, 0.4);
        assert_eq!(menu(&app).state(), MenuOpenState::Open);
        let mut query = app
            .world_mut()
            .query_filtered::<&Visibility, With<MenuPanel>>();
        let vis = *query.single(app.world()).unwrap();
        assert_eq!(vis, Visibility::Visible);
    }

    #[test]
    fn selection_is_ignored_unless_fully_open() {
        let mut app = test_app(3);
        app.world_mut().send_event(RadialMenuRequest::Open);
        advance(&mut app, 0.0);

        press_first_button(&mut app);
        advance(&mut app, 0.0);
        assert!(selected_events(&app).is_empty(), "press during Opening must be dropped");

        advance(&mut app, 0.4);
        assert_eq!(menu(&app).state(), MenuOpenState::Open);

        press_first_button(&mut app);
        advance(&mut app, 0.0);
        assert_eq!(selected_events(&app), vec![0]);
    }

    #[test]
    fn zero_options_still_fades_open_and_closed() {
        let mut app = test_app(0);
        app.world_mut().send_event(RadialMenuRequest::Open);
        advance(&mut app, 0.0);
        assert_eq!(menu(&app).live_button_count(), 0);

        advance(&mut app, 0.3);
        assert_eq!(menu(&app).state(), MenuOpenState::Open);

        app.world_mut().send_event(RadialMenuRequest::Close);
        advance(&mut app, 0.0);
        advance(&mut app, 0.3);
        assert_eq!(menu(&app).state(), MenuOpenState::Closed);
    }

    fn live_button_entities(app: &mut App) -> Vec<Entity> {
        let mut query = app.world_mut().query::<(Entity, &RadialButton)>();
        query.iter(app.world()).map(|(e, _)| e).collect()
    }

    fn press_first_button(app: &mut App) {
        let mut query = app.world_mut().query::<(Entity, &RadialButton)>();
        let target = query
            .iter(app.world())
            .find(|(_, b)| b.index == 0)
            .map(|(e, _)| e);
        if let Some(entity) = target {
            let mut interaction = app.world_mut().get_mut::<Interaction>(entity).unwrap();
            *interaction = Interaction::Pressed;
        }
    }

    fn selected_events(app: &App) -> Vec<usize> {
        let events = app.world().resource::<Events<OptionSelected>>();
        events.iter_current_update_events().map(|e| e.index).collect()
    }
}
