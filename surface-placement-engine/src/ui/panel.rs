use bevy::prelude::*;
use constants::ui_settings::{MENU_PANEL_COLOR, MENU_PANEL_SIZE, PANEL_FADE_DURATION};

use super::tween::FadeTween;

/// The screen-space panel the radial buttons live in. Spawned once,
/// hidden; the menu controller fades it in and out and only deactivates
/// it once a fade-out completes uncontested.
#[derive(Component)]
pub struct MenuPanel;

pub fn spawn_menu_panel(mut commands: Commands) {
    commands.spawn((
        MenuPanel,
        Name::new("RadialMenuPanel"),
        BackgroundColor(MENU_PANEL_COLOR.with_alpha(0.0)),
        Visibility::Hidden,
        Node {
            width: Val::Px(MENU_PANEL_SIZE),
            height: Val::Px(MENU_PANEL_SIZE),
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            margin: UiRect {
                left: Val::Px(-MENU_PANEL_SIZE / 2.0),
                top: Val::Px(-MENU_PANEL_SIZE / 2.0),
                ..default()
            },
            ..default()
        },
    ));
}

pub fn panel_alpha(bg: &BackgroundColor) -> f32 {
    bg.0.alpha()
}

/// Starts a fade from the panel's current alpha. Replacing an in-flight
/// fade cancels it, so rapid toggling never snaps the alpha.
pub fn begin_panel_fade(commands: &mut Commands, panel: Entity, bg: &BackgroundColor, to: f32) {
    commands
        .entity(panel)
        .insert(FadeTween::new(panel_alpha(bg), to, PANEL_FADE_DURATION));
}
