//! Screen-space menu stack: tween primitives, the fading menu panel, the
//! pure radial layout, and the radial menu state machine that owns the
//! transient option buttons.

/// Menu panel node and fade helpers.
pub mod panel;

/// Pure circle layout for a variable option count.
pub mod radial_layout;

/// Radial menu controller: open/close state machine, button lifecycle,
/// selection events.
pub mod radial_menu;

/// Cancellable property animations with completion events.
pub mod tween;

use bevy::prelude::*;

use radial_menu::RadialMenuPlugin;
use tween::TweenPlugin;

pub struct MenuUiPlugin;

impl Plugin for MenuUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((TweenPlugin, RadialMenuPlugin));
    }
}
