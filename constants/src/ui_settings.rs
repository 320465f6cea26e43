use bevy::prelude::*;

/// Distance from the menu centre to each option button, in logical pixels.
pub const MENU_RADIUS: f32 = 150.0;

/// Duration of the per-button appear/disappear animation, seconds.
pub const BUTTON_ANIMATION_DURATION: f32 = 0.3;

/// Duration of the menu panel fade, seconds.
pub const PANEL_FADE_DURATION: f32 = 0.25;

/// Overshoot factor for the back easings (the classic DOTween/Penner value).
pub const BACK_OVERSHOOT: f32 = 1.70158;

/// Side length of the square menu panel node.
pub const MENU_PANEL_SIZE: f32 = 420.0;

/// Side length of a radial option button.
pub const MENU_BUTTON_SIZE: f32 = 56.0;

pub const MENU_PANEL_COLOR: Color = Color::srgba(0.10, 0.11, 0.13, 0.85);
pub const MENU_BUTTON_BORDER: Color = Color::srgba(0.0, 0.0, 0.0, 0.25);

pub const TOOLBAR_BUTTON_COLOR: Color = Color::srgb(0.22, 0.24, 0.28);
pub const TOOLBAR_BUTTON_HOVER: Color = Color::srgb(0.26, 0.28, 0.32);
pub const TOOLBAR_BUTTON_PRESSED: Color = Color::srgb(0.18, 0.20, 0.24);
pub const TOOLBAR_BUTTON_ACTIVE: Color = Color::srgb(0.30, 0.34, 0.40);

pub const DELETE_BUTTON_COLOR: Color = Color::srgb(0.28, 0.10, 0.10);
pub const DELETE_BUTTON_HOVER: Color = Color::srgb(0.34, 0.14, 0.14);

pub const MODAL_BACKGROUND: Color = Color::srgb(0.12, 0.13, 0.15);
