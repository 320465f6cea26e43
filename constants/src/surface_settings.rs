use bevy::prelude::*;

/// Half extent of a demo tracked surface, metres.
pub const DEMO_SURFACE_HALF_EXTENT: f32 = 1.25;

/// Companion visual tint for tracked surfaces.
pub const SURFACE_VISUAL_COLOR: Color = Color::srgba(0.25, 0.55, 0.95, 0.25);

/// Companion visuals start hidden until the debug toggle enables them.
pub const SURFACE_VISUALS_DEFAULT_VISIBLE: bool = false;
