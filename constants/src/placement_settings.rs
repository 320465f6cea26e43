/// Cosine of the half-angle of the spawn view cone. A pending spawn point
/// outside this cone around the camera forward axis is rejected.
pub const SPAWN_VIEW_COS_THRESHOLD: f32 = 0.5;

/// Uniform scale applied to the preview stand-in relative to the final object.
pub const PREVIEW_SCALE: f32 = 0.85;

/// Preview material alpha.
pub const PREVIEW_ALPHA: f32 = 0.35;

/// Fallback footprint for catalog entries with degenerate bounds.
pub const MIN_FOOTPRINT: f32 = 0.001;
