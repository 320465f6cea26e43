use bevy::prelude::*;

/// Evenly spaced target offsets on a circle of the given radius, one per
/// option, starting at the +X axis and walking counter-clockwise. Pure;
/// called once per menu open.
pub fn radial_offsets(count: usize, radius: f32) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }

    let step = std::f32::consts::TAU / count as f32;
    (0..count)
        .map(|i| {
            let angle = i as f32 * step;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}
