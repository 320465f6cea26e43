use bevy::prelude::*;
use constants::ui_settings::BACK_OVERSHOOT;

/// Easing curves used by the menu animations. `OutBack`/`InBack` carry the
/// usual Penner overshoot so buttons pop slightly past their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    OutQuad,
    OutBack,
    InBack,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::OutQuad => t * (2.0 - t),
            Easing::OutBack => {
                let s = BACK_OVERSHOOT;
                let t = t - 1.0;
                t * t * ((s + 1.0) * t + s) + 1.0
            }
            Easing::InBack => {
                let s = BACK_OVERSHOOT;
                t * t * ((s + 1.0) * t - s)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    Fade,
    Move,
    Scale,
}

/// Fired once per tween, strictly in the frame its final value is applied.
/// The tween component is removed in the same frame, so inserting a fresh
/// tween is always a clean restart from the current property value.
#[derive(Event)]
pub struct TweenFinished {
    pub entity: Entity,
    pub kind: TweenKind,
}

/// Current logical offset of an animated node from its container centre.
/// `MoveTween` drives this; layout code maps it to `Node` coordinates.
#[derive(Component, Default, Clone, Copy)]
pub struct UiOffset(pub Vec2);

/// Animates `BackgroundColor` alpha. Construct with the current alpha as
/// `from`; replacing an in-flight fade therefore resumes without snapping.
#[derive(Component)]
pub struct FadeTween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl FadeTween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self { from, to, duration, elapsed: 0.0 }
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}

/// Animates `UiOffset` between two logical offsets.
#[derive(Component)]
pub struct MoveTween {
    from: Vec2,
    to: Vec2,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl MoveTween {
    pub fn new(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self { from, to, duration, elapsed: 0.0, easing }
    }
}

/// Animates uniform `Transform` scale.
#[derive(Component)]
pub struct ScaleTween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl ScaleTween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self { from, to, duration, elapsed: 0.0, easing }
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}

/// Set the tween tick systems run in, so consumers of `TweenFinished` can
/// order themselves after it within the same frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenSet;

pub struct TweenPlugin;

impl Plugin for TweenPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TweenFinished>().add_systems(
            Update,
            (tick_fade_tweens, tick_move_tweens, tick_scale_tweens).in_set(TweenSet),
        );
    }
}

fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).min(1.0)
    }
}

fn tick_fade_tweens(
    time: Res<Time>,
    mut commands: Commands,
    mut tweens: Query<(Entity, &mut FadeTween, &mut BackgroundColor)>,
    mut finished: EventWriter<TweenFinished>,
) {
    for (entity, mut tween, mut bg) in &mut tweens {
        tween.elapsed += time.delta_secs();
        let t = progress(tween.elapsed, tween.duration);
        let eased = Easing::OutQuad.sample(t);
        let alpha = (tween.from + (tween.to - tween.from) * eased).clamp(0.0, 1.0);
        bg.0.set_alpha(alpha);

        if t >= 1.0 {
            commands.entity(entity).remove::<FadeTween>();
            finished.write(TweenFinished { entity, kind: TweenKind::Fade });
        }
    }
}

fn tick_move_tweens(
    time: Res<Time>,
    mut commands: Commands,
    mut tweens: Query<(Entity, &mut MoveTween, &mut UiOffset)>,
    mut finished: EventWriter<TweenFinished>,
) {
    for (entity, mut tween, mut offset) in &mut tweens {
        tween.elapsed += time.delta_secs();
        let t = progress(tween.elapsed, tween.duration);
        let eased = tween.easing.sample(t);
        offset.0 = tween.from + (tween.to - tween.from) * eased;

        if t >= 1.0 {
            offset.0 = tween.to;
            commands.entity(entity).remove::<MoveTween>();
            finished.write(TweenFinished { entity, kind: TweenKind::Move });
        }
    }
}

fn tick_scale_tweens(
    time: Res<Time>,
    mut commands: Commands,
    mut tweens: Query<(Entity, &mut ScaleTween, &mut Transform)>,
    mut finished: EventWriter<TweenFinished>,
) {
    for (entity, mut tween, mut transform) in &mut tweens {
        tween.elapsed += time.delta_secs();
        let t = progress(tween.elapsed, tween.duration);
        let eased = tween.easing.sample(t);
        transform.scale = Vec3::splat(tween.from + (tween.to - tween.from) * eased);

        if t >= 1.0 {
            transform.scale = Vec3::splat(tween.to);
            commands.entity(entity).remove::<ScaleTween>();
            finished.write(TweenFinished { entity, kind: TweenKind::Scale });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_are_exact() {
        for easing in [Easing::Linear, Easing::OutQuad, Easing::OutBack, Easing::InBack] {
            assert!(easing.sample(0.0).abs() < 1e-6);
            assert!((easing.sample(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn out_back_overshoots_past_one() {
        let peak = (0..100)
            .map(|i| Easing::OutBack.sample(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn in_back_dips_below_zero() {
        let dip = (0..100)
            .map(|i| Easing::InBack.sample(i as f32 / 100.0))
            .fold(f32::MAX, f32::min);
        assert!(dip < 0.0);
    }
}
