use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::ui::ComputedNode;
use bevy::window::PrimaryWindow;

/// Per-frame pointer snapshot. Touch input wins; mouse is the desktop
/// fallback.
#[derive(Resource, Default)]
pub struct ScreenInput {
    /// Screen position of a tap that began this frame, if any.
    pub tap: Option<Vec2>,
    /// A pointer is held down this frame (active touch or mouse drag).
    pub drag_active: bool,
    /// Whether any pointer currently sits over an interactive UI node.
    pub pointer_over_ui: bool,
}

/// Runs before every consumer of [`ScreenInput`].
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputSet;

pub struct ScreenInputPlugin;

impl Plugin for ScreenInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScreenInput>()
            .add_systems(Update, read_screen_input.in_set(InputSet));
    }
}

pub fn read_screen_input(
    touches: Res<Touches>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_nodes: Query<(&ComputedNode, &GlobalTransform, &InheritedVisibility), With<Interaction>>,
    mut input: ResMut<ScreenInput>,
) {
    let cursor = windows.single().ok().and_then(|w| w.cursor_position());

    input.tap = touches
        .iter_just_pressed()
        .next()
        .map(|touch| touch.position())
        .or_else(|| {
            if mouse.just_pressed(MouseButton::Left) {
                cursor
            } else {
                None
            }
        });

    input.drag_active = touches.iter().next().is_some() || mouse.pressed(MouseButton::Left);

    // Any active touch over UI counts; the mouse is consulted only when no
    // touches exist.
    input.pointer_over_ui = if touches.iter().next().is_some() {
        touches
            .iter()
            .any(|touch| hit_test(touch.position(), &ui_nodes))
    } else {
        cursor.is_some_and(|p| hit_test(p, &ui_nodes))
    };
}

fn hit_test(
    point: Vec2,
    ui_nodes: &Query<(&ComputedNode, &GlobalTransform, &InheritedVisibility), With<Interaction>>,
) -> bool {
    ui_nodes.iter().any(|(node, transform, visibility)| {
        if !visibility.get() {
            return false;
        }
        let scale = node.inverse_scale_factor();
        let size = node.size() * scale;
        let center = transform.translation().truncate() * scale;
        Rect::from_center_size(center, size).contains(point)
    })
}
