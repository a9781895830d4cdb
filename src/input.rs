//! Player input systems.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`intent_clear_system`] — resets `PlayerIntent` to zero.
//! 2. [`keyboard_to_intent_system`] — translates WASD/arrow keys and the
//!    dash key into `PlayerIntent` fields.
//! 3. [`mouse_to_intent_system`] — converts a held left mouse button into
//!    a world-space fire direction via the 2D camera.
//!
//! The **input abstraction layer** (`PlayerIntent`) makes movement and
//! firing fully testable: tests populate the resource directly and run
//! only the consuming systems.

use crate::player::Player;
use bevy::prelude::*;

/// Per-frame snapshot of what the player is asking for.
///
/// Cleared at the start of every frame; written by the device-specific
/// input systems; consumed by the movement and fire systems.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerIntent {
    /// Requested movement axes, each component in [-1, 1]; normalized
    /// before use so diagonals are not faster.
    pub move_axes: Vec2,
    /// World-space direction to fire in, when the fire button is held.
    pub fire: Option<Vec2>,
    /// Dash requested this frame.
    pub dash: bool,
}

// ── Step 1: Clear ─────────────────────────────────────────────────────────────

/// Reset [`PlayerIntent`] to zero.  Must run before any system that
/// writes to the intent.
pub fn intent_clear_system(mut intent: ResMut<PlayerIntent>) {
    *intent = PlayerIntent::default();
}

// ── Step 2a: Keyboard → Intent ────────────────────────────────────────────────

/// Translate WASD / arrow keys into [`PlayerIntent::move_axes`] and the
/// Space key into [`PlayerIntent::dash`].
pub fn keyboard_to_intent_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut intent: ResMut<PlayerIntent>,
) {
    let mut axes = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        axes.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        axes.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        axes.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        axes.x += 1.0;
    }
    intent.move_axes = axes;

    if keys.just_pressed(KeyCode::Space) {
        intent.dash = true;
    }
}

// ── Step 2b: Mouse → Intent ───────────────────────────────────────────────────

/// While the left mouse button is held, set [`PlayerIntent::fire`] to the
/// world-space direction from the player toward the cursor.
///
/// Uses `Camera::viewport_to_world_2d` for the screen→world conversion, so
/// aiming stays correct regardless of window size.  Does nothing when the
/// cursor is outside the window or the player is absent.
pub fn mouse_to_intent_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    player_q: Query<&Transform, With<Player>>,
    mut intent: ResMut<PlayerIntent>,
) {
    if !buttons.pressed(MouseButton::Left) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_q.single() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };
    let Ok(player_transform) = player_q.single() else {
        return;
    };

    let direction = world_pos - player_transform.translation.truncate();
    if direction.length_squared() > 1e-4 {
        intent.fire = Some(direction);
    }
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(PlayerIntent::default()).add_systems(
            Update,
            (
                intent_clear_system,
                keyboard_to_intent_system,
                mouse_to_intent_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_all_fields() {
        let mut app = App::new();
        app.insert_resource(PlayerIntent {
            move_axes: Vec2::new(1.0, -1.0),
            fire: Some(Vec2::X),
            dash: true,
        });
        app.add_systems(Update, intent_clear_system);
        app.update();

        let intent = app.world().resource::<PlayerIntent>();
        assert_eq!(intent.move_axes, Vec2::ZERO);
        assert!(intent.fire.is_none());
        assert!(!intent.dash);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut app = App::new();
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::KeyS);
        app.insert_resource(keys);
        app.insert_resource(PlayerIntent::default());
        app.add_systems(Update, keyboard_to_intent_system);
        app.update();

        let intent = app.world().resource::<PlayerIntent>();
        assert_eq!(intent.move_axes, Vec2::ZERO);
    }

    #[test]
    fn dash_requires_a_fresh_press() {
        let mut app = App::new();
        let mut keys = ButtonInput::<KeyCode>::default();
        keys.press(KeyCode::Space);
        app.insert_resource(keys);
        app.insert_resource(PlayerIntent::default());
        app.add_systems(Update, keyboard_to_intent_system);
        app.update();
        assert!(app.world().resource::<PlayerIntent>().dash);

        // Holding the key across frames does not re-trigger.
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear_just_pressed(KeyCode::Space);
        app.insert_resource(PlayerIntent::default());
        app.update();
        assert!(!app.world().resource::<PlayerIntent>().dash);
    }
}
