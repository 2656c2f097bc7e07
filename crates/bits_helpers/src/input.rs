use bevy::prelude::*;

/// What the primary pointer (left mouse button or first touch) did this frame.
///
/// Positions are window coordinates: origin at the top-left corner, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSample {
    Pressed(Vec2),
    /// Pressed and released within the same frame.
    Clicked(Vec2),
    Held(Vec2),
    Released(Vec2),
    /// The pointer went away without a clean release (touch cancelled, cursor left the window).
    Cancelled,
}

pub fn pointer_sample(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<PointerSample> {
    if let Some(sample) = touch_sample(touch_input) {
        return Some(sample);
    }

    let cursor_position = windows
        .get_single()
        .ok()
        .and_then(Window::cursor_position);

    let just_pressed = button_input.just_pressed(MouseButton::Left);
    let just_released = button_input.just_released(MouseButton::Left);

    if just_pressed && just_released {
        cursor_position.map(PointerSample::Clicked)
    } else if just_pressed {
        cursor_position.map(PointerSample::Pressed)
    } else if just_released {
        Some(cursor_position.map_or(PointerSample::Cancelled, PointerSample::Released))
    } else if button_input.pressed(MouseButton::Left) {
        Some(cursor_position.map_or(PointerSample::Cancelled, PointerSample::Held))
    } else {
        None
    }
}

fn touch_sample(touch_input: &Res<Touches>) -> Option<PointerSample> {
    if let Some(touch) = touch_input.iter_just_pressed().next() {
        let id = touch.id();
        let sample = if touch_input.just_canceled(id) {
            PointerSample::Cancelled
        } else if let Some(released) = touch_input.get_released(id) {
            PointerSample::Clicked(released.position())
        } else {
            PointerSample::Pressed(touch.position())
        };
        Some(sample)
    } else if let Some(touch) = touch_input.iter_just_released().next() {
        Some(PointerSample::Released(touch.position()))
    } else if touch_input.iter_just_canceled().next().is_some() {
        Some(PointerSample::Cancelled)
    } else {
        touch_input
            .iter()
            .next()
            .map(|touch| PointerSample::Held(touch.position()))
    }
}

/// Converts a window position into world space for a default `Camera2d` centered on the origin.
#[must_use]
pub fn screen_to_world(screen_position: Vec2, window_size: Vec2) -> Vec2 {
    Vec2::new(
        screen_position.x - window_size.x / 2.0,
        window_size.y / 2.0 - screen_position.y,
    )
}

/// Inverse of [`screen_to_world`].
#[must_use]
pub fn world_to_screen(world_position: Vec2, window_size: Vec2) -> Vec2 {
    Vec2::new(
        world_position.x + window_size.x / 2.0,
        window_size.y / 2.0 - world_position.y,
    )
}

/// Flips a screen-space direction (y down) into world space (y up).
#[must_use]
pub const fn screen_direction_to_world(direction: Vec2) -> Vec2 {
    Vec2::new(direction.x, -direction.y)
}
