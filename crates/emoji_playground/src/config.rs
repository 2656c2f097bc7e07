//! Tuning constants for the playground.

use core::time::Duration;

/// Glyph size in logical pixels, used for both the text and the collider.
pub const EMOJI_SIZE: f32 = 40.0;

pub const ELASTICITY: f32 = 0.7;
pub const DENSITY: f32 = 1.5;

/// Minimum time between two spawns while dragging.
pub const DRAG_COOLDOWN: Duration = Duration::from_millis(100);
/// Spawn period while a long press is held.
pub const GENERATION_INTERVAL: Duration = Duration::from_millis(200);
/// How long exploded bodies stay around before they are removed.
pub const EXPLOSION_CLEANUP_DELAY: Duration = Duration::from_secs(1);

/// Push applied to every body by a shake, in push units.
pub const EXPLOSION_MAGNITUDE: f32 = 5.0;

pub const SPAWN_HAPTIC: f32 = 1.0;
pub const EXPLOSION_HAPTIC: f32 = 1.0;
pub const CONTACT_HAPTIC: f32 = 0.5;

// Gesture recognition
pub const LONG_PRESS_MIN_DURATION: Duration = Duration::from_millis(300);
pub const MOVEMENT_SLOP: f32 = 10.0;

// Motion sampling (100 Hz)
pub const TILT_SAMPLE_INTERVAL: Duration = Duration::from_millis(10);
/// Tilt added per second while an arrow key is held.
pub const KEYBOARD_TILT_RATE: f32 = 2.0;

// Engine scales
pub const PIXELS_PER_METER: f32 = 100.0;
/// Acceleration for a unit gravity vector, in px/s².
pub const GRAVITY_SCALE: f32 = 1000.0;
/// Velocity change for one push unit, in px/s.
pub const PUSH_SPEED_PER_UNIT: f32 = 100.0;
/// Depth between two consecutive bodies, so newer ones draw on top.
pub const DEPTH_STEP: f32 = 0.001;
/// Highest body depth, kept inside the 2D camera's far plane.
pub const MAX_DEPTH: f32 = 900.0;
/// Thickness of the walls built around the surface while it is bounded.
pub const WALL_THICKNESS: f32 = 20.0;
