use bevy::math::Vec2;
use core::time::Duration;

use crate::config;
use crate::error::Result;
use crate::gesture::{GestureEvent, GesturePhase};
use crate::playground::Playground;

/// Throttles spawning while dragging.
#[derive(Debug, Clone, Copy)]
pub struct DragCooldown {
    min_interval: Duration,
    last_spawn: Option<Duration>,
}

impl Default for DragCooldown {
    fn default() -> Self {
        Self::new(config::DRAG_COOLDOWN)
    }
}

impl DragCooldown {
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_spawn: None,
        }
    }

    #[must_use]
    pub fn is_ready(&self, now: Duration) -> bool {
        self.last_spawn
            .is_none_or(|last| now.saturating_sub(last) >= self.min_interval)
    }

    pub const fn record(&mut self, now: Duration) {
        self.last_spawn = Some(now);
    }
}

/// Input signals the presentation layer forwards into the simulation.
pub trait InputBridge {
    fn on_tap(&mut self, position: Vec2) -> Result<()>;
    fn on_long_press(&mut self, phase: GesturePhase, position: Vec2) -> Result<()>;
    /// `now` is the time of the sample, used for the drag cooldown.
    fn on_pan(&mut self, phase: GesturePhase, position: Vec2, now: Duration) -> Result<()>;
    fn on_shake(&mut self);
    fn on_tilt_sample(&mut self, x: f32, y: f32);
    fn on_collision(&mut self);

    fn dispatch(&mut self, gesture: GestureEvent, now: Duration) -> Result<()> {
        match gesture {
            GestureEvent::Tap { position } => self.on_tap(position),
            GestureEvent::LongPress { phase, position } => self.on_long_press(phase, position),
            GestureEvent::Pan { phase, position } => self.on_pan(phase, position, now),
        }
    }
}

impl InputBridge for Playground {
    fn on_tap(&mut self, position: Vec2) -> Result<()> {
        self.create_emoji(position).map(|_| ())
    }

    fn on_long_press(&mut self, phase: GesturePhase, position: Vec2) -> Result<()> {
        match phase {
            GesturePhase::Began => self.start_continuous_emoji_generation(position),
            phase if phase.is_finished() => {
                self.stop_continuous_emoji_generation();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn on_pan(&mut self, phase: GesturePhase, position: Vec2, now: Duration) -> Result<()> {
        // Dragging takes over from a held long press.
        self.stop_continuous_emoji_generation();

        if phase.is_finished() || !self.drag_cooldown.is_ready(now) {
            return Ok(());
        }
        self.create_emoji(position)?;
        self.haptics.pulse(config::SPAWN_HAPTIC);
        self.drag_cooldown.record(now);
        Ok(())
    }

    fn on_shake(&mut self) {
        self.shake_emojis();
    }

    fn on_tilt_sample(&mut self, x: f32, y: f32) {
        self.update_gravity(x, y);
    }

    fn on_collision(&mut self) {
        self.world.report_contact(self.haptics.as_mut());
    }
}
