use bevy::math::Vec2;
use bevy::time::{Timer, TimerMode};
use core::time::Duration;

use crate::config;

#[derive(Debug)]
struct GenerationSession {
    location: Vec2,
    timer: Timer,
}

/// Single-slot repeating spawn timer driven by a held long press.
#[derive(Debug, Default)]
pub struct ContinuousGeneration {
    session: Option<GenerationSession>,
}

impl ContinuousGeneration {
    pub fn start(&mut self, location: Vec2) {
        self.start_with_interval(location, config::GENERATION_INTERVAL);
    }

    /// Starts a session, replacing any running one.
    pub fn start_with_interval(&mut self, location: Vec2, interval: Duration) {
        if self.stop() {
            tracing::debug!("continuous generation restarted");
        }
        self.session = Some(GenerationSession {
            location,
            timer: Timer::new(interval, TimerMode::Repeating),
        });
    }

    /// Returns whether a session was running.
    pub fn stop(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Advances the running session. Returns its location and how many
    /// spawns came due.
    pub fn tick(&mut self, delta: Duration) -> Option<(Vec2, u32)> {
        let session = self.session.as_mut()?;
        let fired = session.timer.tick(delta).times_finished_this_tick();
        (fired > 0).then_some((session.location, fired))
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn location(&self) -> Option<Vec2> {
        self.session.as_ref().map(|session| session.location)
    }
}
