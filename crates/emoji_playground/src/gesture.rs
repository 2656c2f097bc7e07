//! Tap, long press and pan recognition over a single pointer.
//!
//! The three gestures recognize simultaneously: a long press that is already
//! running keeps running when the pointer starts panning, so a pan can take
//! over from it.

use bevy::math::Vec2;
use bevy::prelude::{Event, Resource};
use core::time::Duration;

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl GesturePhase {
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled | Self::Failed)
    }
}

/// Positions are in surface coordinates (y down).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Tap { position: Vec2 },
    LongPress { phase: GesturePhase, position: Vec2 },
    Pan { phase: GesturePhase, position: Vec2 },
}

#[derive(Debug, Clone, Copy)]
struct TrackedTouch {
    origin: Vec2,
    position: Vec2,
    pressed_at: Duration,
    long_press: LongPressState,
    panning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LongPressState {
    Possible,
    Recognized,
    Failed,
}

#[derive(Resource, Debug)]
pub struct GestureRecognizer {
    touch: Option<TrackedTouch>,
    long_press_duration: Duration,
    slop: f32,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(config::LONG_PRESS_MIN_DURATION, config::MOVEMENT_SLOP)
    }
}

impl GestureRecognizer {
    #[must_use]
    pub const fn new(long_press_duration: Duration, slop: f32) -> Self {
        Self {
            touch: None,
            long_press_duration,
            slop,
        }
    }

    /// Starts tracking a pointer. A press while one is already tracked is ignored.
    pub fn press(&mut self, position: Vec2, now: Duration) {
        if self.touch.is_some() {
            return;
        }
        self.touch = Some(TrackedTouch {
            origin: position,
            position,
            pressed_at: now,
            long_press: LongPressState::Possible,
            panning: false,
        });
    }

    /// Feeds the current position of a held pointer.
    pub fn update(&mut self, position: Vec2, now: Duration) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        let long_press_duration = self.long_press_duration;
        let slop = self.slop;
        let Some(touch) = self.touch.as_mut() else {
            return events;
        };

        let moved = position != touch.position;
        touch.position = position;

        if !touch.panning && position.distance(touch.origin) > slop {
            touch.panning = true;
            if touch.long_press == LongPressState::Possible {
                touch.long_press = LongPressState::Failed;
            }
            events.push(GestureEvent::Pan {
                phase: GesturePhase::Began,
                position,
            });
        } else if touch.panning && moved {
            events.push(GestureEvent::Pan {
                phase: GesturePhase::Changed,
                position,
            });
        }

        match touch.long_press {
            LongPressState::Possible if now.saturating_sub(touch.pressed_at) >= long_press_duration => {
                touch.long_press = LongPressState::Recognized;
                events.push(GestureEvent::LongPress {
                    phase: GesturePhase::Began,
                    position,
                });
            }
            LongPressState::Recognized if moved => events.push(GestureEvent::LongPress {
                phase: GesturePhase::Changed,
                position,
            }),
            _ => {}
        }

        events
    }

    /// Finishes the tracked pointer. Without a pan or long press this is a tap.
    pub fn release(&mut self, position: Vec2, now: Duration) -> Vec<GestureEvent> {
        let mut events = self.update(position, now);
        let Some(touch) = self.touch.take() else {
            return events;
        };

        if touch.panning {
            events.push(GestureEvent::Pan {
                phase: GesturePhase::Ended,
                position,
            });
        }
        if touch.long_press == LongPressState::Recognized {
            events.push(GestureEvent::LongPress {
                phase: GesturePhase::Ended,
                position,
            });
        }
        if !touch.panning && touch.long_press != LongPressState::Recognized {
            events.push(GestureEvent::Tap { position });
        }
        events
    }

    /// Drops the tracked pointer without a tap.
    pub fn cancel(&mut self) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        let Some(touch) = self.touch.take() else {
            return events;
        };

        if touch.panning {
            events.push(GestureEvent::Pan {
                phase: GesturePhase::Cancelled,
                position: touch.position,
            });
        }
        if touch.long_press == LongPressState::Recognized {
            events.push(GestureEvent::LongPress {
                phase: GesturePhase::Cancelled,
                position: touch.position,
            });
        }
        events
    }

    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.touch.is_some()
    }
}
