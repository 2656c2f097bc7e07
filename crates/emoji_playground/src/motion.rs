//! Device tilt sampling.
//!
//! Samples are produced off the main schedule and handed over through a
//! mailbox that only keeps the latest one; the main schedule drains it once
//! per frame and feeds the playground.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use bevy::prelude::*;
use core::time::Duration;
use parking_lot::Mutex;

use crate::PlaygroundSet;
use crate::bridge::InputBridge;
use crate::config;
use crate::playground::Playground;

/// Latest tilt sample (device gravity, sensor axes: y up). Any thread may post.
#[derive(Resource, Debug, Clone, Default)]
pub struct TiltMailbox(Arc<Mutex<Option<Vec2>>>);

impl TiltMailbox {
    pub fn post(&self, sample: Vec2) {
        *self.0.lock() = Some(sample);
    }

    pub fn take(&self) -> Option<Vec2> {
        self.0.lock().take()
    }
}

/// Polls a tilt provider on a background thread until stopped or dropped.
#[derive(Resource, Debug)]
pub struct MotionSampler {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MotionSampler {
    pub fn start<P>(mailbox: TiltMailbox, interval: Duration, mut provider: P) -> std::io::Result<Self>
    where
        P: FnMut() -> Option<Vec2> + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let keep_running = Arc::clone(&running);
        let handle = std::thread::Builder::new()
            .name("motion-sampler".to_string())
            .spawn(move || {
                while keep_running.load(Ordering::Acquire) {
                    if let Some(sample) = provider() {
                        mailbox.post(sample);
                    }
                    std::thread::sleep(interval);
                }
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.join().is_err() {
            tracing::error!("motion sampler thread panicked");
        } else {
            tracing::debug!("motion sampling stopped");
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for MotionSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Tilt steered with the arrow keys on devices without an accelerometer.
/// Starts upright: gravity straight down the device.
#[derive(Resource, Debug, Clone)]
pub struct SimulatedTilt(Arc<Mutex<Vec2>>);

impl Default for SimulatedTilt {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(Vec2::new(0.0, -1.0))))
    }
}

impl SimulatedTilt {
    #[must_use]
    pub fn get(&self) -> Vec2 {
        *self.0.lock()
    }

    /// Nudges the tilt, keeping it within the unit circle.
    pub fn nudge(&self, delta: Vec2) -> Vec2 {
        let mut tilt = self.0.lock();
        *tilt = (*tilt + delta).clamp_length_max(1.0);
        *tilt
    }
}

pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TiltMailbox>()
            .init_resource::<SimulatedTilt>()
            .add_systems(
                Update,
                (steer_simulated_tilt, apply_tilt_samples)
                    .chain()
                    .in_set(PlaygroundSet::Input),
            )
            .add_systems(Last, stop_motion_sampling);

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(Startup, start_motion_sampling);

        // No threads on the web: the simulated tilt is posted from the main schedule.
        #[cfg(target_arch = "wasm32")]
        app.add_systems(
            Update,
            post_simulated_tilt
                .after(steer_simulated_tilt)
                .before(apply_tilt_samples),
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn start_motion_sampling(
    mut commands: Commands,
    mailbox: Res<TiltMailbox>,
    tilt: Res<SimulatedTilt>,
) {
    let tilt = tilt.clone();
    match MotionSampler::start(mailbox.clone(), config::TILT_SAMPLE_INTERVAL, move || {
        Some(tilt.get())
    }) {
        Ok(sampler) => {
            info!("Motion sampling started");
            commands.insert_resource(sampler);
        }
        Err(err) => error!("Could not start motion sampling: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn post_simulated_tilt(tilt: Res<SimulatedTilt>, mailbox: Res<TiltMailbox>) {
    mailbox.post(tilt.get());
}

fn steer_simulated_tilt(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    tilt: Res<SimulatedTilt>,
) {
    let mut direction = Vec2::ZERO;
    if keys.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }
    if keys.pressed(KeyCode::ArrowUp) {
        direction.y += 1.0;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }
    if direction == Vec2::ZERO {
        return;
    }
    tilt.nudge(direction * config::KEYBOARD_TILT_RATE * time.delta_secs());
}

fn apply_tilt_samples(mailbox: Res<TiltMailbox>, mut playground: ResMut<Playground>) {
    if let Some(sample) = mailbox.take() {
        playground.on_tilt_sample(sample.x, sample.y);
    }
}

fn stop_motion_sampling(mut exit: EventReader<AppExit>, sampler: Option<ResMut<MotionSampler>>) {
    if exit.read().next().is_none() {
        return;
    }
    if let Some(mut sampler) = sampler {
        sampler.stop();
    }
}
