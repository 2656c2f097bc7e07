use bevy::math::Vec2;
use bevy::prelude::Resource;
use core::time::Duration;

use crate::bridge::DragCooldown;
use crate::config;
use crate::error::Result;
use crate::generation::ContinuousGeneration;
use crate::haptics::HapticSink;
use crate::palette::Palette;
use crate::pool::BodyId;
use crate::world::{PhysicsCommand, PhysicsWorld};

/// Everything the presentation layer talks to: the world, the spawn palette,
/// the long-press generator and the haptics they report to.
#[derive(Resource)]
pub struct Playground {
    pub(crate) world: PhysicsWorld,
    pub(crate) palette: Palette,
    pub(crate) rng: fastrand::Rng,
    pub(crate) generation: ContinuousGeneration,
    pub(crate) drag_cooldown: DragCooldown,
    pub(crate) haptics: Box<dyn HapticSink>,
}

impl Playground {
    pub fn new(haptics: impl HapticSink + 'static) -> Self {
        Self {
            world: PhysicsWorld::default(),
            palette: Palette::default(),
            rng: fastrand::Rng::new(),
            generation: ContinuousGeneration::default(),
            drag_cooldown: DragCooldown::default(),
            haptics: Box::new(haptics),
        }
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn configure_view(&mut self, emoji_size: f32, view_height: f32) {
        self.world.configure(emoji_size, view_height);
    }

    pub fn resize_view(&mut self, size: Vec2) -> Result<()> {
        self.world.resize(size)
    }

    pub fn update_gravity(&mut self, x: f32, y: f32) {
        self.world.set_gravity_direction(x, y);
    }

    /// Spawns one emoji with a random glyph.
    pub fn create_emoji(&mut self, at: Vec2) -> Result<BodyId> {
        // Fail on configuration before consuming randomness.
        self.world.surface()?;
        let glyph = self.palette.pick(&mut self.rng)?;
        self.world.spawn(glyph, at)
    }

    /// Explodes every emoji; they are removed once the cleanup delay has passed.
    pub fn shake_emojis(&mut self) -> usize {
        self.world.explode_and_clear(self.haptics.as_mut())
    }

    pub fn start_continuous_emoji_generation(&mut self, at: Vec2) -> Result<()> {
        self.world.surface()?;
        self.generation.start(at);
        tracing::debug!(%at, "continuous generation started");
        Ok(())
    }

    pub fn stop_continuous_emoji_generation(&mut self) -> bool {
        let stopped = self.generation.stop();
        if stopped {
            tracing::debug!("continuous generation stopped");
        }
        stopped
    }

    /// Moves simulated time forward: runs a due explosion cleanup, then any
    /// spawns the long-press generator owes.
    pub fn advance(&mut self, delta: Duration) -> Result<()> {
        let removed = self.world.advance(delta);
        if removed > 0 {
            tracing::info!(removed, "exploded emojis cleared");
        }

        if let Some((location, fired)) = self.generation.tick(delta) {
            for _ in 0..fired {
                self.haptics.pulse(config::SPAWN_HAPTIC);
                self.create_emoji(location)?;
            }
        }
        Ok(())
    }

    /// Stops generation, cancels a pending cleanup and removes every emoji.
    pub fn teardown(&mut self) {
        self.generation.stop();
        self.world.teardown();
        tracing::info!("playground torn down");
    }

    pub fn drain_commands(&mut self) -> Vec<PhysicsCommand> {
        self.world.drain_commands()
    }

    #[must_use]
    pub const fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub const fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    #[must_use]
    pub const fn generation(&self) -> &ContinuousGeneration {
        &self.generation
    }
}
