use std::collections::HashSet;

use bevy::math::Vec2;
use bevy::time::{Timer, TimerMode};
use bits_helpers::WINDOW_WIDTH;
use core::time::Duration;

use crate::config;
use crate::error::{PlaygroundError, Result};
use crate::haptics::HapticSink;
use crate::pool::{BodyId, EmojiBody, EmojiPool};

/// Whether the surface edges act as walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum BoundaryMode {
    #[default]
    Bounded,
    Unbounded,
}

/// Material shared by every body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMaterial {
    pub elasticity: f32,
    pub density: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self {
            elasticity: config::ELASTICITY,
            density: config::DENSITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub body_size: f32,
    pub size: Vec2,
}

impl Surface {
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.size / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum WorldState {
    #[default]
    Unconfigured,
    Configured(Surface),
}

/// Membership of bodies in the gravity, collision and item behaviors.
///
/// A body is attached to all three or to none.
#[derive(Debug, Default)]
pub struct Behaviors {
    gravity: HashSet<BodyId>,
    collision: HashSet<BodyId>,
    item: HashSet<BodyId>,
}

impl Behaviors {
    pub fn attach(&mut self, id: BodyId) {
        self.gravity.insert(id);
        self.collision.insert(id);
        self.item.insert(id);
    }

    pub fn detach_all(&mut self, ids: impl IntoIterator<Item = BodyId>) {
        for id in ids {
            self.gravity.remove(&id);
            self.collision.remove(&id);
            self.item.remove(&id);
        }
    }

    /// Number of behaviors (0 to 3) the body is attached to.
    #[must_use]
    pub fn attachments(&self, id: BodyId) -> usize {
        [&self.gravity, &self.collision, &self.item]
            .iter()
            .filter(|set| set.contains(&id))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gravity.is_empty() && self.collision.is_empty() && self.item.is_empty()
    }
}

/// Changes the physics engine has to mirror. Positions and directions are in
/// surface coordinates (y down).
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsCommand {
    Spawn {
        id: BodyId,
        glyph: &'static str,
        position: Vec2,
        size: f32,
        material: BodyMaterial,
        /// Position in the pool's draw order. Restarts at 0 after every clear.
        layer: usize,
    },
    /// One-shot push, in push units.
    Push { id: BodyId, impulse: Vec2 },
    Despawn(Vec<BodyId>),
    SetGravity(Vec2),
    SetBoundary { mode: BoundaryMode, surface: Vec2 },
}

/// Engine-agnostic view of the simulation: which bodies exist, how they are
/// configured, and what the engine must do next.
#[derive(Debug)]
pub struct PhysicsWorld {
    state: WorldState,
    gravity: Vec2,
    boundary: BoundaryMode,
    material: BodyMaterial,
    behaviors: Behaviors,
    pool: EmojiPool,
    next_body_id: u64,
    pending_cleanup: Option<Timer>,
    commands: Vec<PhysicsCommand>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self {
            state: WorldState::Unconfigured,
            gravity: Vec2::new(0.0, 1.0),
            boundary: BoundaryMode::Bounded,
            material: BodyMaterial::default(),
            behaviors: Behaviors::default(),
            pool: EmojiPool::default(),
            next_body_id: 0,
            pending_cleanup: None,
            commands: Vec::new(),
        }
    }
}

impl PhysicsWorld {
    /// Sets the size of every future body. Must be called before spawning.
    pub fn configure(&mut self, body_size: f32, surface_height: f32) {
        let width = match self.state {
            WorldState::Configured(surface) => surface.size.x,
            WorldState::Unconfigured => WINDOW_WIDTH,
        };
        let surface = Surface {
            body_size,
            size: Vec2::new(width, surface_height),
        };
        self.state = WorldState::Configured(surface);
        tracing::info!(body_size, surface_height, "physics world configured");

        self.commands.push(PhysicsCommand::SetGravity(self.gravity));
        self.commands.push(PhysicsCommand::SetBoundary {
            mode: self.boundary,
            surface: surface.size,
        });
    }

    pub fn resize(&mut self, size: Vec2) -> Result<()> {
        let WorldState::Configured(surface) = &mut self.state else {
            return Err(PlaygroundError::InvalidState(
                "surface resized before the world was configured",
            ));
        };
        surface.size = size;
        self.commands.push(PhysicsCommand::SetBoundary {
            mode: self.boundary,
            surface: size,
        });
        Ok(())
    }

    /// Takes a device tilt sample. Sensor y points up while surface y points
    /// down, so y is inverted.
    pub fn set_gravity_direction(&mut self, x: f32, y: f32) {
        let gravity = Vec2::new(x, -y);
        if gravity == self.gravity {
            return;
        }
        self.gravity = gravity;
        self.commands.push(PhysicsCommand::SetGravity(gravity));
    }

    pub fn spawn(&mut self, glyph: &'static str, position: Vec2) -> Result<BodyId> {
        let surface = self.surface()?;
        let id = BodyId(self.next_body_id);
        self.next_body_id += 1;

        let layer = self.pool.len();
        self.behaviors.attach(id);
        self.pool.add(EmojiBody {
            id,
            glyph,
            position,
            size: surface.body_size,
        });
        self.commands.push(PhysicsCommand::Spawn {
            id,
            glyph,
            position,
            size: surface.body_size,
            material: self.material,
            layer,
        });
        tracing::trace!(?id, glyph, %position, "spawned body");
        Ok(id)
    }

    /// Pushes every live body away from the surface center, lets them leave
    /// the surface, and schedules their removal. Returns the number of bodies
    /// pushed.
    pub fn explode_and_clear(&mut self, haptics: &mut dyn HapticSink) -> usize {
        self.explode_and_clear_after(config::EXPLOSION_CLEANUP_DELAY, haptics)
    }

    pub fn explode_and_clear_after(
        &mut self,
        delay: Duration,
        haptics: &mut dyn HapticSink,
    ) -> usize {
        let center = self
            .surface()
            .map_or(Vec2::ZERO, |surface| surface.center());

        self.set_boundary(BoundaryMode::Unbounded);

        for body in &self.pool {
            let offset = body.position - center;
            let angle = offset.y.atan2(offset.x);
            self.commands.push(PhysicsCommand::Push {
                id: body.id,
                impulse: Vec2::from_angle(angle) * config::EXPLOSION_MAGNITUDE,
            });
            haptics.pulse(config::EXPLOSION_HAPTIC);
        }

        if self.pending_cleanup.is_some() {
            tracing::debug!("explosion cleanup rescheduled");
        }
        self.pending_cleanup = Some(Timer::new(delay, TimerMode::Once));

        let exploded = self.pool.len();
        tracing::info!(exploded, "exploding emojis");
        exploded
    }

    /// Moves simulated time forward. Returns how many bodies a due cleanup removed.
    pub fn advance(&mut self, delta: Duration) -> usize {
        let Some(timer) = &mut self.pending_cleanup else {
            return 0;
        };
        if !timer.tick(delta).finished() {
            return 0;
        }

        self.pending_cleanup = None;
        let removed = self.clear();
        self.set_boundary(BoundaryMode::Bounded);
        removed
    }

    /// Reports that two bodies, or a body and a wall, started touching.
    /// Contacts before configuration come from nothing the world owns.
    pub fn report_contact(&self, haptics: &mut dyn HapticSink) -> bool {
        if !self.is_configured() {
            return false;
        }
        haptics.pulse(config::CONTACT_HAPTIC);
        true
    }

    /// Records where the engine currently has the body.
    pub fn update_position(&mut self, id: BodyId, position: Vec2) -> bool {
        let Some(body) = self.pool.get_mut(id) else {
            return false;
        };
        body.position = position;
        true
    }

    /// Cancels a pending cleanup and removes every body right away.
    pub fn teardown(&mut self) {
        if self.pending_cleanup.take().is_some() {
            tracing::debug!("pending explosion cleanup cancelled");
        }
        self.clear();
        self.set_boundary(BoundaryMode::Bounded);
    }

    fn clear(&mut self) -> usize {
        let removed = self.pool.remove_all(&mut self.behaviors);
        if removed.is_empty() {
            return 0;
        }
        self.commands.push(PhysicsCommand::Despawn(
            removed.iter().map(|body| body.id).collect(),
        ));
        removed.len()
    }

    fn set_boundary(&mut self, mode: BoundaryMode) {
        if self.boundary == mode {
            return;
        }
        self.boundary = mode;
        if let WorldState::Configured(surface) = self.state {
            self.commands.push(PhysicsCommand::SetBoundary {
                mode,
                surface: surface.size,
            });
        }
    }

    pub fn surface(&self) -> Result<Surface> {
        match self.state {
            WorldState::Configured(surface) => Ok(surface),
            WorldState::Unconfigured => Err(PlaygroundError::InvalidState(
                "the world must be configured before spawning",
            )),
        }
    }

    pub fn drain_commands(&mut self) -> Vec<PhysicsCommand> {
        core::mem::take(&mut self.commands)
    }

    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self.state, WorldState::Configured(_))
    }

    #[must_use]
    pub const fn gravity(&self) -> Vec2 {
        self.gravity
    }

    #[must_use]
    pub const fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    #[must_use]
    pub const fn behaviors(&self) -> &Behaviors {
        &self.behaviors
    }

    #[must_use]
    pub const fn pool(&self) -> &EmojiPool {
        &self.pool
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub const fn has_pending_cleanup(&self) -> bool {
        self.pending_cleanup.is_some()
    }
}
