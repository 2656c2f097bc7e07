use std::collections::HashMap;

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_rapier2d::prelude::*;
use bits_helpers::input::{screen_direction_to_world, screen_to_world, world_to_screen};

use crate::PlaygroundSet;
use crate::bridge::InputBridge;
use crate::config;
use crate::playground::Playground;
use crate::pool::BodyId;
use crate::world::{BodyMaterial, BoundaryMode, PhysicsCommand};

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            config::PIXELS_PER_METER,
        ))
        .init_resource::<BodyEntities>()
        .add_systems(
            Update,
            (track_window_resize, sync_body_positions).in_set(PlaygroundSet::Sync),
        )
        .add_systems(Update, apply_physics_commands.in_set(PlaygroundSet::Apply))
        .add_systems(Update, report_contacts.in_set(PlaygroundSet::Contacts));
    }
}

/// Links a rapier body to its entry in the playground.
#[derive(Component, Debug, Clone, Copy)]
pub struct EmojiSprite(pub BodyId);

#[derive(Component)]
pub struct BoundaryWall;

#[derive(Resource, Default)]
pub struct BodyEntities(HashMap<BodyId, Entity>);

fn window_size(windows: &Query<&Window, With<PrimaryWindow>>) -> Option<Vec2> {
    windows.get_single().ok().map(Window::size)
}

fn track_window_resize(
    mut resized: EventReader<WindowResized>,
    mut playground: ResMut<Playground>,
) {
    let Some(event) = resized.read().last() else {
        return;
    };
    if let Err(err) = playground.resize_view(Vec2::new(event.width, event.height)) {
        error!("Could not resize the playground: {err}");
    }
}

/// Reports where rapier moved every body so explosions push from live positions.
fn sync_body_positions(
    windows: Query<&Window, With<PrimaryWindow>>,
    bodies: Query<(&EmojiSprite, &Transform)>,
    mut playground: ResMut<Playground>,
) {
    let Some(size) = window_size(&windows) else {
        return;
    };
    let world = playground.world_mut();
    for (sprite, transform) in &bodies {
        world.update_position(sprite.0, world_to_screen(transform.translation.truncate(), size));
    }
}

fn apply_physics_commands(
    mut commands: Commands,
    mut playground: ResMut<Playground>,
    mut entities: ResMut<BodyEntities>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut velocities: Query<&mut Velocity, With<EmojiSprite>>,
    walls: Query<Entity, With<BoundaryWall>>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    let Some(size) = window_size(&windows) else {
        return;
    };

    // Walls spawned this frame are not queryable yet, so only the last
    // boundary change of the frame is applied.
    let mut boundary = None;

    for command in playground.drain_commands() {
        match command {
            PhysicsCommand::Spawn {
                id,
                glyph,
                position,
                size: body_size,
                material,
                layer,
            } => {
                let position = screen_to_world(position, size);
                let depth = (layer as f32 * config::DEPTH_STEP).min(config::MAX_DEPTH);
                let entity = spawn_body(
                    &mut commands,
                    id,
                    glyph,
                    position.extend(depth),
                    body_size,
                    material,
                );
                entities.0.insert(id, entity);
            }
            PhysicsCommand::Push { id, impulse } => {
                let Some(&entity) = entities.0.get(&id) else {
                    debug!("Push for unknown body {id:?}");
                    continue;
                };
                let kick = screen_direction_to_world(impulse) * config::PUSH_SPEED_PER_UNIT;
                if let Ok(mut velocity) = velocities.get_mut(entity) {
                    velocity.linvel += kick;
                } else {
                    commands.entity(entity).insert(Velocity::linear(kick));
                }
            }
            PhysicsCommand::Despawn(ids) => {
                for id in ids {
                    if let Some(entity) = entities.0.remove(&id) {
                        commands.entity(entity).despawn_recursive();
                    }
                }
            }
            PhysicsCommand::SetGravity(direction) => {
                for mut rapier in &mut rapier_config {
                    rapier.gravity = screen_direction_to_world(direction) * config::GRAVITY_SCALE;
                }
            }
            PhysicsCommand::SetBoundary { mode, surface } => boundary = Some((mode, surface)),
        }
    }

    if let Some((mode, surface)) = boundary {
        for wall in &walls {
            commands.entity(wall).despawn();
        }
        if mode == BoundaryMode::Bounded {
            spawn_walls(&mut commands, surface);
        }
        debug!("Boundary is now {mode}");
    }
}

/// Spawns a glyph body at `translation` (world space, z is the draw depth).
///
/// The glyph is laid out with Bevy's default font, which has no emoji
/// coverage: every body renders as the missing-glyph box until an
/// emoji-capable font is set on `TextFont`. Collider and physics are unaffected.
fn spawn_body(
    commands: &mut Commands,
    id: BodyId,
    glyph: &'static str,
    translation: Vec3,
    size: f32,
    material: BodyMaterial,
) -> Entity {
    commands
        .spawn((
            Text2d::new(glyph),
            TextFont {
                font_size: size,
                ..default()
            },
            TextColor(Color::BLACK),
            Transform::from_translation(translation),
            RigidBody::Dynamic,
            Collider::cuboid(size / 2.0, size / 2.0),
            Restitution::coefficient(material.elasticity),
            ColliderMassProperties::Density(material.density),
            ActiveEvents::COLLISION_EVENTS,
            Velocity::zero(),
            EmojiSprite(id),
        ))
        .id()
}

/// Surrounds the surface with four fixed walls just outside its edges.
fn spawn_walls(commands: &mut Commands, surface: Vec2) {
    let half = surface / 2.0;
    let thickness = config::WALL_THICKNESS;
    let walls = [
        // top and bottom
        (
            Vec2::new(0.0, half.y + thickness / 2.0),
            Vec2::new(half.x + thickness, thickness / 2.0),
        ),
        (
            Vec2::new(0.0, -half.y - thickness / 2.0),
            Vec2::new(half.x + thickness, thickness / 2.0),
        ),
        // left and right
        (
            Vec2::new(-half.x - thickness / 2.0, 0.0),
            Vec2::new(thickness / 2.0, half.y + thickness),
        ),
        (
            Vec2::new(half.x + thickness / 2.0, 0.0),
            Vec2::new(thickness / 2.0, half.y + thickness),
        ),
    ];

    for (center, half_extents) in walls {
        commands.spawn((
            BoundaryWall,
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y),
            Transform::from_translation(center.extend(0.0)),
        ));
    }
}

fn report_contacts(mut collisions: EventReader<CollisionEvent>, mut playground: ResMut<Playground>) {
    for event in collisions.read() {
        if matches!(event, CollisionEvent::Started(..)) {
            playground.on_collision();
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::window::WindowResolution;
    use core::time::Duration;

    use super::*;
    use crate::haptics::testing::RecordingHaptics;

    const SURFACE: Vec2 = Vec2::new(400.0, 800.0);

    fn app() -> App {
        let mut playground = Playground::new(RecordingHaptics::default()).with_seed(9);
        playground.configure_view(40.0, SURFACE.y);
        playground.resize_view(SURFACE).unwrap();

        let mut app = App::new();
        app.insert_resource(playground)
            .init_resource::<BodyEntities>()
            .add_systems(Update, apply_physics_commands);
        app.world_mut().spawn((
            Window {
                resolution: WindowResolution::new(SURFACE.x, SURFACE.y),
                ..default()
            },
            PrimaryWindow,
        ));
        app.world_mut().spawn(RapierConfiguration::new(1.0));
        app
    }

    fn playground(app: &mut App) -> Mut<'_, Playground> {
        app.world_mut().resource_mut::<Playground>()
    }

    fn wall_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<BoundaryWall>>()
            .iter(app.world())
            .count()
    }

    fn gravity(app: &mut App) -> Vec2 {
        app.world_mut()
            .query::<&RapierConfiguration>()
            .single(app.world())
            .gravity
    }

    fn body_entity(app: &App, id: BodyId) -> Option<Entity> {
        app.world().resource::<BodyEntities>().0.get(&id).copied()
    }

    #[test]
    fn walls_follow_the_last_boundary_of_the_frame() {
        let mut app = app();
        // Configure and resize each announced a bounded boundary this frame.
        app.update();
        assert_eq!(wall_count(&mut app), 4);

        playground(&mut app).create_emoji(Vec2::new(10.0, 10.0)).unwrap();
        playground(&mut app).shake_emojis();
        app.update();
        assert_eq!(wall_count(&mut app), 0);

        playground(&mut app).advance(Duration::from_secs(1)).unwrap();
        app.update();
        assert_eq!(wall_count(&mut app), 4);
    }

    #[test]
    fn gravity_is_scaled_and_flipped_into_world_space() {
        let mut app = app();
        app.update();
        assert_eq!(gravity(&mut app), Vec2::new(0.0, -config::GRAVITY_SCALE));

        playground(&mut app).update_gravity(0.5, 0.25);
        app.update();
        assert_eq!(
            gravity(&mut app),
            Vec2::new(0.5, 0.25) * config::GRAVITY_SCALE
        );
    }

    #[test]
    fn pushes_add_scaled_velocity_pointing_up_in_world_space() {
        let mut app = app();
        // Straight above the surface center, so the push points up the screen.
        let id = playground(&mut app)
            .create_emoji(Vec2::new(200.0, 100.0))
            .unwrap();
        app.update();
        let entity = body_entity(&app, id).unwrap();

        playground(&mut app).shake_emojis();
        app.update();

        let velocity = app.world().get::<Velocity>(entity).unwrap().linvel;
        let expected = Vec2::new(0.0, config::EXPLOSION_MAGNITUDE * config::PUSH_SPEED_PER_UNIT);
        assert!((velocity - expected).length() < 1e-3);
    }

    #[test]
    fn despawned_bodies_leave_the_entity_map() {
        let mut app = app();
        let first = playground(&mut app).create_emoji(Vec2::new(50.0, 50.0)).unwrap();
        let second = playground(&mut app).create_emoji(Vec2::new(80.0, 50.0)).unwrap();
        app.update();
        let entity = body_entity(&app, first).unwrap();
        assert!(body_entity(&app, second).is_some());

        playground(&mut app).shake_emojis();
        playground(&mut app).advance(Duration::from_secs(1)).unwrap();
        app.update();

        assert!(app.world().resource::<BodyEntities>().0.is_empty());
        assert!(app.world().get::<EmojiSprite>(entity).is_none());
    }

    #[test]
    fn newer_bodies_draw_on_top() {
        let mut app = app();
        let older = playground(&mut app).create_emoji(Vec2::new(50.0, 50.0)).unwrap();
        let newer = playground(&mut app).create_emoji(Vec2::new(50.0, 50.0)).unwrap();
        app.update();

        let depth = |app: &App, id: BodyId| {
            body_entity(app, id)
                .and_then(|entity| app.world().get::<Transform>(entity))
                .map(|transform| transform.translation.z)
        };
        let (older, newer) = (depth(&app, older).unwrap(), depth(&app, newer).unwrap());
        assert!(newer > older);
        assert!(newer <= config::MAX_DEPTH);
    }
}
