use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub mod bridge;
pub mod config;
pub mod error;
pub mod generation;
pub mod gesture;
pub mod haptics;
mod input;
pub mod motion;
pub mod palette;
mod physics;
pub mod playground;
pub mod pool;
pub mod world;

use haptics::DeviceHaptics;
use input::InputPlugin;
use motion::MotionPlugin;
use physics::PhysicsPlugin;
use playground::Playground;

/// Frame order: engine state flows into the playground, input mutates it,
/// time advances, the result is written back to the engine.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlaygroundSet {
    Sync,
    Input,
    Simulate,
    Apply,
    Contacts,
}

pub struct PlaygroundPlugin;

impl Plugin for PlaygroundPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Playground::new(DeviceHaptics))
            .configure_sets(
                Update,
                (
                    PlaygroundSet::Sync,
                    PlaygroundSet::Input,
                    PlaygroundSet::Simulate,
                    PlaygroundSet::Apply,
                    PlaygroundSet::Contacts,
                )
                    .chain(),
            )
            .add_plugins((PhysicsPlugin, InputPlugin, MotionPlugin))
            .add_systems(Startup, (setup_camera, configure_playground))
            .add_systems(Update, advance_playground.in_set(PlaygroundSet::Simulate))
            .add_systems(Last, teardown_on_exit);
    }
}

pub fn run() {
    bits_helpers::get_default_app(env!("CARGO_PKG_NAME"), Color::WHITE)
        .add_plugins(PlaygroundPlugin)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn configure_playground(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut playground: ResMut<Playground>,
) {
    let Ok(window) = windows.get_single() else {
        error!("No primary window to host the playground");
        return;
    };
    let size = window.size();
    playground.configure_view(config::EMOJI_SIZE, size.y);
    if let Err(err) = playground.resize_view(size) {
        error!("Could not size the playground: {err}");
    }
}

fn advance_playground(time: Res<Time>, mut playground: ResMut<Playground>) {
    if let Err(err) = playground.advance(time.delta()) {
        error!("Could not advance the playground: {err}");
    }
}

fn teardown_on_exit(mut exit: EventReader<AppExit>, mut playground: ResMut<Playground>) {
    if exit.read().next().is_some() {
        playground.teardown();
    }
}
