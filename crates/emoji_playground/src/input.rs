use bevy::prelude::*;
use bits_helpers::input::{PointerSample, pointer_sample};

use crate::PlaygroundSet;
use crate::bridge::InputBridge;
use crate::gesture::{GestureEvent, GestureRecognizer};
use crate::playground::Playground;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GestureRecognizer>()
            .add_event::<GestureEvent>()
            .add_systems(
                Update,
                (recognize_gestures, dispatch_gestures, handle_shake)
                    .chain()
                    .in_set(PlaygroundSet::Input),
            );
    }
}

fn recognize_gestures(
    time: Res<Time>,
    buttons: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    mut recognizer: ResMut<GestureRecognizer>,
    mut gestures: EventWriter<GestureEvent>,
) {
    let now = time.elapsed();
    let events = match pointer_sample(&buttons, &touch_input, &windows) {
        Some(PointerSample::Pressed(position)) => {
            recognizer.press(position, now);
            Vec::new()
        }
        Some(PointerSample::Clicked(position)) => {
            recognizer.press(position, now);
            recognizer.release(position, now)
        }
        Some(PointerSample::Held(position)) => recognizer.update(position, now),
        Some(PointerSample::Released(position)) => recognizer.release(position, now),
        // With nothing down, a pointer still tracked lost its release.
        Some(PointerSample::Cancelled) | None if recognizer.is_tracking() => recognizer.cancel(),
        Some(PointerSample::Cancelled) | None => return,
    };
    gestures.send_batch(events);
}

fn dispatch_gestures(
    time: Res<Time>,
    mut gestures: EventReader<GestureEvent>,
    mut playground: ResMut<Playground>,
) {
    for &gesture in gestures.read() {
        if let Err(err) = playground.dispatch(gesture, time.elapsed()) {
            error!("Could not handle {gesture:?}: {err}");
        }
    }
}

/// Space stands in for shaking the device.
fn handle_shake(keys: Res<ButtonInput<KeyCode>>, mut playground: ResMut<Playground>) {
    if keys.just_pressed(KeyCode::Space) {
        playground.on_shake();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GesturePhase;
    use crate::haptics::testing::RecordingHaptics;

    fn playground() -> Playground {
        let mut playground = Playground::new(RecordingHaptics::default()).with_seed(5);
        playground.configure_view(40.0, 640.0);
        playground
    }

    fn app() -> App {
        let mut app = App::new();
        app.insert_resource(playground())
            .init_resource::<Time>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_event::<GestureEvent>()
            .add_systems(Update, (dispatch_gestures, handle_shake).chain());
        app
    }

    /// Runs the whole pointer path: mouse buttons, recognition and dispatch.
    fn pointer_app() -> App {
        let mut app = App::new();
        app.insert_resource(playground())
            .init_resource::<Time>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Touches>()
            .init_resource::<GestureRecognizer>()
            .add_event::<GestureEvent>()
            .add_systems(Update, (recognize_gestures, dispatch_gestures).chain());

        let mut window = Window::default();
        window.set_cursor_position(Some(Vec2::new(20.0, 20.0)));
        app.world_mut().spawn(window);
        app
    }

    fn click_within_one_frame(app: &mut App) {
        let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        buttons.clear();
        buttons.press(MouseButton::Left);
        buttons.release(MouseButton::Left);
        app.update();
    }

    #[test]
    fn recognized_gestures_reach_the_playground() {
        let mut app = app();
        app.world_mut().send_event(GestureEvent::Tap {
            position: Vec2::new(20.0, 20.0),
        });
        app.world_mut().send_event(GestureEvent::LongPress {
            phase: GesturePhase::Began,
            position: Vec2::new(30.0, 30.0),
        });
        app.update();

        let playground = app.world().resource::<Playground>();
        assert_eq!(playground.world().live_count(), 1);
        assert!(playground.generation().is_active());
    }

    #[test]
    fn space_shakes_the_emojis() {
        let mut app = app();
        app.world_mut().send_event(GestureEvent::Tap {
            position: Vec2::new(20.0, 20.0),
        });
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Space);
        app.update();

        let playground = app.world().resource::<Playground>();
        assert!(playground.world().has_pending_cleanup());
        assert_eq!(playground.world().live_count(), 1);
    }

    #[test]
    fn click_within_one_frame_taps() {
        let mut app = pointer_app();
        click_within_one_frame(&mut app);

        assert!(!app.world().resource::<GestureRecognizer>().is_tracking());
        assert_eq!(
            app.world().resource::<Playground>().world().live_count(),
            1
        );

        // The next quick click is a tap too, not a long press left over from the first.
        click_within_one_frame(&mut app);
        let playground = app.world().resource::<Playground>();
        assert_eq!(playground.world().live_count(), 2);
        assert!(!playground.generation().is_active());
    }

    #[test]
    fn lost_release_drops_the_tracked_pointer() {
        let mut app = pointer_app();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        assert!(app.world().resource::<GestureRecognizer>().is_tracking());

        // The button is up without a release ever being seen.
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .reset_all();
        app.update();

        assert!(!app.world().resource::<GestureRecognizer>().is_tracking());
        assert_eq!(
            app.world().resource::<Playground>().world().live_count(),
            0
        );
    }
}
