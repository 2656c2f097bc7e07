/// Receives haptic pulses. Intensity is in `[0, 1]`.
pub trait HapticSink: Send + Sync {
    fn pulse(&mut self, intensity: f32);
}

/// Vibrates the device where the platform allows it, logs otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeviceHaptics;

#[cfg(target_arch = "wasm32")]
const MAX_PULSE_MILLIS: f32 = 20.0;

impl HapticSink for DeviceHaptics {
    fn pulse(&mut self, intensity: f32) {
        let intensity = intensity.clamp(0.0, 1.0);

        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let millis = (intensity * MAX_PULSE_MILLIS).round() as u32;
            if !window.navigator().vibrate_with_duration(millis) {
                tracing::trace!("vibration refused by the browser");
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        tracing::debug!(intensity, "haptic pulse");
    }
}
