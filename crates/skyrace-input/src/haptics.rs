//! Fire-and-forget haptic feedback boundary.
//!
//! The crash sequence requests one rumble burst with a fixed intensity
//! and duration; nothing waits on the result, and a missing device is a
//! silent no-op.

/// Receiver for rumble requests.
pub trait RumbleSink {
    /// Request a rumble at `intensity` in `[0, 1]` for `seconds`.
    fn rumble(&mut self, intensity: f32, seconds: f32);

    /// Cut any rumble that is still playing.
    fn stop(&mut self) {}
}

/// Discards every request. Stands in when no haptics device is bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRumble;

impl RumbleSink for NullRumble {
    fn rumble(&mut self, _intensity: f32, _seconds: f32) {}
}

/// Logs requests instead of shaking hardware; used by the headless runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRumble;

impl RumbleSink for TracingRumble {
    fn rumble(&mut self, intensity: f32, seconds: f32) {
        tracing::info!("Rumble requested: intensity {intensity:.2} for {seconds:.1}s");
    }

    fn stop(&mut self) {
        tracing::debug!("Rumble stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        bursts: Vec<(f32, f32)>,
        stops: usize,
    }

    impl RumbleSink for Recorder {
        fn rumble(&mut self, intensity: f32, seconds: f32) {
            self.bursts.push((intensity, seconds));
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn test_requests_are_fire_and_forget() {
        let mut sink = Recorder::default();
        sink.rumble(1.0, 2.0);
        sink.stop();
        assert_eq!(sink.bursts, vec![(1.0, 2.0)]);
        assert_eq!(sink.stops, 1);
    }

    #[test]
    fn test_null_sink_ignores_everything() {
        let mut sink = NullRumble;
        sink.rumble(1.0, 2.0);
        sink.stop();
    }
}
