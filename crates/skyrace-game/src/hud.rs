//! Text HUD readout.
//!
//! Formats the speed and altitude lines from rounded model readouts and
//! rate-limits them to one log line per second so the tick loop does not
//! flood the console.

/// Formatted `Speed: N` line.
#[must_use]
pub fn speed_line(speed: f32) -> String {
    format!("Speed: {}", speed.round() as i32)
}

/// Formatted `Altitude: N` line.
#[must_use]
pub fn altitude_line(altitude: f32) -> String {
    format!("Altitude: {}", altitude.round() as i32)
}

/// Fires once per `period` seconds of accumulated tick time.
#[derive(Debug, Clone)]
pub struct HudTicker {
    period: f32,
    accumulated: f32,
}

impl HudTicker {
    /// A ticker that fires every `period` seconds, starting with an
    /// immediate first fire.
    #[must_use]
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(0.0),
            accumulated: period,
        }
    }

    /// Accumulate `dt`; returns `true` when a HUD line is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.accumulated += dt;
        if self.accumulated >= self.period {
            self.accumulated = 0.0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readouts_round_to_whole_numbers() {
        assert_eq!(speed_line(29.6), "Speed: 30");
        assert_eq!(speed_line(-4.4), "Speed: -4");
        assert_eq!(altitude_line(174.5), "Altitude: 175");
        assert_eq!(altitude_line(0.0), "Altitude: 0");
    }

    #[test]
    fn test_ticker_fires_immediately_then_once_per_period() {
        let mut ticker = HudTicker::new(1.0);
        assert!(ticker.tick(0.02));

        let mut fires = 0;
        for _ in 0..110 {
            if ticker.tick(0.02) {
                fires += 1;
            }
        }
        // 2.2s of ticks after the immediate fire: two more.
        assert_eq!(fires, 2);
    }
}
