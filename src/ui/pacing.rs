use chrono::{DateTime, Local};
use std::time::{Duration, Instant};
use tracing::info;

use crate::controller::FrameOutput;

/// Fixed-rate tick source driven by the egui repaint loop.
///
/// egui repaints whenever input arrives, so ticks are gated here instead of
/// relying on the repaint rate.
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    last_tick: Option<Instant>,
}

impl TickClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
        }
    }

    // True at most once per interval. Missed ticks are dropped, not replayed.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last_tick {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_tick = Some(now);
                true
            }
        }
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        match self.last_tick {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

// Periodic tick statistics for the log
#[derive(Debug)]
pub struct FrameStats {
    ticks: u64,
    motions: u64,
    shakes: u64,
    last_report: DateTime<Local>,
    report_interval: chrono::Duration,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            ticks: 0,
            motions: 0,
            shakes: 0,
            last_report: Local::now(),
            report_interval: chrono::Duration::seconds(30),
        }
    }
}

impl FrameStats {
    pub fn record(&mut self, output: &FrameOutput) {
        self.ticks += 1;
        if output.motion.is_some() {
            self.motions += 1;
        }
        if output.shake.is_some() {
            self.shakes += 1;
        }

        let now = Local::now();
        if now - self.last_report > self.report_interval {
            let elapsed_seconds = (now - self.last_report).num_seconds().max(1);
            info!(
                "Frame stats: {} ticks, {} motion events, {} shakes in {} seconds ({:.1} ticks/sec)",
                self.ticks,
                self.motions,
                self.shakes,
                elapsed_seconds,
                self.ticks as f64 / elapsed_seconds as f64
            );
            self.ticks = 0;
            self.motions = 0;
            self.shakes = 0;
            self.last_report = now;
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Device, MotionEvent, ShakeEvent, Vector2};

    #[test]
    fn clock_ticks_once_per_interval() {
        let start = Instant::now();
        let mut clock = TickClock::new(Duration::from_millis(33));

        assert!(clock.due(start));
        assert!(!clock.due(start + Duration::from_millis(10)));
        assert_eq!(
            clock.until_next(start + Duration::from_millis(10)),
            Duration::from_millis(23)
        );
        assert!(clock.due(start + Duration::from_millis(33)));
        assert!(!clock.due(start + Duration::from_millis(40)));
    }

    #[test]
    fn late_ticks_are_not_replayed() {
        let start = Instant::now();
        let mut clock = TickClock::new(Duration::from_millis(33));
        assert!(clock.due(start));
        assert!(clock.due(start + Duration::from_millis(500)));
        assert!(!clock.due(start + Duration::from_millis(510)));
    }

    #[test]
    fn stats_count_ticks() {
        let mut stats = FrameStats::default();
        stats.record(&FrameOutput::default());
        stats.record(&FrameOutput {
            motion: Some(MotionEvent {
                old_position: Vector2::ZERO,
                new_position: Vector2::new(1.0, 0.0),
            }),
            shake: Some(ShakeEvent {
                device: Device::Pointer,
            }),
        });
        assert_eq!(stats.ticks(), 2);
        assert_eq!(stats.motions, 1);
        assert_eq!(stats.shakes, 1);
    }
}
