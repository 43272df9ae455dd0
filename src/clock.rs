//! Millisecond play clocks. Sessions never read time themselves; the host
//! samples a clock and passes `now` into every tick.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock: std::fmt::Debug {
    /// Milliseconds of play time since the clock was (re)started.
    fn now_ms(&self) -> i64;

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    /// Back to zero, running.
    fn restart(&mut self);
}

/// Wall clock that can be paused. Time spent paused is not play time.
#[derive(Debug, Clone)]
pub struct PlayClock {
    started: Instant,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl PlayClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    fn elapsed_at(&self, instant: Instant) -> Duration {
        let end = self.paused_at.unwrap_or(instant);
        end.saturating_duration_since(self.started)
            .saturating_sub(self.paused_total)
    }
}

impl Default for PlayClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for PlayClock {
    fn now_ms(&self) -> i64 {
        self.elapsed_at(Instant::now()).as_millis() as i64
    }

    fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += at.elapsed();
        }
    }

    fn restart(&mut self) {
        *self = Self::new();
    }
}

/// Hand-driven clock for tests and replays. Clones share the same time, so
/// a test can keep a handle after giving the clock away.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: i64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: i64) -> i64 {
        let next = self.now.get() + ms;
        self.now.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }

    fn restart(&mut self) {
        self.now.set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn manual_clock_set_and_advance() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_ms(), 100);
        assert_eq!(clock.advance(250), 350);
        clock.set(20);
        assert_eq!(clock.now_ms(), 20);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(0);
        let handle = clock.clone();
        let mut boxed: Box<dyn Clock> = Box::new(clock);
        handle.set(1234);
        assert_eq!(boxed.now_ms(), 1234);
        boxed.restart();
        assert_eq!(handle.now_ms(), 0);
    }

    #[test]
    fn manual_clock_restart() {
        let mut clock = ManualClock::new(5000);
        clock.pause();
        assert_eq!(clock.now_ms(), 5000);
        clock.restart();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn play_clock_advances() {
        let clock = PlayClock::new();
        sleep(Duration::from_millis(20));
        assert!(clock.now_ms() >= 20);
    }

    #[test]
    fn play_clock_frozen_while_paused() {
        let mut clock = PlayClock::new();
        clock.pause();
        assert!(clock.is_paused());
        let frozen = clock.now_ms();
        sleep(Duration::from_millis(30));
        assert_eq!(clock.now_ms(), frozen);

        clock.resume();
        assert!(!clock.is_paused());
        // the paused stretch is excluded
        assert!(clock.now_ms() < frozen + 30);
    }

    #[test]
    fn play_clock_restart() {
        let mut clock = PlayClock::new();
        sleep(Duration::from_millis(20));
        clock.pause();
        clock.restart();
        assert!(!clock.is_paused());
        assert!(clock.now_ms() < 20);
    }
}
