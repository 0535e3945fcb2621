//! Millisecond tick sources.
//!
//! Animations never read the time themselves; the frame driver samples a
//! [`Clock`] once per frame and passes the tick down through `update`.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond counter
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary, fixed epoch.
    fn now(&self) -> u64;
}

/// Wall clock measured from the moment it was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to, for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an absolute tick
    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    /// Move forward by `ms` milliseconds
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now(), 100);
        clock.advance(50);
        assert_eq!(clock.now(), 150);
        clock.set(10);
        assert_eq!(clock.now(), 10);
    }

    #[test]
    fn test_shared_manual_clock() {
        let clock = std::rc::Rc::new(ManualClock::new(0));
        let driver = clock.clone();
        driver.advance(16);
        assert_eq!(clock.now(), 16);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
