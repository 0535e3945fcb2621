//! Time-driven scalar animations.
//!
//! An [`Animation`] is a pure function of the current tick:
//!
//! ```text
//! value = shaping(crop(position(now))) * amplitude + base
//! ```
//!
//! `position` is the fraction of the interval elapsed since the animation was last
//! (re)started, folded into `0.0..=1.0` by the [`CycleType`]. `crop` remaps that
//! fraction into a sub-range of the shape; a lower bound above the upper bound
//! plays the range backwards.

use std::rc::Rc;

use super::shaping::Shaping;
use super::Callback;

/// What an animation does once its interval has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleType {
    /// Wrap around to the start
    #[default]
    Repeat,
    /// Hold at the end
    Clamp,
    /// Run backwards to the start, then forwards again
    Reverse,
}

impl CycleType {
    /// Fold a raw position into `0.0..=1.0`.
    pub fn apply(self, pos: f64) -> f64 {
        match self {
            CycleType::Repeat => pos - pos.floor(),
            CycleType::Clamp => pos.clamp(0.0, 1.0),
            CycleType::Reverse => {
                let period = pos.floor();
                let frac = pos - period;
                if (period as i64).rem_euclid(2) == 1 {
                    1.0 - frac
                } else {
                    frac
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct Animation {
    shaping: Shaping,
    amplitude: f64,
    base: f64,
    /// Length of one cycle in milliseconds
    interval: u64,
    crop_lower: f64,
    crop_upper: f64,
    cycle: CycleType,
    paused: bool,
    /// Tick of the last reset or unpause
    started_at: u64,
    /// Raw position accumulated before `started_at`
    paused_pos: f64,
    on_start: Option<Callback>,
}

impl Animation {
    /// Create a paused animation at position 0 that repeats.
    pub fn new(shaping: Shaping, interval: u64, amplitude: f64, base: f64) -> Self {
        Self {
            shaping,
            amplitude,
            base,
            interval,
            crop_lower: 0.0,
            crop_upper: 1.0,
            cycle: CycleType::Repeat,
            paused: true,
            started_at: 0,
            paused_pos: 0.0,
            on_start: None,
        }
    }

    /// A constant value. Unlike the other constructors this one is already running.
    pub fn fixed(value: f64) -> Self {
        let mut animation = Self::new(Shaping::WaitZero, 10, 0.0, value).cycle(CycleType::Clamp);
        animation.paused = false;
        animation
    }

    /// Hold `value` for `interval` milliseconds.
    pub fn wait_at(value: f64, interval: u64) -> Self {
        Self::new(Shaping::WaitZero, interval, 0.0, value)
    }

    /// Move linearly from `start` to `end`, wrapping back to `start`.
    pub fn from_to(start: f64, end: f64, interval: u64) -> Self {
        Self::new(Shaping::Linear, interval, end - start, start)
    }

    /// Move linearly from `start` to `end` and stay there.
    pub fn from_to_clamped(start: f64, end: f64, interval: u64) -> Self {
        Self::from_to(start, end, interval).cycle(CycleType::Clamp)
    }

    /// Move linearly from `start` to `start + add`, wrapping back to `start`.
    pub fn from_plus(start: f64, add: f64, interval: u64) -> Self {
        Self::new(Shaping::Linear, interval, add, start)
    }

    /// Move linearly from `start` to `start + add` and stay there.
    pub fn from_plus_clamped(start: f64, add: f64, interval: u64) -> Self {
        Self::from_plus(start, add, interval).cycle(CycleType::Clamp)
    }

    pub fn cycle(mut self, cycle: CycleType) -> Self {
        self.cycle = cycle;
        self
    }

    pub fn crop(mut self, lower: f64, upper: f64) -> Self {
        self.crop_lower = lower;
        self.crop_upper = upper;
        self
    }

    /// Called whenever the animation is reset without pausing.
    pub fn on_start<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.on_start = Some(Rc::new(callback));
        self
    }

    /// Start from the beginning at `now`.
    pub fn start(&mut self, now: u64) {
        self.reset(now, false);
    }

    /// Rewind to position 0 at `now`, optionally leaving the animation paused.
    pub fn reset(&mut self, now: u64, pause: bool) {
        self.started_at = now;
        self.paused_pos = 0.0;

        if !pause {
            if let Some(on_start) = &self.on_start {
                on_start();
            }
        }

        self.paused = pause;
    }

    /// Pause or resume. Resuming continues from the position held at pause time.
    pub fn pause(&mut self, now: u64, pause: bool) {
        if pause && !self.paused {
            self.paused_pos = self.raw_position(now);
        } else if !pause && self.paused {
            self.started_at = now;
        }

        self.paused = pause;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True once a clamped animation has reached the end of its interval.
    pub fn is_done(&self, now: u64) -> bool {
        self.cycle == CycleType::Clamp && self.position(now, 0.0) == 1.0
    }

    /// Unfolded number of cycles elapsed, before the cycle policy applies.
    fn raw_position(&self, now: u64) -> f64 {
        if self.paused {
            return self.paused_pos;
        }

        if self.interval == 0 {
            return 1.0;
        }

        let elapsed = now.saturating_sub(self.started_at) as f64;
        elapsed / self.interval as f64 + self.paused_pos
    }

    /// Position in the current cycle (`0.0..=1.0`), `offset` cycles ahead of `now`.
    pub fn position(&self, now: u64, offset: f64) -> f64 {
        self.cycle.apply(self.raw_position(now) + offset)
    }

    /// Like [`position`](Self::position) with the offset given in milliseconds.
    pub fn position_time(&self, now: u64, offset_ms: i64) -> f64 {
        self.position(now, self.ms_to_pos(offset_ms))
    }

    /// Remap a cycle position through the crop bounds.
    /// A lower bound above the upper one runs the cycle backwards.
    pub fn crop_position(&self, pos: f64) -> f64 {
        self.crop_lower + (self.crop_upper - self.crop_lower) * pos
    }

    /// The value at `now`.
    pub fn value(&self, now: u64) -> f64 {
        self.value_offset(now, 0.0)
    }

    /// The value `offset` cycles ahead of `now`.
    pub fn value_offset(&self, now: u64, offset: f64) -> f64 {
        self.value_fixed(self.position(now, offset))
    }

    /// The value `offset_ms` milliseconds ahead of `now`.
    pub fn value_offset_time(&self, now: u64, offset_ms: i64) -> f64 {
        self.value_fixed(self.position_time(now, offset_ms))
    }

    /// The value as if the animation were running backwards.
    pub fn value_reversed(&self, now: u64, offset: f64) -> f64 {
        self.value_fixed(1.0 - self.position(now, offset))
    }

    /// The value at a fixed cycle position, ignoring the clock.
    pub fn value_fixed(&self, pos: f64) -> f64 {
        self.shaping.evaluate(self.crop_position(pos)) * self.amplitude + self.base
    }

    /// The value at a fixed number of milliseconds into the cycle.
    pub fn value_fixed_time(&self, ms: u64) -> f64 {
        self.value_fixed(self.ms_to_pos(ms as i64))
    }

    pub fn value_fixed_reversed(&self, pos: f64) -> f64 {
        self.value_fixed(1.0 - pos)
    }

    /// Jump to cycle position `pos`, counting from `now`.
    pub fn set_pos(&mut self, now: u64, pos: f64) {
        self.paused_pos = pos;
        self.started_at = now;
    }

    /// Jump to `ms` milliseconds into the cycle, counting from `now`.
    pub fn set_pos_time(&mut self, now: u64, ms: u64) {
        self.set_pos(now, self.ms_to_pos(ms as i64));
    }

    fn ms_to_pos(&self, ms: i64) -> f64 {
        if self.interval == 0 {
            return 0.0;
        }
        ms as f64 / self.interval as f64
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = amplitude;
    }

    pub fn set_interval(&mut self, interval: u64) {
        self.interval = interval;
    }

    pub fn set_base(&mut self, base: f64) {
        self.base = base;
    }

    pub fn set_shaping(&mut self, shaping: Shaping) {
        self.shaping = shaping;
    }

    pub fn set_cycle(&mut self, cycle: CycleType) {
        self.cycle = cycle;
    }

    pub fn set_crop(&mut self, lower: f64, upper: f64) {
        self.crop_lower = lower;
        self.crop_upper = upper;
    }

    pub fn set_start_handler(&mut self, callback: Option<Callback>) {
        self.on_start = callback;
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn cycle_type(&self) -> CycleType {
        self.cycle
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn base(&self) -> f64 {
        self.base
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("shaping", &self.shaping)
            .field("amplitude", &self.amplitude)
            .field("base", &self.base)
            .field("interval", &self.interval)
            .field("crop", &(self.crop_lower, self.crop_upper))
            .field("cycle", &self.cycle)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_linear_clamp_samples() {
        let mut anim = Animation::new(Shaping::Linear, 1000, 40.0, 10.0).cycle(CycleType::Clamp);
        anim.start(0);

        assert_close(anim.value(0), 10.0);
        assert_close(anim.value(500), 30.0);
        assert_close(anim.value(1000), 50.0);
        assert_close(anim.value(4000), 50.0);
    }

    #[test]
    fn test_constructors_start_paused() {
        let anim = Animation::from_to(0.0, 100.0, 1000);
        assert!(anim.is_paused());
        assert_close(anim.value(750), 0.0);
    }

    #[test]
    fn test_repeat_wraps() {
        let mut anim = Animation::from_to(0.0, 100.0, 1000);
        anim.start(0);
        assert_close(anim.value(1250), 25.0);
        assert_close(anim.value(3500), 50.0);
    }

    #[test]
    fn test_reverse_folds() {
        let mut anim = Animation::from_to(0.0, 1.0, 1000).cycle(CycleType::Reverse);
        anim.start(0);

        let forward = anim.position(250, 0.0);
        let backward = anim.position(1250, 0.0);
        assert_close(backward, 1.0 - forward);
        assert_close(anim.position(2250, 0.0), forward);
    }

    #[test]
    fn test_pause_resume_does_not_jump() {
        let mut anim = Animation::from_to(0.0, 100.0, 1000).cycle(CycleType::Clamp);
        anim.start(0);

        anim.pause(300, true);
        let held = anim.value(300);
        assert_close(held, 30.0);
        assert_close(anim.value(5000), held);

        anim.pause(5000, false);
        assert_close(anim.value(5000), held);
        assert_close(anim.value(5200), 50.0);
    }

    #[test]
    fn test_pause_keeps_reverse_direction() {
        let mut anim = Animation::from_to(0.0, 1.0, 1000).cycle(CycleType::Reverse);
        anim.start(0);

        // Paused while running backwards
        anim.pause(1200, true);
        anim.pause(9000, false);
        assert_close(anim.position(9000, 0.0), 0.8);
        assert_close(anim.position(9100, 0.0), 0.7);
    }

    #[test]
    fn test_done_only_when_clamped() {
        let mut clamped = Animation::from_to_clamped(0.0, 1.0, 100);
        clamped.start(0);
        assert!(!clamped.is_done(99));
        assert!(clamped.is_done(100));

        let mut repeating = Animation::from_to(0.0, 1.0, 100);
        repeating.start(0);
        assert!(!repeating.is_done(100));
    }

    #[test]
    fn test_zero_interval_is_finished() {
        let mut anim = Animation::from_to_clamped(5.0, 15.0, 0);
        anim.start(0);
        assert_close(anim.value(0), 15.0);
        assert!(anim.is_done(0));
        assert_close(anim.value_fixed_time(10), 5.0);
    }

    #[test]
    fn test_crop_reversed_bounds() {
        let anim = Animation::from_to(0.0, 1.0, 1000).crop(1.0, 0.0);
        assert_close(anim.value_fixed(0.0), 1.0);
        assert_close(anim.value_fixed(0.25), 0.75);

        let sub = Animation::from_to(0.0, 1.0, 1000).crop(0.5, 1.0);
        assert_close(sub.value_fixed(0.0), 0.5);
        assert_close(sub.value_fixed(1.0), 1.0);

        let narrowed = Animation::from_to(0.0, 1.0, 1000).crop(0.8, 0.2);
        assert_close(narrowed.crop_position(0.0), 0.8);
        assert_close(narrowed.crop_position(0.25), 0.65);
        assert_close(narrowed.crop_position(1.0), 0.2);
    }

    #[test]
    fn test_offsets_and_fixed_positions() {
        let mut anim = Animation::from_to(0.0, 100.0, 1000);
        anim.start(0);

        assert_close(anim.value_offset(100, 0.5), 60.0);
        assert_close(anim.value_offset_time(100, 200), 30.0);
        assert_close(anim.value_reversed(100, 0.0), 90.0);
        assert_close(anim.value_fixed_time(400), 40.0);
        assert_close(anim.value_fixed_reversed(0.25), 75.0);
    }

    #[test]
    fn test_set_pos() {
        let mut anim = Animation::from_to_clamped(0.0, 100.0, 1000);
        anim.start(0);
        anim.set_pos(2000, 0.5);
        assert_close(anim.value(2000), 50.0);
        assert_close(anim.value(2250), 75.0);

        anim.set_pos_time(3000, 100);
        assert_close(anim.value(3000), 10.0);
    }

    #[test]
    fn test_start_handler_fires_on_unpaused_reset() {
        let starts = Rc::new(Cell::new(0));
        let counter = starts.clone();
        let mut anim = Animation::wait_at(3.0, 100).on_start(move || counter.set(counter.get() + 1));

        anim.reset(0, true);
        assert_eq!(starts.get(), 0);
        anim.start(0);
        anim.reset(50, false);
        assert_eq!(starts.get(), 2);
        assert_close(anim.value(75), 3.0);
    }

    #[test]
    fn test_fixed() {
        let anim = Animation::fixed(42.0);
        assert!(!anim.is_paused());
        assert_close(anim.value(123_456), 42.0);
        assert_eq!(anim.cycle_type(), CycleType::Clamp);
    }
}
