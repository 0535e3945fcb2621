//! Sequences of animations played back to back.

use std::rc::Rc;

use super::curve::{Animation, CycleType};
use super::Callback;

/// What a chain does after its last entry finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainCycle {
    /// Hold the final value and report done
    #[default]
    Clamp,
    /// Start again from the first entry
    Repeat,
}

/// Animations played one after another as a single value stream.
///
/// Entries always clamp; only the chain's own [`ChainCycle`] decides what happens
/// after the last one. The chain advances lazily: [`update`](Self::update) moves
/// past at most one finished entry per call, so it must be polled once per frame
/// (see [`poll`](Self::poll)).
///
/// A chain that has been neither started nor paused starts itself on its first
/// update.
#[derive(Clone)]
pub struct AnimationChain {
    entries: Vec<Animation>,
    index: usize,
    done: bool,
    paused: bool,
    /// Waiting for the first update to start it
    armed: bool,
    cycle: ChainCycle,
    final_value: f64,
    on_done: Option<Callback>,
}

impl AnimationChain {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            done: true,
            paused: true,
            armed: true,
            cycle: ChainCycle::Clamp,
            final_value: 0.0,
            on_done: None,
        }
    }

    /// Append an entry. It is forced to clamp and rewound, paused.
    pub fn add(&mut self, animation: Animation) {
        let mut animation = animation;
        animation.set_cycle(CycleType::Clamp);
        animation.reset(0, true);
        self.entries.push(animation);
        self.done = false;
    }

    /// Builder form of [`add`](Self::add).
    pub fn then(mut self, animation: Animation) -> Self {
        self.add(animation);
        self
    }

    pub fn cycle(mut self, cycle: ChainCycle) -> Self {
        self.cycle = cycle;
        self
    }

    /// Called once when a clamped chain finishes.
    pub fn on_done<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.on_done = Some(Rc::new(callback));
        self
    }

    pub fn set_done_handler(&mut self, callback: Option<Callback>) {
        self.on_done = callback;
    }

    pub fn set_cycle(&mut self, cycle: ChainCycle) {
        self.cycle = cycle;
    }

    /// Start or resume the current entry, optionally rewinding it first.
    pub fn start(&mut self, now: u64, reset: bool) {
        self.paused = false;
        self.armed = false;

        if let Some(current) = self.entries.get_mut(self.index) {
            if reset {
                current.reset(now, false);
            }
            self.done = false;
            current.pause(now, false);
            return;
        }

        match self.cycle {
            ChainCycle::Clamp => {
                if !self.done {
                    self.done = true;
                    log::debug!("Animation chain finished at {}", self.final_value);
                    if let Some(on_done) = &self.on_done {
                        on_done();
                    }
                }
            }
            ChainCycle::Repeat => self.reset(now),
        }
    }

    /// Rewind to the first entry and start it.
    pub fn reset(&mut self, now: u64) {
        self.index = 0;
        self.armed = false;
        if !self.entries.is_empty() {
            self.start(now, true);
        }
    }

    pub fn pause(&mut self, now: u64, pause: bool) {
        self.armed = false;

        if let Some(current) = self.entries.get_mut(self.index) {
            current.pause(now, pause);
        }

        if !pause {
            self.start(now, false);
        }

        self.paused = pause;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Move to the next entry if the current one has finished.
    pub fn update(&mut self, now: u64) {
        if self.armed {
            self.start(now, true);
        }

        let Some(current) = self.entries.get(self.index) else {
            return;
        };

        if current.is_done(now) {
            self.final_value = current.value(now);
            self.index += 1;
            self.start(now, true);
        }
    }

    /// The current value without advancing.
    pub fn value(&self, now: u64, offset: f64) -> f64 {
        match self.entries.get(self.index) {
            Some(current) if !self.done => current.value_offset(now, offset),
            _ => self.final_value,
        }
    }

    /// Advance then read: the once-per-frame polling call.
    pub fn poll(&mut self, now: u64, offset: f64) -> f64 {
        self.update(now);
        self.value(now, offset)
    }

    /// Index of the entry currently playing
    pub fn current(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AnimationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Animation> for AnimationChain {
    fn from(animation: Animation) -> Self {
        Self::new().then(animation)
    }
}

impl FromIterator<Animation> for AnimationChain {
    fn from_iter<I: IntoIterator<Item = Animation>>(iter: I) -> Self {
        let mut chain = Self::new();
        for animation in iter {
            chain.add(animation);
        }
        chain
    }
}

impl std::fmt::Debug for AnimationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationChain")
            .field("entries", &self.entries)
            .field("index", &self.index)
            .field("done", &self.done)
            .field("paused", &self.paused)
            .field("cycle", &self.cycle)
            .field("final_value", &self.final_value)
            .finish_non_exhaustive()
    }
}
