//! Time-driven value animation.
//!
//! - [`Animation`] maps a millisecond tick to a scalar through a [`Shaping`] function
//! - [`AnimationChain`] plays animations back to back as one value stream
//! - [`Clock`] supplies the tick once per frame
//!
//! Nothing here reads the time on its own. Every time-dependent call takes the
//! current tick as `now`, so the same inputs always produce the same values.

mod chain;
mod clock;
mod curve;
mod shaping;

use std::rc::Rc;

pub use chain::{AnimationChain, ChainCycle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use curve::{Animation, CycleType};
pub use shaping::Shaping;

/// Notification hook shared by animations and chains
pub type Callback = Rc<dyn Fn()>;
