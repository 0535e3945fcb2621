//! Shaping functions for animations.
//!
//! A shaping function maps the position within an animation cycle (`0.0..=1.0`)
//! to a factor that is scaled by the animation's amplitude and shifted by its base.
//!
//! ## Built-in Shapes
//!
//! - [`Shaping::Linear`] - the position itself
//! - [`Shaping::Sin`] / [`Shaping::Cos`] - one full period per cycle
//! - [`Shaping::OneMinusSin`] / [`Shaping::OneMinusCos`] - the inverted waves
//! - [`Shaping::Tan`] - tangent over one full period
//! - [`Shaping::Log`] - base-10 logarithm of the position
//! - [`Shaping::WaitZero`] / [`Shaping::WaitOne`] - constants, used to hold a value
//!
//! ## Example
//!
//! ```ignore
//! // Pulse between 0.5 and 1.0 once per second
//! Animation::new(Shaping::OneMinusCos, 1000, 0.25, 0.5)
//! ```

use std::f64::consts::TAU;
use std::sync::Arc;

/// Function shaping the value of an animation over one cycle
#[derive(Clone, Default)]
pub enum Shaping {
    /// Always 0
    WaitZero,
    /// Always 1
    WaitOne,
    /// Straight line from 0 to 1
    #[default]
    Linear,
    /// `sin(2πt)`
    Sin,
    /// `cos(2πt)`
    Cos,
    /// `1 - sin(2πt)`
    OneMinusSin,
    /// `1 - cos(2πt)`
    OneMinusCos,
    /// `tan(2πt)`
    Tan,
    /// `log10(t)`
    Log,
    /// User-defined shape
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl Shaping {
    /// Evaluate the shape at position `t` in the cycle.
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            Shaping::WaitZero => 0.0,
            Shaping::WaitOne => 1.0,
            Shaping::Linear => t,
            Shaping::Sin => (TAU * t).sin(),
            Shaping::Cos => (TAU * t).cos(),
            Shaping::OneMinusSin => 1.0 - (TAU * t).sin(),
            Shaping::OneMinusCos => 1.0 - (TAU * t).cos(),
            Shaping::Tan => (TAU * t).tan(),
            Shaping::Log => t.log10(),
            Shaping::Custom(f) => f(t),
        }
    }

    /// Create a custom shape from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Shaping::Custom(Arc::new(f))
    }
}

impl std::fmt::Debug for Shaping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shaping::WaitZero => write!(f, "WaitZero"),
            Shaping::WaitOne => write!(f, "WaitOne"),
            Shaping::Linear => write!(f, "Linear"),
            Shaping::Sin => write!(f, "Sin"),
            Shaping::Cos => write!(f, "Cos"),
            Shaping::OneMinusSin => write!(f, "OneMinusSin"),
            Shaping::OneMinusCos => write!(f, "OneMinusCos"),
            Shaping::Tan => write!(f, "Tan"),
            Shaping::Log => write!(f, "Log"),
            Shaping::Custom(_) => write!(f, "Custom"),
        }
    }
}
