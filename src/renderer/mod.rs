//! Drawing backend seam.
//!
//! Scene objects draw into a [`Surface`]. The crate ships [`CommandList`], which
//! records the calls; a real backend implements the trait on top of its own
//! device and is handed to [`App::frame`](crate::App::frame) once per frame.
//!
//! Coordinates are logical pixels relative to the innermost layer.

mod commands;

pub use commands::{CommandList, DrawCommand};

use crate::widgets::{Color, Rect, TextStyle};

/// Opaque reference to a bitmap owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Measured extent of a run of text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait Surface {
    /// Fill the whole target with `color`.
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color);

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color, width: f32);

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f32);

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle);

    fn measure_text(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Draw the `source` region of `image` into `dest`.
    fn image(&mut self, image: ImageId, source: Rect, dest: Rect, opacity: f64);

    /// Start a layer: everything drawn until the matching
    /// [`pop_layer`](Self::pop_layer) is translated by (`dx`, `dy`) and
    /// composited with `opacity`.
    fn push_layer(&mut self, opacity: f64, dx: f64, dy: f64);

    fn pop_layer(&mut self);
}
