//! Recorded draw commands.

use super::{ImageId, Surface, TextMetrics};
use crate::widgets::{Color, Rect, TextStyle};

/// A single draw operation in the coordinate space of the current layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f64,
        color: Color,
    },
    StrokeRoundedRect {
        rect: Rect,
        radius: f64,
        color: Color,
        width: f32,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        width: f32,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
    Image {
        image: ImageId,
        source: Rect,
        dest: Rect,
        opacity: f64,
    },
    PushLayer {
        opacity: f64,
        dx: f64,
        dy: f64,
    },
    PopLayer,
}

/// [`Surface`] that records every call.
///
/// Text is measured with a fixed advance of half the font size per character
/// and a line height of 1.2 times the font size.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Layers pushed but not popped yet
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Hand out the recorded commands and start over.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        self.depth = 0;
        std::mem::take(&mut self.commands)
    }

    /// Recorded text runs, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for CommandList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color) {
        self.commands.push(DrawCommand::FillRoundedRect {
            rect,
            radius,
            color,
        });
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeRoundedRect {
            rect,
            radius,
            color,
            width,
        });
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_owned(),
            style: style.clone(),
        });
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let advance = f64::from(style.size) * 0.5;
        TextMetrics {
            width: text.chars().count() as f64 * advance,
            height: style.line_height(),
        }
    }

    fn image(&mut self, image: ImageId, source: Rect, dest: Rect, opacity: f64) {
        self.commands.push(DrawCommand::Image {
            image,
            source,
            dest,
            opacity,
        });
    }

    fn push_layer(&mut self, opacity: f64, dx: f64, dy: f64) {
        self.depth += 1;
        self.commands
            .push(DrawCommand::PushLayer { opacity, dx, dy });
    }

    fn pop_layer(&mut self) {
        if self.depth == 0 {
            log::warn!("pop_layer without a matching push_layer");
            return;
        }
        self.depth -= 1;
        self.commands.push(DrawCommand::PopLayer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut list = CommandList::new();
        list.clear(Color::BLACK);
        list.push_layer(0.5, 10.0, 20.0);
        list.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::WHITE);
        list.pop_layer();

        assert_eq!(list.len(), 4);
        assert_eq!(list.commands()[0], DrawCommand::Clear(Color::BLACK));
        assert_eq!(
            list.commands()[1],
            DrawCommand::PushLayer {
                opacity: 0.5,
                dx: 10.0,
                dy: 20.0
            }
        );
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_unbalanced_pop_is_ignored() {
        let mut list = CommandList::new();
        list.pop_layer();
        assert!(list.is_empty());
    }

    #[test]
    fn test_measure_text() {
        let list = CommandList::new();
        let metrics = list.measure_text("abcd", &TextStyle::new(10.0, Color::WHITE));
        assert_eq!(metrics.width, 20.0);
        assert!((metrics.height - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_take_resets() {
        let mut list = CommandList::new();
        list.text(1.0, 2.0, "hi", &TextStyle::default());
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["hi"]);

        let taken = list.take();
        assert_eq!(taken.len(), 1);
        assert!(list.is_empty());
    }
}
