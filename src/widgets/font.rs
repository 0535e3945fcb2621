//! Font and text style types for labels and controls.

use super::Color;

/// Font family specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    /// Sans-serif font (default system sans-serif)
    #[default]
    SansSerif,
    /// Serif font (default system serif)
    Serif,
    /// Monospace font (default system monospace)
    Monospace,
    /// Custom font by name
    Name(String),
}

/// Font weight on a 100-900 scale, matching CSS font-weight values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Light weight (300)
    pub const LIGHT: Self = Self(300);
    /// Normal/regular weight (400) - default
    pub const NORMAL: Self = Self(400);
    /// Semi-bold weight (600)
    pub const SEMI_BOLD: Self = Self(600);
    /// Bold weight (700)
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Everything a surface needs to lay out and paint a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: FontFamily,
    pub weight: FontWeight,
    /// Font size in logical pixels
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            ..Self::default()
        }
    }

    pub fn family(mut self, family: FontFamily) -> Self {
        self.family = family;
        self
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Height of one line of text
    pub fn line_height(&self) -> f64 {
        f64::from(self.size) * 1.2
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: FontFamily::default(),
            weight: FontWeight::default(),
            size: 14.0,
            color: Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_family_default() {
        assert_eq!(FontFamily::default(), FontFamily::SansSerif);
    }

    #[test]
    fn font_weight_default() {
        assert_eq!(FontWeight::default(), FontWeight(400));
        assert_eq!(FontWeight::BOLD.0, 700);
    }

    #[test]
    fn text_style_builder() {
        let style = TextStyle::new(20.0, Color::BLACK)
            .family(FontFamily::Monospace)
            .weight(FontWeight::BOLD);
        assert_eq!(style.size, 20.0);
        assert_eq!(style.family, FontFamily::Monospace);
        assert_eq!(style.color, Color::BLACK);
        assert!((style.line_height() - 24.0).abs() < 1e-9);
    }
}
