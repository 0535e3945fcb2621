//! Passive drawables: rectangles, text labels and free-form drawing.

use std::rc::Rc;

use crate::renderer::Surface;
use crate::scene::{ObjectState, SceneObject};
use crate::Bindable;

use super::widget::{Color, Rect};
use super::TextStyle;

/// Filled rectangle.
#[derive(Clone, Debug, Bindable)]
pub struct Rectangle {
    state: ObjectState,
    #[bind(X)]
    x: f64,
    #[bind(Y)]
    y: f64,
    #[bind(Width)]
    width: f64,
    #[bind(Height)]
    height: f64,
    /// Multiplied into the colour's own alpha
    #[bind(Alpha)]
    alpha: f64,
    color: Color,
    radius: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            state: ObjectState::new(),
            x,
            y,
            width,
            height,
            alpha: 1.0,
            color: Color::WHITE,
            radius: 0.0,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl SceneObject for Rectangle {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn draw_hook(&self, surface: &mut dyn Surface) {
        let color = self.color.faded(self.alpha);
        if self.radius > 0.0 {
            surface.fill_rounded_rect(self.rect(), self.radius, color);
        } else {
            surface.fill_rect(self.rect(), color);
        }
    }
}

/// A line of text.
#[derive(Clone, Debug, Bindable)]
pub struct Label {
    state: ObjectState,
    #[bind(X)]
    x: f64,
    #[bind(Y)]
    y: f64,
    #[bind(Alpha)]
    alpha: f64,
    text: String,
    style: TextStyle,
}

impl Label {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            state: ObjectState::new(),
            x,
            y,
            alpha: 1.0,
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl SceneObject for Label {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn draw_hook(&self, surface: &mut dyn Surface) {
        let style = self.style.clone().color(self.style.color.faded(self.alpha));
        surface.text(self.x, self.y, &self.text, &style);
    }
}

/// Scene object that draws with a user closure.
#[derive(Clone, Bindable)]
pub struct CustomDraw {
    state: ObjectState,
    draw: Rc<dyn Fn(&mut dyn Surface)>,
}

impl CustomDraw {
    pub fn new(draw: impl Fn(&mut dyn Surface) + 'static) -> Self {
        Self {
            state: ObjectState::new(),
            draw: Rc::new(draw),
        }
    }
}

impl std::fmt::Debug for CustomDraw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomDraw")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SceneObject for CustomDraw {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn draw_hook(&self, surface: &mut dyn Surface) {
        (self.draw)(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandList, DrawCommand};
    use crate::scene::Binding;

    #[test]
    fn test_rectangle_bindings() {
        let rect = Rectangle::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.get(Binding::Width), Some(3.0));
        assert_eq!(rect.get(Binding::Alpha), Some(1.0));
        assert!(!rect.supports(Binding::Rotation));
    }

    #[test]
    fn test_rectangle_draws_with_alpha() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0).color(Color::rgb(1.0, 0.0, 0.0));
        rect.set(Binding::Alpha, 0.5);

        let mut commands = CommandList::new();
        rect.draw(&mut commands);
        assert_eq!(
            commands.commands(),
            &[DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                color: Color::rgba(1.0, 0.0, 0.0, 0.5),
            }]
        );
    }

    #[test]
    fn test_hidden_rectangle_draws_nothing() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        rect.off();
        let mut commands = CommandList::new();
        rect.draw(&mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_label_text() {
        let mut label = Label::new(5.0, 5.0, "Score: 0");
        label.set_text("Score: 10");

        let mut commands = CommandList::new();
        label.draw(&mut commands);
        assert_eq!(commands.texts().collect::<Vec<_>>(), vec!["Score: 10"]);
    }

    #[test]
    fn test_custom_draw() {
        let drawing = CustomDraw::new(|surface| {
            surface.line((0.0, 0.0), (10.0, 10.0), Color::WHITE, 1.0)
        });
        let mut commands = CommandList::new();
        drawing.draw(&mut commands);
        assert_eq!(commands.len(), 1);
        assert!(!drawing.supports(Binding::X));
    }
}
