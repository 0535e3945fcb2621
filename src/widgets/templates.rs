//! Batch creation of similar controls.
//!
//! A group template holds the look shared by a list of controls, an item
//! template the per-control parts. [`ItemGroup`] lays the generated controls
//! out in a row or a column; hand the result to
//! [`ObjectManager::add_items`](crate::scene::ObjectManager::add_items).

use std::rc::Rc;

use crate::scene::SceneObject;

use super::button::{Button, ClickCallback};
use super::control::Control;
use super::text_box::{CaptionPosition, TextBox};
use super::widget::Color;
use super::TextStyle;

/// Turns per-item templates into controls sharing one look.
pub trait GroupTemplate {
    type Item;
    type Output: SceneObject + Control;

    fn generate(&self, x: f64, y: f64, item: &Self::Item) -> Self::Output;
}

#[derive(Clone, Default)]
pub struct ButtonTemplate {
    pub text: String,
    pub on_click: Option<ClickCallback>,
}

impl ButtonTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            on_click: None,
        }
    }

    pub fn on_click(mut self, f: impl Fn(&Button) + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }
}

#[derive(Clone, Debug)]
pub struct ButtonGroupTemplate {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub idle_color: Color,
    pub hover_color: Color,
    pub style: TextStyle,
    pub active: bool,
}

impl ButtonGroupTemplate {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            radius: 4.0,
            idle_color: Color::rgb(0.25, 0.25, 0.3),
            hover_color: Color::rgb(0.35, 0.35, 0.45),
            style: TextStyle::default(),
            active: true,
        }
    }
}

impl GroupTemplate for ButtonGroupTemplate {
    type Item = ButtonTemplate;
    type Output = Button;

    fn generate(&self, x: f64, y: f64, item: &ButtonTemplate) -> Button {
        let mut button = Button::new(x, y, self.width, self.height, item.text.clone())
            .colors(self.idle_color, self.hover_color)
            .style(self.style.clone())
            .corner_radius(self.radius)
            .active(self.active);
        button.set_on_click(item.on_click.clone());
        button
    }
}

#[derive(Clone, Debug)]
pub struct TextBoxTemplate {
    pub initial_text: String,
    pub max_length: usize,
    pub caption: String,
    pub password: bool,
}

impl Default for TextBoxTemplate {
    fn default() -> Self {
        Self {
            initial_text: String::new(),
            max_length: usize::MAX,
            caption: String::new(),
            password: false,
        }
    }
}

impl TextBoxTemplate {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct TextBoxGroupTemplate {
    pub width: f64,
    pub height: f64,
    pub style: TextStyle,
    pub fill_color: Color,
    pub outline_color: Color,
    pub caret_color: Color,
    pub selection_color: Color,
    pub caption_style: TextStyle,
    pub caption_position: CaptionPosition,
    pub caption_gap: f64,
}

impl TextBoxGroupTemplate {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            style: TextStyle::default(),
            fill_color: Color::rgba(0.0, 0.0, 0.0, 0.5),
            outline_color: Color::WHITE,
            caret_color: Color::rgb(0.4, 0.8, 1.0),
            selection_color: Color::rgba(0.4, 0.6, 1.0, 0.4),
            caption_style: TextStyle::default(),
            caption_position: CaptionPosition::Left,
            caption_gap: 10.0,
        }
    }
}

impl GroupTemplate for TextBoxGroupTemplate {
    type Item = TextBoxTemplate;
    type Output = TextBox;

    fn generate(&self, x: f64, y: f64, item: &TextBoxTemplate) -> TextBox {
        let mut text_box = TextBox::new(x, y, self.width, self.height)
            .with_text(item.initial_text.clone())
            .max_length(item.max_length)
            .password(item.password)
            .style(self.style.clone())
            .colors(
                self.fill_color,
                self.outline_color,
                self.caret_color,
                self.selection_color,
            );
        if !item.caption.is_empty() {
            text_box = text_box.caption(
                item.caption.clone(),
                self.caption_position,
                self.caption_gap,
                self.caption_style.clone(),
            );
        }
        text_box
    }
}

/// Row and column layout of generated controls
pub struct ItemGroup;

impl ItemGroup {
    /// Stack controls downwards from (`x`, `y`), `gap` pixels apart.
    pub fn column<G: GroupTemplate>(
        x: f64,
        y: f64,
        template: &G,
        items: &[G::Item],
        gap: f64,
    ) -> Vec<G::Output> {
        let mut offset = 0.0;
        items
            .iter()
            .map(|item| {
                let control = template.generate(x, y + offset, item);
                offset += control.interface().height + gap;
                control
            })
            .collect()
    }

    /// Place controls rightwards from (`x`, `y`), `gap` pixels apart.
    pub fn row<G: GroupTemplate>(
        x: f64,
        y: f64,
        template: &G,
        items: &[G::Item],
        gap: f64,
    ) -> Vec<G::Output> {
        let mut offset = 0.0;
        items
            .iter()
            .map(|item| {
                let control = template.generate(x + offset, y, item);
                offset += control.interface().width + gap;
                control
            })
            .collect()
    }
}
