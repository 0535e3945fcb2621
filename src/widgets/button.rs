use std::rc::Rc;

use crate::renderer::Surface;
use crate::scene::{FocusScope, ObjectState, SceneObject};
use crate::Bindable;

use super::control::{impl_control_object, Control, Interface};
use super::widget::{ButtonState, Color, MouseButton};
use super::TextStyle;

pub type ClickCallback = Rc<dyn Fn(&Button)>;

/// Clickable rounded button with centred text.
///
/// Clicks fire on left button release inside the button. An inactive button
/// keeps its idle colour and ignores clicks.
#[derive(Clone, Bindable)]
pub struct Button {
    state: ObjectState,
    #[bind(flatten)]
    interface: Interface,
    text: String,
    style: TextStyle,
    idle_color: Color,
    hover_color: Color,
    fill: Color,
    radius: f64,
    active: bool,
    on_click: Option<ClickCallback>,
}

impl Button {
    pub fn new(x: f64, y: f64, width: f64, height: f64, text: impl Into<String>) -> Self {
        let idle_color = Color::rgb(0.25, 0.25, 0.3);
        Self {
            state: ObjectState::new(),
            interface: Interface::new(x, y, width, height),
            text: text.into(),
            style: TextStyle::default(),
            idle_color,
            hover_color: Color::rgb(0.35, 0.35, 0.45),
            fill: idle_color,
            radius: 4.0,
            active: true,
            on_click: None,
        }
    }

    pub fn colors(mut self, idle: Color, hover: Color) -> Self {
        self.idle_color = idle;
        self.hover_color = hover;
        self.fill = idle;
        self
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn on_click(mut self, f: impl Fn(&Button) + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    pub fn set_on_click(&mut self, callback: Option<ClickCallback>) {
        self.on_click = callback;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.fill = self.idle_color;
        }
    }

    /// Colour the button is currently filled with
    pub fn fill(&self) -> Color {
        self.fill
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("interface", &self.interface)
            .field("text", &self.text)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Control for Button {
    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn interface_mut(&mut self) -> &mut Interface {
        &mut self.interface
    }

    fn hover_hook(&mut self) {
        if self.active {
            self.fill = self.hover_color;
        }
    }

    fn unhover_hook(&mut self) {
        if self.active {
            self.fill = self.idle_color;
        }
    }

    fn mouse_button_hook(
        &mut self,
        button: MouseButton,
        state: ButtonState,
        _x: f64,
        _y: f64,
        _focus: &mut FocusScope<'_>,
    ) -> bool {
        if !self.active || button != MouseButton::Left || state != ButtonState::Released {
            return false;
        }

        log::debug!("Button '{}' clicked", self.text);
        if let Some(on_click) = self.on_click.clone() {
            on_click(self);
        }
        true
    }
}

impl SceneObject for Button {
    impl_control_object!();

    fn draw_hook(&self, surface: &mut dyn Surface) {
        let bounds = self.interface.bounds();
        surface.fill_rounded_rect(bounds, self.radius, self.fill);

        let metrics = surface.measure_text(&self.text, &self.style);
        surface.text(
            bounds.x + (bounds.width - metrics.width) / 2.0,
            bounds.y + (bounds.height - metrics.height) / 2.0,
            &self.text,
            &self.style,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandList, DrawCommand};
    use crate::scene::{Focus, ObjectManager};
    use crate::widgets::MouseButtons;
    use std::cell::Cell;

    #[test]
    fn test_click_on_release() {
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        let mut manager = ObjectManager::new();
        manager.add(Button::new(0.0, 0.0, 100.0, 30.0, "OK").on_click(move |_| c.set(c.get() + 1)));
        let mut focus = Focus::new();

        manager.dispatch_mouse_button(MouseButton::Left, ButtonState::Pressed, 10.0, 10.0, &mut focus);
        assert_eq!(clicks.get(), 0);

        let handled = manager.dispatch_mouse_button(
            MouseButton::Left,
            ButtonState::Released,
            10.0,
            10.0,
            &mut focus,
        );
        assert!(handled);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_inactive_button_ignores_clicks() {
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        let mut manager = ObjectManager::new();
        manager.add(
            Button::new(0.0, 0.0, 100.0, 30.0, "OK")
                .active(false)
                .on_click(move |_| c.set(c.get() + 1)),
        );
        let mut focus = Focus::new();

        manager.dispatch_mouse_button(MouseButton::Left, ButtonState::Released, 10.0, 10.0, &mut focus);
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_hover_changes_fill() {
        let idle = Color::rgb(0.1, 0.1, 0.1);
        let hover = Color::rgb(0.9, 0.9, 0.9);
        let mut manager = ObjectManager::new();
        let handle = manager.add(Button::new(0.0, 0.0, 100.0, 30.0, "OK").colors(idle, hover));

        manager.dispatch_mouse_move(50.0, 15.0, MouseButtons::empty());
        assert_eq!(manager.with_object(handle, |b| b.fill()), Some(hover));

        manager.dispatch_mouse_move(150.0, 15.0, MouseButtons::empty());
        assert_eq!(manager.with_object(handle, |b| b.fill()), Some(idle));
    }

    #[test]
    fn test_text_is_centred() {
        let button = Button::new(0.0, 0.0, 100.0, 40.0, "ab").style(TextStyle::new(10.0, Color::WHITE));
        let mut commands = CommandList::new();
        button.draw(&mut commands);

        match &commands.commands()[1] {
            DrawCommand::Text { x, y, text, .. } => {
                assert_eq!(text, "ab");
                assert!((x - 45.0).abs() < 1e-9);
                assert!((y - 14.0).abs() < 1e-9);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }
}
