use std::rc::Rc;

use crate::renderer::Surface;
use crate::scene::{FocusScope, ObjectState, SceneObject};
use crate::Bindable;

use super::control::{impl_control_object, Control, Interface};
use super::widget::{ButtonState, Color, MouseButton};
use super::TextStyle;

pub type CheckBoxCallback = Rc<dyn Fn(&CheckBox)>;

/// Gap between the box and its text
const TEXT_GAP: f64 = 5.0;

/// Box with a tick and a text label, toggled by a left click on the box.
#[derive(Clone, Bindable)]
pub struct CheckBox {
    state: ObjectState,
    #[bind(flatten)]
    interface: Interface,
    text: String,
    style: TextStyle,
    box_color: Color,
    tick_color: Color,
    checked: bool,
    on_change: Option<CheckBoxCallback>,
}

impl CheckBox {
    pub fn new(x: f64, y: f64, size: f64, text: impl Into<String>) -> Self {
        Self {
            state: ObjectState::new(),
            interface: Interface::new(x, y, size, size),
            text: text.into(),
            style: TextStyle::default(),
            box_color: Color::WHITE,
            tick_color: Color::WHITE,
            checked: false,
            on_change: None,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn colors(mut self, box_color: Color, tick_color: Color) -> Self {
        self.box_color = box_color;
        self.tick_color = tick_color;
        self
    }

    pub fn on_change(mut self, f: impl Fn(&CheckBox) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}

impl std::fmt::Debug for CheckBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckBox")
            .field("interface", &self.interface)
            .field("text", &self.text)
            .field("checked", &self.checked)
            .finish_non_exhaustive()
    }
}

impl Control for CheckBox {
    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn interface_mut(&mut self) -> &mut Interface {
        &mut self.interface
    }

    fn mouse_button_hook(
        &mut self,
        button: MouseButton,
        state: ButtonState,
        _x: f64,
        _y: f64,
        _focus: &mut FocusScope<'_>,
    ) -> bool {
        if button != MouseButton::Left || state != ButtonState::Pressed {
            return false;
        }

        self.checked = !self.checked;
        if let Some(on_change) = self.on_change.clone() {
            on_change(self);
        }
        true
    }
}

impl SceneObject for CheckBox {
    impl_control_object!();

    fn draw_hook(&self, surface: &mut dyn Surface) {
        let bounds = self.interface.bounds();
        surface.stroke_rounded_rect(bounds, 2.0, self.box_color, 1.0);

        if self.checked {
            let (x, y, w, h) = (bounds.x, bounds.y, bounds.width, bounds.height);
            surface.line((x + 2.0, y + h / 2.0), (x + w / 2.0, y + h - 2.0), self.tick_color, 2.0);
            surface.line((x + w / 2.0, y + h - 2.0), (x + w - 2.0, y + 2.0), self.tick_color, 2.0);
        }

        let metrics = surface.measure_text(&self.text, &self.style);
        surface.text(
            bounds.x + bounds.width + TEXT_GAP,
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
    use std::cell::Cell;

    #[test]
    fn test_click_toggles() {
        let last = Rc::new(Cell::new(false));
        let l = last.clone();
        let mut manager = ObjectManager::new();
        let handle = manager.add(
            CheckBox::new(0.0, 0.0, 16.0, "Sound").on_change(move |cb| l.set(cb.is_checked())),
        );
        let mut focus = Focus::new();

        manager.dispatch_mouse_button(MouseButton::Left, ButtonState::Pressed, 8.0, 8.0, &mut focus);
        assert!(last.get());
        manager.dispatch_mouse_button(MouseButton::Left, ButtonState::Released, 8.0, 8.0, &mut focus);
        manager.dispatch_mouse_button(MouseButton::Left, ButtonState::Pressed, 8.0, 8.0, &mut focus);
        assert!(!last.get());
        assert_eq!(manager.with_object(handle, |cb| cb.is_checked()), Some(false));
    }

    #[test]
    fn test_tick_drawn_only_when_checked() {
        let count_lines = |cb: &CheckBox| {
            let mut commands = CommandList::new();
            cb.draw(&mut commands);
            commands
                .commands()
                .iter()
                .filter(|c| matches!(c, DrawCommand::Line { .. }))
                .count()
        };

        assert_eq!(count_lines(&CheckBox::new(0.0, 0.0, 16.0, "x")), 0);
        assert_eq!(count_lines(&CheckBox::new(0.0, 0.0, 16.0, "x").checked(true)), 2);
    }
}
