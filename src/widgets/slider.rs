use std::rc::Rc;

use crate::renderer::Surface;
use crate::scene::{FocusScope, ObjectState, SceneObject};
use crate::Bindable;

use super::control::{impl_control_object, Control, Interface};
use super::widget::{ButtonState, Color, MouseButton, MouseButtons, Rect};

pub type SliderCallback = Rc<dyn Fn(&Slider)>;

const BAR_THICKNESS: f64 = 6.0;
const HANDLE_WIDTH: f64 = 8.0;

/// Horizontal slider over an integer range, set by clicking or dragging.
#[derive(Clone, Bindable)]
pub struct Slider {
    state: ObjectState,
    #[bind(flatten)]
    interface: Interface,
    value: i32,
    min: i32,
    max: i32,
    bar_color: Color,
    handle_color: Color,
    on_change: Option<SliderCallback>,
}

impl Slider {
    pub fn new(x: f64, y: f64, width: f64, height: f64, min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            state: ObjectState::new(),
            interface: Interface::new(x, y, width, height),
            value: min,
            min,
            max,
            bar_color: Color::rgb(0.4, 0.4, 0.4),
            handle_color: Color::WHITE,
            on_change: None,
        }
    }

    pub fn colors(mut self, bar: Color, handle: Color) -> Self {
        self.bar_color = bar;
        self.handle_color = handle;
        self
    }

    pub fn on_change(mut self, f: impl Fn(&Slider) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Set the value, clamped to the range. Does not fire the change callback.
    pub fn set_value(&mut self, value: i32) -> i32 {
        self.value = value.clamp(self.min, self.max);
        self.value
    }

    /// Map a pointer x coordinate onto the range.
    fn track(&mut self, x: f64) {
        let bounds = self.interface.bounds();
        if x < bounds.x || x >= bounds.x + bounds.width {
            return;
        }

        let fraction = (x - bounds.x) / bounds.width;
        let previous = self.value;
        self.value = (f64::from(self.max - self.min) * fraction + 0.5) as i32 + self.min;

        if self.value != previous {
            if let Some(on_change) = self.on_change.clone() {
                on_change(self);
            }
        }
    }

    fn fraction(&self) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        f64::from(self.value - self.min) / f64::from(self.max - self.min)
    }
}

impl std::fmt::Debug for Slider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider")
            .field("interface", &self.interface)
            .field("value", &self.value)
            .field("min", &self.min)
            .field("max", &self.max)
            .finish_non_exhaustive()
    }
}

impl Control for Slider {
    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn interface_mut(&mut self) -> &mut Interface {
        &mut self.interface
    }

    fn mouse_move_hook(&mut self, x: f64, _y: f64, buttons: MouseButtons) -> bool {
        // Drag with the left button only
        if buttons != MouseButtons::LEFT {
            return false;
        }
        self.track(x);
        true
    }

    fn mouse_button_hook(
        &mut self,
        button: MouseButton,
        state: ButtonState,
        x: f64,
        _y: f64,
        _focus: &mut FocusScope<'_>,
    ) -> bool {
        if button != MouseButton::Left || state != ButtonState::Pressed {
            return false;
        }
        self.track(x);
        true
    }
}

impl SceneObject for Slider {
    impl_control_object!();

    fn draw_hook(&self, surface: &mut dyn Surface) {
        let bounds = self.interface.bounds();
        let bar = Rect::new(
            bounds.x,
            bounds.y + (bounds.height - BAR_THICKNESS) / 2.0,
            bounds.width,
            BAR_THICKNESS,
        );
        surface.fill_rounded_rect(bar, BAR_THICKNESS / 2.0, self.bar_color);

        let handle = Rect::new(
            bounds.x + self.fraction() * bounds.width - HANDLE_WIDTH / 2.0,
            bounds.y,
            HANDLE_WIDTH,
            bounds.height,
        );
        surface.fill_rounded_rect(handle, HANDLE_WIDTH / 2.0, self.handle_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Focus, ObjectManager};
    use std::cell::Cell;

    #[test]
    fn test_set_value_clamps() {
        let mut slider = Slider::new(0.0, 0.0, 100.0, 10.0, 0, 10);
        assert_eq!(slider.set_value(15), 10);
        assert_eq!(slider.set_value(-3), 0);
    }

    #[test]
    fn test_click_sets_value_and_notifies() {
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        let mut manager = ObjectManager::new();
        let handle = manager.add(
            Slider::new(0.0, 0.0, 100.0, 10.0, 0, 10).on_change(move |_| c.set(c.get() + 1)),
        );
        let mut focus = Focus::new();

        manager.dispatch_mouse_button(MouseButton::Left, ButtonState::Pressed, 50.0, 5.0, &mut focus);
        assert_eq!(manager.with_object(handle, |s| s.value()), Some(5));
        assert_eq!(changes.get(), 1);

        manager.dispatch_mouse_button(MouseButton::Left, ButtonState::Pressed, 52.0, 5.0, &mut focus);
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn test_drag_requires_left_button() {
        let mut manager = ObjectManager::new();
        let handle = manager.add(Slider::new(0.0, 0.0, 100.0, 10.0, 0, 100));

        manager.dispatch_mouse_move(30.0, 5.0, MouseButtons::empty());
        assert_eq!(manager.with_object(handle, |s| s.value()), Some(0));

        manager.dispatch_mouse_move(30.0, 5.0, MouseButtons::LEFT);
        assert_eq!(manager.with_object(handle, |s| s.value()), Some(30));
    }
}
