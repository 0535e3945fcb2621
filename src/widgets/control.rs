//! Interactive objects.
//!
//! A control is a scene object with an [`Interface`]: a hit box, optional
//! user callbacks and hover/focus bookkeeping. The free functions in this
//! module are the dispatch path used by [`ObjectManager`](crate::scene::ObjectManager)
//! and [`Scene`](crate::scene::Scene); for every event the user callback runs
//! first and the control's own hook only sees what the callback left
//! unhandled.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::renderer::Surface;
use crate::scene::{Focus, FocusScope, ObjectState, SceneObject};
use crate::Bindable;

use super::widget::{ButtonState, Key, Modifiers, MouseButton, MouseButtons, Rect};

pub type HoverCallback = Rc<dyn Fn()>;
pub type MouseMoveCallback = Rc<dyn Fn(f64, f64, MouseButtons) -> bool>;
pub type MouseButtonCallback = Rc<dyn Fn(MouseButton, ButtonState, f64, f64) -> bool>;
/// Arguments: character, repeat count, previously down, transition
pub type KeyCharCallback = Rc<dyn Fn(char, u32, bool, bool) -> bool>;
pub type KeyDownCallback = Rc<dyn Fn(Key, Modifiers, bool) -> bool>;
pub type KeyUpCallback = Rc<dyn Fn(Key, Modifiers) -> bool>;

/// Hit box, callbacks and input state shared by every control.
#[derive(Clone, Default, Bindable)]
pub struct Interface {
    #[bind(X)]
    pub x: f64,
    #[bind(Y)]
    pub y: f64,
    #[bind(Width)]
    pub width: f64,
    #[bind(Height)]
    pub height: f64,
    on_hover: Option<HoverCallback>,
    on_unhover: Option<HoverCallback>,
    on_mouse_move: Option<MouseMoveCallback>,
    on_mouse_button: Option<MouseButtonCallback>,
    on_key_char: Option<KeyCharCallback>,
    on_key_down: Option<KeyDownCallback>,
    on_key_up: Option<KeyUpCallback>,
    mouse_over: bool,
    just_got_focus: bool,
    tab_stop: bool,
}

/// Size of the hit box of keyboard-only interfaces
const KEYBOARD_EXTENT: f64 = 100_000.0;

impl Interface {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    /// An interface that covers the whole surface, for objects that only
    /// listen to the keyboard.
    pub fn keyboard() -> Self {
        Self::new(0.0, 0.0, KEYBOARD_EXTENT, KEYBOARD_EXTENT)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }

    pub fn is_mouse_over(&self) -> bool {
        self.mouse_over
    }

    /// Set between a focusing click and the next fresh key press.
    pub fn just_got_focus(&self) -> bool {
        self.just_got_focus
    }

    pub fn set_just_got_focus(&mut self, value: bool) {
        self.just_got_focus = value;
    }

    pub fn is_tab_stop(&self) -> bool {
        self.tab_stop
    }

    pub fn tab_stop(mut self, tab_stop: bool) -> Self {
        self.tab_stop = tab_stop;
        self
    }

    pub fn on_hover(mut self, f: impl Fn() + 'static) -> Self {
        self.on_hover = Some(Rc::new(f));
        self
    }

    pub fn on_unhover(mut self, f: impl Fn() + 'static) -> Self {
        self.on_unhover = Some(Rc::new(f));
        self
    }

    pub fn on_mouse_move(mut self, f: impl Fn(f64, f64, MouseButtons) -> bool + 'static) -> Self {
        self.on_mouse_move = Some(Rc::new(f));
        self
    }

    pub fn on_mouse_button(
        mut self,
        f: impl Fn(MouseButton, ButtonState, f64, f64) -> bool + 'static,
    ) -> Self {
        self.on_mouse_button = Some(Rc::new(f));
        self
    }

    pub fn on_key_char(mut self, f: impl Fn(char, u32, bool, bool) -> bool + 'static) -> Self {
        self.on_key_char = Some(Rc::new(f));
        self
    }

    pub fn on_key_down(mut self, f: impl Fn(Key, Modifiers, bool) -> bool + 'static) -> Self {
        self.on_key_down = Some(Rc::new(f));
        self
    }

    pub fn on_key_up(mut self, f: impl Fn(Key, Modifiers) -> bool + 'static) -> Self {
        self.on_key_up = Some(Rc::new(f));
        self
    }
}

impl std::fmt::Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interface")
            .field("bounds", &self.bounds())
            .field("mouse_over", &self.mouse_over)
            .field("just_got_focus", &self.just_got_focus)
            .field("tab_stop", &self.tab_stop)
            .finish_non_exhaustive()
    }
}

/// Input hooks of an interactive object.
///
/// Every hook returns whether it consumed the event. Hooks that may change
/// keyboard focus receive a [`FocusScope`] for the object.
pub trait Control {
    fn interface(&self) -> &Interface;
    fn interface_mut(&mut self) -> &mut Interface;

    fn hover_hook(&mut self) {}
    fn unhover_hook(&mut self) {}

    /// Pointer moved while over the hit box.
    fn mouse_move_hook(&mut self, _x: f64, _y: f64, _buttons: MouseButtons) -> bool {
        false
    }

    /// Button pressed or released while over the hit box.
    fn mouse_button_hook(
        &mut self,
        _button: MouseButton,
        _state: ButtonState,
        _x: f64,
        _y: f64,
        _focus: &mut FocusScope<'_>,
    ) -> bool {
        false
    }

    fn key_char_hook(
        &mut self,
        _ch: char,
        _repeat: u32,
        _previous: bool,
        _transition: bool,
        _focus: &mut FocusScope<'_>,
    ) -> bool {
        false
    }

    fn key_down_hook(
        &mut self,
        _key: Key,
        _modifiers: Modifiers,
        _previous: bool,
        _focus: &mut FocusScope<'_>,
    ) -> bool {
        false
    }

    fn key_up_hook(&mut self, _key: Key, _modifiers: Modifiers, _focus: &mut FocusScope<'_>) -> bool {
        false
    }

    /// Runs after the control was shown or hidden and its hover state reset.
    fn visibility_hook(&mut self, _visible: bool) {}

    /// Keyboard focus moved onto or away from this control.
    fn focus_hook(&mut self, _focused: bool) {}

    fn is_tab_stop(&self) -> bool {
        self.interface().is_tab_stop()
    }
}

/// Implements the `SceneObject` plumbing shared by every control:
/// state access, the control capability and hover reset on show/hide.
macro_rules! impl_control_object {
    () => {
        fn state(&self) -> &crate::scene::ObjectState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut crate::scene::ObjectState {
            &mut self.state
        }
        fn as_control(&self) -> Option<&dyn crate::widgets::Control> {
            Some(self)
        }
        fn as_control_mut(&mut self) -> Option<&mut dyn crate::widgets::Control> {
            Some(self)
        }
        fn on_shown(&mut self) {
            crate::widgets::control::visibility_changed(self, true);
        }
        fn on_hidden(&mut self) {
            crate::widgets::control::visibility_changed(self, false);
        }
    };
}
pub(crate) use impl_control_object;

/// Hover is cleared whenever visibility changes; hiding also drops the
/// just-focused latch. Focus itself is released by the scene on its next
/// update or key event.
pub(crate) fn visibility_changed(control: &mut dyn Control, visible: bool) {
    control.unhover_hook();
    if let Some(callback) = control.interface().on_unhover.clone() {
        callback();
    }

    let interface = control.interface_mut();
    interface.mouse_over = false;
    if !visible {
        interface.just_got_focus = false;
    }
    control.visibility_hook(visible);
}

/// An object offered an event. Shared objects are only borrowed while their
/// own state is read or changed, so user callbacks may borrow them again.
pub(crate) enum ControlTarget<'a> {
    Direct(&'a mut dyn SceneObject),
    Shared(&'a RefCell<dyn SceneObject>),
}

impl ControlTarget<'_> {
    fn object<R>(&mut self, f: impl FnOnce(&mut dyn SceneObject) -> R) -> R {
        match self {
            ControlTarget::Direct(obj) => f(&mut **obj),
            ControlTarget::Shared(cell) => f(&mut *cell.borrow_mut()),
        }
    }

    /// Run `f` on the object if it is a visible control.
    fn control<R>(&mut self, f: impl FnOnce(&mut dyn Control) -> R) -> Option<R> {
        self.object(|obj| {
            if !obj.is_on() {
                return None;
            }
            obj.as_control_mut().map(f)
        })
    }
}

/// Recompute hover for a pointer at (`x`, `y`) and run the hover hooks on
/// transitions. Returns whether the pointer is over the control and the user
/// callback to fire.
fn track_hover(control: &mut dyn Control, x: f64, y: f64) -> (bool, Option<HoverCallback>) {
    let was_over = control.interface().mouse_over;
    let over = control.interface().bounds().contains(x, y);
    control.interface_mut().mouse_over = over;

    let callback = if over && !was_over {
        control.hover_hook();
        control.interface().on_hover.clone()
    } else if !over && was_over {
        control.unhover_hook();
        control.interface().on_unhover.clone()
    } else {
        None
    };
    (over, callback)
}

/// `None` when the target is not a visible control.
fn hover(target: &mut ControlTarget<'_>, x: f64, y: f64) -> Option<bool> {
    let (over, callback) = target.control(|control| track_hover(control, x, y))?;
    if let Some(callback) = callback {
        callback();
    }
    Some(over)
}

pub(crate) fn mouse_move(mut target: ControlTarget<'_>, x: f64, y: f64, buttons: MouseButtons) -> bool {
    let Some(callback) = target.control(|control| control.interface().on_mouse_move.clone()) else {
        return false;
    };
    if let Some(callback) = callback {
        if callback(x, y, buttons) {
            return true;
        }
    }

    if hover(&mut target, x, y) != Some(true) {
        return false;
    }
    target
        .control(|control| control.mouse_move_hook(x, y, buttons))
        .unwrap_or(false)
}

/// A left press inside the hit box takes keyboard focus and sets the
/// just-focused latch; the press then counts as consumed even if nothing
/// else handles it.
pub(crate) fn mouse_button(
    mut target: ControlTarget<'_>,
    button: MouseButton,
    state: ButtonState,
    x: f64,
    y: f64,
    focus: &mut Focus,
) -> bool {
    let Some(id) = target.object(|obj| obj.id()) else {
        return false;
    };
    if hover(&mut target, x, y) != Some(true) {
        return false;
    }

    if button == MouseButton::Left && state == ButtonState::Pressed {
        focus.request(id);
        target.control(|control| control.interface_mut().just_got_focus = true);
    }

    let callback = target
        .control(|control| control.interface().on_mouse_button.clone())
        .flatten();
    if let Some(callback) = callback {
        if callback(button, state, x, y) {
            return true;
        }
    }

    let mut scope = FocusScope::new(focus, id);
    target
        .control(|control| {
            control.mouse_button_hook(button, state, x, y, &mut scope)
                || control.interface().just_got_focus
        })
        .unwrap_or(false)
}

pub(crate) fn key_char(
    mut target: ControlTarget<'_>,
    ch: char,
    repeat: u32,
    previous: bool,
    transition: bool,
    focus: &mut Focus,
) -> bool {
    let Some(id) = target.object(|obj| obj.id()) else {
        return false;
    };
    let Some(callback) = target.control(|control| control.interface().on_key_char.clone()) else {
        return false;
    };
    if let Some(callback) = callback {
        if callback(ch, repeat, previous, transition) {
            return true;
        }
    }

    let mut scope = FocusScope::new(focus, id);
    target
        .control(|control| control.key_char_hook(ch, repeat, previous, transition, &mut scope))
        .unwrap_or(false)
}

/// Outcome of offering a key press to the focused control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDispatch {
    Handled,
    Ignored,
    /// Tab inside a group: the caller moves focus along the group's tab order.
    TabNavigation { forwards: bool },
}

/// `in_group` tells whether the control sits in an [`ObjectGroup`](crate::scene::ObjectGroup),
/// which makes Tab a navigation key instead of ordinary input.
pub(crate) fn key_down(
    mut target: ControlTarget<'_>,
    key: Key,
    modifiers: Modifiers,
    previous: bool,
    in_group: bool,
    focus: &mut Focus,
) -> KeyDispatch {
    let Some(id) = target.object(|obj| obj.id()) else {
        return KeyDispatch::Ignored;
    };

    let step = target.control(|control| {
        // A key that was already held when the click focused us is swallowed
        // until it is pressed afresh.
        let interface = control.interface_mut();
        if interface.just_got_focus {
            if previous {
                return ControlFlow::Break(KeyDispatch::Handled);
            }
            interface.just_got_focus = false;
        }

        if key == Key::Tab && in_group {
            return ControlFlow::Break(KeyDispatch::TabNavigation {
                forwards: !modifiers.shift,
            });
        }
        ControlFlow::Continue(control.interface().on_key_down.clone())
    });
    let callback = match step {
        None => return KeyDispatch::Ignored,
        Some(ControlFlow::Break(dispatch)) => return dispatch,
        Some(ControlFlow::Continue(callback)) => callback,
    };

    if let Some(callback) = callback {
        if callback(key, modifiers, previous) {
            return KeyDispatch::Handled;
        }
    }

    let mut scope = FocusScope::new(focus, id);
    target
        .control(|control| control.key_down_hook(key, modifiers, previous, &mut scope))
        .unwrap_or(false)
        .into()
}

pub(crate) fn key_up(
    mut target: ControlTarget<'_>,
    key: Key,
    modifiers: Modifiers,
    focus: &mut Focus,
) -> bool {
    let Some(id) = target.object(|obj| obj.id()) else {
        return false;
    };
    let Some(callback) = target.control(|control| control.interface().on_key_up.clone()) else {
        return false;
    };
    if let Some(callback) = callback {
        if callback(key, modifiers) {
            return true;
        }
    }

    let mut scope = FocusScope::new(focus, id);
    target
        .control(|control| control.key_up_hook(key, modifiers, &mut scope))
        .unwrap_or(false)
}

impl From<bool> for KeyDispatch {
    fn from(handled: bool) -> Self {
        if handled {
            KeyDispatch::Handled
        } else {
            KeyDispatch::Ignored
        }
    }
}

/// A bare control: an invisible hit box that only forwards events to its
/// callbacks.
#[derive(Clone, Debug, Bindable)]
pub struct InterfaceObject {
    state: ObjectState,
    #[bind(flatten)]
    interface: Interface,
}

impl InterfaceObject {
    pub fn new(interface: Interface) -> Self {
        Self {
            state: ObjectState::new(),
            interface,
        }
    }
}

impl Control for InterfaceObject {
    fn interface(&self) -> &Interface {
        &self.interface
    }

    fn interface_mut(&mut self) -> &mut Interface {
        &mut self.interface
    }
}

impl SceneObject for InterfaceObject {
    impl_control_object!();

    fn draw_hook(&self, _surface: &mut dyn Surface) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectManager;
    use std::cell::Cell;

    fn managed(interface: Interface) -> (ObjectManager, crate::scene::Handle<InterfaceObject>) {
        let mut manager = ObjectManager::new();
        let handle = manager.add(InterfaceObject::new(interface));
        (manager, handle)
    }

    #[test]
    fn test_hover_transitions() {
        let hovers = Rc::new(Cell::new(0));
        let unhovers = Rc::new(Cell::new(0));
        let (h, u) = (hovers.clone(), unhovers.clone());
        let interface = Interface::new(10.0, 10.0, 20.0, 20.0)
            .on_hover(move || h.set(h.get() + 1))
            .on_unhover(move || u.set(u.get() + 1));
        let (mut manager, _) = managed(interface);

        manager.dispatch_mouse_move(15.0, 15.0, MouseButtons::empty());
        manager.dispatch_mouse_move(16.0, 16.0, MouseButtons::empty());
        assert_eq!(hovers.get(), 1);

        manager.dispatch_mouse_move(50.0, 50.0, MouseButtons::empty());
        assert_eq!(unhovers.get(), 1);
    }

    #[test]
    fn test_left_click_takes_focus() {
        let (mut manager, handle) = managed(Interface::new(0.0, 0.0, 10.0, 10.0));
        let mut focus = Focus::new();

        let handled = manager.dispatch_mouse_button(
            MouseButton::Left,
            ButtonState::Pressed,
            5.0,
            5.0,
            &mut focus,
        );
        assert!(handled);
        assert!(focus.has_focus(handle.id()));
        assert_eq!(
            manager.with_object(handle, |obj| obj.interface().just_got_focus()),
            Some(true)
        );
    }

    #[test]
    fn test_click_outside_is_ignored() {
        let (mut manager, _) = managed(Interface::new(0.0, 0.0, 10.0, 10.0));
        let mut focus = Focus::new();
        let handled = manager.dispatch_mouse_button(
            MouseButton::Left,
            ButtonState::Pressed,
            10.0,
            5.0,
            &mut focus,
        );
        assert!(!handled);
        assert_eq!(focus.focused(), None);
    }

    #[test]
    fn test_callback_consumes_before_hook() {
        let seen = Rc::new(Cell::new(false));
        let s = seen.clone();
        let interface = Interface::new(0.0, 0.0, 10.0, 10.0).on_mouse_button(move |_, state, _, _| {
            s.set(true);
            state == ButtonState::Released
        });
        let (mut manager, _) = managed(interface);
        let mut focus = Focus::new();

        assert!(manager.dispatch_mouse_button(
            MouseButton::Right,
            ButtonState::Released,
            1.0,
            1.0,
            &mut focus
        ));
        assert!(seen.get());
        assert_eq!(focus.focused(), None);
    }

    #[test]
    fn test_hidden_control_ignores_input() {
        let (mut manager, handle) = managed(Interface::new(0.0, 0.0, 10.0, 10.0));
        manager.with_object(handle, |obj| obj.off());
        let mut focus = Focus::new();
        assert!(!manager.dispatch_mouse_button(
            MouseButton::Left,
            ButtonState::Pressed,
            5.0,
            5.0,
            &mut focus
        ));
        assert!(!manager.dispatch_mouse_move(5.0, 5.0, MouseButtons::empty()));
    }

    #[test]
    fn test_just_got_focus_swallows_repeat() {
        let presses = Rc::new(Cell::new(0));
        let p = presses.clone();
        let interface = Interface::keyboard().on_key_down(move |_, _, _| {
            p.set(p.get() + 1);
            true
        });
        let (mut manager, handle) = managed(interface);
        let mut focus = Focus::new();
        manager.dispatch_mouse_button(MouseButton::Left, ButtonState::Pressed, 1.0, 1.0, &mut focus);

        let dispatch = |manager: &mut ObjectManager, focus: &mut Focus, previous: bool| {
            manager
                .with_target(handle.id(), |target| {
                    key_down(target, Key::Char('a'), Modifiers::NONE, previous, false, focus)
                })
                .unwrap()
        };

        assert_eq!(dispatch(&mut manager, &mut focus, true), KeyDispatch::Handled);
        assert_eq!(presses.get(), 0);

        assert_eq!(dispatch(&mut manager, &mut focus, false), KeyDispatch::Handled);
        assert_eq!(presses.get(), 1);

        assert_eq!(dispatch(&mut manager, &mut focus, true), KeyDispatch::Handled);
        assert_eq!(presses.get(), 2);
    }

    #[test]
    fn test_tab_only_navigates_inside_group() {
        let (mut manager, handle) = managed(Interface::keyboard());
        let mut focus = Focus::new();

        let in_group = manager
            .with_target(handle.id(), |target| {
                key_down(target, Key::Tab, Modifiers::SHIFT, false, true, &mut focus)
            })
            .unwrap();
        assert_eq!(in_group, KeyDispatch::TabNavigation { forwards: false });

        let top_level = manager
            .with_target(handle.id(), |target| {
                key_down(target, Key::Tab, Modifiers::NONE, false, false, &mut focus)
            })
            .unwrap();
        assert_eq!(top_level, KeyDispatch::Ignored);
    }

    #[test]
    fn test_hiding_resets_hover() {
        let (mut manager, handle) = managed(Interface::new(0.0, 0.0, 10.0, 10.0));
        manager.dispatch_mouse_move(5.0, 5.0, MouseButtons::empty());
        assert_eq!(
            manager.with_object(handle, |obj| obj.interface().is_mouse_over()),
            Some(true)
        );

        manager.with_object(handle, |obj| obj.off());
        assert_eq!(
            manager.with_object(handle, |obj| obj.interface().is_mouse_over()),
            Some(false)
        );
    }
}
