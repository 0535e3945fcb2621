//! Retained scene graph.
//!
//! A [`Scene`] is the top of the hierarchy: it owns an [`ObjectManager`],
//! buffers removals across frames, tracks keyboard focus and is the entry point
//! for frame updates and input. [`ObjectGroup`]s nest further managers inside
//! it.

mod binding;
mod focus;
mod group;
mod manager;
mod object;

use std::cell::RefCell;
use std::rc::Rc;

pub use binding::{Bindable, Binding};
pub use focus::{Focus, FocusScope};
pub use group::ObjectGroup;
pub use manager::{Handle, ObjectManager};
use manager::EntryKey;
pub use object::{DeleteBehaviour, ManagerId, ObjectBase, ObjectId, ObjectState, SceneObject};

use crate::renderer::Surface;
use crate::widgets::control::{self, KeyDispatch};
use crate::widgets::{ButtonState, Key, Modifiers, MouseButton, MouseButtons};

pub type SceneCallback = Rc<dyn Fn()>;
pub type SceneKeyCharCallback = Rc<dyn Fn(char, u32, bool, bool) -> bool>;
pub type SceneKeyDownCallback = Rc<dyn Fn(Key, Modifiers, bool) -> bool>;
pub type SceneKeyUpCallback = Rc<dyn Fn(Key, Modifiers) -> bool>;
pub type SceneMouseMoveCallback = Rc<dyn Fn(f64, f64, MouseButtons) -> bool>;
pub type SceneMouseButtonCallback = Rc<dyn Fn(MouseButton, ButtonState, f64, f64) -> bool>;

#[derive(Default)]
struct SceneCallbacks {
    key_char: Option<SceneKeyCharCallback>,
    key_down: Option<SceneKeyDownCallback>,
    key_up: Option<SceneKeyUpCallback>,
    mouse_move: Option<SceneMouseMoveCallback>,
    mouse_button: Option<SceneMouseButtonCallback>,
    activate: Option<SceneCallback>,
    deactivate: Option<SceneCallback>,
}

/// Top-level object manager driven once per frame.
///
/// Objects that finish during [`update`](Scene::update), and everything marked
/// by [`clear`](Scene::clear), are removed at the start of the following
/// update. Input callbacks registered on the scene see every event before the
/// objects do.
#[derive(Default)]
pub struct Scene {
    objects: ObjectManager,
    pending_removal: Vec<EntryKey>,
    focus: Focus,
    callbacks: SceneCallbacks,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_char_handler(mut self, f: impl Fn(char, u32, bool, bool) -> bool + 'static) -> Self {
        self.callbacks.key_char = Some(Rc::new(f));
        self
    }

    pub fn key_down_handler(mut self, f: impl Fn(Key, Modifiers, bool) -> bool + 'static) -> Self {
        self.callbacks.key_down = Some(Rc::new(f));
        self
    }

    pub fn key_up_handler(mut self, f: impl Fn(Key, Modifiers) -> bool + 'static) -> Self {
        self.callbacks.key_up = Some(Rc::new(f));
        self
    }

    pub fn mouse_move_handler(mut self, f: impl Fn(f64, f64, MouseButtons) -> bool + 'static) -> Self {
        self.callbacks.mouse_move = Some(Rc::new(f));
        self
    }

    pub fn mouse_button_handler(
        mut self,
        f: impl Fn(MouseButton, ButtonState, f64, f64) -> bool + 'static,
    ) -> Self {
        self.callbacks.mouse_button = Some(Rc::new(f));
        self
    }

    /// Called when the scene becomes the current one.
    pub fn on_activate(mut self, f: impl Fn() + 'static) -> Self {
        self.callbacks.activate = Some(Rc::new(f));
        self
    }

    /// Called when another scene replaces this one.
    pub fn on_deactivate(mut self, f: impl Fn() + 'static) -> Self {
        self.callbacks.deactivate = Some(Rc::new(f));
        self
    }

    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectManager {
        &mut self.objects
    }

    pub fn add<T: SceneObject>(&mut self, obj: T) -> Handle<T> {
        self.objects.add(obj)
    }

    pub fn add_ref<T: SceneObject>(&mut self, obj: Rc<RefCell<T>>) -> Handle<T> {
        self.objects.add_ref(obj)
    }

    /// Remove a direct child immediately, dropping focus if it held it.
    pub fn remove(&mut self, id: impl Into<ObjectId>) -> bool {
        let id = id.into();
        if self.focus.has_focus(id) {
            self.set_focus(None);
        }
        self.objects.remove(id)
    }

    /// Mark every current object for removal at the next update. Objects
    /// added after this call are kept.
    pub fn clear(&mut self) {
        for key in self.objects.entry_keys() {
            if !self.pending_removal.contains(&key) {
                self.pending_removal.push(key);
            }
        }
    }

    /// Advance the scene to `now`: apply pending removals, update the visible
    /// objects and schedule the ones that finished.
    pub fn update(&mut self, now: u64) {
        for key in std::mem::take(&mut self.pending_removal) {
            self.flush_removal(key);
        }

        let mut finished = Vec::new();
        self.objects.update_visible(now, &mut finished);
        if !finished.is_empty() {
            log::trace!("{} object(s) finished at {}", finished.len(), now);
        }
        self.pending_removal = finished;

        self.validate_focus();
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        self.objects.draw_all(surface);
    }

    pub fn reset_animations(&mut self, now: u64) {
        self.objects.reset_animations(now);
    }

    pub fn activate(&mut self) {
        if let Some(callback) = self.callbacks.activate.clone() {
            callback();
        }
    }

    pub fn deactivate(&mut self) {
        if let Some(callback) = self.callbacks.deactivate.clone() {
            callback();
        }
    }

    pub fn focused(&self) -> Option<ObjectId> {
        self.focus.focused()
    }

    /// Move keyboard focus to `id`.
    pub fn set_focus(&mut self, id: Option<ObjectId>) {
        let before = self.focus.focused();
        self.focus.set(id);
        self.sync_focus(before);
    }

    pub fn clear_focus(&mut self) {
        self.set_focus(None);
    }

    pub fn on_key_char(&mut self, ch: char, repeat: u32, previous: bool, transition: bool) -> bool {
        if let Some(callback) = self.callbacks.key_char.clone() {
            if callback(ch, repeat, previous, transition) {
                return true;
            }
        }

        let Some(id) = self.validate_focus() else {
            return false;
        };
        let focus = &mut self.focus;
        let handled = self
            .objects
            .with_target(id, |target| {
                control::key_char(target, ch, repeat, previous, transition, focus)
            })
            .unwrap_or(false);
        self.sync_focus(Some(id));
        handled
    }

    /// Tab pressed on a control inside a group moves focus along the group's
    /// tab order.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers, previous: bool) -> bool {
        if let Some(callback) = self.callbacks.key_down.clone() {
            if callback(key, modifiers, previous) {
                return true;
            }
        }

        let Some(id) = self.validate_focus() else {
            return false;
        };
        let owner = self.objects.with_dyn(id, |obj| obj.owner()).flatten();
        let in_group = owner.is_some_and(|owner| owner != self.objects.id());

        let focus = &mut self.focus;
        let dispatch = self
            .objects
            .with_target(id, |target| {
                control::key_down(target, key, modifiers, previous, in_group, focus)
            })
            .unwrap_or(KeyDispatch::Ignored);

        let handled = match dispatch {
            KeyDispatch::Handled => true,
            KeyDispatch::Ignored => false,
            KeyDispatch::TabNavigation { forwards } => {
                let next = owner.and_then(|owner| {
                    self.objects
                        .with_group(owner, |group| group.find_tabbed_item(forwards, Some(id)))
                        .flatten()
                });
                if let Some(next) = next {
                    log::trace!("Tab moved focus from {:?} to {:?}", id, next);
                    self.focus.request(next);
                }
                true
            }
        };
        self.sync_focus(Some(id));
        handled
    }

    pub fn on_key_up(&mut self, key: Key, modifiers: Modifiers) -> bool {
        if let Some(callback) = self.callbacks.key_up.clone() {
            if callback(key, modifiers) {
                return true;
            }
        }

        let Some(id) = self.validate_focus() else {
            return false;
        };
        let focus = &mut self.focus;
        let handled = self
            .objects
            .with_target(id, |target| control::key_up(target, key, modifiers, focus))
            .unwrap_or(false);
        self.sync_focus(Some(id));
        handled
    }

    pub fn on_mouse_move(&mut self, x: f64, y: f64, buttons: MouseButtons) -> bool {
        if let Some(callback) = self.callbacks.mouse_move.clone() {
            if callback(x, y, buttons) {
                return true;
            }
        }
        self.objects.dispatch_mouse_move(x, y, buttons)
    }

    pub fn on_mouse_button(
        &mut self,
        button: MouseButton,
        state: ButtonState,
        x: f64,
        y: f64,
    ) -> bool {
        if let Some(callback) = self.callbacks.mouse_button.clone() {
            if callback(button, state, x, y) {
                return true;
            }
        }

        let before = self.focus.focused();
        let handled = self
            .objects
            .dispatch_mouse_button(button, state, x, y, &mut self.focus);
        self.sync_focus(before);
        handled
    }

    /// Remove the entry behind `key`. Focus is only dropped when no later
    /// insertion of the same object remains.
    fn flush_removal(&mut self, key: EntryKey) {
        if !self.objects.has_entry(key) {
            return;
        }
        let copies = self.objects.ids().into_iter().filter(|&id| id == key.id).count();
        if copies == 1 && self.focus.has_focus(key.id) {
            self.set_focus(None);
        }
        self.objects.remove_entry(key);
    }

    /// The focused object, if it is still in the scene and visible. Otherwise
    /// focus is released.
    fn validate_focus(&mut self) -> Option<ObjectId> {
        let id = self.focus.focused()?;
        let visible = self.objects.with_dyn(id, |obj| obj.is_on());
        if visible == Some(true) {
            return Some(id);
        }

        log::debug!("Releasing focus of {:?}", id);
        self.set_focus(None);
        None
    }

    /// Tell the controls that lost or gained focus since `before`.
    fn sync_focus(&mut self, before: Option<ObjectId>) {
        let after = self.focus.focused();
        if before == after {
            return;
        }
        for (id, focused) in [(before, false), (after, true)] {
            if let Some(id) = id {
                self.objects.with_dyn(id, |obj| {
                    if let Some(control) = obj.as_control_mut() {
                        control.focus_hook(focused);
                    }
                });
            }
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.objects)
            .field("pending_removal", &self.pending_removal)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}
