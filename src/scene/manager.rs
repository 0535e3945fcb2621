//! Ordered collections of scene objects.
//!
//! An [`ObjectManager`] is the child list behind both [`Scene`](super::Scene)
//! and [`ObjectGroup`](super::ObjectGroup). Insertion order is update and draw
//! order, so later objects are drawn on top; mouse hit-testing walks the list
//! the other way so the topmost object sees the event first.
//!
//! Objects are stored either owned by the manager ([`ObjectManager::add`]) or
//! shared with the caller ([`ObjectManager::add_ref`]). Access goes through
//! closures, in the same way for both:
//!
//! ```ignore
//! let label = scene.objects_mut().add(Label::new(10.0, 10.0, "Score: 0"));
//! scene.objects_mut().with_object(label, |label| label.set_text("Score: 10"));
//! ```

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::renderer::Surface;
use crate::widgets::control::{self, ControlTarget};
use crate::widgets::{ButtonState, CustomDraw, MouseButton, MouseButtons};

use super::focus::Focus;
use super::group::ObjectGroup;
use super::object::{DeleteBehaviour, ManagerId, ObjectId, SceneObject};

/// Typed reference to an object inserted into a manager
pub struct Handle<T> {
    id: ObjectId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(id: ObjectId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({:?})", self.id)
    }
}

impl<T> From<Handle<T>> for ObjectId {
    fn from(handle: Handle<T>) -> Self {
        handle.id
    }
}

enum Slot {
    Owned(Box<dyn SceneObject>),
    Shared(Rc<RefCell<dyn SceneObject>>),
}

impl Slot {
    fn with<R>(&self, f: impl FnOnce(&dyn SceneObject) -> R) -> R {
        match self {
            Slot::Owned(obj) => f(obj.as_ref()),
            Slot::Shared(obj) => f(&*obj.borrow()),
        }
    }

    fn with_mut<R>(&mut self, f: impl FnOnce(&mut dyn SceneObject) -> R) -> R {
        match self {
            Slot::Owned(obj) => f(obj.as_mut()),
            Slot::Shared(obj) => f(&mut *obj.borrow_mut()),
        }
    }

    fn target(&mut self) -> ControlTarget<'_> {
        match self {
            Slot::Owned(obj) => ControlTarget::Direct(obj.as_mut()),
            Slot::Shared(obj) => ControlTarget::Shared(&**obj),
        }
    }

    fn holds(&self, shared: &Rc<RefCell<dyn SceneObject>>) -> bool {
        matches!(self, Slot::Shared(obj) if Rc::ptr_eq(obj, shared))
    }
}

/// One insertion of an object. Adding the same shared object again gives
/// a new key under the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EntryKey {
    pub(crate) id: ObjectId,
    serial: u64,
}

struct Entry {
    id: ObjectId,
    serial: u64,
    slot: Slot,
}

impl Entry {
    fn key(&self) -> EntryKey {
        EntryKey {
            id: self.id,
            serial: self.serial,
        }
    }
}

pub struct ObjectManager {
    id: ManagerId,
    entries: Vec<Entry>,
    next_serial: u64,
}

impl ObjectManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::next(),
            entries: Vec::new(),
            next_serial: 0,
        }
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct children, back to front
    pub fn ids(&self) -> Vec<ObjectId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    fn insert(&mut self, mut slot: Slot, id: ObjectId, behind: bool) -> ObjectId {
        let owner = self.id;
        let behaviour = match slot {
            Slot::Owned(_) => DeleteBehaviour::Destroy,
            Slot::Shared(_) => DeleteBehaviour::Release,
        };
        slot.with_mut(|obj| obj.state_mut().attach(id, owner, behaviour));

        let serial = self.next_serial;
        self.next_serial += 1;
        let entry = Entry { id, serial, slot };
        if behind {
            self.entries.insert(0, entry);
        } else {
            self.entries.push(entry);
        }

        log::debug!("Added {:?} to {:?} ({:?})", id, owner, behaviour);
        id
    }

    /// Take ownership of `obj`. It is dropped when removed.
    pub fn add<T: SceneObject>(&mut self, obj: T) -> Handle<T> {
        Handle::new(self.insert(Slot::Owned(Box::new(obj)), ObjectId::next(), false))
    }

    /// Like [`add`](Self::add), but drawn below everything already present.
    pub fn add_behind<T: SceneObject>(&mut self, obj: T) -> Handle<T> {
        Handle::new(self.insert(Slot::Owned(Box::new(obj)), ObjectId::next(), true))
    }

    /// Add an independent copy of a prototype object.
    pub fn add_cloned<T: SceneObject + Clone>(&mut self, prototype: &T) -> Handle<T> {
        self.add(prototype.clone())
    }

    pub fn add_cloned_behind<T: SceneObject + Clone>(&mut self, prototype: &T) -> Handle<T> {
        self.add_behind(prototype.clone())
    }

    pub fn add_boxed(&mut self, obj: Box<dyn SceneObject>) -> ObjectId {
        self.insert(Slot::Owned(obj), ObjectId::next(), false)
    }

    /// Track an object the caller keeps ownership of. Removing it only
    /// forgets it; the caller's `Rc` stays valid.
    pub fn add_ref<T: SceneObject>(&mut self, obj: Rc<RefCell<T>>) -> Handle<T> {
        let id = obj.borrow().state().id().unwrap_or_else(ObjectId::next);
        Handle::new(self.insert(Slot::Shared(obj), id, false))
    }

    pub fn add_ref_behind<T: SceneObject>(&mut self, obj: Rc<RefCell<T>>) -> Handle<T> {
        let id = obj.borrow().state().id().unwrap_or_else(ObjectId::next);
        Handle::new(self.insert(Slot::Shared(obj), id, true))
    }

    /// Add an object that only draws through `draw`.
    pub fn add_drawing<F>(&mut self, draw: F) -> Handle<CustomDraw>
    where
        F: Fn(&mut dyn Surface) + 'static,
    {
        self.add(CustomDraw::new(draw))
    }

    /// Add a batch of objects, for instance from an item template.
    pub fn add_items<T: SceneObject>(&mut self, items: Vec<T>) -> Vec<Handle<T>> {
        items.into_iter().map(|item| self.add(item)).collect()
    }

    /// Remove a direct child. Owned objects are dropped, shared ones are
    /// released back to the caller. Removing an absent object does nothing.
    pub fn remove(&mut self, id: impl Into<ObjectId>) -> bool {
        let id = id.into();
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return false;
        };
        self.release(index);
        true
    }

    /// Keys of the direct children, back to front.
    pub(crate) fn entry_keys(&self) -> Vec<EntryKey> {
        self.entries.iter().map(Entry::key).collect()
    }

    pub(crate) fn has_entry(&self, key: EntryKey) -> bool {
        self.entries.iter().any(|entry| entry.key() == key)
    }

    /// Remove the child inserted under `key`. Later insertions of the same
    /// object are left alone.
    pub(crate) fn remove_entry(&mut self, key: EntryKey) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.key() == key) else {
            return false;
        };
        self.release(index);
        true
    }

    fn release(&mut self, index: usize) {
        let entry = self.entries.remove(index);
        match &entry.slot {
            Slot::Owned(_) => log::debug!("Destroyed {:?}", entry.id),
            Slot::Shared(obj) => {
                // A shared object added again keeps its place under this manager.
                let readded = self.entries.iter().any(|other| other.slot.holds(obj));
                let mut obj = obj.borrow_mut();
                if !readded && obj.state().owner() == Some(self.id) {
                    obj.state_mut().detach();
                }
                log::debug!("Released {:?}", entry.id);
            }
        }
    }

    /// Remove every child immediately.
    pub fn clear(&mut self) {
        for id in self.ids() {
            self.remove(id);
        }
    }

    /// Whether `id` is anywhere below this manager.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.iter().any(|entry| {
            entry.id == id
                || entry.slot.with(|obj| {
                    obj.as_group()
                        .is_some_and(|group| group.objects().contains(id))
                })
        })
    }

    /// Run `f` on the object behind `handle`, searching nested groups.
    pub fn with_object<T: SceneObject, R>(
        &mut self,
        handle: Handle<T>,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        self.with_dyn(handle.id, |obj| obj.as_any_mut().downcast_mut::<T>().map(f))
            .flatten()
    }

    /// Run `f` on the object with `id`, searching nested groups.
    pub fn with_dyn<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut dyn SceneObject) -> R,
    ) -> Option<R> {
        let mut f = Some(f);
        self.visit(id, &mut f)
    }

    fn visit<R, F>(&mut self, id: ObjectId, f: &mut Option<F>) -> Option<R>
    where
        F: FnOnce(&mut dyn SceneObject) -> R,
    {
        for entry in &mut self.entries {
            let entry_id = entry.id;
            let found = entry.slot.with_mut(|obj| {
                if entry_id == id {
                    return f.take().map(|f| f(obj));
                }
                obj.as_group_mut()
                    .and_then(|group| group.objects_mut().visit(id, f))
            });
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Hand the object with `id` to an input dispatch function, searching
    /// nested groups. The object itself is not kept borrowed.
    pub(crate) fn with_target<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(ControlTarget<'_>) -> R,
    ) -> Option<R> {
        let mut f = Some(f);
        self.visit_target(id, &mut f)
    }

    fn visit_target<R, F>(&mut self, id: ObjectId, f: &mut Option<F>) -> Option<R>
    where
        F: FnOnce(ControlTarget<'_>) -> R,
    {
        for entry in &mut self.entries {
            if entry.id == id {
                return f.take().map(|f| f(entry.slot.target()));
            }
            let found = entry.slot.with_mut(|obj| {
                obj.as_group_mut()
                    .and_then(|group| group.objects_mut().visit_target(id, f))
            });
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Run `f` on the group whose child list is `manager`.
    pub fn with_group<R>(
        &mut self,
        manager: ManagerId,
        f: impl FnOnce(&mut ObjectGroup) -> R,
    ) -> Option<R> {
        let mut f = Some(f);
        self.visit_group(manager, &mut f)
    }

    fn visit_group<R, F>(&mut self, manager: ManagerId, f: &mut Option<F>) -> Option<R>
    where
        F: FnOnce(&mut ObjectGroup) -> R,
    {
        for entry in &mut self.entries {
            let found = entry.slot.with_mut(|obj| {
                let group = obj.as_group_mut()?;
                if group.objects().id() == manager {
                    return f.take().map(|f| f(group));
                }
                group.objects_mut().visit_group(manager, f)
            });
            if found.is_some() {
                return found;
            }
        }
        None
    }

    /// Visit every direct child, back to front.
    pub fn for_each(&self, mut f: impl FnMut(ObjectId, &dyn SceneObject)) {
        for entry in &self.entries {
            entry.slot.with(|obj| f(entry.id, obj));
        }
    }

    pub fn for_each_mut(&mut self, mut f: impl FnMut(ObjectId, &mut dyn SceneObject)) {
        for entry in &mut self.entries {
            let id = entry.id;
            entry.slot.with_mut(|obj| f(id, obj));
        }
    }

    /// Update every child regardless of visibility.
    pub fn update_all(&mut self, now: u64) {
        self.for_each_mut(|_, obj| obj.update(now));
    }

    /// Update visible children and collect the ones that finished.
    pub(crate) fn update_visible(&mut self, now: u64, finished: &mut Vec<EntryKey>) {
        for entry in &mut self.entries {
            let done = entry.slot.with_mut(|obj| {
                if !obj.is_on() {
                    return false;
                }
                obj.update(now);
                obj.is_done()
            });
            if done {
                finished.push(entry.key());
            }
        }
    }

    pub fn draw_all(&self, surface: &mut dyn Surface) {
        self.for_each(|_, obj| obj.draw(surface));
    }

    pub fn reset_animations(&mut self, now: u64) {
        self.for_each_mut(|_, obj| obj.reset_animations(now));
    }

    /// Offer a pointer move to the children, topmost first. Visible groups
    /// receive it in their own coordinate space. Stops at the first child
    /// that consumes it.
    pub fn dispatch_mouse_move(&mut self, x: f64, y: f64, buttons: MouseButtons) -> bool {
        self.entries.iter_mut().rev().any(|entry| {
            if control::mouse_move(entry.slot.target(), x, y, buttons) {
                return true;
            }
            entry.slot.with_mut(|obj| match obj.as_group_mut() {
                Some(group) if group.is_on() => {
                    let (ox, oy) = group.origin();
                    group.objects_mut().dispatch_mouse_move(x - ox, y - oy, buttons)
                }
                _ => false,
            })
        })
    }

    /// Offer a button press or release to the children, topmost first.
    pub fn dispatch_mouse_button(
        &mut self,
        button: MouseButton,
        state: ButtonState,
        x: f64,
        y: f64,
        focus: &mut Focus,
    ) -> bool {
        self.entries.iter_mut().rev().any(|entry| {
            if control::mouse_button(entry.slot.target(), button, state, x, y, focus) {
                return true;
            }
            entry.slot.with_mut(|obj| match obj.as_group_mut() {
                Some(group) if group.is_on() => {
                    let (ox, oy) = group.origin();
                    group
                        .objects_mut()
                        .dispatch_mouse_button(button, state, x - ox, y - oy, focus)
                }
                _ => false,
            })
        })
    }
}

impl Default for ObjectManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy: every child is cloned and owned by the copy under a fresh id.
impl Clone for ObjectManager {
    fn clone(&self) -> Self {
        let mut copy = ObjectManager::new();
        for entry in &self.entries {
            let obj = entry.slot.with(|obj| obj.clone_object());
            copy.add_boxed(obj);
        }
        copy
    }
}

impl std::fmt::Debug for ObjectManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for entry in &self.entries {
            entry.slot.with(|obj| {
                list.entry(&(entry.id, obj.type_name()));
            });
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use crate::scene::Binding;
    use crate::widgets::{Button, Control, Interface, InterfaceObject, Rectangle};
    use std::cell::Cell;
    use std::rc::Weak;

    #[test]
    fn test_add_assigns_owner_and_id() {
        let mut manager = ObjectManager::new();
        let handle = manager.add(Rectangle::new(0.0, 0.0, 10.0, 10.0));

        let (id, owner, behaviour) = manager
            .with_object(handle, |rect| {
                (rect.id(), rect.owner(), rect.state().delete_behaviour())
            })
            .unwrap();
        assert_eq!(id, Some(handle.id()));
        assert_eq!(owner, Some(manager.id()));
        assert_eq!(behaviour, DeleteBehaviour::Destroy);
    }

    #[test]
    fn test_add_behind_reorders() {
        let mut manager = ObjectManager::new();
        let a = manager.add(Rectangle::new(0.0, 0.0, 1.0, 1.0));
        let b = manager.add_behind(Rectangle::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(manager.ids(), vec![b.id(), a.id()]);
    }

    #[test]
    fn test_add_cloned_is_independent() {
        let mut prototype = Rectangle::new(5.0, 5.0, 10.0, 10.0);
        prototype
            .bind(Binding::X, Animation::from_to(0.0, 10.0, 100).into(), false)
            .unwrap();

        let mut manager = ObjectManager::new();
        let first = manager.add_cloned(&prototype);
        let second = manager.add_cloned(&prototype);
        assert_ne!(first, second);

        manager.with_object(first, |rect| rect.unbind(Binding::X));
        let still_bound = manager
            .with_object(second, |rect| rect.state().chain(Binding::X).is_some())
            .unwrap();
        assert!(still_bound);
        assert!(prototype.state().id().is_none());
    }

    #[test]
    fn test_remove_shared_releases() {
        let shared = Rc::new(RefCell::new(Rectangle::new(0.0, 0.0, 10.0, 10.0)));
        let mut manager = ObjectManager::new();
        let handle = manager.add_ref(shared.clone());
        assert_eq!(
            shared.borrow().state().delete_behaviour(),
            DeleteBehaviour::Release
        );

        assert!(manager.remove(handle));
        assert!(!manager.remove(handle));
        assert!(manager.is_empty());
        assert_eq!(shared.borrow().owner(), None);
        assert_eq!(shared.borrow().id(), Some(handle.id()));
    }

    #[test]
    fn test_remove_entry_spares_later_insertion() {
        let shared = Rc::new(RefCell::new(Rectangle::new(0.0, 0.0, 10.0, 10.0)));
        let mut manager = ObjectManager::new();
        let first = manager.add_ref(shared.clone());
        let key = manager.entry_keys()[0];
        let second = manager.add_ref(shared.clone());
        assert_eq!(first, second);

        assert!(manager.remove_entry(key));
        assert!(!manager.remove_entry(key));
        assert_eq!(manager.len(), 1);
        assert!(manager.contains(second.id()));
        assert_eq!(shared.borrow().owner(), Some(manager.id()));
    }

    #[test]
    fn test_release_keeps_new_owner() {
        let shared = Rc::new(RefCell::new(Rectangle::new(0.0, 0.0, 10.0, 10.0)));
        let mut before = ObjectManager::new();
        let mut after = ObjectManager::new();
        let handle = before.add_ref(shared.clone());
        after.add_ref(shared.clone());

        assert!(before.remove(handle));
        assert_eq!(shared.borrow().owner(), Some(after.id()));
    }

    #[test]
    fn test_shared_callbacks_can_borrow_their_object() {
        let seen = Rc::new(Cell::new(None));
        let s = seen.clone();
        let shared = Rc::new_cyclic(|weak: &Weak<RefCell<InterfaceObject>>| {
            let weak = weak.clone();
            let interface = Interface::new(0.0, 0.0, 10.0, 10.0).on_hover(move || {
                let over = weak
                    .upgrade()
                    .map(|obj| obj.borrow().interface().is_mouse_over());
                s.set(over);
            });
            RefCell::new(InterfaceObject::new(interface))
        });

        let mut manager = ObjectManager::new();
        manager.add_ref(shared.clone());
        assert!(!manager.dispatch_mouse_move(5.0, 5.0, MouseButtons::empty()));
        assert_eq!(seen.get(), Some(true));
    }

    #[test]
    fn test_wrong_handle_type() {
        let mut manager = ObjectManager::new();
        let rect = manager.add(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        let wrong: Handle<Button> = Handle::new(rect.id());
        assert!(manager.with_object(wrong, |_| ()).is_none());
    }

    #[test]
    fn test_nested_lookup() {
        let mut group = ObjectGroup::new(0.0, 0.0);
        let inner = group.objects_mut().add(Rectangle::new(1.0, 2.0, 3.0, 4.0));
        let group_manager = group.objects().id();

        let mut manager = ObjectManager::new();
        manager.add(group);

        assert!(manager.contains(inner.id()));
        let x = manager.with_object(inner, |rect| rect.get(Binding::X));
        assert_eq!(x, Some(Some(1.0)));
        assert_eq!(
            manager.with_group(group_manager, |group| group.objects().len()),
            Some(1)
        );
    }

    #[test]
    fn test_clone_manager_assigns_fresh_ids() {
        let mut manager = ObjectManager::new();
        let original = manager.add(Rectangle::new(0.0, 0.0, 1.0, 1.0));
        let copy = manager.clone();

        assert_eq!(copy.len(), 1);
        assert_ne!(copy.id(), manager.id());
        assert!(!copy.contains(original.id()));
    }

    #[test]
    fn test_add_drawing() {
        let mut manager = ObjectManager::new();
        manager.add_drawing(|surface| surface.clear(crate::widgets::Color::BLACK));
        let mut commands = crate::renderer::CommandList::new();
        manager.draw_all(&mut commands);
        assert_eq!(commands.len(), 1);
    }
}
