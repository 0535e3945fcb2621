//! Keyboard focus tracking.
//!
//! Each [`Scene`](super::Scene) owns one [`Focus`]; at most one object in it
//! receives keyboard input at a time.

use super::object::ObjectId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Focus {
    focused: Option<ObjectId>,
}

impl Focus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give focus to `id`, taking it from whoever held it.
    pub fn request(&mut self, id: ObjectId) {
        if self.focused != Some(id) {
            log::trace!("Focus moved to {:?}", id);
        }
        self.focused = Some(id);
    }

    /// Drop focus, but only if `id` currently holds it.
    pub fn release(&mut self, id: ObjectId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    pub fn has_focus(&self, id: ObjectId) -> bool {
        self.focused == Some(id)
    }

    pub fn focused(&self) -> Option<ObjectId> {
        self.focused
    }

    /// Replace the focused object, clearing focus on `None`.
    pub fn set(&mut self, id: Option<ObjectId>) {
        self.focused = id;
    }

    pub fn clear(&mut self) {
        self.focused = None;
    }
}

/// Focus as seen from one object during event handling
pub struct FocusScope<'a> {
    focus: &'a mut Focus,
    id: ObjectId,
}

impl<'a> FocusScope<'a> {
    pub fn new(focus: &'a mut Focus, id: ObjectId) -> Self {
        Self { focus, id }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn request(&mut self) {
        self.focus.request(self.id);
    }

    pub fn release(&mut self) {
        self.focus.release(self.id);
    }

    pub fn has_focus(&self) -> bool {
        self.focus.has_focus(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_only_own_focus() {
        let a = ObjectId::next();
        let b = ObjectId::next();
        let mut focus = Focus::new();

        focus.request(a);
        focus.release(b);
        assert!(focus.has_focus(a));

        focus.request(b);
        assert!(!focus.has_focus(a));
        focus.release(b);
        assert_eq!(focus.focused(), None);
    }

    #[test]
    fn test_scope() {
        let id = ObjectId::next();
        let mut focus = Focus::new();
        {
            let mut scope = FocusScope::new(&mut focus, id);
            scope.request();
            assert!(scope.has_focus());
        }
        assert_eq!(focus.focused(), Some(id));
        FocusScope::new(&mut focus, id).release();
        assert_eq!(focus.focused(), None);
    }
}
