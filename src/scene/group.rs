use crate::renderer::Surface;
use crate::Bindable;

use super::manager::ObjectManager;
use super::object::{ObjectId, ObjectState, SceneObject};

/// A scene object that owns its own child list.
///
/// Children are positioned relative to the group origin, `base + offset`,
/// where `BaseX`/`BaseY` are usually fixed and `X`/`Y` animated. The group's
/// `Alpha` is applied to everything it draws.
#[derive(Clone, Debug, Bindable)]
pub struct ObjectGroup {
    state: ObjectState,
    #[bind(X)]
    x: f64,
    #[bind(Y)]
    y: f64,
    #[bind(Alpha)]
    alpha: f64,
    #[bind(BaseX)]
    base_x: f64,
    #[bind(BaseY)]
    base_y: f64,
    objects: ObjectManager,
}

impl ObjectGroup {
    /// Empty, fully opaque group with its origin at (`base_x`, `base_y`).
    pub fn new(base_x: f64, base_y: f64) -> Self {
        Self {
            state: ObjectState::new(),
            x: 0.0,
            y: 0.0,
            alpha: 1.0,
            base_x,
            base_y,
            objects: ObjectManager::new(),
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectManager {
        &mut self.objects
    }

    /// Top-left corner of the children's coordinate space
    pub fn origin(&self) -> (f64, f64) {
        (self.base_x + self.x, self.base_y + self.y)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Remove every child right away.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Next tab stop after `focused` in this group, in insertion order.
    ///
    /// Hidden children are skipped and the search wraps around. When
    /// `focused` is not a tab stop of this group the search starts from the
    /// first (or, going backwards, the last) child. Returns `focused` itself
    /// when it is the only candidate, and `None` when the group is hidden or
    /// has nothing to offer.
    pub fn find_tabbed_item(&self, forwards: bool, focused: Option<ObjectId>) -> Option<ObjectId> {
        if !self.is_on() || self.objects.is_empty() {
            return None;
        }

        let mut items = Vec::with_capacity(self.objects.len());
        self.objects.for_each(|id, obj| {
            if obj.is_tab_stop() {
                items.push((id, obj.is_on()));
            }
        });
        if !forwards {
            items.reverse();
        }

        let current = focused.and_then(|focused| items.iter().position(|(id, _)| *id == focused));
        match current {
            Some(index) => {
                let next = items
                    .iter()
                    .cycle()
                    .skip(index + 1)
                    .take(items.len() - 1)
                    .find(|(_, visible)| *visible)
                    .map(|(id, _)| *id);
                next.or(focused)
            }
            None => items
                .iter()
                .find(|(_, visible)| *visible)
                .map(|(id, _)| *id),
        }
    }
}

impl SceneObject for ObjectGroup {
    fn state(&self) -> &ObjectState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    fn update_hook(&mut self, now: u64) {
        self.objects.update_all(now);
    }

    fn draw_hook(&self, surface: &mut dyn Surface) {
        let (dx, dy) = self.origin();
        surface.push_layer(self.alpha, dx, dy);
        self.objects.draw_all(surface);
        surface.pop_layer();
    }

    fn as_group(&self) -> Option<&ObjectGroup> {
        Some(self)
    }

    fn as_group_mut(&mut self) -> Option<&mut ObjectGroup> {
        Some(self)
    }

    fn reset_animations(&mut self, now: u64) {
        self.state.reset_chains(now);
        self.objects.reset_animations(now);
    }
}
