use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::animation::AnimationChain;
use crate::error::SceneError;
use crate::renderer::Surface;
use crate::widgets::Control;

use super::binding::{Bindable, Binding};
use super::group::ObjectGroup;

/// Identity of an object inside a scene graph
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ObjectId(u64);

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

impl ObjectId {
    /// Generate a new unique object ID
    pub fn next() -> Self {
        ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of an object manager (a scene or a group's child list)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ManagerId(u64);

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(1);

impl ManagerId {
    pub fn next() -> Self {
        ManagerId(NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a manager does with an object when it is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteBehaviour {
    /// The manager owns the object and drops it
    #[default]
    Destroy,
    /// The caller owns the object; the manager only forgets it
    Release,
}

/// State shared by every scene object.
#[derive(Clone, Debug)]
pub struct ObjectState {
    bindings: BTreeMap<Binding, AnimationChain>,
    master: Option<Binding>,
    visible: bool,
    done: bool,
    delete_behaviour: DeleteBehaviour,
    owner: Option<ManagerId>,
    id: Option<ObjectId>,
}

impl ObjectState {
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
            master: None,
            visible: true,
            done: false,
            delete_behaviour: DeleteBehaviour::Destroy,
            owner: None,
            id: None,
        }
    }

    pub fn is_on(&self) -> bool {
        self.visible
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn master(&self) -> Option<Binding> {
        self.master
    }

    /// Manager the object currently sits in
    pub fn owner(&self) -> Option<ManagerId> {
        self.owner
    }

    /// Assigned when the object is first inserted into a manager
    pub fn id(&self) -> Option<ObjectId> {
        self.id
    }

    pub fn delete_behaviour(&self) -> DeleteBehaviour {
        self.delete_behaviour
    }

    pub fn chain(&self, binding: Binding) -> Option<&AnimationChain> {
        self.bindings.get(&binding)
    }

    pub fn chain_mut(&mut self, binding: Binding) -> Option<&mut AnimationChain> {
        self.bindings.get_mut(&binding)
    }

    pub fn bound(&self) -> impl Iterator<Item = Binding> + '_ {
        self.bindings.keys().copied()
    }

    /// Restart every bound chain at `now` and clear the done flag.
    pub fn reset_chains(&mut self, now: u64) {
        for chain in self.bindings.values_mut() {
            chain.reset(now);
        }
        self.done = false;
    }

    pub(crate) fn attach(&mut self, id: ObjectId, owner: ManagerId, behaviour: DeleteBehaviour) {
        self.id = Some(id);
        self.owner = Some(owner);
        self.delete_behaviour = behaviour;
    }

    pub(crate) fn detach(&mut self) {
        self.owner = None;
    }
}

impl Default for ObjectState {
    fn default() -> Self {
        Self::new()
    }
}

/// Object-safe cloning and downcasting, implemented for every `Clone` scene object.
pub trait ObjectBase {
    fn clone_object(&self) -> Box<dyn SceneObject>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: SceneObject + Clone + 'static> ObjectBase for T {
    fn clone_object(&self) -> Box<dyn SceneObject> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Anything that can live in a scene graph.
///
/// Implementors provide the state accessors plus whichever hooks they need; the
/// provided methods (`bind`, `update`, `draw`, `on`, `off`, ...) implement the
/// shared behaviour on top of them. Containers override `reset_animations` to
/// reach their children; the rest are not meant to be overridden.
pub trait SceneObject: Bindable + ObjectBase + 'static {
    fn state(&self) -> &ObjectState;
    fn state_mut(&mut self) -> &mut ObjectState;

    /// Runs after the bound fields were written for this frame.
    fn update_hook(&mut self, _now: u64) {}

    /// Draws the object. Only called while it is visible.
    fn draw_hook(&self, _surface: &mut dyn Surface) {}

    fn on_shown(&mut self) {}
    fn on_hidden(&mut self) {}

    fn as_control(&self) -> Option<&dyn Control> {
        None
    }

    fn as_control_mut(&mut self) -> Option<&mut dyn Control> {
        None
    }

    fn as_group(&self) -> Option<&ObjectGroup> {
        None
    }

    fn as_group_mut(&mut self) -> Option<&mut ObjectGroup> {
        None
    }

    /// Drive `binding` with `chain`. A master binding marks the object done when
    /// its chain completes.
    fn bind(
        &mut self,
        binding: Binding,
        chain: AnimationChain,
        master: bool,
    ) -> Result<(), SceneError> {
        if !self.supports(binding) {
            let err = SceneError::UnsupportedBinding {
                binding,
                object: self.type_name(),
            };
            log::warn!("{err}");
            return Err(err);
        }

        let state = self.state_mut();
        state.bindings.insert(binding, chain);
        if master {
            state.master = Some(binding);
        }
        Ok(())
    }

    fn unbind(&mut self, binding: Binding) {
        let state = self.state_mut();
        state.bindings.remove(&binding);
        if state.master == Some(binding) {
            state.master = None;
        }
    }

    /// Choose which bound chain decides completion.
    fn set_master(&mut self, master: Option<Binding>) {
        self.state_mut().master = master;
    }

    /// Read a bindable field directly.
    fn get(&self, binding: Binding) -> Option<f64> {
        self.binding(binding)
    }

    /// Write a bindable field directly. Returns false if the binding is unsupported.
    fn set(&mut self, binding: Binding, value: f64) -> bool {
        match self.binding_mut(binding) {
            Some(field) => {
                *field = value;
                true
            }
            None => false,
        }
    }

    /// Poll every bound chain, write the results into the bound fields and
    /// detect master completion, then run [`update_hook`](Self::update_hook).
    fn update(&mut self, now: u64) {
        let mut bindings = std::mem::take(&mut self.state_mut().bindings);
        let master = self.state().master;
        let mut master_done = false;

        for (binding, chain) in bindings.iter_mut() {
            let value = chain.poll(now, 0.0);
            if let Some(field) = self.binding_mut(*binding) {
                *field = value;
            }
            if master == Some(*binding) && chain.is_done() {
                master_done = true;
            }
        }

        let state = self.state_mut();
        state.bindings = bindings;
        if master_done {
            state.done = true;
        }

        self.update_hook(now);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if self.state().visible {
            self.draw_hook(surface);
        }
    }

    fn on(&mut self) {
        if self.state().visible {
            return;
        }
        self.state_mut().visible = true;
        self.on_shown();
    }

    fn off(&mut self) {
        if !self.state().visible {
            return;
        }
        self.state_mut().visible = false;
        self.on_hidden();
    }

    fn is_on(&self) -> bool {
        self.state().visible
    }

    fn is_done(&self) -> bool {
        self.state().done
    }

    fn set_done(&mut self, done: bool) {
        self.state_mut().done = done;
    }

    /// Restart every bound chain from its first entry at `now`.
    fn reset_animations(&mut self, now: u64) {
        self.state_mut().reset_chains(now);
    }

    fn id(&self) -> Option<ObjectId> {
        self.state().id
    }

    fn owner(&self) -> Option<ManagerId> {
        self.state().owner
    }

    /// Whether the tab key can move focus onto this object
    fn is_tab_stop(&self) -> bool {
        self.as_control().is_some_and(|control| control.is_tab_stop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animation, ChainCycle};
    use crate::widgets::Rectangle;

    #[test]
    fn test_object_ids_are_unique() {
        assert_ne!(ObjectId::next(), ObjectId::next());
        assert_ne!(ManagerId::next(), ManagerId::next());
    }

    #[test]
    fn test_bind_unsupported_binding() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let result = rect.bind(
            Binding::Rotation,
            Animation::from_to(0.0, 1.0, 100).into(),
            false,
        );
        assert!(matches!(
            result,
            Err(SceneError::UnsupportedBinding {
                binding: Binding::Rotation,
                ..
            })
        ));
        assert!(rect.state().chain(Binding::Rotation).is_none());
    }

    #[test]
    fn test_update_writes_bound_fields() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        rect.bind(Binding::Width, Animation::from_to(10.0, 20.0, 1000).into(), false)
            .unwrap();

        rect.update(0);
        assert_eq!(rect.get(Binding::Width), Some(10.0));
        rect.update(500);
        assert_eq!(rect.get(Binding::Width), Some(15.0));
        assert!(!rect.is_done());
    }

    #[test]
    fn test_master_completion_ignores_other_chains() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        rect.bind(Binding::X, Animation::from_to(0.0, 100.0, 1000).into(), true)
            .unwrap();
        let wobble = AnimationChain::from(Animation::from_to(0.0, 1.0, 200)).cycle(ChainCycle::Repeat);
        rect.bind(Binding::Alpha, wobble, false).unwrap();

        rect.update(0);
        rect.update(1000);
        assert!(rect.is_done());

        rect.update(1300);
        assert!(rect.is_done());
        assert!(!rect.state().chain(Binding::Alpha).unwrap().is_done());
        let alpha = rect.get(Binding::Alpha).unwrap();
        assert!((0.0..=1.0).contains(&alpha));
    }

    #[test]
    fn test_non_master_chain_never_completes_object() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        rect.bind(Binding::X, Animation::from_to(0.0, 100.0, 100).into(), false)
            .unwrap();
        rect.update(0);
        rect.update(500);
        assert!(rect.state().chain(Binding::X).unwrap().is_done());
        assert!(!rect.is_done());
    }

    #[test]
    fn test_unbind_master() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        rect.bind(Binding::X, Animation::from_to(0.0, 1.0, 100).into(), true)
            .unwrap();
        assert_eq!(rect.state().master(), Some(Binding::X));
        rect.unbind(Binding::X);
        assert_eq!(rect.state().master(), None);
        assert_eq!(rect.state().bound().count(), 0);
    }

    #[test]
    fn test_reset_animations_clears_done() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        rect.bind(Binding::X, Animation::from_to(0.0, 100.0, 100).into(), true)
            .unwrap();
        rect.update(0);
        rect.update(100);
        assert!(rect.is_done());

        rect.reset_animations(1000);
        assert!(!rect.is_done());
        rect.update(1050);
        assert_eq!(rect.get(Binding::X), Some(50.0));
    }

    #[test]
    fn test_on_off_are_idempotent() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.is_on());
        rect.on();
        assert!(rect.is_on());
        rect.off();
        rect.off();
        assert!(!rect.is_on());
    }

    #[test]
    fn test_clone_has_independent_bindings() {
        let mut rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        rect.bind(Binding::X, Animation::from_to(0.0, 100.0, 1000).into(), false)
            .unwrap();

        let mut copy = rect.clone_object();
        copy.unbind(Binding::X);
        assert!(rect.state().chain(Binding::X).is_some());
        assert!(copy.state().chain(Binding::X).is_none());
    }
}
