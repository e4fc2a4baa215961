//! Hooks: persistent per-component state addressed by call order.
//!
//! A component receives a [`Hooks`] context while it renders. Each hook
//! call claims the next slot of the component's [`HookStore`]; the kinds of
//! slots claimed must be the same on every render of the same instance.
//!
//! ```
//! use trellis::{Deps, Element, Hooks, Node};
//! use std::time::Duration;
//!
//! fn counter(hooks: &mut Hooks<'_>, _: &()) -> trellis::Result<Node> {
//!     let (count, set_count) = hooks.use_state(0u32)?;
//!     hooks.use_effect(Deps::Values(()), move |ctx| loop {
//!         ctx.sleep(Duration::from_secs(1))?;
//!         set_count.update(|n| n + 1);
//!     })?;
//!     Ok(Element::text(format!("{count}")).into())
//! }
//! ```

mod store;

pub use store::{HookArena, HookStore};

use crate::error::{Error, Result};
use crate::runtime::effects::{EffectContext, EffectResult};
use crate::runtime::EventSender;
use parking_lot::Mutex;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use store::{EffectSlot, Slot};

/// Stable identity of a shadow node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw identity.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Effect dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deps<D> {
    /// Re-run after every render.
    Always,
    /// Re-run only when the value differs from the previous render's.
    Values(D),
}

impl Deps<()> {
    /// Shorthand for [`Deps::Always`] without naming a dependency type.
    pub const ALWAYS: Self = Self::Always;
}

/// Updates one `use_state` slot.
///
/// Setters are `Send`, so effect threads can hold them.
pub struct Setter<T> {
    cell: Arc<Mutex<T>>,
    events: EventSender,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            events: self.events.clone(),
        }
    }
}

impl<T: PartialEq> Setter<T> {
    /// Store `value`. Returns `true` and schedules a re-render if it differs
    /// from the current value.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.cell.lock();
        if *current == value {
            return false;
        }
        *current = value;
        drop(current);
        self.events.state_set();
        true
    }

    /// Compute the new value from the current one, then [`set`](Self::set) it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let mut current = self.cell.lock();
        let next = f(&current);
        if *current == next {
            return false;
        }
        *current = next;
        drop(current);
        self.events.state_set();
        true
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter").field("type", &type_name::<T>()).finish()
    }
}

/// A mutable cell whose identity survives re-renders.
pub struct HookRef<T> {
    cell: Arc<Mutex<T>>,
}

impl<T> Clone for HookRef<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> HookRef<T> {
    /// Replace the value. Never triggers a re-render.
    pub fn set(&self, value: T) {
        *self.cell.lock() = value;
    }

    /// Run `f` with mutable access to the value.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.cell.lock())
    }

    /// True if both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone> HookRef<T> {
    /// A copy of the value.
    pub fn get(&self) -> T {
        self.cell.lock().clone()
    }
}

impl<T> fmt::Debug for HookRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRef").field("type", &type_name::<T>()).finish()
    }
}

/// Render context handed to a component.
pub struct Hooks<'a> {
    node: NodeId,
    store: &'a mut HookStore,
    cursor: usize,
    events: &'a EventSender,
}

impl<'a> Hooks<'a> {
    pub(crate) fn new(node: NodeId, store: &'a mut HookStore, events: &'a EventSender) -> Self {
        Self {
            node,
            store,
            cursor: 0,
            events,
        }
    }

    /// Identity of the rendering node.
    pub const fn node(&self) -> NodeId {
        self.node
    }

    fn mismatch(&self, expected: &'static str, found: &'static str) -> Error {
        tracing::error!(node = %self.node, index = self.cursor, expected, found, "hook order changed");
        Error::InconsistentHookExecution {
            node: self.node,
            index: self.cursor,
            expected,
            found,
        }
    }

    /// Claim the next slot, creating it with `create` on the first render.
    fn next_slot(&mut self, expected: &'static str, create: impl FnOnce() -> Slot) -> Result<&mut Slot> {
        let index = self.cursor;
        if index == self.store.slots.len() {
            if self.store.mounted {
                return Err(self.mismatch(expected, "nothing"));
            }
            self.store.slots.push(create());
        }
        let found = self.store.slots[index].kind();
        if found != expected {
            return Err(self.mismatch(expected, found));
        }
        self.cursor += 1;
        Ok(&mut self.store.slots[index])
    }

    /// Persistent state. Returns the current value and its setter.
    pub fn use_state<T>(&mut self, initial: T) -> Result<(T, Setter<T>)>
    where
        T: Clone + PartialEq + Send + 'static,
    {
        let slot = self.next_slot("state", || Slot::State {
            cell: Box::new(Arc::new(Mutex::new(initial))),
            type_name: type_name::<T>(),
        })?;
        let found = match slot {
            Slot::State { cell, type_name } => match cell.downcast_ref::<Arc<Mutex<T>>>() {
                Some(cell) => Ok(Arc::clone(cell)),
                None => Err(*type_name),
            },
            _ => Err("state"),
        };
        let cell = found.map_err(|found| {
            self.cursor -= 1;
            self.mismatch(type_name::<T>(), found)
        })?;
        let value = cell.lock().clone();
        Ok((
            value,
            Setter {
                cell,
                events: self.events.clone(),
            },
        ))
    }

    /// A mutable cell that keeps its identity across renders.
    pub fn use_ref<T: Send + 'static>(&mut self, initial: T) -> Result<HookRef<T>> {
        let slot = self.next_slot("ref", || Slot::Ref {
            cell: Box::new(Arc::new(Mutex::new(initial))),
            type_name: type_name::<T>(),
        })?;
        let found = match slot {
            Slot::Ref { cell, type_name } => match cell.downcast_ref::<Arc<Mutex<T>>>() {
                Some(cell) => Ok(Arc::clone(cell)),
                None => Err(*type_name),
            },
            _ => Err("ref"),
        };
        let cell = found.map_err(|found| {
            self.cursor -= 1;
            self.mismatch(type_name::<T>(), found)
        })?;
        Ok(HookRef { cell })
    }

    /// Register a background effect.
    ///
    /// `setup` runs on its own thread after the render commits. On later
    /// renders it is restarted (the previous run cancelled first) when
    /// `deps` is [`Deps::Always`] or differs from the previous render's;
    /// otherwise the running task is kept and `setup` is dropped.
    pub fn use_effect<D, F>(&mut self, deps: Deps<D>, setup: F) -> Result<()>
    where
        D: PartialEq + 'static,
        F: FnOnce(EffectContext) -> EffectResult + Send + 'static,
    {
        let slot = self.next_slot("effect", || Slot::Effect(EffectSlot::default()))?;
        let Slot::Effect(effect) = slot else {
            return Ok(());
        };
        let changed = match (&deps, effect.deps.as_ref()) {
            (Deps::Always, _) => true,
            (Deps::Values(next), Some(prev)) => prev.downcast_ref::<D>() != Some(next),
            (Deps::Values(_), None) => true,
        };
        if changed {
            effect.deps = match deps {
                Deps::Always => None,
                Deps::Values(d) => Some(Box::new(d)),
            };
            effect.pending = Some(Box::new(setup));
        }
        Ok(())
    }

    /// Check that the render claimed every slot it claimed last time and
    /// seal the slot sequence.
    pub(crate) fn finish(self) -> Result<()> {
        if self.store.mounted && self.cursor < self.store.slots.len() {
            let found = self.store.slots[self.cursor].kind();
            return Err(self.mismatch("nothing", found));
        }
        self.store.mounted = true;
        Ok(())
    }
}

impl fmt::Debug for Hooks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("node", &self.node)
            .field("cursor", &self.cursor)
            .field("store", &self.store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::EventKind;
    use crossbeam_channel::Receiver;

    fn render<R>(
        store: &mut HookStore,
        events: &EventSender,
        f: impl FnOnce(&mut Hooks<'_>) -> Result<R>,
    ) -> Result<R> {
        let mut hooks = Hooks::new(NodeId::new(1), store, events);
        let out = f(&mut hooks)?;
        hooks.finish()?;
        Ok(out)
    }

    fn state_sets(rx: &Receiver<crate::runtime::Event>) -> usize {
        rx.try_iter()
            .filter(|e| matches!(e.kind, EventKind::StateSet))
            .count()
    }

    #[test]
    fn test_state_persists_and_signals_only_on_change() {
        let (events, rx) = EventSender::channel(16);
        let mut store = HookStore::default();
        let (value, setter) = render(&mut store, &events, |h| h.use_state(1u8)).unwrap();
        assert_eq!(value, 1);

        assert!(!setter.set(1));
        assert_eq!(state_sets(&rx), 0);
        assert!(setter.set(2));
        assert!(setter.update(|v| v + 1));
        assert_eq!(state_sets(&rx), 2);

        let (value, _) = render(&mut store, &events, |h| h.use_state(1u8)).unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_ref_identity_is_stable() {
        let (events, _rx) = EventSender::channel(16);
        let mut store = HookStore::default();
        let first = render(&mut store, &events, |h| h.use_ref(vec![1])).unwrap();
        first.with(|v| v.push(2));
        let second = render(&mut store, &events, |h| h.use_ref(Vec::<i32>::new())).unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(second.get(), vec![1, 2]);
    }

    #[test]
    fn test_kind_change_is_fatal() {
        let (events, _rx) = EventSender::channel(16);
        let mut store = HookStore::default();
        render(&mut store, &events, |h| h.use_state(0i32).map(|_| ())).unwrap();
        let err = render(&mut store, &events, |h| h.use_ref(0i32).map(|_| ())).unwrap_err();
        assert!(matches!(
            err,
            Error::InconsistentHookExecution { index: 0, expected: "ref", found: "state", .. }
        ));
    }

    #[test]
    fn test_slot_count_change_is_fatal() {
        let (events, _rx) = EventSender::channel(16);
        let mut store = HookStore::default();
        render(&mut store, &events, |h| {
            h.use_state(0i32)?;
            h.use_state(0i32).map(|_| ())
        })
        .unwrap();
        let fewer = render(&mut store, &events, |h| h.use_state(0i32).map(|_| ()));
        assert!(matches!(
            fewer,
            Err(Error::InconsistentHookExecution { index: 1, expected: "nothing", found: "state", .. })
        ));
        let more = render(&mut store, &events, |h| {
            h.use_state(0i32)?;
            h.use_state(0i32)?;
            h.use_ref(0i32).map(|_| ())
        });
        assert!(matches!(
            more,
            Err(Error::InconsistentHookExecution { index: 2, expected: "ref", found: "nothing", .. })
        ));
    }

    #[test]
    fn test_state_type_change_is_fatal() {
        let (events, _rx) = EventSender::channel(16);
        let mut store = HookStore::default();
        render(&mut store, &events, |h| h.use_state(0i32).map(|_| ())).unwrap();
        let err = render(&mut store, &events, |h| h.use_state(0u64).map(|_| ())).unwrap_err();
        assert!(matches!(
            err,
            Error::InconsistentHookExecution { expected: "u64", found: "i32", .. }
        ));
    }

    #[test]
    fn test_effect_deps_gate_restarts() {
        let (events, _rx) = EventSender::channel(16);
        let mut store = HookStore::default();
        let pending = |store: &HookStore| match &store.slots[0] {
            Slot::Effect(e) => e.pending.is_some(),
            _ => false,
        };
        let effect = |dep: u32| move |h: &mut Hooks<'_>| h.use_effect(Deps::Values(dep), |_| Ok(()));

        render(&mut store, &events, effect(1)).unwrap();
        assert!(pending(&store));
        if let Slot::Effect(e) = &mut store.slots[0] {
            e.pending = None;
        }
        render(&mut store, &events, effect(1)).unwrap();
        assert!(!pending(&store));
        render(&mut store, &events, effect(2)).unwrap();
        assert!(pending(&store));

        let mut always = HookStore::default();
        for _ in 0..2 {
            render(&mut always, &events, |h| h.use_effect(Deps::ALWAYS, |_| Ok(()))).unwrap();
            assert!(pending(&always));
            if let Slot::Effect(e) = &mut always.slots[0] {
                e.pending = None;
            }
        }
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(42).to_string(), "#42");
    }
}
