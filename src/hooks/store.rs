//! Hook storage: per-node slot lists and the arena holding them.

use super::NodeId;
use crate::error::Result;
use crate::runtime::effects::{EffectFn, EffectTask};
use crate::runtime::EventSender;
use std::any::Any;
use std::collections::{HashMap, HashSet};

/// One positional hook slot.
pub(crate) enum Slot {
    State {
        cell: Box<dyn Any>,
        type_name: &'static str,
    },
    Ref {
        cell: Box<dyn Any>,
        type_name: &'static str,
    },
    Effect(EffectSlot),
}

impl Slot {
    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::State { .. } => "state",
            Self::Ref { .. } => "ref",
            Self::Effect(_) => "effect",
        }
    }
}

/// Dependencies, a body waiting to start, and the running task.
#[derive(Default)]
pub(crate) struct EffectSlot {
    /// `None` means "always re-run".
    pub(crate) deps: Option<Box<dyn Any>>,
    pub(crate) pending: Option<EffectFn>,
    pub(crate) task: Option<EffectTask>,
}

/// The ordered hook slots of one shadow node.
#[derive(Default)]
pub struct HookStore {
    pub(crate) slots: Vec<Slot>,
    /// Set after the first complete render; from then on the slot
    /// sequence is fixed.
    pub(crate) mounted: bool,
}

impl HookStore {
    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the node uses no hooks.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of effect slots with a live task.
    pub fn running_effects(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Effect(e) if e.task.is_some()))
            .count()
    }

    /// Start every pending effect, cancelling the task it supersedes.
    fn start_pending(&mut self, node: NodeId, events: &EventSender) -> Result<()> {
        let mut first_error = None;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Slot::Effect(effect) = slot else { continue };
            let Some(body) = effect.pending.take() else { continue };
            if let Some(task) = effect.task.take() {
                if let Err(e) = task.cancel() {
                    first_error.get_or_insert(e);
                }
            }
            effect.task = Some(EffectTask::spawn(node, index, body, events)?);
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Cancel every running task. Returns the first failure.
    fn cancel_all(&mut self) -> Result<()> {
        let mut first_error = None;
        for slot in &mut self.slots {
            if let Slot::Effect(effect) = slot {
                effect.pending = None;
                if let Some(task) = effect.task.take() {
                    if let Err(e) = task.cancel() {
                        first_error.get_or_insert(e);
                    }
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for HookStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<&str> = self.slots.iter().map(Slot::kind).collect();
        f.debug_struct("HookStore")
            .field("slots", &kinds)
            .field("mounted", &self.mounted)
            .finish()
    }
}

/// Hook stores of every live shadow node, keyed by node identity.
#[derive(Debug, Default)]
pub struct HookArena {
    stores: HashMap<NodeId, HookStore>,
}

impl HookArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// The store of `node`, created on first use.
    pub fn store_mut(&mut self, node: NodeId) -> &mut HookStore {
        self.stores.entry(node).or_default()
    }

    /// The store of `node`, if it has one.
    pub fn get(&self, node: NodeId) -> Option<&HookStore> {
        self.stores.get(&node)
    }

    /// Number of stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// True when no node holds a store.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Bring effect tasks in line with a freshly reconciled tree.
    ///
    /// Stores of nodes missing from `reachable` are dropped after their
    /// tasks are cancelled; pending effects of the remaining stores are
    /// (re)started. Every store is processed even if one fails, and the
    /// first error is returned.
    pub fn sync_effects(&mut self, reachable: &HashSet<NodeId>, events: &EventSender) -> Result<()> {
        let mut first_error = None;
        let gone: Vec<NodeId> = self
            .stores
            .keys()
            .filter(|id| !reachable.contains(id))
            .copied()
            .collect();
        for id in gone {
            if let Some(mut store) = self.stores.remove(&id) {
                tracing::trace!(node = %id, "dropping unreachable hook store");
                if let Err(e) = store.cancel_all() {
                    first_error.get_or_insert(e);
                }
            }
        }
        for (id, store) in &mut self.stores {
            if let Err(e) = store.start_pending(*id, events) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Cancel every task and drop every store.
    pub fn shutdown(&mut self) -> Result<()> {
        let mut first_error = None;
        for (_, mut store) in self.stores.drain() {
            if let Err(e) = store.cancel_all() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
