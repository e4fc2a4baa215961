//! Reconciler: turns a node tree into a concrete element tree while keeping
//! component identity (and with it hook state) stable across renders.
//!
//! Matching is positional. A component call reuses the shadow node at the
//! same position if that node came from the same function with the same
//! key; otherwise it mounts fresh. Raw elements always take over the
//! previous node's identity at their position, whatever it was.

use crate::element::{ComponentIdentity, Container, Element, Node};
use crate::error::Result;
use crate::hooks::{HookArena, Hooks, NodeId};
use crate::runtime::EventSender;
use std::collections::HashSet;

/// What produced a shadow node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShadowKind {
    /// A component call.
    Component {
        /// Function and props type.
        identity: ComponentIdentity,
        /// Identity key.
        key: Option<String>,
    },
    /// A raw container element.
    Container,
    /// A raw text element.
    Text,
}

/// A persistent node of the shadow tree.
#[derive(Debug, Clone)]
pub struct ShadowNode {
    id: NodeId,
    generation: u64,
    kind: ShadowKind,
    children: Vec<ShadowNode>,
}

impl ShadowNode {
    /// Stable identity; keys the node's hook store.
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The render generation that last visited this node.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// What produced the node.
    pub const fn kind(&self) -> &ShadowKind {
        &self.kind
    }

    /// Child nodes. A component has exactly one: its rendered output.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Collect the identities of this node and all descendants.
    pub fn collect_ids(&self, out: &mut HashSet<NodeId>) {
        out.insert(self.id);
        for child in &self.children {
            child.collect_ids(out);
        }
    }

    fn matches(&self, identity: ComponentIdentity, key: Option<&str>) -> bool {
        matches!(&self.kind, ShadowKind::Component { identity: i, key: k }
            if *i == identity && k.as_deref() == key)
    }
}

/// Owns the shadow tree and the hook arena.
#[derive(Debug, Default)]
pub struct Reconciler {
    next_id: u64,
    generation: u64,
    root: Option<ShadowNode>,
    arena: HookArena,
}

impl Reconciler {
    /// Create a reconciler with an empty shadow tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current shadow tree.
    pub const fn root(&self) -> Option<&ShadowNode> {
        self.root.as_ref()
    }

    /// Hook stores of the live nodes.
    pub const fn arena(&self) -> &HookArena {
        &self.arena
    }

    /// Number of completed renders.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Reconcile `root` against the previous shadow tree and return the
    /// concrete element tree.
    ///
    /// On error the previous shadow tree is discarded.
    pub fn render(&mut self, root: &Node, events: &EventSender) -> Result<Element> {
        self.generation += 1;
        let previous = self.root.take();
        let (shadow, element) = self.reconcile(root, previous, events)?;
        self.root = Some(shadow);
        Ok(element)
    }

    /// Cancel effects of unreachable nodes and start pending ones.
    pub fn sync_effects(&mut self, events: &EventSender) -> Result<()> {
        let mut reachable = HashSet::new();
        if let Some(root) = &self.root {
            root.collect_ids(&mut reachable);
        }
        self.arena.sync_effects(&reachable, events)
    }

    /// Cancel every effect and forget the shadow tree.
    pub fn shutdown(&mut self) -> Result<()> {
        self.root = None;
        self.arena.shutdown()
    }

    fn fresh_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId::new(self.next_id)
    }

    fn reconcile(
        &mut self,
        node: &Node,
        previous: Option<ShadowNode>,
        events: &EventSender,
    ) -> Result<(ShadowNode, Element)> {
        match node {
            Node::Component(component) => {
                let identity = component.identity();
                let reused = previous.filter(|p| p.matches(identity, component.key()));
                let (id, previous_children) = match reused {
                    Some(p) => (p.id, p.children),
                    None => (self.fresh_id(), Vec::new()),
                };
                tracing::trace!(node = %id, reused = !previous_children.is_empty(), "rendering component");

                let store = self.arena.store_mut(id);
                let mut hooks = Hooks::new(id, store, events);
                let output = component.render(&mut hooks)?;
                hooks.finish()?;

                let previous_child = previous_children.into_iter().next();
                let (child, element) = self.reconcile(&output, previous_child, events)?;
                let shadow = ShadowNode {
                    id,
                    generation: self.generation,
                    kind: ShadowKind::Component {
                        identity,
                        key: component.key().map(str::to_owned),
                    },
                    children: vec![child],
                };
                Ok((shadow, element))
            }
            Node::Element(element) => {
                let (id, previous_children) = match previous {
                    Some(p) => (p.id, p.children),
                    None => (self.fresh_id(), Vec::new()),
                };
                match element {
                    Element::Container(container) => {
                        let mut previous_children = previous_children.into_iter();
                        let mut shadows = Vec::with_capacity(container.children.len());
                        let mut resolved = Vec::with_capacity(container.children.len());
                        for child in &container.children {
                            let (shadow, element) =
                                self.reconcile(child, previous_children.next(), events)?;
                            shadows.push(shadow);
                            resolved.push(Node::Element(element));
                        }
                        let shadow = ShadowNode {
                            id,
                            generation: self.generation,
                            kind: ShadowKind::Container,
                            children: shadows,
                        };
                        let concrete = Container {
                            style: container.style.clone(),
                            children: resolved,
                            handlers: container.handlers.clone(),
                        };
                        Ok((shadow, Element::Container(concrete)))
                    }
                    Element::Text(text) => {
                        let shadow = ShadowNode {
                            id,
                            generation: self.generation,
                            kind: ShadowKind::Text,
                            children: Vec::new(),
                        };
                        Ok((shadow, Element::Text(text.clone())))
                    }
                }
            }
        }
    }
}
