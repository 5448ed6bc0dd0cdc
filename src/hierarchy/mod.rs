//! Hierarchical composition of machines.
//!
//! A [`Hierarchy`] owns a set of machines, each bound to its own domain
//! object, and records parent/child links between them. Machines never touch
//! each other's state directly: a transform asks for a transition elsewhere
//! through [`crate::machine::TransitionContext::request`], and the hierarchy
//! applies it through the target machine's own resolution, so validation,
//! observers and history apply to every state change.
//!
//! # Example
//!
//! ```rust
//! use statute::hierarchy::{Hierarchy, Target};
//! use statute::machine::{Machine, Transition};
//! use statute::state_enum;
//!
//! state_enum! {
//!     enum Tab {
//!         Visible,
//!         Hidden,
//!     }
//! }
//!
//! let mut tabs = Hierarchy::new();
//! let root = tabs.insert("Tabs", Machine::<(), Tab>::new(Tab::Visible, vec![]), Some(())).unwrap();
//!
//! let account = Machine::<(), Tab>::new(
//!     Tab::Visible,
//!     vec![Transition::new(Tab::Visible, Tab::Hidden, |_, ctx| {
//!         ctx.request(Target::sibling("SearchTab"), Tab::Visible);
//!         Ok(())
//!     })],
//! );
//! let search = Machine::<(), Tab>::new(
//!     Tab::Hidden,
//!     vec![Transition::new(Tab::Hidden, Tab::Visible, |_, _| Ok(()))],
//! );
//!
//! let account = tabs.insert_child(root, "AccountTab", account, Some(())).unwrap();
//! let search = tabs.insert_child(root, "SearchTab", search, Some(())).unwrap();
//!
//! let report = tabs.perform(account, Tab::Hidden).unwrap();
//! assert_eq!(report.len(), 2);
//! assert_eq!(tabs.current_state_name(search), Some("Visible"));
//! ```

mod error;
mod node;
mod request;

pub use error::HierarchyError;
pub use node::MachineNode;
pub use request::{MachineId, Target, TransitionRequest};

use crate::core::State;
use crate::machine::Machine;
use node::ManagedMachine;
use std::collections::{HashMap, HashSet, VecDeque};

/// Dispatch limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Maximum number of requests applied by a single dispatch, counting
    /// the initial one. Bounds runaway request cascades.
    pub max_cascade: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { max_cascade: 64 }
    }
}

/// One request applied during a dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedTransition {
    pub machine: MachineId,
    pub name: String,
    pub state: String,
}

/// Requests applied by a dispatch, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    applied: Vec<AppliedTransition>,
}

impl DispatchReport {
    pub fn applied(&self) -> &[AppliedTransition] {
        &self.applied
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

struct Entry {
    name: String,
    parents: Vec<MachineId>,
    children: Vec<MachineId>,
    node: Box<dyn ManagedMachine>,
}

/// Arena of machines linked by parent/child relations.
///
/// Parents own their children: removing a machine also removes every child
/// left without a parent. Parent links are back-references only.
#[derive(Default)]
pub struct Hierarchy {
    config: DispatchConfig,
    entries: HashMap<MachineId, Entry>,
    names: HashMap<String, MachineId>,
}

impl Hierarchy {
    /// Create an empty hierarchy with the default dispatch limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty hierarchy with custom dispatch limits.
    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Get dispatch limits
    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    /// Number of registered machines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether `id` is still registered.
    pub fn contains(&self, id: MachineId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Register a root machine under a unique name.
    pub fn insert<T, S, P>(
        &mut self,
        name: impl Into<String>,
        machine: Machine<T, S, P>,
        object: Option<T>,
    ) -> Result<MachineId, HierarchyError>
    where
        T: Send + 'static,
        S: State + 'static,
        P: Send + 'static,
    {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(HierarchyError::DuplicateName { name });
        }

        let id = MachineId::new();
        tracing::debug!(machine = %name, %id, "registering machine");
        self.names.insert(name.clone(), id);
        self.entries.insert(
            id,
            Entry {
                name,
                parents: Vec::new(),
                children: Vec::new(),
                node: Box::new(MachineNode::new(machine, object)),
            },
        );
        Ok(id)
    }

    /// Register a machine owned by `parent`.
    pub fn insert_child<T, S, P>(
        &mut self,
        parent: MachineId,
        name: impl Into<String>,
        machine: Machine<T, S, P>,
        object: Option<T>,
    ) -> Result<MachineId, HierarchyError>
    where
        T: Send + 'static,
        S: State + 'static,
        P: Send + 'static,
    {
        self.entry(parent)?;
        let child = self.insert(name, machine, object)?;
        self.link(parent, child);
        Ok(child)
    }

    /// Make `child` an owned child of `parent` as well.
    pub fn adopt(&mut self, parent: MachineId, child: MachineId) -> Result<(), HierarchyError> {
        let parent_name = self.entry(parent)?.name.clone();
        let child_name = self.entry(child)?.name.clone();

        if parent == child || self.ancestors(parent).contains(&child) {
            return Err(HierarchyError::Cycle {
                parent: parent_name,
                child: child_name,
            });
        }

        self.link(parent, child);
        Ok(())
    }

    /// Remove a machine and every descendant left without a parent.
    ///
    /// Returns the ids removed, starting with `id`.
    pub fn remove(&mut self, id: MachineId) -> Result<Vec<MachineId>, HierarchyError> {
        self.entry(id)?;

        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(entry) = self.entries.remove(&current) else {
                continue;
            };
            self.names.remove(&entry.name);

            for parent in &entry.parents {
                if let Some(p) = self.entries.get_mut(parent) {
                    p.children.retain(|c| *c != current);
                }
            }
            for child in &entry.children {
                if let Some(c) = self.entries.get_mut(child) {
                    c.parents.retain(|p| *p != current);
                    if c.parents.is_empty() {
                        pending.push(*child);
                    }
                }
            }

            tracing::debug!(machine = %entry.name, id = %current, "removed machine");
            removed.push(current);
        }
        Ok(removed)
    }

    /// Look up a machine by its registered name.
    pub fn id_of(&self, name: &str) -> Option<MachineId> {
        self.names.get(name).copied()
    }

    /// Name a machine was registered under.
    pub fn name_of(&self, id: MachineId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.name.as_str())
    }

    /// Owned children, in registration order.
    pub fn children(&self, id: MachineId) -> Option<&[MachineId]> {
        self.entries.get(&id).map(|e| e.children.as_slice())
    }

    /// Machines owning `id`.
    pub fn parents(&self, id: MachineId) -> Option<&[MachineId]> {
        self.entries.get(&id).map(|e| e.parents.as_slice())
    }

    /// Machines sharing at least one parent with `id`, in parent then
    /// child order, without duplicates.
    pub fn siblings(&self, id: MachineId) -> Vec<MachineId> {
        let mut seen = HashSet::new();
        self.parents(id)
            .unwrap_or_default()
            .iter()
            .filter_map(|p| self.children(*p))
            .flatten()
            .copied()
            .filter(|c| *c != id && seen.insert(*c))
            .collect()
    }

    /// Name of the current state, without knowing the machine's types.
    pub fn current_state_name(&self, id: MachineId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.node.current_state_name())
    }

    /// Typed access to a registered machine and its object.
    ///
    /// Returns `None` for unknown ids or when `T`, `S`, `P` differ from the
    /// types the machine was registered with.
    pub fn node<T, S, P>(&self, id: MachineId) -> Option<&MachineNode<T, S, P>>
    where
        T: Send + 'static,
        S: State + 'static,
        P: Send + 'static,
    {
        self.entries
            .get(&id)?
            .node
            .as_any()
            .downcast_ref::<MachineNode<T, S, P>>()
    }

    /// Mutable variant of [`Hierarchy::node`].
    pub fn node_mut<T, S, P>(&mut self, id: MachineId) -> Option<&mut MachineNode<T, S, P>>
    where
        T: Send + 'static,
        S: State + 'static,
        P: Send + 'static,
    {
        self.entries
            .get_mut(&id)?
            .node
            .as_any_mut()
            .downcast_mut::<MachineNode<T, S, P>>()
    }

    /// Typed access to a registered machine.
    pub fn machine<T, S, P>(&self, id: MachineId) -> Option<&Machine<T, S, P>>
    where
        T: Send + 'static,
        S: State + 'static,
        P: Send + 'static,
    {
        self.node::<T, S, P>(id).map(MachineNode::machine)
    }

    /// Typed mutable access to a registered machine.
    ///
    /// Transitions performed through it keep their requests in the machine's
    /// own outbox; pass them to [`Hierarchy::dispatch`] to apply them.
    pub fn machine_mut<T, S, P>(&mut self, id: MachineId) -> Option<&mut Machine<T, S, P>>
    where
        T: Send + 'static,
        S: State + 'static,
        P: Send + 'static,
    {
        self.node_mut::<T, S, P>(id).map(MachineNode::machine_mut)
    }

    /// Domain object bound to a registered machine.
    pub fn object<T, S, P>(&self, id: MachineId) -> Option<&T>
    where
        T: Send + 'static,
        S: State + 'static,
        P: Send + 'static,
    {
        self.node::<T, S, P>(id)?.object()
    }

    /// Move machine `id` to `state`, then apply every request its transform
    /// (and any transform it triggers) emits.
    pub fn perform<S: State + 'static>(
        &mut self,
        id: MachineId,
        state: S,
    ) -> Result<DispatchReport, HierarchyError> {
        self.dispatch(id, TransitionRequest::new(Target::Id(id), state))
    }

    /// Like [`Hierarchy::perform`], handing `payload` to the transform.
    pub fn perform_with<S: State + 'static, P: Send + 'static>(
        &mut self,
        id: MachineId,
        state: S,
        payload: P,
    ) -> Result<DispatchReport, HierarchyError> {
        self.dispatch(
            id,
            TransitionRequest::new(Target::Id(id), state).with_payload(payload),
        )
    }

    /// Apply `request` as if emitted by machine `origin`.
    ///
    /// Requests are applied breadth-first. The first failure stops the
    /// dispatch; requests applied before it are not rolled back.
    pub fn dispatch(
        &mut self,
        origin: MachineId,
        request: TransitionRequest,
    ) -> Result<DispatchReport, HierarchyError> {
        self.entry(origin)?;

        let mut report = DispatchReport::default();
        let mut queue = VecDeque::from([(origin, request)]);

        while let Some((from, request)) = queue.pop_front() {
            if report.applied.len() >= self.config.max_cascade {
                tracing::warn!(
                    limit = self.config.max_cascade,
                    pending = queue.len() + 1,
                    "dispatch cascade limit reached"
                );
                return Err(HierarchyError::CascadeLimit {
                    limit: self.config.max_cascade,
                });
            }

            let id = self.resolve_target(from, request.target())?;
            let entry = self
                .entries
                .get_mut(&id)
                .ok_or(HierarchyError::UnknownMachine { id })?;
            let state = request.state_name().to_string();

            tracing::debug!(machine = %entry.name, state = %state, "dispatching transition request");
            let emitted = entry.node.apply(&entry.name, request)?;

            report.applied.push(AppliedTransition {
                machine: id,
                name: entry.name.clone(),
                state,
            });
            queue.extend(emitted.into_iter().map(|r| (id, r)));
        }

        Ok(report)
    }

    fn resolve_target(&self, origin: MachineId, target: &Target) -> Result<MachineId, HierarchyError> {
        match target {
            Target::Id(id) => {
                self.entry(*id)?;
                Ok(*id)
            }
            Target::Named(name) => self.id_of(name).ok_or_else(|| HierarchyError::UnknownTarget {
                target: target.clone(),
            }),
            Target::Sibling(name) => {
                let id = self.id_of(name).ok_or_else(|| HierarchyError::UnknownTarget {
                    target: target.clone(),
                })?;
                if self.siblings(origin).contains(&id) {
                    Ok(id)
                } else {
                    Err(HierarchyError::NotASibling { name: name.clone() })
                }
            }
        }
    }

    fn entry(&self, id: MachineId) -> Result<&Entry, HierarchyError> {
        self.entries
            .get(&id)
            .ok_or(HierarchyError::UnknownMachine { id })
    }

    fn link(&mut self, parent: MachineId, child: MachineId) {
        if let Some(p) = self.entries.get_mut(&parent) {
            if !p.children.contains(&child) {
                p.children.push(child);
            }
        }
        if let Some(c) = self.entries.get_mut(&child) {
            if !c.parents.contains(&parent) {
                c.parents.push(parent);
            }
        }
    }

    fn ancestors(&self, id: MachineId) -> HashSet<MachineId> {
        let mut seen = HashSet::new();
        let mut pending: Vec<MachineId> = self.parents(id).unwrap_or_default().to_vec();
        while let Some(current) = pending.pop() {
            if seen.insert(current) {
                pending.extend_from_slice(self.parents(current).unwrap_or_default());
            }
        }
        seen
    }
}

impl std::fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hierarchy")
            .field("config", &self.config)
            .field("machines", &self.names)
            .finish()
    }
}
