//! Navigational tree over translation keys.

use std::collections::BTreeSet;

use crate::key;
use crate::tree::conflict::{
    Conflict,
    Resolution,
};
use crate::tree::node::{
    NodeArena,
    NodeId,
};

/// Tree mirroring the union of keys of every resource in a project.
///
/// The path from the (synthetic, unaddressable) root to a node is a key.
/// Siblings are ordered ascending by segment name. Consumers read the tree
/// through [`root`](Self::root), [`children`](Self::children),
/// [`is_leaf`](Self::is_leaf) and [`path`](Self::path); structure changes go
/// through the `*_node_by_key` operations.
///
/// Expand/collapse state is kept by key, so it survives the node churn of
/// rename and duplicate.
#[derive(Debug, Clone)]
pub struct TranslationTree {
    arena: NodeArena,
    root: NodeId,
    /// Keys of expanded nodes
    expanded: BTreeSet<String>,
}

impl Default for TranslationTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationTree {
    #[must_use]
    pub fn new() -> Self {
        let mut arena = NodeArena::default();
        let root = arena.alloc("");
        Self { arena, root, expanded: BTreeSet::new() }
    }

    /// Builds the whole tree from a flat key set.
    #[must_use]
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Self {
        let mut tree = Self::new();
        let root = tree.root;
        tree.arena.build_children(root, keys);
        tree
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.arena.children(node)
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(|n| n.parent)
    }

    /// Segment name of `node`. The root has an empty name.
    #[must_use]
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.arena.name(node)
    }

    #[must_use]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.arena.is_leaf(node)
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.arena.contains(node)
    }

    /// Number of nodes, not counting the root.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.arena.len().saturating_sub(1)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full key of `node`; empty for the root, `None` for stale ids.
    #[must_use]
    pub fn path(&self, node: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = node;
        while current != self.root {
            let n = self.arena.get(current)?;
            names.push(n.name.as_str());
            current = n.parent?;
        }
        names.reverse();
        Some(names.join("."))
    }

    /// Every node path in depth-first order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.collect_paths(|_| true)
    }

    /// Paths of childless nodes in depth-first order.
    #[must_use]
    pub fn leaf_keys(&self) -> Vec<String> {
        self.collect_paths(|node| self.arena.is_leaf(node))
    }

    fn collect_paths(&self, include: impl Fn(NodeId) -> bool) -> Vec<String> {
        let mut paths = Vec::new();
        let mut stack: Vec<(NodeId, String)> = self
            .children(self.root)
            .iter()
            .rev()
            .map(|child| (*child, self.name(*child).unwrap_or_default().to_string()))
            .collect();
        while let Some((node, path)) = stack.pop() {
            for child in self.children(node).iter().rev() {
                let child_path = key::create(&path, self.name(*child).unwrap_or_default());
                stack.push((*child, child_path));
            }
            if include(node) {
                paths.push(path);
            }
        }
        paths
    }

    /// Exact-path lookup.
    #[must_use]
    pub fn node_by_key(&self, key: &str) -> Option<NodeId> {
        if key.is_empty() {
            return None;
        }
        key::segments(key)
            .into_iter()
            .try_fold(self.root, |node, segment| self.arena.find_child(node, segment))
    }

    /// Deepest existing node on the way to `key` (excluding `key` itself), or
    /// the root.
    #[must_use]
    pub fn closest_parent_node(&self, key: &str) -> NodeId {
        key::ancestors(key)
            .into_iter()
            .rev()
            .find_map(|ancestor| self.node_by_key(ancestor))
            .unwrap_or(self.root)
    }

    /// Links a detached node under `parent` at its sorted position.
    pub(crate) fn insert_node_into(&mut self, node: NodeId, parent: NodeId) {
        self.arena.attach(node, parent);
    }

    /// Adds a node for `key`.
    ///
    /// Only one node is linked into the tree: the first missing segment
    /// below the closest existing ancestor, carrying any deeper segments as a
    /// pre-built chain. Returns `false` if the node already exists.
    pub fn add_node_by_key(&mut self, key: &str) -> bool {
        if !key::is_valid(key) || self.node_by_key(key).is_some() {
            return false;
        }
        let parent = self.closest_parent_node(key);
        let parent_key = self.path(parent).unwrap_or_default();
        let suffix = key::child_suffix(key, &parent_key);
        let segments = key::segments(suffix);
        let Some((first, rest)) = segments.split_first() else {
            return false;
        };

        let node = if rest.is_empty() {
            self.arena.alloc(*first)
        } else {
            self.arena.build(first, &[key::join(rest)])
        };
        self.insert_node_into(node, parent);
        true
    }

    /// Detaches the node at `key` together with its subtree.
    pub fn remove_node_by_key(&mut self, key: &str) -> bool {
        let Some(node) = self.node_by_key(key) else {
            return false;
        };
        self.arena.detach(node);
        self.arena.release_subtree(node);
        self.retain_expanded();
        true
    }

    /// Conflict information when `new_key` is occupied at the moment
    /// [`relocate_node_by_key`](Self::relocate_node_by_key) decides.
    ///
    /// A rename detaches the source first: a target inside the source is no
    /// longer occupied, and a target whose only child is the source counts
    /// as a leaf.
    #[must_use]
    pub fn conflict(&self, key: &str, new_key: &str, keep_source: bool) -> Option<Conflict> {
        if key == new_key {
            return None;
        }
        let source = self.node_by_key(key)?;
        let target = self.node_by_key(new_key)?;
        let target_is_leaf = if keep_source {
            self.arena.is_leaf(target)
        } else {
            if key::is_ancestor_of(key, new_key) {
                return None;
            }
            self.children(target).iter().all(|child| *child == source)
        };
        Some(Conflict { source_is_leaf: self.arena.is_leaf(source), target_is_leaf })
    }

    /// Moves the subtree at `key` to `new_key`.
    ///
    /// See [`relocate_node_by_key`](Self::relocate_node_by_key).
    pub fn rename_node_by_key(&mut self, key: &str, new_key: &str) -> Option<Vec<String>> {
        self.relocate_node_by_key(key, new_key, false, None)
    }

    /// Copies the subtree at `key` to `new_key`.
    ///
    /// See [`relocate_node_by_key`](Self::relocate_node_by_key).
    pub fn duplicate_node_by_key(&mut self, key: &str, new_key: &str) -> Option<Vec<String>> {
        self.relocate_node_by_key(key, new_key, true, None)
    }

    /// Re-roots (or copies) the subtree at `key` under `new_key`.
    ///
    /// With an occupied target and no explicit `resolution`, a leaf on either
    /// side replaces the target subtree; otherwise children are merged by
    /// segment name, replacing wherever one side is a leaf and recursing
    /// where both are namespaces. Returns the target paths whose previous
    /// subtree was discarded, or `None` if `key` has no node.
    pub fn relocate_node_by_key(
        &mut self,
        key: &str,
        new_key: &str,
        keep_source: bool,
        resolution: Option<Resolution>,
    ) -> Option<Vec<String>> {
        let source = self.node_by_key(key)?;
        if key == new_key || !key::is_valid(new_key) {
            return Some(Vec::new());
        }

        let remapped: Vec<String> = self
            .expanded
            .iter()
            .filter(|k| k.as_str() == key || key::is_ancestor_of(key, k))
            .map(|k| key::create(new_key, key::child_suffix(k, key)))
            .collect();

        let incoming = self.arena.clone_subtree(source, key::last_segment(new_key))?;
        if !keep_source {
            self.arena.detach(source);
            self.arena.release_subtree(source);
        }

        let mut displaced = Vec::new();
        match self.node_by_key(new_key) {
            Some(target) => {
                let resolution = resolution.unwrap_or_else(|| {
                    Resolution::for_leaves(self.arena.is_leaf(incoming), self.arena.is_leaf(target))
                });
                match resolution {
                    Resolution::Replace => {
                        self.replace_node(target, incoming);
                        displaced.push(new_key.to_string());
                    }
                    Resolution::Merge => {
                        self.merge_nodes(incoming, target, new_key, &mut displaced);
                    }
                }
            }
            None => self.splice(new_key, incoming),
        }

        self.expanded.extend(remapped);
        self.retain_expanded();
        tracing::debug!(key, new_key, keep_source, displaced = ?displaced, "Relocated tree node");
        Some(displaced)
    }

    /// Puts `incoming` in place of `target` under the same parent.
    fn replace_node(&mut self, target: NodeId, incoming: NodeId) {
        if let Some(parent) = self.parent(target) {
            self.insert_node_into(incoming, parent);
        }
    }

    /// Moves the children of the detached `incoming` node into `target`.
    fn merge_nodes(
        &mut self,
        incoming: NodeId,
        target: NodeId,
        target_path: &str,
        displaced: &mut Vec<String>,
    ) {
        let children = self
            .arena
            .get_mut(incoming)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        self.arena.release(incoming);

        for child in children {
            let Some(name) = self.arena.name(child).map(str::to_string) else {
                continue;
            };
            let child_path = key::create(target_path, &name);
            match self.arena.find_child(target, &name) {
                Some(existing) if !self.arena.is_leaf(child) && !self.arena.is_leaf(existing) => {
                    self.merge_nodes(child, existing, &child_path, displaced);
                }
                Some(_) => {
                    self.insert_node_into(child, target);
                    displaced.push(child_path);
                }
                None => self.insert_node_into(child, target),
            }
        }
    }

    /// Links the detached `incoming` node at the unoccupied `key`, creating
    /// the missing intermediate nodes as one chain.
    fn splice(&mut self, key: &str, incoming: NodeId) {
        let parent = self.closest_parent_node(key);
        let parent_key = self.path(parent).unwrap_or_default();
        let segments = key::segments(key::child_suffix(key, &parent_key));
        let Some((last, chain)) = segments.split_last() else {
            return;
        };
        self.arena.rename(incoming, last);

        let mut top = incoming;
        for segment in chain.iter().rev() {
            let node = self.arena.alloc(*segment);
            self.insert_node_into(top, node);
            top = node;
        }
        self.insert_node_into(top, parent);
    }

    /// Marks the node at `key` expanded or collapsed. Returns `false` if
    /// there is no such node.
    pub fn set_expanded(&mut self, key: &str, expanded: bool) -> bool {
        if self.node_by_key(key).is_none() {
            return false;
        }
        if expanded {
            self.expanded.insert(key.to_string());
        } else {
            self.expanded.remove(key);
        }
        true
    }

    #[must_use]
    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    pub fn expanded_keys(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    /// Drops view state of nodes that no longer exist.
    fn retain_expanded(&mut self) {
        let expanded = std::mem::take(&mut self.expanded);
        self.expanded = expanded.into_iter().filter(|k| self.node_by_key(k).is_some()).collect();
    }
}
