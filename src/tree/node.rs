//! Node arena backing the translation tree.
//!
//! Nodes live in generational slots and refer to each other by [`NodeId`], so
//! moving or copying a subtree never aliases a live node and a stale id never
//! resolves to a node created later in the same slot.

use crate::key;

/// Handle to a node in a [`TranslationTree`](super::TranslationTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

/// One key segment.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    /// Sorted ascending by segment name
    pub(crate) children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct NodeArena {
    slots: Vec<Slot>,
    /// Indices of vacant slots
    free: Vec<usize>,
    len: usize,
}

impl NodeArena {
    /// Allocates a detached node without children.
    pub(crate) fn alloc(&mut self, name: impl Into<String>) -> NodeId {
        let node = Node { name: name.into(), parent: None, children: Vec::new() };
        self.len += 1;
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(index)
        {
            slot.node = Some(node);
            return NodeId { index, generation: slot.generation };
        }
        self.slots.push(Slot { generation: 0, node: Some(node) });
        NodeId { index: self.slots.len() - 1, generation: 0 }
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|node| node.name.as_str())
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    pub(crate) fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// Child of `parent` named `name`, found by binary search.
    pub(crate) fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let children = self.children(parent);
        children
            .binary_search_by(|child| self.name(*child).unwrap_or_default().cmp(name))
            .ok()
            .and_then(|index| children.get(index).copied())
    }

    /// Releases a single node. Its children are left untouched.
    pub(crate) fn release(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.index)
            && slot.generation == id.generation
            && slot.node.take().is_some()
        {
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            self.len -= 1;
        }
    }

    /// Releases `id` and everything below it.
    pub(crate) fn release_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend_from_slice(self.children(current));
            self.release(current);
        }
    }

    /// Builds a detached node named `name` whose descendants mirror
    /// `child_keys` (keys relative to the new node).
    ///
    /// Keys are partitioned by their first segment into one child per
    /// segment, recursing on the remaining suffixes.
    pub(crate) fn build<S: AsRef<str>>(&mut self, name: &str, child_keys: &[S]) -> NodeId {
        let node = self.alloc(name);
        self.build_children(node, child_keys);
        node
    }

    /// Adds children mirroring `keys` below `parent`.
    pub(crate) fn build_children<S: AsRef<str>>(&mut self, parent: NodeId, keys: &[S]) {
        for segment in key::unique_first_segments(keys) {
            let grandchildren = key::extract_child_keys(keys, &segment);
            let child = self.build(&segment, &grandchildren);
            self.attach(child, parent);
        }
    }

    /// Deep-copies the subtree at `id` into a detached node named `name`.
    pub(crate) fn clone_subtree(&mut self, id: NodeId, name: &str) -> Option<NodeId> {
        let children = self.get(id)?.children.clone();
        let copy = self.alloc(name);
        for child in children {
            let child_name = self.name(child).unwrap_or_default().to_string();
            if let Some(child_copy) = self.clone_subtree(child, &child_name)
                && let Some(node) = self.get_mut(child_copy)
            {
                node.parent = Some(copy);
                if let Some(parent) = self.get_mut(copy) {
                    parent.children.push(child_copy);
                }
            }
        }
        Some(copy)
    }

    /// Attaches a detached node under `parent`, keeping siblings sorted.
    ///
    /// A sibling with the same name is released and replaced in place.
    pub(crate) fn attach(&mut self, node: NodeId, parent: NodeId) {
        let Some(name) = self.name(node).map(str::to_string) else {
            return;
        };
        let position = {
            let children = self.children(parent);
            children.binary_search_by(|child| self.name(*child).unwrap_or_default().cmp(&name))
        };

        match position {
            Ok(index) => {
                let existing = self.children(parent).get(index).copied();
                if let Some(existing) = existing {
                    self.release_subtree(existing);
                }
                if let Some(parent_node) = self.get_mut(parent)
                    && let Some(slot) = parent_node.children.get_mut(index)
                {
                    *slot = node;
                }
            }
            Err(index) => {
                if let Some(parent_node) = self.get_mut(parent) {
                    parent_node.children.insert(index, node);
                }
            }
        }
        if let Some(child) = self.get_mut(node) {
            child.parent = Some(parent);
        }
    }

    /// Unlinks `node` from its parent. The subtree stays allocated.
    pub(crate) fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.get(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.retain(|child| *child != node);
        }
        if let Some(child) = self.get_mut(node) {
            child.parent = None;
        }
    }

    pub(crate) fn rename(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.get_mut(node) {
            name.clone_into(&mut n.name);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn child_names(arena: &NodeArena, id: NodeId) -> Vec<String> {
        arena.children(id).iter().map(|c| arena.name(*c).unwrap().to_string()).collect()
    }

    #[rstest]
    fn build_partitions_by_first_segment() {
        let mut arena = NodeArena::default();

        let root = arena.build("", &["b.x", "a.y", "b.z", "c"]);

        assert_eq!(child_names(&arena, root), vec!["a", "b", "c"]);
        let b = arena.find_child(root, "b").unwrap();
        assert_eq!(child_names(&arena, b), vec!["x", "z"]);
        assert_that!(arena.is_leaf(arena.find_child(root, "c").unwrap()), eq(true));
        assert_that!(arena.len(), eq(7));
    }

    #[rstest]
    fn attach_keeps_siblings_sorted() {
        let mut arena = NodeArena::default();
        let root = arena.alloc("");

        for name in ["m", "c", "x", "a"] {
            let node = arena.alloc(name);
            arena.attach(node, root);
        }

        assert_eq!(child_names(&arena, root), vec!["a", "c", "m", "x"]);
    }

    #[rstest]
    fn released_ids_are_stale() {
        let mut arena = NodeArena::default();
        let root = arena.build("", &["a.b"]);
        let a = arena.find_child(root, "a").unwrap();

        arena.detach(a);
        arena.release_subtree(a);
        let reused = arena.alloc("z");

        assert_that!(arena.contains(a), eq(false));
        assert_that!(arena.contains(reused), eq(true));
        assert_that!(arena.len(), eq(2));
        assert!(arena.children(root).is_empty());
    }

    #[rstest]
    fn clone_subtree_copies_structure() {
        let mut arena = NodeArena::default();
        let root = arena.build("", &["a.b.c", "a.d"]);
        let a = arena.find_child(root, "a").unwrap();

        let copy = arena.clone_subtree(a, "z").unwrap();

        assert_that!(arena.name(copy), some(eq("z")));
        assert_eq!(child_names(&arena, copy), vec!["b", "d"]);
        assert_ne!(arena.children(copy)[0], arena.children(a)[0]);
        assert_that!(arena.get(copy).unwrap().parent, none());
    }
}
