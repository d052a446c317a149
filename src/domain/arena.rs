use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::node::BlockNode;
use crate::domain::record::BlockValue;

/// Node slot in the assembly arena.
#[derive(Debug)]
pub struct ArenaNode {
    /// Record payload for this node
    pub value: BlockValue,
    /// Index of the node that currently owns this one, None while unattached
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in declaration order
    pub children: Vec<Index>,
}

/// Arena holding every node of one build.
///
/// Children are linked by index, so a node has at most one parent and no
/// back-references exist outside the `parent` slot. Once linking is done the
/// arena is detached into an owned [`BlockNode`] tree.
#[derive(Debug, Default)]
pub struct TreeArena {
    arena: Arena<ArenaNode>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
        }
    }

    #[instrument(level = "trace", skip(self, value), fields(id = %value.id))]
    pub fn insert(&mut self, value: BlockValue) -> Index {
        self.arena.insert(ArenaNode {
            value,
            parent: None,
            children: Vec::new(),
        })
    }

    pub fn get(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Append `child` to `parent`'s children.
    ///
    /// A node has a single owner: if `child` was already attached elsewhere it
    /// is removed from that parent first and the previous parent is returned.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, parent: Index, child: Index) -> Option<Index> {
        let previous = self.arena.get(child).and_then(|node| node.parent);

        if let Some(prev_idx) = previous {
            if let Some(prev) = self.arena.get_mut(prev_idx) {
                prev.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }

        previous
    }

    /// Move the subtree under `root` out of the arena into owned nodes.
    ///
    /// Each slot is taken at most once; reaching a slot that was already
    /// taken means the links form a cycle, reported with that node's id.
    /// Works with an explicit stack, so tree depth is bounded by memory only.
    #[instrument(level = "debug", skip(self))]
    pub fn detach(&mut self, root: Index) -> Result<BlockNode, DomainError> {
        let mut taken: HashMap<Index, String> = HashMap::new();
        let mut pre_order: Vec<(Index, ArenaNode)> = Vec::new();
        let mut stack = vec![root];

        while let Some(idx) = stack.pop() {
            let node = self.arena.remove(idx).ok_or_else(|| {
                DomainError::CycleDetected(taken.get(&idx).cloned().unwrap_or_default())
            })?;
            taken.insert(idx, node.value.id.clone());
            stack.extend(node.children.iter().rev());
            pre_order.push((idx, node));
        }

        // Children follow their parent in pre-order, so building in reverse
        // finds every child already built.
        let mut built: HashMap<Index, BlockNode> = HashMap::with_capacity(pre_order.len());
        for (idx, node) in pre_order.into_iter().rev() {
            let children = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(idx, BlockNode::new(node.value, children));
        }

        built
            .remove(&root)
            .ok_or_else(|| DomainError::CycleDetected(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_moves_child_to_last_parent() {
        let mut arena = TreeArena::new();
        let a = arena.insert(BlockValue::new("a", "text"));
        let b = arena.insert(BlockValue::new("b", "text"));
        let c = arena.insert(BlockValue::new("c", "text"));

        assert_eq!(arena.attach(a, c), None);
        assert_eq!(arena.attach(b, c), Some(a));

        assert!(arena.get(a).unwrap().children.is_empty());
        assert_eq!(arena.get(b).unwrap().children, vec![c]);
        assert_eq!(arena.get(c).unwrap().parent, Some(b));
    }

    #[test]
    fn test_detach_builds_owned_tree() {
        let mut arena = TreeArena::new();
        let root = arena.insert(BlockValue::new("root", "page"));
        let child = arena.insert(BlockValue::new("child", "text"));
        arena.attach(root, child);

        let tree = arena.detach(root).unwrap();

        assert_eq!(tree.id(), "root");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].id(), "child");
        assert!(arena.is_empty());
    }

    #[test]
    fn test_detach_reports_cycle() {
        let mut arena = TreeArena::new();
        let a = arena.insert(BlockValue::new("a", "text"));
        let b = arena.insert(BlockValue::new("b", "text"));
        arena.attach(a, b);
        arena.attach(b, a);

        let err = arena.detach(a).unwrap_err();

        assert_eq!(err, DomainError::CycleDetected("a".to_string()));
    }

    #[test]
    fn test_detach_handles_deep_chain() {
        let mut arena = TreeArena::new();
        let root = arena.insert(BlockValue::new("b0", "page"));
        let mut parent = root;
        for i in 1..200_000 {
            let child = arena.insert(BlockValue::new(format!("b{i}"), "toggle"));
            arena.attach(parent, child);
            parent = child;
        }

        let tree = arena.detach(root).unwrap();

        assert_eq!(tree.id(), "b0");
        assert_eq!(tree.node_count(), 200_000);
        // Drop level by level; the owned tree drops recursively
        let mut next = Some(tree);
        while let Some(mut node) = next {
            next = node.children.pop();
        }
    }
}
