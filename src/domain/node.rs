//! Owned block tree produced by assembly.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use termtree::Tree;

use crate::domain::record::BlockValue;

/// One block of the assembled page; exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockNode {
    #[serde(rename = "type")]
    pub block_type: String,
    /// The originating record, `properties` and `format` included.
    pub value: BlockValue,
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    pub fn new(value: BlockValue, children: Vec<BlockNode>) -> Self {
        Self {
            block_type: value.block_type.clone(),
            value,
            children,
        }
    }

    pub fn id(&self) -> &str {
        &self.value.id
    }

    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    pub fn value(&self) -> &BlockValue {
        &self.value
    }

    pub fn properties(&self) -> Option<&Value> {
        self.value.properties.as_ref()
    }

    pub fn format(&self) -> Option<&Value> {
        self.value.format.as_ref()
    }

    /// Pre-order traversal, children left to right.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter { stack: vec![self] }
    }

    /// Ids in pre-order.
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(BlockNode::id).collect()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Levels in this subtree; a lone node has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|c| (c, level + 1)));
        }
        deepest
    }

    pub fn leaf_ids(&self) -> Vec<&str> {
        self.iter()
            .filter(|n| n.is_leaf())
            .map(BlockNode::id)
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&BlockNode> {
        self.iter().find(|n| n.id() == id)
    }

    /// Shape-only comparison: same ids, types and child order.
    pub fn same_shape(&self, other: &BlockNode) -> bool {
        self.id() == other.id()
            && self.block_type == other.block_type
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }
}

impl fmt::Display for BlockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.block_type, self.id())
    }
}

pub struct PreOrderIter<'a> {
    stack: Vec<&'a BlockNode>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a BlockNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Conversion into a printable `termtree`.
pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for BlockNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(self.to_string()).with_leaves(leaves)
    }
}
