use generational_arena::{Arena, Index};
use serde::{Serialize, Serializer};
use tracing::instrument;

use crate::domain::branch::Branch;
use crate::domain::rules::{Inference, Rule};
use crate::domain::signed::SignedFormula;

/// Lifecycle of one tableau segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum NodeStatus {
    Building,
    /// A β rule forked the branch here; the children carry the alternatives.
    Split { rule: Rule, premise: SignedFormula },
    /// Contradiction: `clash` and its conjugate are both on the branch.
    Closed { clash: SignedFormula },
    /// Saturated and open.
    Open,
}

impl NodeStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeStatus::Closed { .. } | NodeStatus::Open)
    }
}

/// Data payload of a tableau segment: the stretch of a branch between two
/// forks (or between a fork and a leaf).
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Signed formulas the segment starts with: the root assertion, or the
    /// β alternative that created this child
    pub seed: Vec<SignedFormula>,
    /// Rule effects applied along the segment, in order
    pub inferences: Vec<Inference>,
    pub status: NodeStatus,
    /// Full branch state, kept for terminal segments only
    pub branch: Option<Branch>,
}

impl NodeData {
    pub fn new(seed: Vec<SignedFormula>) -> Self {
        Self {
            seed,
            inferences: Vec::new(),
            status: NodeStatus::Building,
            branch: None,
        }
    }
}

/// Tree node in the arena-based tableau.
#[derive(Debug, Clone)]
pub struct TableauNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, left alternative first
    pub children: Vec<Index>,
}

/// Arena-based tableau tree. Owned by exactly one builder run.
#[derive(Debug, Clone)]
pub struct TableauTree {
    arena: Arena<TableauNode>,
    root: Option<Index>,
}

impl Default for TableauTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TableauTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = TableauNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TableauNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TableauNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Pre-order, left alternative first.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn open_leaves(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.data.status == NodeStatus::Open)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Every leaf has reached `Closed` or `Open`.
    pub fn is_complete(&self) -> bool {
        self.root.is_some()
            && self
                .iter()
                .all(|(_, node)| !node.children.is_empty() || node.data.status.is_terminal())
    }

    /// Complete and every leaf closed.
    pub fn is_closed(&self) -> bool {
        self.is_complete()
            && self.iter().all(|(_, node)| {
                !node.children.is_empty()
                    || matches!(node.data.status, NodeStatus::Closed { .. })
            })
    }

    /// Branch of the leftmost saturated-open leaf.
    pub fn first_open_branch(&self) -> Option<&Branch> {
        self.iter()
            .find(|(_, node)| node.data.status == NodeStatus::Open)
            .and_then(|(_, node)| node.data.branch.as_ref())
    }

    pub fn open_branches(&self) -> Vec<&Branch> {
        self.iter()
            .filter(|(_, node)| node.data.status == NodeStatus::Open)
            .filter_map(|(_, node)| node.data.branch.as_ref())
            .collect()
    }

    fn view(&self, idx: Index) -> Option<NodeView<'_>> {
        let node = self.get_node(idx)?;
        Some(NodeView {
            seed: &node.data.seed,
            inferences: &node.data.inferences,
            status: &node.data.status,
            children: node
                .children
                .iter()
                .filter_map(|&child| self.view(child))
                .collect(),
        })
    }
}

#[derive(Serialize)]
struct NodeView<'a> {
    seed: &'a [SignedFormula],
    inferences: &'a [Inference],
    status: &'a NodeStatus,
    children: Vec<NodeView<'a>>,
}

impl Serialize for TableauTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.and_then(|root| self.view(root)).serialize(serializer)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a TableauTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a TableauTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TableauNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
