use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{KripkeModel, NodeStatus, Notation, TableauNode, TableauTree};

/// Conversion into a printable `termtree` tree.
pub trait TreeNodeConvert {
    fn to_tree_string(&self, notation: Notation) -> Tree<String>;
}

fn segment_label(node: &TableauNode, notation: Notation) -> String {
    let seed = node
        .data
        .seed
        .iter()
        .map(|sf| sf.render(notation))
        .collect::<Vec<_>>()
        .join(", ");
    match &node.data.status {
        NodeStatus::Building => seed,
        NodeStatus::Split { rule, premise } => {
            format!("{}  => split [{}] on {}", seed, rule, premise.render(notation))
        }
        NodeStatus::Closed { clash } => format!(
            "{}  => closed: {} / {}",
            seed,
            clash.render(notation),
            clash.conjugate().render(notation)
        ),
        NodeStatus::Open => format!("{}  => open (saturated)", seed),
    }
}

fn build_tree(tableau: &TableauTree, idx: Index, notation: Notation) -> Tree<String> {
    let Some(node) = tableau.get_node(idx) else {
        return Tree::new(String::new());
    };
    let mut tree = Tree::new(segment_label(node, notation));
    for inference in &node.data.inferences {
        tree.push(Tree::new(inference.render(notation)));
    }
    for &child in &node.children {
        tree.push(build_tree(tableau, child, notation));
    }
    tree
}

// One tree node per segment: inferences first, then the β alternatives
impl TreeNodeConvert for TableauTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, notation: Notation) -> Tree<String> {
        match self.root() {
            Some(root) => build_tree(self, root, notation),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

impl TreeNodeConvert for KripkeModel {
    fn to_tree_string(&self, notation: Notation) -> Tree<String> {
        let leaves: Vec<Tree<String>> = self
            .worlds()
            .iter()
            .map(|&w| Tree::new(self.describe_world(w, notation)))
            .collect();
        Tree::new(format!(
            "Kripke model ({} worlds, {} edges)",
            self.worlds().len(),
            self.relation().len()
        ))
        .with_leaves(leaves)
    }
}
