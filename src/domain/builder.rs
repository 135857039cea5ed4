//! Tableau builder: grows a complete tableau tree from a root signed formula.

use tracing::{debug, error, instrument};

use crate::domain::arena::{NodeData, NodeStatus, TableauTree};
use crate::domain::branch::Branch;
use crate::domain::error::{Ceiling, DomainError, DomainResult};
use crate::domain::formula::Formula;
use crate::domain::rules::{ExpansionEngine, Rule, Step};
use crate::domain::signed::{Sign, SignedFormula};

/// Defensive bounds and policy switches for one builder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    /// Rule applications allowed along one root-to-leaf branch
    pub max_iterations: usize,
    /// Worlds allowed on one branch
    pub max_worlds: usize,
    /// Reuse an existing world for modal-∃ rules when its label covers the demand
    pub blocking: bool,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_worlds: 512,
            blocking: true,
        }
    }
}

enum Outcome {
    Closed(SignedFormula),
    Split {
        rule: Rule,
        premise: SignedFormula,
        left: SignedFormula,
        right: SignedFormula,
    },
    Open,
}

/// Constructs tableau trees. Stateless between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableauBuilder {
    engine: ExpansionEngine,
    limits: EngineLimits,
}

impl TableauBuilder {
    pub fn new(limits: EngineLimits) -> Self {
        Self {
            engine: ExpansionEngine::new(limits.blocking),
            limits,
        }
    }

    pub fn limits(&self) -> EngineLimits {
        self.limits
    }

    /// Tableau rooted at `(formula, sign, w0)`.
    pub fn build_for(&self, formula: Formula, sign: Sign) -> DomainResult<TableauTree> {
        self.build(SignedFormula::root(formula, sign))
    }

    /// Grow the tree until every leaf is closed or saturated-open.
    ///
    /// Branches are processed depth-first, left alternative first. A branch
    /// that exceeds a ceiling aborts the whole run with
    /// [`DomainError::LoopFault`].
    #[instrument(level = "debug", skip(self, root), fields(root = %root))]
    pub fn build(&self, root: SignedFormula) -> DomainResult<TableauTree> {
        let mut tree = TableauTree::new();
        let root_idx = tree.insert_node(NodeData::new(vec![root.clone()]), None);
        let mut stack = vec![(Branch::new(root), root_idx, 0usize)];

        while let Some((mut branch, node_idx, mut iterations)) = stack.pop() {
            let mut inferences = Vec::new();

            let outcome = loop {
                if let Some((clash, _)) = branch.clash() {
                    break Outcome::Closed(clash.clone());
                }
                if iterations >= self.limits.max_iterations {
                    return Err(self.fault(
                        Ceiling::Iterations(self.limits.max_iterations),
                        iterations,
                        &branch,
                    ));
                }
                iterations += 1;

                match self.engine.step(&mut branch) {
                    Step::Extended(mut applied) => inferences.append(&mut applied),
                    Step::Split {
                        rule,
                        premise,
                        left,
                        right,
                    } => {
                        break Outcome::Split {
                            rule,
                            premise,
                            left,
                            right,
                        }
                    }
                    Step::Saturated => break Outcome::Open,
                }

                if branch.worlds().len() > self.limits.max_worlds {
                    return Err(self.fault(
                        Ceiling::Worlds(self.limits.max_worlds),
                        iterations,
                        &branch,
                    ));
                }
            };

            let (status, kept) = match outcome {
                Outcome::Closed(clash) => {
                    debug!("closed on {} after {} steps", clash, iterations);
                    (NodeStatus::Closed { clash }, Some(branch))
                }
                Outcome::Open => {
                    debug!(
                        "saturated open: {} formulas, {} worlds",
                        branch.len(),
                        branch.worlds().len()
                    );
                    (NodeStatus::Open, Some(branch))
                }
                Outcome::Split {
                    rule,
                    premise,
                    left,
                    right,
                } => {
                    debug!("split {} on {}", rule, premise);
                    let mut left_branch = branch.clone();
                    let mut right_branch = branch;
                    left_branch.add(left.clone());
                    right_branch.add(right.clone());

                    let left_idx = tree.insert_node(NodeData::new(vec![left]), Some(node_idx));
                    let right_idx = tree.insert_node(NodeData::new(vec![right]), Some(node_idx));
                    // LIFO: left alternative is expanded first
                    stack.push((right_branch, right_idx, iterations));
                    stack.push((left_branch, left_idx, iterations));

                    (NodeStatus::Split { rule, premise }, None)
                }
            };

            if let Some(node) = tree.get_node_mut(node_idx) {
                node.data.inferences = inferences;
                node.data.status = status;
                node.data.branch = kept;
            }
        }

        debug!(
            "tableau complete: {} nodes, closed={}",
            tree.node_count(),
            tree.is_closed()
        );
        Ok(tree)
    }

    fn fault(&self, ceiling: Ceiling, iterations: usize, branch: &Branch) -> DomainError {
        let worlds = branch.worlds().len();
        error!(
            "loop guard tripped: {} ({} rule applications, {} worlds)",
            ceiling, iterations, worlds
        );
        DomainError::LoopFault {
            ceiling,
            iterations,
            worlds,
        }
    }
}
