//! Tableau rule table and the expansion engine.
//!
//! One engine step applies exactly one rule to a branch, in this order:
//! 1. the earliest pending α rule or modal-∀ propagation along an edge,
//! 2. else the earliest pending β rule (returned as a split),
//! 3. else the earliest unfulfilled modal-∃ rule,
//! 4. else the branch is saturated.
//!
//! Because modal-∃ rules only fire on a branch where every world is already
//! saturated, a world picked by blocking never receives anything new through
//! the reused edge.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::domain::branch::Branch;
use crate::domain::formula::{Connective, Formula, Notation};
use crate::domain::signed::{Sign, SignedFormula, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RuleKind {
    /// non-branching, same world
    Alpha,
    /// branching, same world
    Beta,
    /// needs a successor world
    ModalExists,
    /// applies to every successor world
    ModalForall,
}

/// A rule is identified by the sign and top connective it consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    pub sign: Sign,
    pub connective: Connective,
}

impl Rule {
    /// Rule consuming `signed`, `None` for signed atoms.
    pub fn for_signed(signed: &SignedFormula) -> Option<Rule> {
        signed.formula.connective().map(|connective| Rule {
            sign: signed.sign,
            connective,
        })
    }

    pub fn kind(self) -> RuleKind {
        use Connective::*;
        match (self.sign, self.connective) {
            (_, Not) => RuleKind::Alpha,
            (Sign::T, And) | (Sign::F, Or) | (Sign::F, Implies) => RuleKind::Alpha,
            (Sign::F, And) | (Sign::T, Or) | (Sign::T, Implies) => RuleKind::Beta,
            (Sign::F, Box) | (Sign::T, Diamond) => RuleKind::ModalExists,
            (Sign::T, Box) | (Sign::F, Diamond) => RuleKind::ModalForall,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.sign,
            Notation::Ascii.symbol(self.connective).trim()
        )
    }
}

/// What a rule concludes from one signed formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// add all, same world
    Alpha(Vec<SignedFormula>),
    /// one alternative per child branch
    Beta(SignedFormula, SignedFormula),
    /// `(formula, sign)` to assert at a successor world
    ModalExists(Arc<Formula>, Sign),
    /// `(formula, sign)` to assert at every successor world
    ModalForall(Arc<Formula>, Sign),
}

/// Pure rule table lookup; `None` for signed atoms.
pub fn expand(signed: &SignedFormula) -> Option<(Rule, Expansion)> {
    let rule = Rule::for_signed(signed)?;
    let w = signed.world;
    let at = |f: &Arc<Formula>, sign: Sign| SignedFormula::new(Arc::clone(f), sign, w);

    let expansion = match (signed.sign, signed.formula.as_ref()) {
        (sign, Formula::Not(a)) => Expansion::Alpha(vec![at(a, sign.flip())]),
        (Sign::T, Formula::And(a, b)) => Expansion::Alpha(vec![at(a, Sign::T), at(b, Sign::T)]),
        (Sign::F, Formula::And(a, b)) => Expansion::Beta(at(a, Sign::F), at(b, Sign::F)),
        (Sign::F, Formula::Or(a, b)) => Expansion::Alpha(vec![at(a, Sign::F), at(b, Sign::F)]),
        (Sign::T, Formula::Or(a, b)) => Expansion::Beta(at(a, Sign::T), at(b, Sign::T)),
        (Sign::T, Formula::Implies(a, b)) => Expansion::Beta(at(a, Sign::F), at(b, Sign::T)),
        (Sign::F, Formula::Implies(a, b)) => {
            Expansion::Alpha(vec![at(a, Sign::T), at(b, Sign::F)])
        }
        (Sign::F, Formula::Box(a)) => Expansion::ModalExists(Arc::clone(a), Sign::F),
        (Sign::T, Formula::Diamond(a)) => Expansion::ModalExists(Arc::clone(a), Sign::T),
        (Sign::T, Formula::Box(a)) => Expansion::ModalForall(Arc::clone(a), Sign::T),
        (Sign::F, Formula::Diamond(a)) => Expansion::ModalForall(Arc::clone(a), Sign::F),
        (_, Formula::Atom(_)) => return None,
    };
    Some((rule, expansion))
}

/// One recorded effect of a rule application, kept in the tableau tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Inference {
    /// A signed formula added to the branch.
    Derived {
        conclusion: SignedFormula,
        rule: Rule,
        premise: SignedFormula,
    },
    /// An accessibility edge created for a modal-∃ rule.
    Access {
        from: World,
        to: World,
        rule: Rule,
        premise: SignedFormula,
        /// target was an existing world chosen by blocking
        reused: bool,
    },
}

impl Inference {
    pub fn render(&self, notation: Notation) -> String {
        match self {
            Inference::Derived {
                conclusion, rule, ..
            } => format!("{}  [{}]", conclusion.render(notation), rule),
            Inference::Access {
                from,
                to,
                rule,
                reused,
                ..
            } => {
                let how = if *reused { "reuse" } else { "new" };
                format!("w{} -> w{}  [{}, {}]", from, to, rule, how)
            }
        }
    }
}

/// Outcome of a single engine step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The branch grew in place (possibly by nothing new, if all conclusions
    /// were already present).
    Extended(Vec<Inference>),
    /// A β rule was consumed; the caller forks the branch.
    Split {
        rule: Rule,
        premise: SignedFormula,
        left: SignedFormula,
        right: SignedFormula,
    },
    /// No rule applies.
    Saturated,
}

/// Applies tableau rules to branches.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionEngine {
    blocking: bool,
}

impl Default for ExpansionEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ExpansionEngine {
    pub fn new(blocking: bool) -> Self {
        Self { blocking }
    }

    /// Apply the next rule to `branch`. Closed branches are the caller's concern.
    pub fn step(&self, branch: &mut Branch) -> Step {
        if let Some(inferences) = self.apply_linear(branch) {
            return Step::Extended(inferences);
        }
        if let Some(split) = self.take_beta(branch) {
            return split;
        }
        if let Some(inferences) = self.apply_exists(branch) {
            return Step::Extended(inferences);
        }
        Step::Saturated
    }

    /// Whether `step` would return `Saturated`, without touching the branch.
    pub fn is_saturated(&self, branch: &Branch) -> bool {
        branch.formulas().iter().enumerate().all(|(position, sf)| {
            match expand(sf) {
                None => true,
                Some((_, Expansion::Alpha(_))) | Some((_, Expansion::Beta(..))) => {
                    branch.is_applied(position)
                }
                Some((_, Expansion::ModalExists(..))) => branch.is_fulfilled(position),
                Some((_, Expansion::ModalForall(..))) => branch
                    .successors(sf.world)
                    .all(|target| branch.is_propagated(position, target)),
            }
        })
    }

    fn apply_linear(&self, branch: &mut Branch) -> Option<Vec<Inference>> {
        for position in 0..branch.len() {
            let premise = branch.formulas()[position].clone();
            match expand(&premise) {
                Some((rule, Expansion::Alpha(conclusions))) if !branch.is_applied(position) => {
                    branch.mark_applied(position);
                    trace!("alpha {} on {}", rule, premise);
                    let inferences = conclusions
                        .into_iter()
                        .filter(|c| branch.add(c.clone()))
                        .map(|conclusion| Inference::Derived {
                            conclusion,
                            rule,
                            premise: premise.clone(),
                        })
                        .collect();
                    return Some(inferences);
                }
                Some((rule, Expansion::ModalForall(payload, sign))) => {
                    let targets: Vec<World> = branch
                        .successors(premise.world)
                        .filter(|&target| !branch.is_propagated(position, target))
                        .collect();
                    if targets.is_empty() {
                        continue;
                    }
                    trace!("forall {} on {} -> {:?}", rule, premise, targets);
                    let mut inferences = Vec::new();
                    for target in targets {
                        branch.mark_propagated(position, target);
                        let conclusion = SignedFormula::new(Arc::clone(&payload), sign, target);
                        if branch.add(conclusion.clone()) {
                            inferences.push(Inference::Derived {
                                conclusion,
                                rule,
                                premise: premise.clone(),
                            });
                        }
                    }
                    return Some(inferences);
                }
                _ => {}
            }
        }
        None
    }

    fn take_beta(&self, branch: &mut Branch) -> Option<Step> {
        for position in 0..branch.len() {
            if branch.is_applied(position) {
                continue;
            }
            let premise = branch.formulas()[position].clone();
            if let Some((rule, Expansion::Beta(left, right))) = expand(&premise) {
                branch.mark_applied(position);
                trace!("beta {} on {}", rule, premise);
                return Some(Step::Split {
                    rule,
                    premise,
                    left,
                    right,
                });
            }
        }
        None
    }

    fn apply_exists(&self, branch: &mut Branch) -> Option<Vec<Inference>> {
        for position in 0..branch.len() {
            if branch.is_fulfilled(position) {
                continue;
            }
            let premise = branch.formulas()[position].clone();
            let Some((rule, Expansion::ModalExists(payload, sign))) = expand(&premise) else {
                continue;
            };
            branch.mark_fulfilled(position);
            let from = premise.world;

            let blocker = if self.blocking {
                find_blocker(branch, from, &payload, sign)
            } else {
                None
            };

            let inferences = match blocker {
                Some(to) => {
                    if branch.add_edge(from, to) {
                        branch.record_reuse(from, to);
                    }
                    debug!("blocking: {} reuses w{} as successor of w{}", premise, to, from);
                    vec![Inference::Access {
                        from,
                        to,
                        rule,
                        premise,
                        reused: true,
                    }]
                }
                None => {
                    let to = branch.fresh_world();
                    branch.add_edge(from, to);
                    let conclusion = SignedFormula::new(payload, sign, to);
                    branch.add(conclusion.clone());
                    trace!("exists {} on {} -> fresh w{}", rule, premise, to);
                    vec![
                        Inference::Access {
                            from,
                            to,
                            rule,
                            premise: premise.clone(),
                            reused: false,
                        },
                        Inference::Derived {
                            conclusion,
                            rule,
                            premise,
                        },
                    ]
                }
            };
            return Some(inferences);
        }
        None
    }
}

/// Existing world whose label already contains everything a fresh successor
/// of `from` would receive: the modal-∃ payload plus every modal-∀ payload
/// asserted at `from`. Lowest world id wins.
fn find_blocker(
    branch: &Branch,
    from: World,
    payload: &Arc<Formula>,
    sign: Sign,
) -> Option<World> {
    let mut demand = vec![(Arc::clone(payload), sign)];
    for sf in branch.label(from) {
        if let Some((_, Expansion::ModalForall(f, s))) = expand(sf) {
            demand.push((f, s));
        }
    }

    branch.worlds().iter().copied().find(|&candidate| {
        demand
            .iter()
            .all(|(f, s)| branch.contains(&SignedFormula::new(Arc::clone(f), *s, candidate)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parser::parse;

    #[test]
    fn test_rule_kinds_follow_sign_and_connective() {
        let f = SignedFormula::root(parse("p & q").unwrap(), Sign::F);
        assert_eq!(Rule::for_signed(&f).map(Rule::kind), Some(RuleKind::Beta));
        let d = SignedFormula::root(parse("<>p").unwrap(), Sign::F);
        assert_eq!(Rule::for_signed(&d).map(Rule::kind), Some(RuleKind::ModalForall));
        let a = SignedFormula::root(parse("p").unwrap(), Sign::T);
        assert_eq!(Rule::for_signed(&a), None);
    }

    #[test]
    fn test_rule_display() {
        let rule = Rule {
            sign: Sign::F,
            connective: Connective::Implies,
        };
        assert_eq!(rule.to_string(), "F->");
    }
}
