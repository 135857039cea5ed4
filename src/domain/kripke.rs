//! Kripke models: extraction from open branches and modal evaluation

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::Serialize;

use crate::domain::branch::Branch;
use crate::domain::formula::{Connective, Formula, Notation};
use crate::domain::signed::{SignedFormula, World};

/// Worlds, a directed accessibility relation and a partial valuation.
///
/// Atoms without an entry at a world evaluate to false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KripkeModel {
    worlds: BTreeSet<World>,
    relation: BTreeSet<(World, World)>,
    valuation: BTreeMap<World, BTreeMap<String, bool>>,
}

impl KripkeModel {
    pub fn new(
        worlds: impl IntoIterator<Item = World>,
        relation: impl IntoIterator<Item = (World, World)>,
    ) -> Self {
        let mut model = Self {
            worlds: worlds.into_iter().collect(),
            relation: relation.into_iter().collect(),
            valuation: BTreeMap::new(),
        };
        let endpoints: Vec<World> = model.relation.iter().flat_map(|&(a, b)| [a, b]).collect();
        model.worlds.extend(endpoints);
        model
    }

    /// Read the model off a saturated open branch: worlds and edges as
    /// recorded, atoms valued by their signed occurrences. `None` for a
    /// closed branch.
    pub fn from_branch(branch: &Branch) -> Option<Self> {
        if branch.is_closed() {
            return None;
        }
        let mut model = Self::new(
            branch.worlds().iter().copied(),
            branch.edges().iter().copied(),
        );
        for sf in branch.formulas() {
            if let Formula::Atom(name) = sf.formula.as_ref() {
                model.set(sf.world, name, sf.sign.holds());
            }
        }
        Some(model)
    }

    pub fn set(&mut self, world: World, atom: &str, value: bool) {
        self.worlds.insert(world);
        self.valuation
            .entry(world)
            .or_default()
            .insert(atom.to_string(), value);
    }

    pub fn worlds(&self) -> &BTreeSet<World> {
        &self.worlds
    }

    pub fn relation(&self) -> &BTreeSet<(World, World)> {
        &self.relation
    }

    pub fn successors(&self, world: World) -> impl Iterator<Item = World> + '_ {
        self.relation
            .range((world, World::MIN)..=(world, World::MAX))
            .map(|&(_, to)| to)
    }

    /// Constrained atoms at `world`.
    pub fn valuation(&self, world: World) -> Option<&BTreeMap<String, bool>> {
        self.valuation.get(&world)
    }

    pub fn value(&self, world: World, atom: &str) -> bool {
        self.valuation
            .get(&world)
            .and_then(|v| v.get(atom))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_constrained(&self, world: World, atom: &str) -> bool {
        self.valuation
            .get(&world)
            .is_some_and(|v| v.contains_key(atom))
    }

    /// Standard modal satisfaction `M, world ⊨ formula`.
    pub fn satisfies(&self, formula: &Formula, world: World) -> bool {
        match formula {
            Formula::Atom(name) => self.value(world, name),
            Formula::Not(a) => !self.satisfies(a, world),
            Formula::And(a, b) => self.satisfies(a, world) && self.satisfies(b, world),
            Formula::Or(a, b) => self.satisfies(a, world) || self.satisfies(b, world),
            Formula::Implies(a, b) => !self.satisfies(a, world) || self.satisfies(b, world),
            Formula::Box(a) => self.successors(world).all(|next| self.satisfies(a, next)),
            Formula::Diamond(a) => self.successors(world).any(|next| self.satisfies(a, next)),
        }
    }

    pub fn satisfies_signed(&self, signed: &SignedFormula) -> bool {
        self.satisfies(&signed.formula, signed.world) == signed.sign.holds()
    }

    /// One-line summary of a world, e.g. `w0: p, ~q -> w1, w2`.
    pub fn describe_world(&self, world: World, notation: Notation) -> String {
        let literals = self
            .valuation(world)
            .map(|v| {
                v.iter()
                    .map(|(atom, &value)| {
                        if value {
                            atom.clone()
                        } else {
                            format!("{}{}", notation.symbol(Connective::Not), atom)
                        }
                    })
                    .join(", ")
            })
            .unwrap_or_default();
        let successors = self.successors(world).map(|w| format!("w{}", w)).join(", ");

        match (literals.is_empty(), successors.is_empty()) {
            (true, true) => format!("w{}", world),
            (false, true) => format!("w{}: {}", world, literals),
            (true, false) => format!("w{} -> {}", world, successors),
            (false, false) => format!("w{}: {} -> {}", world, literals, successors),
        }
    }
}
