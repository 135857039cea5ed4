//! Branch model: the signed formulas along one tableau path, plus the worlds
//! and accessibility edges introduced on it.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::domain::signed::{Sign, SignedFormula, World, ROOT_WORLD};

/// One path of the tableau. Growth is monotone: nothing is ever removed.
#[derive(Debug, Clone)]
pub struct Branch {
    formulas: Vec<SignedFormula>,
    /// position of each signed formula in `formulas`
    index: HashMap<SignedFormula, usize>,
    worlds: BTreeSet<World>,
    edges: BTreeSet<(World, World)>,
    /// edges whose target was an existing world picked by blocking
    reused: BTreeSet<(World, World)>,
    /// α/β rules already applied, by formula position
    applied: HashSet<usize>,
    /// modal-∃ rules already given a successor, by formula position
    fulfilled: HashSet<usize>,
    /// modal-∀ rules already pushed along an edge: (formula position, target)
    propagated: HashSet<(usize, World)>,
    /// first complementary pair found: (T position, F position)
    clash: Option<(usize, usize)>,
    next_world: World,
}

impl Branch {
    pub fn new(root: SignedFormula) -> Self {
        let mut branch = Self::empty();
        branch.add(root);
        branch
    }

    fn empty() -> Self {
        Self {
            formulas: Vec::new(),
            index: HashMap::new(),
            worlds: BTreeSet::from([ROOT_WORLD]),
            edges: BTreeSet::new(),
            reused: BTreeSet::new(),
            applied: HashSet::new(),
            fulfilled: HashSet::new(),
            propagated: HashSet::new(),
            clash: None,
            next_world: ROOT_WORLD + 1,
        }
    }

    /// Branch seeded with several signed formulas and edges, in order.
    pub fn from_parts(
        formulas: impl IntoIterator<Item = SignedFormula>,
        edges: impl IntoIterator<Item = (World, World)>,
    ) -> Self {
        let mut branch = Self::empty();
        for sf in formulas {
            branch.add(sf);
        }
        for (from, to) in edges {
            branch.add_edge(from, to);
        }
        branch
    }

    /// Add a signed formula. Returns `false` if it was already present.
    pub fn add(&mut self, signed: SignedFormula) -> bool {
        if self.index.contains_key(&signed) {
            return false;
        }
        self.register_world(signed.world);

        let position = self.formulas.len();
        if self.clash.is_none() {
            if let Some(&other) = self.index.get(&signed.conjugate()) {
                self.clash = Some(match signed.sign {
                    Sign::T => (position, other),
                    Sign::F => (other, position),
                });
            }
        }
        self.index.insert(signed.clone(), position);
        self.formulas.push(signed);
        true
    }

    fn register_world(&mut self, world: World) {
        self.worlds.insert(world);
        if world >= self.next_world {
            self.next_world = world + 1;
        }
    }

    pub fn contains(&self, signed: &SignedFormula) -> bool {
        self.index.contains_key(signed)
    }

    pub fn formulas(&self) -> &[SignedFormula] {
        &self.formulas
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    /// Signed formulas asserted at `world`, in accumulation order.
    pub fn label(&self, world: World) -> impl Iterator<Item = &SignedFormula> {
        self.formulas.iter().filter(move |sf| sf.world == world)
    }

    pub fn worlds(&self) -> &BTreeSet<World> {
        &self.worlds
    }

    pub fn edges(&self) -> &BTreeSet<(World, World)> {
        &self.edges
    }

    pub fn reused_edges(&self) -> &BTreeSet<(World, World)> {
        &self.reused
    }

    pub fn successors(&self, world: World) -> impl Iterator<Item = World> + '_ {
        self.edges
            .range((world, World::MIN)..=(world, World::MAX))
            .map(|&(_, to)| to)
    }

    /// Allocate a world never used on this branch.
    pub fn fresh_world(&mut self) -> World {
        let world = self.next_world;
        self.register_world(world);
        world
    }

    /// Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, from: World, to: World) -> bool {
        self.register_world(from);
        self.register_world(to);
        self.edges.insert((from, to))
    }

    pub(crate) fn record_reuse(&mut self, from: World, to: World) {
        self.reused.insert((from, to));
    }

    pub(crate) fn mark_applied(&mut self, position: usize) -> bool {
        self.applied.insert(position)
    }

    pub fn is_applied(&self, position: usize) -> bool {
        self.applied.contains(&position)
    }

    pub(crate) fn mark_fulfilled(&mut self, position: usize) -> bool {
        self.fulfilled.insert(position)
    }

    pub fn is_fulfilled(&self, position: usize) -> bool {
        self.fulfilled.contains(&position)
    }

    pub(crate) fn mark_propagated(&mut self, position: usize, target: World) -> bool {
        self.propagated.insert((position, target))
    }

    pub fn is_propagated(&self, position: usize, target: World) -> bool {
        self.propagated.contains(&(position, target))
    }

    /// Closed iff some `(φ, T, w)` and `(φ, F, w)` are both present.
    pub fn is_closed(&self) -> bool {
        self.clash.is_some()
    }

    /// The complementary pair that closed this branch, T side first.
    pub fn clash(&self) -> Option<(&SignedFormula, &SignedFormula)> {
        self.clash.map(|(t, f)| (&self.formulas[t], &self.formulas[f]))
    }
}
