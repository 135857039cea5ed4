//! Shared test helpers: formula shorthands, proptest strategies and
//! exhaustive enumeration of small Kripke models.
#![allow(dead_code)]

use proptest::prelude::*;

use ktab::domain::{parse, Formula, KripkeModel, Sign, SignedFormula, World};

pub fn f(text: &str) -> Formula {
    parse(text).expect("test formula parses")
}

pub fn sf(text: &str, sign: Sign, world: World) -> SignedFormula {
    let root = SignedFormula::root(f(text), sign);
    SignedFormula::new(root.formula, sign, world)
}

/// Random formulas over atoms `p` and `q`, nesting depth at most 4.
pub fn arb_formula() -> impl Strategy<Value = Formula> {
    let leaf = prop_oneof![Just("p"), Just("q")].prop_map(Formula::atom);
    leaf.prop_recursive(4, 12, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Formula::not),
            inner.clone().prop_map(Formula::boxed),
            inner.clone().prop_map(Formula::diamond),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Formula::and(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Formula::or(a, b)),
            (inner.clone(), inner).prop_map(|(a, b)| Formula::implies(a, b)),
        ]
    })
}

/// First model with at most `max_worlds` worlds (ids `0..n`) over `atoms`
/// for which `pred` holds. Every relation and every total valuation is tried.
pub fn find_model(
    max_worlds: usize,
    atoms: &[&str],
    mut pred: impl FnMut(&KripkeModel) -> bool,
) -> Option<KripkeModel> {
    for n in 1..=max_worlds {
        let pairs: Vec<(World, World)> = (0..n).flat_map(|a| (0..n).map(move |b| (a, b))).collect();
        let slots = n * atoms.len();
        for rel_mask in 0u64..(1 << pairs.len()) {
            let relation = pairs
                .iter()
                .enumerate()
                .filter(|(i, _)| (rel_mask >> i) & 1 == 1)
                .map(|(_, &edge)| edge);
            let mut model = KripkeModel::new(0..n, relation);
            for val_mask in 0u64..(1 << slots) {
                for w in 0..n {
                    for (k, atom) in atoms.iter().enumerate() {
                        model.set(w, atom, (val_mask >> (w * atoms.len() + k)) & 1 == 1);
                    }
                }
                if pred(&model) {
                    return Some(model);
                }
            }
        }
    }
    None
}
