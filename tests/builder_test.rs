//! Tests for TableauBuilder

mod common;

use proptest::prelude::*;

use ktab::domain::{
    Ceiling, DomainError, EngineLimits, ExpansionEngine, NodeStatus, Sign, Step, TableauBuilder,
};
use ktab::util::testing;

use common::{arb_formula, f, sf};

fn build(text: &str, sign: Sign) -> ktab::domain::TableauTree {
    TableauBuilder::default()
        .build_for(f(text), sign)
        .expect("tableau completes")
}

fn unblocked() -> TableauBuilder {
    TableauBuilder::new(EngineLimits {
        blocking: false,
        ..EngineLimits::default()
    })
}

#[test]
fn given_disjunction_when_building_then_splits_into_two_open_leaves() {
    // Arrange
    testing::init_test_setup();

    // Act
    let tree = build("p | q", Sign::T);

    // Assert
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.depth(), 2);
    assert_eq!(tree.leaves().len(), 2);
    assert_eq!(tree.open_leaves().len(), 2);
    assert!(tree.is_complete());
    assert!(!tree.is_closed());
    let root = tree.get_node(tree.root().unwrap()).unwrap();
    assert!(matches!(root.data.status, NodeStatus::Split { .. }));
    let first = tree.first_open_branch().expect("open branch");
    assert!(first.contains(&sf("p", Sign::T, 0)));
}

#[test]
fn given_contradiction_when_building_then_single_closed_segment() {
    let tree = build("p & ~p", Sign::T);

    assert_eq!(tree.node_count(), 1);
    assert!(tree.is_closed());
    let root = tree.get_node(tree.root().unwrap()).unwrap();
    assert_eq!(
        root.data.status,
        NodeStatus::Closed {
            clash: sf("p", Sign::T, 0)
        }
    );
    assert!(tree.first_open_branch().is_none());
}

#[test]
fn given_every_alternative_refuted_when_building_then_all_leaves_closed() {
    let tree = build("(p | q) & ~p & ~q", Sign::T);

    assert_eq!(tree.node_count(), 3);
    assert!(tree.is_closed());
    assert!(tree.open_leaves().is_empty());
}

#[test]
fn given_nested_split_when_iterating_then_pre_order_left_first() {
    // Arrange
    let tree = build("(p | q) | r", Sign::T);

    // Act
    let seeds: Vec<String> = tree
        .iter()
        .map(|(_, node)| node.data.seed[0].to_string())
        .collect();
    let leaves: Vec<String> = tree
        .leaves()
        .into_iter()
        .map(|idx| tree.get_node(idx).unwrap().data.seed[0].to_string())
        .collect();

    // Assert
    assert_eq!(
        seeds,
        vec!["T p | q | r @w0", "T p | q @w0", "T p @w0", "T q @w0", "T r @w0"]
    );
    assert_eq!(leaves, vec!["T p @w0", "T q @w0", "T r @w0"]);
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.open_branches().len(), 3);
}

#[test]
fn given_world_already_holding_payload_when_blocking_then_reuses_root_world() {
    // Act
    let tree = build("p & <>p", Sign::T);

    // Assert
    let branch = tree.first_open_branch().expect("open");
    assert_eq!(branch.worlds().len(), 1);
    assert_eq!(branch.edges().iter().copied().collect::<Vec<_>>(), vec![(0, 0)]);
    assert!(branch.reused_edges().contains(&(0, 0)));
}

#[test]
fn given_same_formula_without_blocking_when_building_then_creates_fresh_world() {
    let tree = unblocked().build_for(f("p & <>p"), Sign::T).unwrap();

    let branch = tree.first_open_branch().expect("open");
    assert_eq!(branch.worlds().len(), 2);
    assert!(branch.reused_edges().is_empty());
}

#[test]
fn given_second_diamond_covered_by_existing_world_when_blocking_then_world_count_stays() {
    let tree = build("<>(p & q) & <>p", Sign::T);

    let branch = tree.first_open_branch().expect("open");
    assert_eq!(branch.worlds().len(), 2);
    assert_eq!(branch.edges().iter().copied().collect::<Vec<_>>(), vec![(0, 1)]);
}

#[test]
fn given_box_diamond_chain_when_blocking_then_fewer_worlds_than_unblocked() {
    // Arrange
    let text = "[]<>p & <>p";

    // Act
    let blocked = build(text, Sign::T);
    let plain = unblocked().build_for(f(text), Sign::T).unwrap();

    // Assert
    let blocked_branch = blocked.first_open_branch().unwrap();
    let plain_branch = plain.first_open_branch().unwrap();
    assert_eq!(blocked_branch.worlds().len(), 2);
    assert_eq!(
        blocked_branch.edges().iter().copied().collect::<Vec<_>>(),
        vec![(0, 1), (1, 1)]
    );
    assert_eq!(plain_branch.worlds().len(), 3);
}

#[test]
fn given_world_ceiling_of_one_when_diamond_needs_successor_then_loop_fault() {
    // Arrange
    let builder = TableauBuilder::new(EngineLimits {
        max_worlds: 1,
        ..EngineLimits::default()
    });

    // Act
    let result = builder.build_for(f("<>p"), Sign::T);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::LoopFault {
            ceiling: Ceiling::Worlds(1),
            iterations: 1,
            worlds: 2,
        }
    );
}

#[test]
fn given_iteration_ceiling_below_need_when_building_then_loop_fault() {
    let builder = TableauBuilder::new(EngineLimits {
        max_iterations: 2,
        ..EngineLimits::default()
    });

    let result = builder.build_for(f("p & q & r"), Sign::T);

    match result {
        Err(DomainError::LoopFault {
            ceiling: Ceiling::Iterations(2),
            iterations,
            ..
        }) => assert_eq!(iterations, 2),
        other => panic!("expected loop fault, got {:?}", other),
    }
}

#[test]
fn given_loop_fault_when_displayed_then_names_ceiling() {
    let err = DomainError::LoopFault {
        ceiling: Ceiling::Iterations(10),
        iterations: 10,
        worlds: 3,
    };
    assert_eq!(
        err.to_string(),
        "internal loop fault: branch exceeded max_iterations=10 (after 10 rule applications, 3 worlds)"
    );
}

#[test]
fn given_open_leaf_branch_when_stepping_again_then_saturated() {
    let tree = build("[](p -> q) & <>p & <>~q", Sign::T);
    let engine = ExpansionEngine::default();

    for branch in tree.open_branches() {
        let mut copy = branch.clone();
        assert_eq!(engine.step(&mut copy), Step::Saturated);
        assert_eq!(copy.len(), branch.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_small_formula_terminates_within_default_ceilings(formula in arb_formula()) {
        let builder = TableauBuilder::default();
        let positive = builder.build_for(formula.clone(), Sign::T);
        let negative = builder.build_for(formula, Sign::F);
        prop_assert!(positive.is_ok());
        prop_assert!(negative.is_ok());
        prop_assert!(positive.unwrap().is_complete());
        prop_assert!(negative.unwrap().is_complete());
    }
}
