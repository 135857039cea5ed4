//! Domain layer: the tableau decision engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod branch;
pub mod builder;
pub mod error;
pub mod formula;
pub mod kripke;
pub mod parser;
pub mod rules;
pub mod signed;

pub use arena::{NodeData, NodeStatus, TableauNode, TableauTree};
pub use branch::Branch;
pub use builder::{EngineLimits, TableauBuilder};
pub use error::{Ceiling, DomainError, DomainResult, SyntaxError};
pub use formula::{Connective, Formula, FormulaProfile, Notation};
pub use kripke::KripkeModel;
pub use parser::{parse, MAX_NESTING};
pub use rules::{expand, Expansion, ExpansionEngine, Inference, Rule, RuleKind, Step};
pub use signed::{Sign, SignedFormula, World, ROOT_WORLD};
