//! Semantic tableau decision procedure for propositional modal logic K.
//!
//! Text goes through [`domain::parse`], the tableau builder grows a closed or
//! open tree, and open branches yield Kripke countermodels or witnesses.
//! [`application::services::VerdictService`] bundles both checks.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;
