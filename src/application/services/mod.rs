//! Application services
//!
//! Concrete service structs that run the tableau engine and assemble reports.

mod verdict;

pub use verdict::VerdictService;
