//! Application layer: services and use cases
//!
//! This layer orchestrates the domain engine and assembles result bundles.

pub mod error;
pub mod error_ext;
pub mod report;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use report::{BatchEntry, CheckOutcome, Classification, Report, Verdict};
