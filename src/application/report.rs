//! Result bundles handed to presentation code

use std::fmt;

use serde::Serialize;

use crate::domain::{Formula, FormulaProfile, KripkeModel, TableauTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Valid,
    Invalid,
    Satisfiable,
    Unsatisfiable,
}

impl Verdict {
    /// `Valid` or `Satisfiable`.
    pub fn is_positive(self) -> bool {
        matches!(self, Verdict::Valid | Verdict::Satisfiable)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Valid => "valid",
            Verdict::Invalid => "invalid",
            Verdict::Satisfiable => "satisfiable",
            Verdict::Unsatisfiable => "unsatisfiable",
        };
        write!(f, "{}", text)
    }
}

/// Output bundle of one check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub verdict: Verdict,
    pub tree: TableauTree,
    /// Countermodel for `Invalid`, witness for `Satisfiable`, otherwise `None`
    pub model: Option<KripkeModel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// true in every model
    Tautology,
    /// true in some model, false in another
    Contingent,
    /// true in no model
    Contradiction,
}

impl Classification {
    pub fn from_verdicts(validity: Verdict, satisfiability: Verdict) -> Self {
        match (validity, satisfiability) {
            (Verdict::Valid, _) => Classification::Tautology,
            (_, Verdict::Unsatisfiable) => Classification::Contradiction,
            _ => Classification::Contingent,
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            Classification::Tautology => {
                "The formula holds at every world of every Kripke model: the tableau for its negation closes."
            }
            Classification::Contingent => {
                "The formula holds in some model and fails in another: both tableaux leave an open branch."
            }
            Classification::Contradiction => {
                "No world of any Kripke model makes the formula true: its tableau closes."
            }
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Classification::Tautology => "tautology",
            Classification::Contingent => "contingent",
            Classification::Contradiction => "contradiction",
        };
        write!(f, "{}", text)
    }
}

/// Both checks for one formula plus its structure profile.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub formula: Formula,
    pub profile: FormulaProfile,
    pub validity: CheckOutcome,
    pub satisfiability: CheckOutcome,
    pub classification: Classification,
    pub explanation: &'static str,
}

/// One line of a batch run.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    /// 1-based line number in the input
    pub line: usize,
    pub input: String,
    #[serde(serialize_with = "serialize_result")]
    pub result: Result<Report, crate::application::ApplicationError>,
}

fn serialize_result<S: serde::Serializer>(
    result: &Result<Report, crate::application::ApplicationError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(1))?;
    match result {
        Ok(report) => map.serialize_entry("report", report)?,
        Err(e) => map.serialize_entry("error", &e.to_string())?,
    }
    map.end()
}
