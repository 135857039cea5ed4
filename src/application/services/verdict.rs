//! Verdict assembly: validity and satisfiability checks over one formula

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::application::report::{BatchEntry, CheckOutcome, Classification, Report, Verdict};
use crate::application::ApplicationResult;
use crate::domain::{parse, EngineLimits, Formula, KripkeModel, Sign, TableauBuilder};

/// Runs the tableau builder for both checks. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerdictService {
    builder: TableauBuilder,
    parallel: bool,
}

impl VerdictService {
    pub fn new(limits: EngineLimits, parallel: bool) -> Self {
        Self {
            builder: TableauBuilder::new(limits),
            parallel,
        }
    }

    pub fn limits(&self) -> EngineLimits {
        self.builder.limits()
    }

    /// Tableau rooted at `(formula, F, w0)`. Closed means valid; otherwise the
    /// first open branch yields a countermodel.
    #[instrument(level = "debug", skip(self, formula), fields(formula = %formula))]
    pub fn check_validity(&self, formula: &Formula) -> ApplicationResult<CheckOutcome> {
        self.check(formula, Sign::F, Verdict::Valid, Verdict::Invalid)
    }

    /// Tableau rooted at `(formula, T, w0)`. Closed means unsatisfiable;
    /// otherwise the first open branch yields a witness model.
    #[instrument(level = "debug", skip(self, formula), fields(formula = %formula))]
    pub fn check_satisfiability(&self, formula: &Formula) -> ApplicationResult<CheckOutcome> {
        self.check(formula, Sign::T, Verdict::Unsatisfiable, Verdict::Satisfiable)
    }

    fn check(
        &self,
        formula: &Formula,
        sign: Sign,
        when_closed: Verdict,
        when_open: Verdict,
    ) -> ApplicationResult<CheckOutcome> {
        let tree = self.builder.build_for(formula.clone(), sign)?;
        let outcome = if tree.is_closed() {
            CheckOutcome {
                verdict: when_closed,
                tree,
                model: None,
            }
        } else {
            let model = tree.first_open_branch().and_then(KripkeModel::from_branch);
            CheckOutcome {
                verdict: when_open,
                tree,
                model,
            }
        };
        debug!("{} -> {}", formula, outcome.verdict);
        Ok(outcome)
    }

    /// Parse `text` and run the validity check.
    pub fn validity(&self, text: &str) -> ApplicationResult<CheckOutcome> {
        let formula = parse(text)?;
        self.check_validity(&formula)
    }

    /// Parse `text` and run the satisfiability check.
    pub fn satisfiability(&self, text: &str) -> ApplicationResult<CheckOutcome> {
        let formula = parse(text)?;
        self.check_satisfiability(&formula)
    }

    /// Parse once, run both checks and classify.
    #[instrument(level = "debug", skip(self))]
    pub fn solve(&self, text: &str) -> ApplicationResult<Report> {
        let formula = parse(text)?;

        let (validity, satisfiability) = if self.parallel {
            rayon::join(
                || self.check_validity(&formula),
                || self.check_satisfiability(&formula),
            )
        } else {
            (
                self.check_validity(&formula),
                self.check_satisfiability(&formula),
            )
        };
        let validity = validity?;
        let satisfiability = satisfiability?;

        let classification = Classification::from_verdicts(validity.verdict, satisfiability.verdict);
        info!("{}: {}", formula, classification);

        Ok(Report {
            profile: formula.profile(),
            formula,
            validity,
            satisfiability,
            classification,
            explanation: classification.explanation(),
        })
    }

    /// Solve every non-blank, non-comment line. Results keep input order; a
    /// failing line does not stop the others.
    #[instrument(level = "debug", skip(self, input))]
    pub fn solve_batch(&self, input: &str) -> Vec<BatchEntry> {
        let lines: Vec<(usize, &str)> = input
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .collect();
        debug!("batch: {} formulas", lines.len());

        let solve_line = |&(line, text): &(usize, &str)| BatchEntry {
            line,
            input: text.to_string(),
            result: self.solve(text),
        };

        if self.parallel {
            lines.par_iter().map(solve_line).collect()
        } else {
            lines.iter().map(solve_line).collect()
        }
    }
}
