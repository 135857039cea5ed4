//! Signed formulas: a formula asserted true or false at a world

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::formula::{Formula, Notation};

/// World identifier. The root world of every tableau is `0`.
pub type World = usize;

pub const ROOT_WORLD: World = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Sign {
    T,
    F,
}

impl Sign {
    pub fn flip(self) -> Sign {
        match self {
            Sign::T => Sign::F,
            Sign::F => Sign::T,
        }
    }

    pub fn holds(self) -> bool {
        self == Sign::T
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::T => write!(f, "T"),
            Sign::F => write!(f, "F"),
        }
    }
}

/// `(formula, sign, world)`. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SignedFormula {
    pub formula: Arc<Formula>,
    pub sign: Sign,
    pub world: World,
}

impl SignedFormula {
    pub fn new(formula: Arc<Formula>, sign: Sign, world: World) -> Self {
        Self {
            formula,
            sign,
            world,
        }
    }

    /// Root assertion of a tableau at world 0.
    pub fn root(formula: Formula, sign: Sign) -> Self {
        Self::new(Arc::new(formula), sign, ROOT_WORLD)
    }

    /// Same formula and world, opposite sign.
    pub fn conjugate(&self) -> Self {
        Self::new(Arc::clone(&self.formula), self.sign.flip(), self.world)
    }

    pub fn render(&self, notation: Notation) -> String {
        format!("{} {} @w{}", self.sign, self.formula.render(notation), self.world)
    }
}

impl fmt::Display for SignedFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Notation::Ascii))
    }
}
