//! Modal formula AST, notation and structure analysis

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

/// Immutable formula node. Children are shared read-only between signed
/// formulas, branches and both checks. Serializes as its ASCII text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Formula {
    Atom(String),
    Not(Arc<Formula>),
    And(Arc<Formula>, Arc<Formula>),
    Or(Arc<Formula>, Arc<Formula>),
    Implies(Arc<Formula>, Arc<Formula>),
    Box(Arc<Formula>),
    Diamond(Arc<Formula>),
}

/// Connective kinds, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    Not,
    And,
    Or,
    Implies,
    Box,
    Diamond,
}

impl Connective {
    pub fn is_modal(self) -> bool {
        matches!(self, Connective::Box | Connective::Diamond)
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Connective::Not => "negation",
            Connective::And => "conjunction",
            Connective::Or => "disjunction",
            Connective::Implies => "implication",
            Connective::Box => "necessity",
            Connective::Diamond => "possibility",
        };
        write!(f, "{}", name)
    }
}

/// Symbol set used when printing formulas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// `~ & | -> [] <>`, accepted back by the parser
    #[default]
    Ascii,
    /// `¬ ∧ ∨ → □ ◇`
    Unicode,
}

impl Notation {
    pub(crate) fn symbol(self, connective: Connective) -> &'static str {
        match (self, connective) {
            (Notation::Ascii, Connective::Not) => "~",
            (Notation::Ascii, Connective::And) => " & ",
            (Notation::Ascii, Connective::Or) => " | ",
            (Notation::Ascii, Connective::Implies) => " -> ",
            (Notation::Ascii, Connective::Box) => "[]",
            (Notation::Ascii, Connective::Diamond) => "<>",
            (Notation::Unicode, Connective::Not) => "¬",
            (Notation::Unicode, Connective::And) => " ∧ ",
            (Notation::Unicode, Connective::Or) => " ∨ ",
            (Notation::Unicode, Connective::Implies) => " → ",
            (Notation::Unicode, Connective::Box) => "□",
            (Notation::Unicode, Connective::Diamond) => "◇",
        }
    }
}

// Binding strength, loosest first.
const PREC_IMPLIES: u8 = 1;
const PREC_OR: u8 = 2;
const PREC_AND: u8 = 3;
const PREC_UNARY: u8 = 4;

impl Formula {
    pub fn atom(name: impl Into<String>) -> Self {
        Formula::Atom(name.into())
    }

    pub fn not(f: Formula) -> Self {
        Formula::Not(Arc::new(f))
    }

    pub fn and(a: Formula, b: Formula) -> Self {
        Formula::And(Arc::new(a), Arc::new(b))
    }

    pub fn or(a: Formula, b: Formula) -> Self {
        Formula::Or(Arc::new(a), Arc::new(b))
    }

    pub fn implies(a: Formula, b: Formula) -> Self {
        Formula::Implies(Arc::new(a), Arc::new(b))
    }

    pub fn boxed(f: Formula) -> Self {
        Formula::Box(Arc::new(f))
    }

    pub fn diamond(f: Formula) -> Self {
        Formula::Diamond(Arc::new(f))
    }

    /// Top-level connective, `None` for atoms.
    pub fn connective(&self) -> Option<Connective> {
        match self {
            Formula::Atom(_) => None,
            Formula::Not(_) => Some(Connective::Not),
            Formula::And(..) => Some(Connective::And),
            Formula::Or(..) => Some(Connective::Or),
            Formula::Implies(..) => Some(Connective::Implies),
            Formula::Box(_) => Some(Connective::Box),
            Formula::Diamond(_) => Some(Connective::Diamond),
        }
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Formula::Atom(_))
    }

    /// Immediate subformulas, left to right.
    pub fn children(&self) -> Vec<&Arc<Formula>> {
        match self {
            Formula::Atom(_) => vec![],
            Formula::Not(f) | Formula::Box(f) | Formula::Diamond(f) => vec![f],
            Formula::And(a, b) | Formula::Or(a, b) | Formula::Implies(a, b) => vec![a, b],
        }
    }

    pub fn atoms(&self) -> BTreeSet<String> {
        let mut atoms = BTreeSet::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms(&self, atoms: &mut BTreeSet<String>) {
        match self {
            Formula::Atom(name) => {
                atoms.insert(name.clone());
            }
            _ => {
                for child in self.children() {
                    child.collect_atoms(atoms);
                }
            }
        }
    }

    /// Whether any Box or Diamond node occurs.
    pub fn is_modal(&self) -> bool {
        self.connective().is_some_and(Connective::is_modal)
            || self.children().iter().any(|c| c.is_modal())
    }

    /// Number of connective occurrences.
    pub fn size(&self) -> usize {
        match self {
            Formula::Atom(_) => 0,
            _ => 1 + self.children().iter().map(|c| c.size()).sum::<usize>(),
        }
    }

    /// Maximal nesting of connectives.
    pub fn depth(&self) -> usize {
        match self {
            Formula::Atom(_) => 0,
            _ => 1 + self.children().iter().map(|c| c.depth()).max().unwrap_or(0),
        }
    }

    /// Maximal nesting of Box/Diamond.
    pub fn modal_depth(&self) -> usize {
        let below = self
            .children()
            .iter()
            .map(|c| c.modal_depth())
            .max()
            .unwrap_or(0);
        match self {
            Formula::Box(_) | Formula::Diamond(_) => below + 1,
            _ => below,
        }
    }

    pub fn connectives(&self) -> BTreeSet<Connective> {
        let mut kinds = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(f) = stack.pop() {
            if let Some(c) = f.connective() {
                kinds.insert(c);
            }
            stack.extend(f.children().into_iter().map(|c| c.as_ref()));
        }
        kinds
    }

    /// Read-only structural summary for presentation.
    pub fn profile(&self) -> FormulaProfile {
        FormulaProfile {
            modal: self.is_modal(),
            connectives: self.connectives(),
            atoms: self.atoms(),
            size: self.size(),
            depth: self.depth(),
            modal_depth: self.modal_depth(),
        }
    }

    pub fn render(&self, notation: Notation) -> String {
        let mut out = String::new();
        self.write_with(&mut out, notation, 0);
        out
    }

    fn precedence(&self) -> u8 {
        match self {
            Formula::Implies(..) => PREC_IMPLIES,
            Formula::Or(..) => PREC_OR,
            Formula::And(..) => PREC_AND,
            _ => PREC_UNARY,
        }
    }

    fn write_with(&self, out: &mut String, notation: Notation, min_prec: u8) {
        let wrap = self.precedence() < min_prec;
        if wrap {
            out.push('(');
        }
        match self {
            Formula::Atom(name) => out.push_str(name),
            Formula::Not(f) | Formula::Box(f) | Formula::Diamond(f) => {
                if let Some(c) = self.connective() {
                    out.push_str(notation.symbol(c));
                }
                f.write_with(out, notation, PREC_UNARY);
            }
            Formula::And(a, b) => {
                a.write_with(out, notation, PREC_AND);
                out.push_str(notation.symbol(Connective::And));
                b.write_with(out, notation, PREC_UNARY);
            }
            Formula::Or(a, b) => {
                a.write_with(out, notation, PREC_OR);
                out.push_str(notation.symbol(Connective::Or));
                b.write_with(out, notation, PREC_AND);
            }
            // right-associative
            Formula::Implies(a, b) => {
                a.write_with(out, notation, PREC_OR);
                out.push_str(notation.symbol(Connective::Implies));
                b.write_with(out, notation, PREC_IMPLIES);
            }
        }
        if wrap {
            out.push(')');
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Notation::Ascii))
    }
}

impl Serialize for Formula {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which connectives a formula uses and how deep it nests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaProfile {
    /// Contains a Box or Diamond node
    pub modal: bool,
    pub connectives: BTreeSet<Connective>,
    pub atoms: BTreeSet<String>,
    /// Number of connective occurrences
    pub size: usize,
    pub depth: usize,
    pub modal_depth: usize,
}
