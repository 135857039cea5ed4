//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Decide validity and satisfiability of modal formulas (logic K) with semantic tableaux
#[derive(Parser, Debug)]
#[command(name = "ktab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file, layered over the global config
    #[arg(long, global = true, env = "KTAB_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print formulas with ¬ ∧ ∨ → □ ◇
    #[arg(long, global = true)]
    pub unicode: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run both checks and classify the formula
    Check {
        /// Formula, e.g. "[]p -> <>p"
        formula: String,
        /// Print both tableau trees
        #[arg(long)]
        tree: bool,
        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validity check only (tableau rooted at F)
    Valid {
        formula: String,
        /// Print the tableau tree
        #[arg(long)]
        tree: bool,
    },

    /// Satisfiability check only (tableau rooted at T)
    Sat {
        formula: String,
        /// Print the tableau tree
        #[arg(long)]
        tree: bool,
    },

    /// Parse and show the formula with its structure profile
    Parse { formula: String },

    /// Check one formula per line; blank lines and # comments are skipped
    Batch {
        /// Input file, "-" for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show effective settings as TOML
    Config {
        /// Print a commented template instead
        #[arg(long)]
        template: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
