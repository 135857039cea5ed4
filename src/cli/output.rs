//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::application::Verdict;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print a labelled value, label padded to a column
pub fn field(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{:<16}{}", format!("{}:", label).bold(), msg);
}

/// Print a verdict: green checkmark for valid/satisfiable, red X otherwise
pub fn verdict(label: &str, verdict: Verdict) {
    let mark = if verdict.is_positive() {
        format!("{} {}", "✓".green(), verdict.to_string().green())
    } else {
        format!("{} {}", "✗".red(), verdict.to_string().red())
    };
    field(label, &mark);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data such as JSON or trees)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
