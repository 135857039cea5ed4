//! Command dispatch

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::VerdictService;
use crate::application::{ApplicationError, CheckOutcome, IoResultExt, Report, Verdict};
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{parse, FormulaProfile, Notation};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Commands::Completion { shell } = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.unicode {
        settings.notation = Notation::Unicode;
    }
    debug!("settings: {:?}", settings);
    let service = VerdictService::new(settings.limits(), settings.parallel);
    let notation = settings.notation;

    match &cli.command {
        Commands::Check {
            formula,
            tree,
            json,
        } => _check(&service, notation, formula, *tree, *json),
        Commands::Valid { formula, tree } => {
            let outcome = service.validity(formula)?;
            print_outcome("Validity", &outcome, notation, *tree);
            Ok(())
        }
        Commands::Sat { formula, tree } => {
            let outcome = service.satisfiability(formula)?;
            print_outcome("Satisfiability", &outcome, notation, *tree);
            Ok(())
        }
        Commands::Parse { formula } => _parse(formula, notation),
        Commands::Batch { file, json } => _batch(&service, notation, file, *json),
        Commands::Config { template } => {
            if *template {
                output::info(&Settings::template());
            } else {
                output::info(&settings.to_toml()?);
            }
            Ok(())
        }
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(service))]
fn _check(
    service: &VerdictService,
    notation: Notation,
    formula: &str,
    tree: bool,
    json: bool,
) -> CliResult<()> {
    let report = service.solve(formula)?;
    if json {
        output::info(&serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_report(&report, notation, tree);
    Ok(())
}

#[instrument]
fn _parse(formula: &str, notation: Notation) -> CliResult<()> {
    let parsed = parse(formula).map_err(ApplicationError::from)?;
    output::field("Formula", &parsed.render(notation));
    print_profile(&parsed.profile());
    Ok(())
}

#[instrument(skip(service))]
fn _batch(service: &VerdictService, notation: Notation, file: &Path, json: bool) -> CliResult<()> {
    let input = if file == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .with_path_context("read stdin", file)?;
        buf
    } else {
        std::fs::read_to_string(file).with_path_context("read batch file", file)?
    };

    let entries = service.solve_batch(&input);
    if json {
        output::info(&serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        match &entry.result {
            Ok(report) => output::info(&format!(
                "{:>4}  {:<14} {}",
                entry.line,
                report.classification.to_string(),
                report.formula.render(notation)
            )),
            Err(e) => output::warning(&format!("line {}: {}: {}", entry.line, entry.input, e)),
        }
    }
    Ok(())
}

fn print_profile(profile: &FormulaProfile) {
    let kind = if profile.modal {
        "modal"
    } else {
        "propositional"
    };
    let connectives = if profile.connectives.is_empty() {
        "none".to_string()
    } else {
        profile.connectives.iter().join(", ")
    };
    output::field("Kind", &kind);
    output::field("Connectives", &connectives);
    output::field("Atoms", &profile.atoms.iter().join(", "));
    output::field(
        "Size",
        &format!(
            "{} connectives, depth {}, modal depth {}",
            profile.size, profile.depth, profile.modal_depth
        ),
    );
}

fn print_outcome(label: &str, outcome: &CheckOutcome, notation: Notation, tree: bool) {
    output::verdict(label, outcome.verdict);
    if let Some(model) = &outcome.model {
        let title = match outcome.verdict {
            Verdict::Invalid => "countermodel",
            _ => "model",
        };
        output::detail(&title);
        for line in model.to_tree_string(notation).to_string().lines() {
            output::detail(&line);
        }
    }
    if tree {
        output::header(&format!("{} tableau", label));
        output::info(&outcome.tree.to_tree_string(notation));
    }
}

fn print_report(report: &Report, notation: Notation, tree: bool) {
    output::field("Formula", &report.formula.render(notation));
    print_profile(&report.profile);
    print_outcome("Validity", &report.validity, notation, tree);
    print_outcome("Satisfiability", &report.satisfiability, notation, tree);
    output::field("Classification", &report.classification);
    output::detail(&report.explanation);
}
