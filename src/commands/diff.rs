//! Preview redeployment over a previously synthesized template

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use declarative::{Change, DiffSummary, ResourceDiff, Template, group_by_change};
use std::fs;

use crate::Context;
use crate::cli::DiffArgs;
use crate::config::Manifest;
use crate::ui;

pub fn run(ctx: &Context, args: DiffArgs) -> Result<()> {
    let manifest = Manifest::load(ctx.manifest.as_deref())?;

    let content = fs::read_to_string(&args.previous)
        .with_context(|| format!("Could not read template: {}", args.previous.display()))?;
    let previous = Template::from_json(&content)
        .with_context(|| format!("Invalid template: {}", args.previous.display()))?;

    let (desired, diffs) = compare(&manifest, &previous)?;
    let summary = DiffSummary::from_diffs(&diffs);

    ui::header("Registration changes");
    for (kind, group) in group_by_change(&diffs) {
        ui::section(&format!("{kind} ({})", group.len()));
        for diff in group {
            print_diff(diff);
        }
    }
    if ctx.verbose > 0 {
        ui::section("unchanged");
        for diff in diffs.iter().filter(|d| !d.has_change()) {
            print_diff(diff);
        }
    }

    if args.text {
        ui::section("Template");
        print_text_diff(&previous.to_json(true)?, &desired.to_json(true)?);
    }

    println!();
    if summary.has_changes() {
        ui::info(&format!(
            "{} to create, {} to delete, {} to replace, {} to update",
            summary.creates, summary.deletes, summary.replacements, summary.updates
        ));
    } else {
        ui::success("No changes");
    }

    Ok(())
}

/// Synthesize the manifest and diff it against the deployed template
pub fn compare(manifest: &Manifest, previous: &Template) -> Result<(Template, Vec<ResourceDiff>)> {
    let desired = declarative::synthesize(&manifest.build_stack()?)?;
    let diffs = declarative::compute_diffs(previous, &desired)?;
    Ok((desired, diffs))
}

fn print_diff(diff: &ResourceDiff) {
    let line = format!("{} {}", diff.logical_id, diff.change);
    match diff.change {
        Change::Create { .. } => println!("  {} {}", "+".green(), line.green()),
        Change::Delete { .. } => println!("  {} {}", "-".red(), line.red()),
        Change::Replace { .. } => println!("  {} {}", "±".yellow(), line.yellow()),
        Change::Update { .. } => println!("  {} {}", "~".cyan(), line.cyan()),
        Change::NoChange => ui::dim(&line),
    }
}

/// Line diff of two rendered templates using the `similar` crate
fn print_text_diff(before: &str, after: &str) {
    let diff = similar::TextDiff::from_lines(before, after);
    let mut has_changes = false;

    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => {
                has_changes = true;
                print!("    {}", format!("- {change}").red());
            }
            similar::ChangeTag::Insert => {
                has_changes = true;
                print!("    {}", format!("+ {change}").green());
            }
            similar::ChangeTag::Equal => {}
        }
    }

    if !has_changes {
        println!("    {}", "(templates are identical)".dimmed());
    }
}
