//! Synthesize the template for the declared registrations

use anyhow::{Context as AnyhowContext, Result};
use std::fs;

use crate::Context;
use crate::cli::SynthArgs;
use crate::config::Manifest;
use crate::ui;

pub fn run(ctx: &Context, args: SynthArgs) -> Result<()> {
    let manifest = Manifest::load(ctx.manifest.as_deref())?;
    let rendered = render(&manifest, args.filter.target.as_deref(), !args.compact)?;

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write template: {}", path.display()))?;
            if !ctx.quiet {
                ui::success(&format!("Template written to {}", path.display()));
            }
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Render the (optionally filtered) stack of a manifest
pub fn render(manifest: &Manifest, target: Option<&str>, pretty: bool) -> Result<String> {
    let stack = manifest.build_stack()?.filter_by_target(target);
    if stack.is_empty() {
        log::warn!("No registrations to synthesize");
    }

    let template = declarative::synthesize(&stack)?;
    log::info!(
        "Synthesized {} registration(s) for stack {}",
        stack.len(),
        stack.name
    );
    Ok(template.to_json(pretty)?)
}
