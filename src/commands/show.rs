//! Show declared registrations

use anyhow::Result;
use colored::Colorize;

use crate::Context;
use crate::config::Manifest;
use crate::ui;

pub fn run(ctx: &Context, target: Option<&str>) -> Result<()> {
    let manifest = Manifest::load(ctx.manifest.as_deref())?;
    let stack = manifest.build_stack()?.filter_by_target(target);

    ui::header(&format!("Stack {}", stack.name));
    if let Some(description) = &stack.description {
        ui::dim(description);
    }

    if stack.is_empty() {
        ui::info("No registrations declared");
        return Ok(());
    }

    for construct in stack.constructs() {
        let resource = construct.resource.as_ref();

        ui::section(&construct.id);
        ui::kv("description", &resource.description());
        ui::kv(
            "physical id",
            resource.physical_id().as_deref().unwrap_or("<from response>"),
        );
        ui::kv(
            "logical id",
            &declarative::logical_id(&stack.path_of(&construct.id)),
        );

        for (event, call) in resource.calls() {
            println!("  {} {}", format!("on {event}:").bold(), call);
            if ctx.verbose > 0 {
                for (name, value) in &call.parameters {
                    ui::dim(&format!("  {name} = {value}"));
                }
            }
        }

        let policy = resource.policy();
        let actions: Vec<&str> = policy.actions().collect();
        ui::kv("permissions", &actions.join(", "));
    }

    if !ctx.quiet {
        println!();
        ui::info(&ui::plural(stack.len(), "registration"));
    }

    Ok(())
}
