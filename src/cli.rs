use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orgadmin")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declare delegated administrators for your organization", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Registrations manifest (default: ~/.config/orgadmin/registrations.toml)
    #[arg(short, long, global = true, env = "ORGADMIN_MANIFEST")]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render the template for the declared registrations
    Synth(SynthArgs),

    /// Show each registration with its create and delete calls
    Show(TargetArgs),

    /// Preview what redeploying over a previous template would run
    Diff(DiffArgs),

    /// Check the manifest for conflicts and suspicious values
    Validate,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct TargetArgs {
    /// Only include matching registrations: construct id, service principal,
    /// or "delegation.<name>"
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Parser)]
pub struct SynthArgs {
    /// Write the template to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Render without indentation
    #[arg(long)]
    pub compact: bool,

    #[command(flatten)]
    pub filter: TargetArgs,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Previously synthesized template
    #[arg(short, long)]
    pub previous: PathBuf,

    /// Also print a line diff of the two templates
    #[arg(long)]
    pub text: bool,
}
