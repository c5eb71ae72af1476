use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cirrus")]
#[command(version)]
#[command(
    about = "Compare declared cloud access config with live state and consolidate rules",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show differences between declared and live IAM resources
    Diff(DiffArgs),

    /// Turn a live security group snapshot into consolidated declared rules
    Migrate(MigrateArgs),

    /// Consolidate declared rule lists from one or more files
    Consolidate(ConsolidateArgs),

    /// Inspect settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Diff
// ============================================================================

#[derive(Parser)]
pub struct DiffArgs {
    /// Declared IAM snapshot (overrides iam.declared)
    #[arg(short, long)]
    pub declared: Option<PathBuf>,

    /// Live IAM snapshot (overrides iam.live)
    #[arg(short, long)]
    pub live: Option<PathBuf>,

    /// Only show resources whose name contains this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Exit with status 1 when differences are found
    #[arg(long)]
    pub exit_code: bool,
}

// ============================================================================
// Security Groups
// ============================================================================

#[derive(Parser)]
pub struct MigrateArgs {
    /// Live security group snapshot (overrides security-groups.live)
    #[arg(short, long)]
    pub live: Option<PathBuf>,

    /// Directory to write one file per group (overrides security-groups.output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print to stdout even if an output directory is configured
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Parser)]
pub struct ConsolidateArgs {
    /// Files holding JSON arrays of declared rules
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

// ============================================================================
// Config
// ============================================================================

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show effective settings
    Show,

    /// Print the settings file path
    Path,
}
