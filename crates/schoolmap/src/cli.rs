//! Clap derive structures for the `schoolmap` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// schoolmap -- browse schools, regions and routes from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "schoolmap",
    version,
    about = "Explore the school map from the command line",
    long_about = "Query schools, administrative regions and per-region statistics\n\
        from a school map API, and compute driving routes between schools\n\
        or from a known position through an OSRM service.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long, env = "SCHOOLMAP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// School map API base URL (overrides config)
    #[arg(long, env = "SCHOOLMAP_API_URL", global = true)]
    pub api_url: Option<String>,

    /// OSRM service base URL (overrides config)
    #[arg(long, env = "SCHOOLMAP_DIRECTIONS_URL", global = true)]
    pub directions_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SCHOOLMAP_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and inspect schools
    #[command(alias = "s")]
    Schools(SchoolsArgs),

    /// List accredited schools
    Accredited(AccreditedArgs),

    /// List and inspect administrative regions
    #[command(alias = "r")]
    Regions(RegionsArgs),

    /// School counts per region and education level
    Stats(StatsArgs),

    /// Compute a route to a school
    Route(RouteArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Schools ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SchoolsArgs {
    #[command(subcommand)]
    pub command: SchoolsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchoolsCommand {
    /// List the schools shown on the map under the given filters
    #[command(alias = "ls")]
    List(SchoolFilterArgs),

    /// Show one school
    Get {
        /// School ID
        school: String,
    },

    /// Find schools by name or address (case-insensitive)
    #[command(alias = "find")]
    Search {
        /// Text to look for
        query: String,

        #[command(flatten)]
        filter: SchoolFilterArgs,
    },
}

#[derive(Debug, Args)]
pub struct SchoolFilterArgs {
    /// Only schools of this education level (SD, SMP, SMA)
    #[arg(long, short = 'l')]
    pub level: Option<String>,

    /// Only schools in this region
    #[arg(long, short = 'r')]
    pub region: Option<i64>,

    /// Max rows to print (0 = all)
    #[arg(long, default_value = "0")]
    pub limit: usize,
}

// ── Accredited ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccreditedArgs {
    /// Only this accreditation grade (A, B, C)
    #[arg(long, short = 'g')]
    pub grade: Option<String>,

    /// Max rows to print (0 = all)
    #[arg(long, default_value = "0")]
    pub limit: usize,
}

// ── Regions ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RegionsArgs {
    #[command(subcommand)]
    pub command: RegionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegionsCommand {
    /// List regions
    #[command(alias = "ls")]
    List,

    /// Show one region
    Get {
        /// Region ID
        region: i64,
    },
}

// ── Stats ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Only this region
    #[arg(long, short = 'r')]
    pub region: Option<i64>,
}

// ── Route ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Destination school ID
    pub to: String,

    /// Start from this school
    #[arg(long, conflicts_with = "at")]
    pub from: Option<String>,

    /// Start from this position ("lat,lng"); without --from or --at the
    /// last saved location is used
    #[arg(long, value_name = "LAT,LNG")]
    pub at: Option<String>,

    /// Print only the summary line, not each step
    #[arg(long)]
    pub summary: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
