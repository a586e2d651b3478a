//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Localizador: validate and query a UI test object repository
#[derive(Parser, Debug)]
#[command(name = "localizador")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, global = true)]
    pub color: Option<ColorArg>,

    /// Result format (text, json)
    #[arg(long, global = true)]
    pub format: Option<FormatArg>,

    /// YAML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip invalid records instead of failing on the first one
    #[arg(long, global = true)]
    pub skip_invalid: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate every element record in a repository
    Check(RepoArgs),

    /// List element paths
    List(ListArgs),

    /// Show one element descriptor
    Show(ElementArgs),

    /// Resolve the selector for an element
    Resolve(ResolveArgs),

    /// Evaluate an element's attribute rules against given attributes
    Match(MatchArgs),
}

/// Repository location
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Object repository directory
    pub repo: PathBuf,
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Object repository directory
    pub repo: PathBuf,

    /// Only list elements of this scope (e.g. Page_Home)
    #[arg(short, long)]
    pub scope: Option<String>,
}

/// Repository plus element path
#[derive(Args, Debug, Clone)]
pub struct ElementArgs {
    /// Object repository directory
    pub repo: PathBuf,

    /// Element path (e.g. Page_Home/search_box)
    pub element: String,
}

/// Arguments for the resolve command
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Object repository directory
    pub repo: PathBuf,

    /// Element path (e.g. Page_Home/search_box)
    pub element: String,

    /// Print the whole fallback sequence
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the match command
#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    /// Object repository directory
    pub repo: PathBuf,

    /// Element path (e.g. Page_Home/search_box)
    pub element: String,

    /// Candidate attribute as name=value (repeatable)
    #[arg(short, long = "attr", value_parser = parse_attribute)]
    pub attrs: Vec<(String, String)>,
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::config::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Parse `name=value`; the value may itself contain `=`.
fn parse_attribute(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing attribute name in '{s}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
