//! Localizador: command-line front end for Localizar
//!
//! Reads an object repository from disk, loads it into a
//! [`localizar::DescriptorStore`] and answers queries about it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;
pub mod repository;

pub use commands::{
    Cli, ColorArg, Commands, ElementArgs, FormatArg, ListArgs, MatchArgs, RepoArgs, ResolveArgs,
};
pub use config::{CliConfig, ColorChoice, OutputFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_json, Reporter};
pub use repository::RepositoryReader;
