//! Command handlers, kept out of main.rs for testability
//!
//! Each handler loads the repository, writes its result to the given writer
//! (stdout in the binary) and reports status through a [`Reporter`].

pub mod check;
pub mod list;
pub mod matching;
pub mod resolve;
pub mod show;

use std::path::Path;

use localizar::{DescriptorStore, LoadReport};
use tracing::info;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use crate::repository::RepositoryReader;

pub use check::{execute_check, CheckSummary, Rejection};
pub use list::execute_list;
pub use matching::{execute_match, MatchOutcome};
pub use resolve::{execute_resolve, ResolvedLocator};
pub use show::execute_show;

/// Read a repository with the configured extension and load policy
///
/// # Errors
/// Repository I/O failures, and with the default policy the first rejected
/// record.
pub fn load_report(config: &CliConfig, repo: &Path) -> CliResult<LoadReport> {
    info!(repo = %repo.display(), "loading object repository");
    RepositoryReader::new(repo)
        .with_extension(config.record_extension.clone())
        .load(&config.load)
}

/// Load a repository for a query command; skipped records become warnings.
///
/// # Errors
/// See [`load_report`].
pub fn open_store(
    config: &CliConfig,
    reporter: &Reporter,
    repo: &Path,
) -> CliResult<DescriptorStore> {
    let report = load_report(config, repo)?;
    for rejection in &report.rejected {
        reporter.warning(&format!("skipped {rejection}"));
    }
    if config.verbosity.is_verbose() {
        reporter.info(&format!(
            "loaded {} element(s) in {} scope(s) from {}",
            report.store.len(),
            report.store.scopes().len(),
            repo.display()
        ));
    }
    Ok(report.store)
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Verbosity;
    use localizar::LoadPolicy;

    #[test]
    fn test_open_store_verbose() {
        let dir = fixtures::repository();
        let config = CliConfig::default().with_verbosity(Verbosity::Verbose);
        let store = open_store(&config, &Reporter::new(false, false), dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.scopes(), ["Page_Home"]);
    }

    #[test]
    fn test_open_store_skips_broken_records() {
        let dir = fixtures::repository();
        fixtures::write(dir.path(), "Page_Home/broken.rs", "<WebElementEntity>");
        let config = CliConfig::default()
            .with_verbosity(Verbosity::Verbose)
            .with_load_policy(LoadPolicy::SkipAndReport);
        let store = open_store(&config, &Reporter::new(false, true), dir.path()).unwrap();
        assert_eq!(store.len(), 2);
    }
}
