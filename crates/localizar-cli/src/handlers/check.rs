//! Check command handler

use std::io::Write;

use localizar::{LocalizarError, RecordRef};
use serde::Serialize;

use crate::commands::RepoArgs;
use crate::config::{CliConfig, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::{render_json, Reporter};

/// Result of validating a repository
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    /// Repository root as given
    pub repository: String,
    /// Number of accepted descriptors
    pub loaded: usize,
    /// Accepted descriptors per scope, in load order
    pub scopes: Vec<(String, usize)>,
    /// Records that were rejected
    pub rejected: Vec<Rejection>,
}

/// One rejected record
#[derive(Debug, Clone, Serialize)]
pub struct Rejection {
    /// Offending record, when known
    pub record: Option<RecordRef>,
    /// Human-readable reason
    pub message: String,
}

impl From<&LocalizarError> for Rejection {
    fn from(err: &LocalizarError) -> Self {
        Self {
            record: err.record().cloned(),
            message: err
                .reason()
                .map_or_else(|| err.to_string(), ToString::to_string),
        }
    }
}

/// Execute the check command.
///
/// # Errors
/// [`CliError::Rejected`] when any record was rejected, plus load failures.
pub fn execute_check(
    config: &CliConfig,
    reporter: &Reporter,
    args: &RepoArgs,
    out: &mut dyn Write,
) -> CliResult<()> {
    let report = super::load_report(config, &args.repo)?;
    let store = &report.store;

    let summary = CheckSummary {
        repository: args.repo.display().to_string(),
        loaded: store.len(),
        scopes: store
            .scopes()
            .into_iter()
            .map(|scope| {
                let count = store.page(scope).map_or(0, |page| page.len());
                (scope.to_string(), count)
            })
            .collect(),
        rejected: report.rejected.iter().map(Rejection::from).collect(),
    };

    match config.format {
        OutputFormat::Json => writeln!(out, "{}", render_json(&summary)?)?,
        OutputFormat::Text => {
            for (scope, count) in &summary.scopes {
                let scope = if scope.is_empty() { "(root)" } else { scope };
                writeln!(out, "{scope}: {count} element(s)")?;
            }
            for rejection in &report.rejected {
                reporter.failure(&rejection.to_string());
            }
            reporter.summary(summary.loaded, summary.rejected.len());
            if summary.rejected.is_empty() {
                reporter.success(&format!("{} is valid", summary.repository));
            }
        }
    }

    if summary.rejected.is_empty() {
        Ok(())
    } else {
        Err(CliError::Rejected {
            count: summary.rejected.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::handlers::fixtures;
    use localizar::LoadPolicy;

    fn quiet() -> Reporter {
        Reporter::new(false, true)
    }

    #[test]
    fn test_check_clean_repository() {
        let dir = fixtures::repository();
        let args = RepoArgs {
            repo: dir.path().to_path_buf(),
        };
        let mut out = Vec::new();
        execute_check(&CliConfig::default(), &quiet(), &args, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Page_Home: 2 element(s)\n");
    }

    #[test]
    fn test_check_clean_repository_with_status_lines() {
        let dir = fixtures::repository();
        let args = RepoArgs {
            repo: dir.path().to_path_buf(),
        };
        let mut out = Vec::new();
        let reporter = Reporter::new(false, false);
        execute_check(&CliConfig::default(), &reporter, &args, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Page_Home: 2 element(s)\n");
    }

    #[test]
    fn test_check_aborts_on_first_rejection() {
        let dir = fixtures::repository();
        fixtures::write(
            dir.path(),
            "Page_Home/broken.rs",
            &fixtures::SEARCH_BOX.replace("search_box", "  "),
        );
        let args = RepoArgs {
            repo: dir.path().to_path_buf(),
        };
        let err = execute_check(&CliConfig::default(), &quiet(), &args, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, CliError::Localizar(_)));
    }

    #[test]
    fn test_check_reports_every_rejection_as_json() {
        let dir = fixtures::repository();
        fixtures::write(dir.path(), "Page_Home/broken.rs", "<WebElementEntity>");
        fixtures::write(
            dir.path(),
            "Page_Login/search_box.rs",
            &fixtures::SEARCH_BOX.replace("<selectorMethod></selectorMethod>", "<selectorMethod>XPATH</selectorMethod>"),
        );
        let config = CliConfig::default()
            .with_format(OutputFormat::Json)
            .with_load_policy(LoadPolicy::SkipAndReport);
        let args = RepoArgs {
            repo: dir.path().to_path_buf(),
        };
        let mut out = Vec::new();
        let err = execute_check(&config, &quiet(), &args, &mut out).unwrap_err();
        assert!(matches!(err, CliError::Rejected { count: 2 }));

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["loaded"], 2);
        let rejected = json["rejected"].as_array().unwrap();
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0]["record"]["origin"], "Page_Home/broken.rs");
        assert_eq!(rejected[1]["record"]["origin"], "Page_Login/search_box.rs");
    }
}
