//! Object repository ingestion from disk.
//!
//! Each element record is one file; the folders between the repository root
//! and the file form its scope:
//!
//! ```text
//! Object Repository/
//! └── Page_Home/
//!     ├── navigation_menu.rs   -> Page_Home/navigation_menu
//!     └── search_box.rs        -> Page_Home/search_box
//! ```
//!
//! Files are read in sorted path order so that batch positions and "first
//! one wins" decisions are reproducible.

use std::path::{Path, PathBuf};

use localizar::{
    BatchEntry, DescriptorStore, LoadOptions, LoadReport, LocalizarError, RawRecord, ScopedRecord,
};
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// Reads element records from a repository directory.
#[derive(Debug, Clone)]
pub struct RepositoryReader {
    root: PathBuf,
    extension: String,
}

impl RepositoryReader {
    /// Reader for `root`, picking up `*.rs` record files
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "rs".to_string(),
        }
    }

    /// Set the record file extension (without the dot)
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Repository root as given
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record files under the canonical root, sorted
    ///
    /// # Errors
    /// [`CliError::InvalidArgument`] if the root is not a directory.
    pub fn discover(&self) -> CliResult<Vec<PathBuf>> {
        let root = self.canonical_root()?;
        let pattern = format!(
            "{}/**/*.{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            self.extension
        );
        let mut files: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| CliError::invalid_argument(e.to_string()))?
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        debug!(count = files.len(), root = %root.display(), "discovered record files");
        Ok(files)
    }

    /// Scope of a record file: its parent folders relative to the root
    ///
    /// # Errors
    /// [`CliError::InvalidArgument`] if the file is not under the root.
    pub fn scope_of(&self, path: &Path) -> CliResult<String> {
        let relative = self.relative(path)?;
        Ok(relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default())
    }

    /// Read and load every record under the root.
    ///
    /// Each file is one batch slot in sorted path order. Files that are not
    /// well-formed XML are rejected in their own slot and follow the same
    /// policy as validation failures.
    ///
    /// # Errors
    /// I/O failures, and with [`localizar::LoadPolicy::AbortOnFirstError`]
    /// the first rejected record.
    pub fn load(&self, options: &LoadOptions) -> CliResult<LoadReport> {
        let files = self.discover()?;
        let mut entries = Vec::with_capacity(files.len());

        for path in &files {
            let origin = self.origin_of(path)?;
            let xml = std::fs::read_to_string(path)?;
            let entry = match RawRecord::from_xml(&xml) {
                Ok(record) => BatchEntry::from(
                    ScopedRecord::new(record)
                        .in_scope(self.scope_of(path)?)
                        .with_origin(origin),
                ),
                Err(err) => {
                    warn!(origin = %origin, error = %err, "unreadable record file");
                    BatchEntry::unparsed(origin, syntax_message(err))
                }
            };
            entries.push(entry);
        }

        Ok(DescriptorStore::load_with(entries, options)?)
    }

    fn canonical_root(&self) -> CliResult<PathBuf> {
        if !self.root.is_dir() {
            return Err(CliError::invalid_argument(format!(
                "repository not found: {}",
                self.root.display()
            )));
        }
        Ok(self.root.canonicalize()?)
    }

    fn relative<'p>(&self, path: &'p Path) -> CliResult<&'p Path> {
        if let Ok(relative) = path.strip_prefix(&self.root) {
            return Ok(relative);
        }
        let root = self.canonical_root()?;
        path.strip_prefix(&root).map_err(|_| {
            CliError::invalid_argument(format!(
                "{} is outside the repository {}",
                path.display(),
                self.root.display()
            ))
        })
    }

    fn origin_of(&self, path: &Path) -> CliResult<String> {
        Ok(self.relative(path)?.to_string_lossy().replace('\\', "/"))
    }
}

fn syntax_message(err: LocalizarError) -> String {
    match err {
        LocalizarError::RecordSyntax { message } => message,
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use localizar::{LoadPolicy, MalformedReason};
    use std::fs;
    use tempfile::TempDir;

    fn record_xml(id: &str, name: &str, css: &str) -> String {
        format!(
            "<WebElementEntity>\n   <name>{name}</name>\n   <elementGuidId>{id}</elementGuidId>\n   <selectorCollection>\n      <entry>\n         <key>CSS</key>\n         <value>{css}</value>\n      </entry>\n   </selectorCollection>\n   <selectorMethod>CSS</selectorMethod>\n</WebElementEntity>"
        )
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn repository() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Page_Home/search_box.rs", &record_xml("1", "search_box", "input.search"));
        write(dir.path(), "Page_Home/menu.rs", &record_xml("2", "menu", "nav"));
        write(dir.path(), "Page_Login/Form/submit.rs", &record_xml("3", "submit", "button"));
        write(dir.path(), "Page_Login/notes.txt", "not a record");
        dir
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = repository();
        let reader = RepositoryReader::new(dir.path());
        let files = reader.discover().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["menu.rs", "search_box.rs", "submit.rs"]);
    }

    #[test]
    fn test_discover_missing_root() {
        let reader = RepositoryReader::new("/nonexistent/object-repository");
        assert!(matches!(
            reader.discover(),
            Err(CliError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_scope_of_nested_file() {
        let dir = repository();
        let reader = RepositoryReader::new(dir.path());
        let path = dir.path().join("Page_Login/Form/submit.rs");
        assert_eq!(reader.scope_of(&path).unwrap(), "Page_Login/Form");
        assert_eq!(reader.scope_of(&dir.path().join("top.rs")).unwrap(), "");
    }

    #[test]
    fn test_scope_of_file_outside_root() {
        let dir = repository();
        let reader = RepositoryReader::new(dir.path().join("Page_Home"));
        let outside = dir.path().join("Page_Login/Form/submit.rs");
        assert!(matches!(
            reader.scope_of(&outside),
            Err(CliError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_dot_relative_root_keeps_scopes() {
        let dir = tempfile::Builder::new().tempdir_in(".").unwrap();
        let root = dir.path().join("repo");
        assert!(root.starts_with("."));
        write(&root, "Page_A/button.rs", &record_xml("1", "button", "button.a"));
        write(&root, "Page_B/button.rs", &record_xml("2", "button", "button.b"));

        let report = RepositoryReader::new(&root)
            .load(&LoadOptions::default())
            .unwrap();
        assert_eq!(report.store.scopes(), ["Page_A", "Page_B"]);
        assert_eq!(report.store.get("Page_B/button").unwrap().id(), "2");
    }

    #[test]
    fn test_dot_relative_root_origins_are_relative() {
        let dir = tempfile::Builder::new().tempdir_in(".").unwrap();
        let root = dir.path().join("repo");
        write(&root, "Page_A/broken.rs", "<WebElementEntity>");
        let err = RepositoryReader::new(&root)
            .load(&LoadOptions::default())
            .unwrap_err();
        let err = match err {
            CliError::Localizar(err) => err,
            other => panic!("expected a record error, got {other:?}"),
        };
        assert_eq!(
            err.record().and_then(|r| r.origin.as_deref()),
            Some("Page_A/broken.rs")
        );
    }

    #[test]
    fn test_abort_follows_file_order() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "P/a_invalid.rs",
            &record_xml("", "a_invalid", "a"),
        );
        write(dir.path(), "P/b_broken.rs", "<WebElementEntity>");
        let err = RepositoryReader::new(dir.path())
            .load(&LoadOptions::default())
            .unwrap_err();
        let err = match err {
            CliError::Localizar(err) => err,
            other => panic!("expected a record error, got {other:?}"),
        };
        assert_eq!(err.record().map(|r| r.position), Some(0));
        assert_eq!(err.reason(), Some(&MalformedReason::MissingId));
    }

    #[test]
    fn test_positions_match_file_indices() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "P/a_broken.rs", "<WebElementEntity>");
        write(dir.path(), "P/b_valid.rs", &record_xml("1", "b_valid", "b"));
        write(dir.path(), "P/c_invalid.rs", &record_xml("", "c_invalid", "c"));
        let options = LoadOptions::new().with_policy(LoadPolicy::SkipAndReport);
        let report = RepositoryReader::new(dir.path()).load(&options).unwrap();
        let rejected: Vec<_> = report
            .rejected
            .iter()
            .map(|e| {
                let record = e.record().unwrap();
                (record.position, record.origin.clone().unwrap())
            })
            .collect();
        assert_eq!(
            rejected,
            [
                (0, "P/a_broken.rs".to_string()),
                (2, "P/c_invalid.rs".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_repository() {
        let dir = repository();
        let report = RepositoryReader::new(dir.path())
            .load(&LoadOptions::default())
            .unwrap();
        assert!(report.is_clean());
        assert_eq!(report.store.len(), 3);
        assert!(report.store.get("Page_Login/Form/submit").is_ok());
        assert_eq!(report.store.scopes(), ["Page_Home", "Page_Login/Form"]);
    }

    #[test]
    fn test_custom_extension() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Page/a.xml", &record_xml("1", "a", "a"));
        write(dir.path(), "Page/b.rs", &record_xml("2", "b", "b"));
        let report = RepositoryReader::new(dir.path())
            .with_extension("xml")
            .load(&LoadOptions::default())
            .unwrap();
        assert_eq!(report.store.len(), 1);
        assert!(report.store.get("Page/a").is_ok());
    }

    #[test]
    fn test_unreadable_file_aborts_by_default() {
        let dir = repository();
        write(dir.path(), "Page_Home/broken.rs", "<WebElementEntity><name>x</WebElementEntity>");
        let err = RepositoryReader::new(dir.path())
            .load(&LoadOptions::default())
            .unwrap_err();
        let err = match err {
            CliError::Localizar(err) => err,
            other => panic!("expected a record error, got {other:?}"),
        };
        assert_eq!(
            err.record().and_then(|r| r.origin.as_deref()),
            Some("Page_Home/broken.rs")
        );
        assert!(matches!(err.reason(), Some(MalformedReason::Syntax(_))));
    }

    #[test]
    fn test_skip_collects_syntax_and_validation_rejections() {
        let dir = repository();
        write(dir.path(), "Page_Home/broken.rs", "<WebElementEntity><name>x</WebElementEntity>");
        write(dir.path(), "Page_Home/zz_duplicate.rs", &record_xml("9", "menu", "nav.other"));
        let options = LoadOptions::new().with_policy(LoadPolicy::SkipAndReport);
        let report = RepositoryReader::new(dir.path()).load(&options).unwrap();

        assert_eq!(report.store.len(), 3);
        assert_eq!(report.rejected.len(), 2);
        assert!(matches!(
            report.rejected[0].reason(),
            Some(MalformedReason::Syntax(_))
        ));
        assert!(matches!(
            report.rejected[1].reason(),
            Some(MalformedReason::DuplicateName { .. })
        ));
        assert_eq!(
            report.rejected[1].record().and_then(|r| r.origin.as_deref()),
            Some("Page_Home/zz_duplicate.rs")
        );
    }
}
