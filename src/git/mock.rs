use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::error::{ExpoVersionError, Result};
use crate::git::VersionControl;

/// A side-effecting call recorded by [MockVersionControl].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Stage(Vec<PathBuf>),
    Commit(String),
    Tag(String),
}

/// Mock repository for testing without actual git operations
pub struct MockVersionControl {
    repository: bool,
    uncommitted_changes: bool,
    fail_on: Option<&'static str>,
    calls: RefCell<Vec<GitCall>>,
}

impl MockVersionControl {
    /// A clean repository
    pub fn new() -> Self {
        MockVersionControl {
            repository: true,
            uncommitted_changes: false,
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A directory outside any repository
    pub fn not_a_repository() -> Self {
        MockVersionControl {
            repository: false,
            ..Self::new()
        }
    }

    /// A repository with a dirty working tree
    pub fn with_uncommitted_changes() -> Self {
        MockVersionControl {
            uncommitted_changes: true,
            ..Self::new()
        }
    }

    /// Make the named operation (`"stage"`, `"commit"` or `"tag"`) fail.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, operation: &'static str, call: GitCall) -> Result<()> {
        if self.fail_on == Some(operation) {
            return Err(ExpoVersionError::vcs(operation)(git2::Error::from_str(
                "simulated failure",
            )));
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Default for MockVersionControl {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockVersionControl {
    fn is_repository(&self, _dir: &Path) -> bool {
        self.repository
    }

    fn has_uncommitted_changes(&self, _dir: &Path) -> Result<bool> {
        Ok(self.uncommitted_changes)
    }

    fn stage(&self, files: &[PathBuf], _dir: &Path) -> Result<()> {
        self.record("stage", GitCall::Stage(files.to_vec()))
    }

    fn commit(&self, message: &str, _dir: &Path) -> Result<()> {
        self.record("commit", GitCall::Commit(message.to_string()))
    }

    fn tag(&self, name: &str, _dir: &Path) -> Result<()> {
        self.record("tag", GitCall::Tag(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_in_order() {
        let git = MockVersionControl::new();
        let dir = Path::new(".");
        git.stage(&[PathBuf::from("app.json")], dir).unwrap();
        git.commit("v1.0.1", dir).unwrap();
        git.tag("v1.0.1", dir).unwrap();

        assert_eq!(
            git.calls(),
            vec![
                GitCall::Stage(vec![PathBuf::from("app.json")]),
                GitCall::Commit("v1.0.1".to_string()),
                GitCall::Tag("v1.0.1".to_string()),
            ]
        );
    }

    #[test]
    fn test_mock_failure_is_not_recorded() {
        let git = MockVersionControl::new().failing_on("commit");
        let err = git.commit("v1.0.1", Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("simulated failure"));
        assert!(git.calls().is_empty());
    }

    #[test]
    fn test_mock_repository_states() {
        let dir = Path::new(".");
        assert!(!MockVersionControl::not_a_repository().is_repository(dir));
        assert!(MockVersionControl::with_uncommitted_changes()
            .has_uncommitted_changes(dir)
            .unwrap());
        assert!(!MockVersionControl::default()
            .has_uncommitted_changes(dir)
            .unwrap());
    }
}
