//! Git operations abstraction layer
//!
//! The orchestrator only needs five things from version control: whether a
//! project lives in a working tree, whether that tree is dirty, and the
//! ability to stage, commit and tag. They are expressed by the
//! [VersionControl] trait so the workflow can run against:
//!
//! - [repository::Git2VersionControl]: a real implementation using the `git2` crate
//! - [mock::MockVersionControl]: a recording implementation for testing

pub mod mock;
pub mod repository;

pub use mock::{GitCall, MockVersionControl};
pub use repository::Git2VersionControl;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Version-control operations used by the version update workflow.
///
/// Every method takes the project directory; the repository is discovered
/// from it, so the project may sit in a subdirectory of the work tree.
pub trait VersionControl {
    /// True if `dir` is inside a git working tree.
    ///
    /// Never fails: any error while discovering the repository means
    /// "not a repository".
    fn is_repository(&self, dir: &Path) -> bool;

    /// True if the working tree has modified, staged or untracked files.
    ///
    /// Ignored files do not count. Only called when [Self::is_repository]
    /// returned true.
    fn has_uncommitted_changes(&self, dir: &Path) -> Result<bool>;

    /// Add `files` to the index.
    fn stage(&self, files: &[PathBuf], dir: &Path) -> Result<()>;

    /// Commit the index on top of `HEAD` with `message`.
    fn commit(&self, message: &str, dir: &Path) -> Result<()>;

    /// Create a lightweight tag named `name` at `HEAD`.
    ///
    /// Fails if a tag with that name already exists.
    fn tag(&self, name: &str, dir: &Path) -> Result<()>;
}
