use std::fmt;

/// Non-fatal conditions that stop or shorten a run without failing it.
/// These are reported on the warning channel and exit with code 0.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Requested version is the one already in the manifests
    VersionUnchanged,
    /// The working tree was dirty and the user chose not to continue
    UncommittedChangesDeclined,
    /// The project directory is not inside a git working tree
    NotARepository,
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::VersionUnchanged => write!(f, "Version unchanged. No action taken."),
            BoundaryWarning::UncommittedChangesDeclined => {
                write!(f, "Aborted due to uncommitted changes.")
            }
            BoundaryWarning::NotARepository => {
                write!(f, "Not a git repository. Skipping git operations.")
            }
        }
    }
}
