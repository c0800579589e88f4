use std::path::{Path, PathBuf};

use git2::{ErrorCode, ObjectType, Repository, StatusOptions};

use crate::error::{ExpoVersionError, Result};
use crate::git::VersionControl;

/// [VersionControl] on top of libgit2.
///
/// Stateless: each call discovers the repository from the directory it is
/// given, so changes made between calls are always observed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2VersionControl;

impl Git2VersionControl {
    pub fn new() -> Self {
        Git2VersionControl
    }

    fn open(dir: &Path) -> Result<Repository> {
        Repository::discover(dir).map_err(ExpoVersionError::vcs("open"))
    }
}

impl VersionControl for Git2VersionControl {
    fn is_repository(&self, dir: &Path) -> bool {
        Repository::discover(dir)
            .map(|repo| !repo.is_bare())
            .unwrap_or(false)
    }

    fn has_uncommitted_changes(&self, dir: &Path) -> Result<bool> {
        let repo = Self::open(dir)?;

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = repo
            .statuses(Some(&mut options))
            .map_err(ExpoVersionError::vcs("status"))?;

        Ok(statuses
            .iter()
            .any(|entry| !entry.status().is_ignored()))
    }

    fn stage(&self, files: &[PathBuf], dir: &Path) -> Result<()> {
        let repo = Self::open(dir)?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| {
                ExpoVersionError::vcs("stage")(git2::Error::from_str(
                    "repository has no working directory",
                ))
            })?
            .to_path_buf();

        let mut index = repo.index().map_err(ExpoVersionError::vcs("stage"))?;
        for file in files {
            let relative = relative_to_workdir(&workdir, file)?;
            index
                .add_path(&relative)
                .map_err(ExpoVersionError::vcs("stage"))?;
        }
        index.write().map_err(ExpoVersionError::vcs("stage"))?;

        Ok(())
    }

    fn commit(&self, message: &str, dir: &Path) -> Result<()> {
        let repo = Self::open(dir)?;
        let signature = repo.signature().map_err(ExpoVersionError::vcs("commit"))?;

        let mut index = repo.index().map_err(ExpoVersionError::vcs("commit"))?;
        let tree_oid = index.write_tree().map_err(ExpoVersionError::vcs("commit"))?;
        let tree = repo
            .find_tree(tree_oid)
            .map_err(ExpoVersionError::vcs("commit"))?;

        // An unborn branch has no HEAD commit yet; this becomes the root commit.
        let parent = match repo.head() {
            Ok(head) => Some(
                head.peel_to_commit()
                    .map_err(ExpoVersionError::vcs("commit"))?,
            ),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(ExpoVersionError::vcs("commit")(e)),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )
        .map_err(ExpoVersionError::vcs("commit"))?;

        Ok(())
    }

    fn tag(&self, name: &str, dir: &Path) -> Result<()> {
        let repo = Self::open(dir)?;
        let target = repo
            .head()
            .and_then(|head| head.peel(ObjectType::Commit))
            .map_err(ExpoVersionError::vcs("tag"))?;

        repo.tag_lightweight(name, &target, false)
            .map_err(ExpoVersionError::vcs("tag"))?;

        Ok(())
    }
}

/// Index paths are relative to the work tree root.
fn relative_to_workdir(workdir: &Path, file: &Path) -> Result<PathBuf> {
    let workdir = workdir.canonicalize()?;
    let file = file.canonicalize()?;

    file.strip_prefix(&workdir)
        .map(Path::to_path_buf)
        .map_err(|_| {
            ExpoVersionError::vcs("stage")(git2::Error::from_str(&format!(
                "{} is outside the repository at {}",
                file.display(),
                workdir.display()
            )))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        (dir, repo)
    }

    fn commit_all(git: &Git2VersionControl, dir: &Path, names: &[&str], message: &str) {
        let files: Vec<PathBuf> = names.iter().map(|name| dir.join(name)).collect();
        git.stage(&files, dir).unwrap();
        git.commit(message, dir).unwrap();
    }

    #[test]
    fn test_plain_directory_is_not_repository() {
        let dir = TempDir::new().unwrap();
        let git = Git2VersionControl::new();
        assert!(!git.is_repository(dir.path()));
    }

    #[test]
    fn test_missing_directory_is_not_repository() {
        let git = Git2VersionControl::new();
        assert!(!git.is_repository(Path::new("/definitely/not/here")));
    }

    #[test]
    fn test_initialized_repository_detected() {
        let (dir, _repo) = init_repo();
        assert!(Git2VersionControl::new().is_repository(dir.path()));
    }

    #[test]
    fn test_untracked_file_counts_as_uncommitted() {
        let (dir, _repo) = init_repo();
        let git = Git2VersionControl::new();
        assert!(!git.has_uncommitted_changes(dir.path()).unwrap());

        fs::write(dir.path().join("app.json"), "{}").unwrap();
        assert!(git.has_uncommitted_changes(dir.path()).unwrap());
    }

    #[test]
    fn test_ignored_file_is_not_uncommitted() {
        let (dir, _repo) = init_repo();
        let git = Git2VersionControl::new();
        fs::write(dir.path().join(".gitignore"), "node_modules/\n").unwrap();
        commit_all(&git, dir.path(), &[".gitignore"], "ignore");

        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules").join("x.js"), "").unwrap();
        assert!(!git.has_uncommitted_changes(dir.path()).unwrap());
    }

    #[test]
    fn test_stage_commit_and_tag() {
        let (dir, repo) = init_repo();
        let git = Git2VersionControl::new();
        fs::write(dir.path().join("app.json"), "{}").unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        commit_all(&git, dir.path(), &["app.json", "package.json"], "v1.0.0");
        git.tag("v1.0.0", dir.path()).unwrap();

        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message(), Some("v1.0.0"));
        assert_eq!(head.parent_count(), 0);
        assert!(!git.has_uncommitted_changes(dir.path()).unwrap());

        let tagged = repo
            .find_reference("refs/tags/v1.0.0")
            .unwrap()
            .peel_to_commit()
            .unwrap();
        assert_eq!(tagged.id(), head.id());
    }

    #[test]
    fn test_second_commit_has_parent() {
        let (dir, repo) = init_repo();
        let git = Git2VersionControl::new();
        fs::write(dir.path().join("app.json"), "{\"v\": 1}").unwrap();
        commit_all(&git, dir.path(), &["app.json"], "first");
        fs::write(dir.path().join("app.json"), "{\"v\": 2}").unwrap();
        commit_all(&git, dir.path(), &["app.json"], "second");

        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.parent_count(), 1);
        assert_eq!(head.parent(0).unwrap().message(), Some("first"));
    }

    #[test]
    fn test_duplicate_tag_fails() {
        let (dir, _repo) = init_repo();
        let git = Git2VersionControl::new();
        fs::write(dir.path().join("app.json"), "{}").unwrap();
        commit_all(&git, dir.path(), &["app.json"], "v1.0.0");

        git.tag("v1.0.0", dir.path()).unwrap();
        let err = git.tag("v1.0.0", dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ExpoVersionError::VcsOperation {
                operation: "tag",
                ..
            }
        ));
    }

    #[test]
    fn test_tag_without_commits_fails() {
        let (dir, _repo) = init_repo();
        assert!(Git2VersionControl::new().tag("v1.0.0", dir.path()).is_err());
    }

    #[test]
    fn test_stage_from_subdirectory_project() {
        let (dir, repo) = init_repo();
        let git = Git2VersionControl::new();
        let project = dir.path().join("apps").join("mobile");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("app.json"), "{}").unwrap();

        git.stage(&[project.join("app.json")], &project).unwrap();

        let index = repo.index().unwrap();
        assert!(index
            .get_path(Path::new("apps/mobile/app.json"), 0)
            .is_some());
    }
}
