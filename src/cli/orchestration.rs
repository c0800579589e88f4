//! Version update workflow
//!
//! Reads the current version, settles on a target, updates both manifests
//! and records the change in git. The workflow itself never exits the
//! process: [VersionUpdate::run] returns an [Outcome] or an error, and
//! [VersionUpdate::run_and_report] is the one place that turns either into
//! an exit code.

use std::path::PathBuf;

use crate::boundary::BoundaryWarning;
use crate::config::{self, Config};
use crate::error::{ExpoVersionError, Result};
use crate::git::VersionControl;
use crate::manifest::ManifestStore;
use crate::ui::Operator;
use crate::version::{self, VersionTransition};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

const UNCOMMITTED_CHANGES_PROMPT: &str = "You have uncommitted changes. Continue anyway?";

/// Options for the version update workflow
#[derive(Debug, Clone, PartialEq)]
pub struct VersionOptions {
    /// Commit without creating a tag
    pub skip_tag: bool,

    /// Commit message template, `{version}` is replaced by the target
    pub commit_message: String,

    /// Tag name template, `{version}` is replaced by the target
    pub tag_name: String,
}

impl Default for VersionOptions {
    fn default() -> Self {
        VersionOptions::from_config(&Config::default())
    }
}

impl VersionOptions {
    pub fn from_config(config: &Config) -> Self {
        VersionOptions {
            skip_tag: config.git.skip_tag,
            commit_message: config.git.commit_message.clone(),
            tag_name: config.git.tag_name.clone(),
        }
    }

    pub fn skipping_tag(mut self, skip_tag: bool) -> Self {
        self.skip_tag = self.skip_tag || skip_tag;
        self
    }
}

/// What git recorded for an update
#[derive(Debug, Clone, PartialEq)]
pub struct VcsRecord {
    pub commit_message: String,
    pub tag: Option<String>,
}

/// Result of a run that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Both manifests now carry the target version
    Updated {
        transition: VersionTransition,
        /// `None` when the project is not in a git repository
        vcs: Option<VcsRecord>,
    },
    /// The target equals the current version; nothing was touched
    Unchanged { version: String },
    /// The user declined to continue with a dirty working tree
    Declined,
}

/// The version update workflow, wired to its collaborators
pub struct VersionUpdate<'a, M, G, O> {
    project_dir: PathBuf,
    options: VersionOptions,
    manifests: &'a M,
    git: &'a G,
    operator: &'a O,
}

impl<'a, M, G, O> VersionUpdate<'a, M, G, O>
where
    M: ManifestStore,
    G: VersionControl,
    O: Operator,
{
    pub fn new(
        project_dir: impl Into<PathBuf>,
        options: VersionOptions,
        manifests: &'a M,
        git: &'a G,
        operator: &'a O,
    ) -> Self {
        VersionUpdate {
            project_dir: project_dir.into(),
            options,
            manifests,
            git,
            operator,
        }
    }

    /// Runs the workflow and maps the result to a process exit code.
    ///
    /// Failures are reported on the operator's error channel and yield 1;
    /// every [Outcome] yields 0.
    pub fn run_and_report(&self, explicit_version: Option<&str>) -> u8 {
        match self.run(explicit_version) {
            Ok(_) => EXIT_SUCCESS,
            Err(e) => {
                self.operator.show_error(&e.to_string());
                EXIT_FAILURE
            }
        }
    }

    /// Main version update workflow
    ///
    /// 1. Read the current version from the app manifest
    /// 2. Resolve the target (explicit argument or interactive prompt)
    /// 3. Validate it; stop early if it equals the current version
    /// 4. Confirm with the user if the working tree is dirty
    /// 5. Rewrite both manifests
    /// 6. Stage, commit and (unless disabled) tag
    pub fn run(&self, explicit_version: Option<&str>) -> Result<Outcome> {
        let current = self.manifests.read_app_manifest()?.version().to_string();
        self.operator.show_current_version(&current);

        let target = match explicit_version {
            Some(version) => version.to_string(),
            None => self.operator.prompt_for_version(&current)?,
        };

        if !version::validate(&target) {
            return Err(ExpoVersionError::Validation(target));
        }

        if target == current {
            self.warn(BoundaryWarning::VersionUnchanged);
            return Ok(Outcome::Unchanged { version: current });
        }

        let in_repository = self.git.is_repository(&self.project_dir);
        if in_repository
            && self.git.has_uncommitted_changes(&self.project_dir)?
            && !self.operator.confirm_continue(UNCOMMITTED_CHANGES_PROMPT)?
        {
            self.warn(BoundaryWarning::UncommittedChangesDeclined);
            return Ok(Outcome::Declined);
        }

        let transition = VersionTransition::new(current, target);
        self.write_manifests(&transition)?;

        let vcs = if in_repository {
            Some(self.record_in_version_control(&transition)?)
        } else {
            self.warn(BoundaryWarning::NotARepository);
            None
        };

        self.operator.show_success(&format!(
            "Version updated from {} to {}",
            transition.current(),
            transition.target()
        ));

        Ok(Outcome::Updated { transition, vcs })
    }

    /// Re-reads both manifests so edits made while the user was being
    /// prompted are not overwritten, then writes both unconditionally.
    fn write_manifests(&self, transition: &VersionTransition) -> Result<()> {
        let mut app = self.manifests.read_app_manifest()?;
        let mut package = self.manifests.read_package_manifest()?;

        app.set_version(transition.target());
        package.set_version(transition.target());

        self.manifests.write_app_manifest(&app)?;
        self.manifests.write_package_manifest(&package)?;
        Ok(())
    }

    fn record_in_version_control(&self, transition: &VersionTransition) -> Result<VcsRecord> {
        self.git.stage(&self.manifests.manifest_paths(), &self.project_dir)?;

        let commit_message =
            config::render_template(&self.options.commit_message, transition.target());
        self.git.commit(&commit_message, &self.project_dir)?;

        let tag = if self.options.skip_tag {
            None
        } else {
            let tag_name = config::render_template(&self.options.tag_name, transition.target());
            self.git.tag(&tag_name, &self.project_dir)?;
            self.operator.show_success(&format!("Created git tag: {}", tag_name));
            Some(tag_name)
        };

        self.operator.show_success(&format!("Created git commit: {}", commit_message));

        Ok(VcsRecord {
            commit_message,
            tag,
        })
    }

    fn warn(&self, warning: BoundaryWarning) {
        self.operator.show_warning(&warning.to_string());
    }
}
