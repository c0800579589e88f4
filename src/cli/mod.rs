//! Command-line entry point
//!
//! Turns parsed arguments into a configured [orchestration::VersionUpdate]
//! wired to the real filesystem, git and terminal.

pub mod orchestration;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;

use crate::config;
use crate::git::Git2VersionControl;
use crate::manifest::FsManifestStore;
use crate::ui::{self, ConsoleOperator};
use orchestration::{VersionOptions, VersionUpdate, EXIT_FAILURE, EXIT_SUCCESS};

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "expo-version",
    version,
    about = "Version management for Expo React Native apps",
    after_help = "Reads the current version from app.json, prompts for a new version when none is \
                  given, and updates both app.json and package.json. It also creates a git commit \
                  and tag (unless disabled with --no-git-tag-version).\n\n\
                  Examples:\n  \
                  expo-version                             # Interactive version selection\n  \
                  expo-version 1.2.3                       # Set specific version\n  \
                  expo-version 2.0.0 --no-git-tag-version  # Set version without git tag"
)]
pub struct Args {
    /// New version in semver format (e.g., 1.2.3); prompts when omitted
    #[arg(value_name = "VERSION")]
    pub new_version: Option<String>,

    /// Prevent git tag creation
    #[arg(long)]
    pub no_git_tag_version: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short = 'C', long, help = "Project directory (defaults to the current directory)")]
    pub cwd: Option<PathBuf>,
}

/// Parse `argv` and run the tool, returning the exit code.
///
/// Help and version output exit with 0. Any other usage error is reported on
/// the error channel and exits with 1, like every other failure.
pub fn run_from<I, T>(argv: I) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => run(args),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            EXIT_SUCCESS
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered.trim_start_matches("error: ").trim_end();
            ui::display_error(message);
            EXIT_FAILURE
        }
    }
}

/// Run the tool for already-parsed arguments, returning the exit code.
pub fn run(args: Args) -> u8 {
    let project_dir = match args.cwd {
        Some(dir) => dir,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                ui::display_error(&format!("Cannot determine working directory: {}", e));
                return EXIT_FAILURE;
            }
        },
    };

    let loaded = config::load_config(args.config.as_deref(), &project_dir)
        .with_context(|| format!("Cannot load configuration for {}", project_dir.display()));
    let config = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            return EXIT_FAILURE;
        }
    };

    let options = VersionOptions::from_config(&config).skipping_tag(args.no_git_tag_version);
    let manifests = FsManifestStore::with_file_names(
        &project_dir,
        &config.files.app_manifest,
        &config.files.package_manifest,
    );
    let git = Git2VersionControl::new();
    let operator = ConsoleOperator::stdin();

    VersionUpdate::new(project_dir, options, &manifests, &git, &operator)
        .run_and_report(args.new_version.as_deref())
}
