use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExpoVersionError, Result};
use crate::manifest::{DEFAULT_APP_MANIFEST, DEFAULT_PACKAGE_MANIFEST};

pub const CONFIG_FILE_NAME: &str = "expoversion.toml";
const VERSION_PLACEHOLDER: &str = "{version}";

/// Represents the complete configuration for expo-version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub git: GitConfig,
}

fn default_app_manifest() -> String {
    DEFAULT_APP_MANIFEST.to_string()
}

fn default_package_manifest() -> String {
    DEFAULT_PACKAGE_MANIFEST.to_string()
}

fn default_version_template() -> String {
    format!("v{}", VERSION_PLACEHOLDER)
}

/// Manifest file names, relative to the project directory.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_app_manifest")]
    pub app_manifest: String,

    #[serde(default = "default_package_manifest")]
    pub package_manifest: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            app_manifest: default_app_manifest(),
            package_manifest: default_package_manifest(),
        }
    }
}

/// Commit and tag behavior.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default)]
    pub skip_tag: bool,

    #[serde(default = "default_version_template")]
    pub commit_message: String,

    #[serde(default = "default_version_template")]
    pub tag_name: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            skip_tag: false,
            commit_message: default_version_template(),
            tag_name: default_version_template(),
        }
    }
}

impl Config {
    /// Checks that both git templates carry exactly one `{version}`.
    pub fn validate(&self) -> Result<()> {
        for (key, template) in [
            ("git.commit_message", &self.git.commit_message),
            ("git.tag_name", &self.git.tag_name),
        ] {
            if template.matches(VERSION_PLACEHOLDER).count() != 1 {
                return Err(ExpoVersionError::config(format!(
                    "Invalid {} '{}': should have exactly one {{version}} placeholder",
                    key, template
                )));
            }
        }
        Ok(())
    }
}

/// Substitute `version` into a `{version}` template.
pub fn render_template(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `expoversion.toml` in the project directory
/// 3. `.expoversion.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>, project_dir: &Path) -> Result<Config> {
    let Some(path) = locate_config(config_path, project_dir) else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ExpoVersionError::config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&config_str).map_err(|e| {
        ExpoVersionError::config(format!("Cannot parse config file {}: {}", path.display(), e))
    })?;
    config.validate()?;

    Ok(config)
}

fn locate_config(config_path: Option<&Path>, project_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(path.to_path_buf());
    }

    let local = project_dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}
