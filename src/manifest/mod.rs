//! Manifest storage
//!
//! Reads and writes the two JSON manifests that carry the app version:
//! the Expo app config (`expo.version`) and the package descriptor
//! (`version`). Every field the tool does not understand is carried through
//! a read/write cycle untouched, in its original key order.
//!
//! - [FsManifestStore]: files in a project directory
//! - [memory::InMemoryManifestStore]: in-memory double for testing

pub mod memory;

pub use memory::InMemoryManifestStore;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{ExpoVersionError, Result};

pub const DEFAULT_APP_MANIFEST: &str = "app.json";
pub const DEFAULT_PACKAGE_MANIFEST: &str = "package.json";

/// Expo app config with a required `expo.version` string.
#[derive(Debug, Clone, PartialEq)]
pub struct AppManifest {
    data: Map<String, Value>,
}

impl AppManifest {
    /// Checks the shape of a parsed document.
    ///
    /// `path` is only used for error messages.
    pub fn from_value(value: Value, path: &Path) -> Result<Self> {
        let schema_error = || ExpoVersionError::Schema {
            path: path.to_path_buf(),
            field: "expo.version",
        };

        let Value::Object(data) = value else {
            return Err(schema_error());
        };

        let has_version = data
            .get("expo")
            .and_then(|expo| expo.get("version"))
            .and_then(Value::as_str)
            .is_some_and(|version| !version.is_empty());
        if !has_version {
            return Err(schema_error());
        }

        Ok(AppManifest { data })
    }

    pub fn version(&self) -> &str {
        self.data
            .get("expo")
            .and_then(|expo| expo.get("version"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn set_version(&mut self, version: &str) {
        if let Some(Value::Object(expo)) = self.data.get_mut("expo") {
            expo.insert("version".to_string(), Value::String(version.to_string()));
        }
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

/// Package descriptor; `version` may be absent until the first write.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    data: Map<String, Value>,
}

impl PackageManifest {
    pub fn from_value(value: Value, path: &Path) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(PackageManifest { data }),
            _ => Err(ExpoVersionError::Schema {
                path: path.to_path_buf(),
                field: "a top-level object with a version",
            }),
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.data.get("version").and_then(Value::as_str)
    }

    pub fn set_version(&mut self, version: &str) {
        self.data
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

/// Storage seam for the two manifests.
///
/// Every read goes back to the source; implementations must not cache
/// between calls.
pub trait ManifestStore {
    /// Fails with `NotFound`, `Parse`, or `Schema` when `expo.version` is missing.
    fn read_app_manifest(&self) -> Result<AppManifest>;

    /// Fails with `NotFound` or `Parse`.
    fn read_package_manifest(&self) -> Result<PackageManifest>;

    fn write_app_manifest(&self, manifest: &AppManifest) -> Result<()>;

    fn write_package_manifest(&self, manifest: &PackageManifest) -> Result<()>;

    /// Paths of both manifests, app config first; used for staging.
    fn manifest_paths(&self) -> Vec<PathBuf>;
}

/// Manifests stored as files in a project directory.
#[derive(Debug, Clone)]
pub struct FsManifestStore {
    app_path: PathBuf,
    package_path: PathBuf,
}

impl FsManifestStore {
    /// Use the default file names inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_file_names(dir, DEFAULT_APP_MANIFEST, DEFAULT_PACKAGE_MANIFEST)
    }

    pub fn with_file_names(
        dir: impl AsRef<Path>,
        app_manifest: impl AsRef<Path>,
        package_manifest: impl AsRef<Path>,
    ) -> Self {
        let dir = dir.as_ref();
        FsManifestStore {
            app_path: dir.join(app_manifest),
            package_path: dir.join(package_manifest),
        }
    }

    pub fn app_path(&self) -> &Path {
        &self.app_path
    }

    pub fn package_path(&self) -> &Path {
        &self.package_path
    }
}

impl ManifestStore for FsManifestStore {
    fn read_app_manifest(&self) -> Result<AppManifest> {
        let value = read_json(&self.app_path)?;
        AppManifest::from_value(value, &self.app_path)
    }

    fn read_package_manifest(&self) -> Result<PackageManifest> {
        let value = read_json(&self.package_path)?;
        PackageManifest::from_value(value, &self.package_path)
    }

    fn write_app_manifest(&self, manifest: &AppManifest) -> Result<()> {
        write_json(&manifest.as_value(), &self.app_path)
    }

    fn write_package_manifest(&self, manifest: &PackageManifest) -> Result<()> {
        write_json(&manifest.as_value(), &self.package_path)
    }

    fn manifest_paths(&self) -> Vec<PathBuf> {
        vec![self.app_path.clone(), self.package_path.clone()]
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ExpoVersionError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content).map_err(|source| ExpoVersionError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-prints with a trailing newline, then swaps the file into place.
fn write_json(value: &Value, path: &Path) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value).map_err(|source| {
        ExpoVersionError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    content.push('\n');

    // Replace the file a symlink points at, never the link itself.
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e.into()),
    };

    let mut staging = target.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, content)?;
    let renamed = match fs::metadata(&target) {
        Ok(existing) => fs::set_permissions(&staging, existing.permissions()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
    .and_then(|()| fs::rename(&staging, &target));
    if let Err(e) = renamed {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }
    Ok(())
}
