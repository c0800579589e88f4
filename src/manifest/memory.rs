use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{ExpoVersionError, Result};
use crate::manifest::{
    AppManifest, ManifestStore, PackageManifest, DEFAULT_APP_MANIFEST, DEFAULT_PACKAGE_MANIFEST,
};

/// Manifest store backed by in-memory JSON documents, for testing
/// without touching the filesystem.
///
/// Documents are validated on every read, like the file store does.
/// A `None` document behaves like a missing file.
pub struct InMemoryManifestStore {
    app: RefCell<Option<Value>>,
    package: RefCell<Option<Value>>,
    reads: Cell<usize>,
    writes: Cell<usize>,
}

impl InMemoryManifestStore {
    pub fn new(app: Value, package: Value) -> Self {
        InMemoryManifestStore {
            app: RefCell::new(Some(app)),
            package: RefCell::new(Some(package)),
            reads: Cell::new(0),
            writes: Cell::new(0),
        }
    }

    /// Both manifests at `version`, with a couple of unrelated fields.
    pub fn with_version(version: &str) -> Self {
        Self::new(
            serde_json::json!({"expo": {"name": "demo", "slug": "demo", "version": version}}),
            serde_json::json!({"name": "demo", "version": version, "private": true}),
        )
    }

    /// A store where the app manifest does not exist.
    pub fn without_app_manifest(package: Value) -> Self {
        let store = Self::new(Value::Null, package);
        store.app.replace(None);
        store
    }

    /// Replace the app document, as if edited on disk behind the tool's back.
    pub fn replace_app(&self, app: Value) {
        self.app.replace(Some(app));
    }

    pub fn app(&self) -> Option<Value> {
        self.app.borrow().clone()
    }

    pub fn package(&self) -> Option<Value> {
        self.package.borrow().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    fn read(&self, slot: &RefCell<Option<Value>>, name: &str) -> Result<Value> {
        self.reads.set(self.reads.get() + 1);
        slot.borrow()
            .clone()
            .ok_or_else(|| ExpoVersionError::NotFound(PathBuf::from(name)))
    }

    fn write(&self, slot: &RefCell<Option<Value>>, value: Value) {
        self.writes.set(self.writes.get() + 1);
        slot.replace(Some(value));
    }
}

impl ManifestStore for InMemoryManifestStore {
    fn read_app_manifest(&self) -> Result<AppManifest> {
        let value = self.read(&self.app, DEFAULT_APP_MANIFEST)?;
        AppManifest::from_value(value, Path::new(DEFAULT_APP_MANIFEST))
    }

    fn read_package_manifest(&self) -> Result<PackageManifest> {
        let value = self.read(&self.package, DEFAULT_PACKAGE_MANIFEST)?;
        PackageManifest::from_value(value, Path::new(DEFAULT_PACKAGE_MANIFEST))
    }

    fn write_app_manifest(&self, manifest: &AppManifest) -> Result<()> {
        self.write(&self.app, manifest.as_value());
        Ok(())
    }

    fn write_package_manifest(&self, manifest: &PackageManifest) -> Result<()> {
        self.write(&self.package, manifest.as_value());
        Ok(())
    }

    fn manifest_paths(&self) -> Vec<PathBuf> {
        vec![
            PathBuf::from(DEFAULT_APP_MANIFEST),
            PathBuf::from(DEFAULT_PACKAGE_MANIFEST),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_in_memory_round_trip_counts() {
        let store = InMemoryManifestStore::with_version("1.0.0");
        let mut app = store.read_app_manifest().unwrap();
        app.set_version("1.0.1");
        store.write_app_manifest(&app).unwrap();

        assert_eq!(store.read_count(), 1);
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.app().unwrap()["expo"]["version"], "1.0.1");
        assert_eq!(store.app().unwrap()["expo"]["slug"], "demo");
    }

    #[test]
    fn test_in_memory_missing_app_manifest() {
        let store = InMemoryManifestStore::without_app_manifest(json!({"version": "1.0.0"}));
        assert!(matches!(
            store.read_app_manifest().unwrap_err(),
            ExpoVersionError::NotFound(_)
        ));
    }

    #[test]
    fn test_in_memory_validates_schema() {
        let store = InMemoryManifestStore::new(json!({"expo": {}}), json!({}));
        assert!(matches!(
            store.read_app_manifest().unwrap_err(),
            ExpoVersionError::Schema { .. }
        ));
    }
}
