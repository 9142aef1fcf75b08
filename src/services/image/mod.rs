//! App-private copies of user-picked background images.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;

pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `source` into the store under a fresh name and return the new path.
    pub fn import(&self, source: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            bail!("Image file does not exist: {:?}", source);
        }

        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create image directory: {:?}", self.root))?;

        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "img".to_string());

        let stamp = Local::now().format("%Y%m%d_%H%M%S_%f");
        let mut destination = self.root.join(format!("event_{}.{}", stamp, extension));
        let mut suffix = 1;
        while destination.exists() {
            destination = self
                .root
                .join(format!("event_{}_{}.{}", stamp, suffix, extension));
            suffix += 1;
        }

        fs::copy(source, &destination)
            .with_context(|| format!("Failed to copy image {:?} to {:?}", source, destination))?;

        log::info!("Imported image {:?} as {:?}", source, destination);
        Ok(destination)
    }

    /// Delete an image previously imported into this store. Paths outside
    /// the store are left alone. Returns whether a file was removed.
    pub fn remove(&self, path: &Path) -> Result<bool> {
        if !path.starts_with(&self.root) || !path.is_file() {
            return Ok(false);
        }

        fs::remove_file(path).with_context(|| format!("Failed to remove image {:?}", path))?;
        Ok(true)
    }

    /// Remove `previous` once an event no longer points at it, i.e. when it
    /// differs from `current`. Returns whether a file was removed.
    pub fn discard_replaced(&self, previous: Option<&str>, current: Option<&str>) -> Result<bool> {
        match previous {
            Some(previous) if Some(previous) != current => self.remove(Path::new(previous)),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_copies_with_extension() {
        let source_dir = tempfile::tempdir().unwrap();
        let store_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("Poster.PNG");
        fs::write(&source, b"fake png").unwrap();

        let store = ImageStore::new(store_dir.path().join("images"));
        let imported = store.import(&source).unwrap();

        assert!(imported.starts_with(store.root()));
        assert_eq!(imported.extension().unwrap(), "png");
        assert_eq!(fs::read(&imported).unwrap(), b"fake png");
        assert!(source.exists(), "source must be left in place");
    }

    #[test]
    fn test_repeated_imports_do_not_collide() {
        let source_dir = tempfile::tempdir().unwrap();
        let store_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("a.jpg");
        fs::write(&source, b"jpg").unwrap();

        let store = ImageStore::new(store_dir.path());
        let first = store.import(&source).unwrap();
        let second = store.import(&source).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_import_missing_source_fails() {
        let store_dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(store_dir.path());
        assert!(store.import(Path::new("/definitely/not/here.png")).is_err());
    }

    #[test]
    fn test_remove_only_inside_store() {
        let outside_dir = tempfile::tempdir().unwrap();
        let store_dir = tempfile::tempdir().unwrap();
        let outside = outside_dir.path().join("keep.png");
        fs::write(&outside, b"x").unwrap();

        let store = ImageStore::new(store_dir.path());
        assert!(!store.remove(&outside).unwrap());
        assert!(outside.exists());

        let imported = store.import(&outside).unwrap();
        assert!(store.remove(&imported).unwrap());
        assert!(!imported.exists());
    }

    #[test]
    fn test_discard_replaced_removes_only_superseded_image() {
        let source_dir = tempfile::tempdir().unwrap();
        let store_dir = tempfile::tempdir().unwrap();
        let source = source_dir.path().join("a.png");
        fs::write(&source, b"png").unwrap();

        let store = ImageStore::new(store_dir.path());
        let first = store.import(&source).unwrap();
        let second = store.import(&source).unwrap();
        let first_str = first.to_string_lossy().into_owned();
        let second_str = second.to_string_lossy().into_owned();

        // Same image kept: nothing to discard.
        assert!(!store
            .discard_replaced(Some(&second_str), Some(&second_str))
            .unwrap());
        assert!(second.exists());

        assert!(store
            .discard_replaced(Some(&first_str), Some(&second_str))
            .unwrap());
        assert!(!first.exists());
        assert!(second.exists());

        // Event deleted: the last image goes too.
        assert!(store.discard_replaced(Some(&second_str), None).unwrap());
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 0);

        assert!(!store.discard_replaced(None, None).unwrap());
    }
}
