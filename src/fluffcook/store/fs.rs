use super::{validate_key, DataStore};
use crate::error::{FluffError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(FluffError::Io)?;
        }
        Ok(())
    }

    fn item_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl DataStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FluffError::Io(e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        self.ensure_dir()?;
        fs::write(path, value).map_err(FluffError::Io)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = self.item_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FluffError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert_eq!(store.get_item("recipes.json").unwrap(), None);
    }

    #[test]
    fn creates_root_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let mut store = FileStore::new(root.clone());

        store.set_item("api_key", "secret").unwrap();

        assert!(root.join("api_key").exists());
        assert_eq!(store.get_item("api_key").unwrap().as_deref(), Some("secret"));
    }

    #[test]
    fn overwrite_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());

        store.set_item("custom_rules.txt", "no nuts").unwrap();
        store.set_item("custom_rules.txt", "no dairy").unwrap();
        assert_eq!(
            store.get_item("custom_rules.txt").unwrap().as_deref(),
            Some("no dairy")
        );

        store.remove_item("custom_rules.txt").unwrap();
        store.remove_item("custom_rules.txt").unwrap();
        assert_eq!(store.get_item("custom_rules.txt").unwrap(), None);
    }
}
