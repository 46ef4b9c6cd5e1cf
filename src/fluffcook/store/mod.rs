//! # Storage Layer
//!
//! Durable state is a small string-keyed, string-valued store, the same shape
//! as a browser's local storage. The [`DataStore`] trait lets the application
//! run against different backends.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, one file per key in the data dir
//! - [`memory::InMemoryStore`]: no persistence, used by tests
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── recipes.json        # JSON array of recipe records
//! ├── api_key             # raw generation-service credential
//! ├── custom_rules.txt    # raw custom generation rules
//! ├── config.json         # settings (see config.rs)
//! └── caches/             # offline asset cache generations
//! ```
//!
//! Writes always replace the whole value. There is no delta persistence and no
//! rollback when a write fails.

use crate::error::{FluffError, Result};

pub mod fs;
pub mod memory;

pub const RECIPES_KEY: &str = "recipes.json";
pub const API_KEY_KEY: &str = "api_key";
pub const CUSTOM_RULES_KEY: &str = "custom_rules.txt";

/// Abstract key-value persistence.
pub trait DataStore {
    /// Read a value, `None` when the key was never written or was removed
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write (create or overwrite) a value
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Keys map onto file names, so they must not be able to escape the store.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(FluffError::Store(format!("Invalid storage key: {:?}", key)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_like_keys() {
        assert!(validate_key("recipes.json").is_ok());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("").is_err());
    }
}
