use super::{validate_key, DataStore};
use crate::error::Result;
use std::collections::HashMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default, Debug, Clone)]
pub struct InMemoryStore {
    items: HashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataStore for InMemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.items.remove(key);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Recipe;
    use crate::store::{API_KEY_KEY, RECIPES_KEY};

    pub struct StoreFixture {
        pub store: InMemoryStore,
        recipes: Vec<Recipe>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                recipes: Vec::new(),
            }
        }

        pub fn with_recipe(mut self, id: i64, title: &str) -> Self {
            self.recipes.push(Recipe {
                id,
                title: title.to_string(),
                ingredients: vec![format!("{} ingredient", title)],
                steps: vec![format!("cook the {}", title)],
                is_favorite: false,
            });
            self.sync()
        }

        pub fn with_favorite(mut self, id: i64, title: &str) -> Self {
            self = self.with_recipe(id, title);
            if let Some(last) = self.recipes.last_mut() {
                last.is_favorite = true;
            }
            self.sync()
        }

        pub fn with_api_key(mut self, key: &str) -> Self {
            self.store.set_item(API_KEY_KEY, key).unwrap();
            self
        }

        fn sync(mut self) -> Self {
            let json = serde_json::to_string(&self.recipes).unwrap();
            self.store.set_item(RECIPES_KEY, &json).unwrap();
            self
        }
    }
}
