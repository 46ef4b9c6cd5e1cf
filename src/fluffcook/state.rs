//! # Application State
//!
//! [`AppState`] owns everything the app keeps between runs: the recipe
//! collection, the generation-service credential and the custom generation
//! rules. It is the in-memory side of the durable mirror in [`crate::store`].
//!
//! Every mutating method changes the in-memory copy first and then rewrites
//! the whole durable value. A failed write is returned to the caller; the
//! in-memory change is not rolled back.

use crate::error::{FluffError, Result};
use crate::index::{index_recipes, DisplayRecipe};
use crate::model::{Recipe, RecipeDraft, RecipeId};
use crate::store::{DataStore, API_KEY_KEY, CUSTOM_RULES_KEY, RECIPES_KEY};
use chrono::Utc;
use tracing::debug;

pub struct AppState<S: DataStore> {
    store: S,
    recipes: Vec<Recipe>,
    api_key: Option<String>,
    custom_rules: Option<String>,
}

impl<S: DataStore> AppState<S> {
    /// Loads state from the store. Missing keys mean an empty collection and
    /// no saved settings.
    pub fn load(store: S) -> Result<Self> {
        let recipes = match store.get_item(RECIPES_KEY)? {
            Some(json) if !json.trim().is_empty() => {
                serde_json::from_str(&json).map_err(FluffError::Serialization)?
            }
            _ => Vec::new(),
        };
        let api_key = non_empty(store.get_item(API_KEY_KEY)?);
        let custom_rules = non_empty(store.get_item(CUSTOM_RULES_KEY)?);

        debug!(recipes = recipes.len(), "loaded application state");

        Ok(Self {
            store,
            recipes,
            api_key,
            custom_rules,
        })
    }

    // --- Queries ---

    /// The collection in storage order (newest insertion first).
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// The collection in display order.
    pub fn display_order(&self) -> Vec<DisplayRecipe> {
        index_recipes(&self.recipes)
    }

    pub fn find(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn custom_rules(&self) -> Option<&str> {
        self.custom_rules.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Mutations ---

    /// Stamps a fresh id, prepends the recipe and persists.
    pub fn insert(&mut self, draft: RecipeDraft) -> Result<Recipe> {
        let recipe = Recipe::from_draft(self.next_id()?, draft);
        self.recipes.insert(0, recipe.clone());
        self.persist()?;
        Ok(recipe)
    }

    /// Replaces title, ingredients and steps; id and favorite flag are kept.
    pub fn update(&mut self, id: RecipeId, draft: RecipeDraft) -> Result<Recipe> {
        let recipe = self.find_mut(id)?;
        recipe.title = draft.title;
        recipe.ingredients = draft.ingredients;
        recipe.steps = draft.steps;
        let updated = recipe.clone();
        self.persist()?;
        Ok(updated)
    }

    pub fn remove(&mut self, id: RecipeId) -> Result<Recipe> {
        let pos = self
            .recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or(FluffError::RecipeNotFound(id))?;
        let removed = self.recipes.remove(pos);
        self.persist()?;
        Ok(removed)
    }

    pub fn toggle_favorite(&mut self, id: RecipeId) -> Result<Recipe> {
        let recipe = self.find_mut(id)?;
        recipe.is_favorite = !recipe.is_favorite;
        let toggled = recipe.clone();
        self.persist()?;
        Ok(toggled)
    }

    /// Wholesale replacement used by import: no merge, no dedup.
    pub fn replace_all(&mut self, recipes: Vec<Recipe>) -> Result<()> {
        self.recipes = recipes;
        self.persist()
    }

    /// Saves the credential; `None` or blank clears it.
    pub fn set_api_key(&mut self, key: Option<&str>) -> Result<()> {
        self.api_key = key.map(str::trim).filter(|k| !k.is_empty()).map(String::from);
        match &self.api_key {
            Some(k) => self.store.set_item(API_KEY_KEY, k),
            None => self.store.remove_item(API_KEY_KEY),
        }
    }

    /// Saves custom generation rules; `None` or blank clears them.
    pub fn set_custom_rules(&mut self, rules: Option<&str>) -> Result<()> {
        self.custom_rules = rules
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);
        match &self.custom_rules {
            Some(r) => self.store.set_item(CUSTOM_RULES_KEY, r),
            None => self.store.remove_item(CUSTOM_RULES_KEY),
        }
    }

    /// Full rewrite of the durable mirror.
    pub fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.recipes).map_err(FluffError::Serialization)?;
        self.store.set_item(RECIPES_KEY, &json)
    }

    fn find_mut(&mut self, id: RecipeId) -> Result<&mut Recipe> {
        self.recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(FluffError::RecipeNotFound(id))
    }

    /// Creation timestamp in milliseconds, bumped past the current maximum
    /// when two inserts land on the same millisecond.
    fn next_id(&self) -> Result<RecipeId> {
        let now = Utc::now().timestamp_millis();
        match self.recipes.iter().map(|r| r.id).max() {
            Some(max) if max >= now => max.checked_add(1).ok_or_else(|| {
                FluffError::Store(format!("No id left above existing recipe id {}", max))
            }),
            _ => Ok(now),
        }
    }
}

/// Read-only view of the collection for renderers.
pub trait RecipeQuery {
    /// Storage order (newest insertion first).
    fn all(&self) -> &[Recipe];

    /// Favorites first, then newest first, with 1-based indexes.
    fn ordered(&self) -> Vec<DisplayRecipe>;

    fn get(&self, id: RecipeId) -> Option<&Recipe>;
}

impl<S: DataStore> RecipeQuery for AppState<S> {
    fn all(&self) -> &[Recipe] {
        self.recipes()
    }

    fn ordered(&self) -> Vec<DisplayRecipe> {
        self.display_order()
    }

    fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.find(id)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
