use crate::config::AppConfig;
use crate::index::DisplayRecipe;
use crate::model::{Recipe, RecipeDraft};
use crate::offline::{CacheStatus, FetchOutcome};
use std::path::{Path, PathBuf};

pub mod cache;
pub mod config;
pub mod cook;
pub mod create;
pub mod delete;
pub mod export;
pub mod favorite;
pub mod helpers;
pub mod import;
pub mod list;
pub mod settings;
pub mod update;
pub mod view;

/// Locations the commands read and write outside the key-value store.
#[derive(Debug, Clone)]
pub struct FluffPaths {
    pub data_dir: PathBuf,
}

impl FluffPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("caches")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_recipes: Vec<Recipe>,
    pub listed_recipes: Vec<DisplayRecipe>,
    pub config: Option<AppConfig>,
    pub export_path: Option<PathBuf>,
    pub cache_status: Option<CacheStatus>,
    pub fetch_outcome: Option<FetchOutcome>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.affected_recipes = recipes;
        self
    }

    pub fn with_listed_recipes(mut self, recipes: Vec<DisplayRecipe>) -> Self {
        self.listed_recipes = recipes;
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_export_path(mut self, path: PathBuf) -> Self {
        self.export_path = Some(path);
        self
    }

    pub fn with_cache_status(mut self, status: CacheStatus) -> Self {
        self.cache_status = Some(status);
        self
    }

    pub fn with_fetch_outcome(mut self, outcome: FetchOutcome) -> Self {
        self.fetch_outcome = Some(outcome);
        self
    }
}

/// Replacement content for one recipe, addressed by display index.
#[derive(Debug, Clone)]
pub struct RecipeUpdate {
    pub index: crate::index::DisplayIndex,
    pub draft: RecipeDraft,
}

impl RecipeUpdate {
    pub fn new(index: crate::index::DisplayIndex, draft: RecipeDraft) -> Self {
        Self { index, draft }
    }
}
