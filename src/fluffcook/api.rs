//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every fluffcook operation, whatever UI drives it.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*` function
//! - **Normalizes inputs** (display-index strings become [`DisplayIndex`]es)
//! - **Owns** the [`AppState`], so every mutation goes through `&mut self`
//!
//! It does no business logic, no terminal I/O and no formatting.
//!
//! `FluffApi<S: DataStore>` is generic over the storage backend:
//! `FluffApi<FileStore>` in production, `FluffApi<InMemoryStore>` in tests.
//!
//! Network collaborators are passed in per call rather than owned: the
//! acquisition [`Kitchen`] for `cook`, an [`AssetOrigin`] for the cache
//! commands. Read-only callers use [`FluffApi::query`].

use crate::acquire::generate::GenerationService;
use crate::acquire::Kitchen;
use crate::commands;
use crate::error::{FluffError, Result};
use crate::http::HttpTransport;
use crate::index::{parse_indexes, DisplayIndex};
use crate::model::{Mode, RecipeDraft};
use crate::offline::origin::{AssetOrigin, AssetRequest};
use crate::offline::storage::FsCacheStorage;
use crate::offline::CacheWorker;
use crate::state::{AppState, RecipeQuery};
use crate::store::DataStore;
use std::path::Path;

pub struct FluffApi<S: DataStore> {
    state: AppState<S>,
    paths: commands::FluffPaths,
}

impl<S: DataStore> FluffApi<S> {
    pub fn new(state: AppState<S>, paths: commands::FluffPaths) -> Self {
        Self { state, paths }
    }

    /// Read-only access to the collection and its display order.
    pub fn query(&self) -> &dyn RecipeQuery {
        &self.state
    }

    pub fn list_recipes(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.state)
    }

    pub fn view_recipes<I: AsRef<str>>(&self, indexes: &[I]) -> Result<commands::CmdResult> {
        let indexes = self.parse_display_indexes(indexes)?;
        commands::view::run(&self.state, &indexes)
    }

    pub fn create_recipe(&mut self, draft: RecipeDraft) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.state, draft)
    }

    pub fn update_recipes(&mut self, updates: &[commands::RecipeUpdate]) -> Result<commands::CmdResult> {
        commands::update::run(&mut self.state, updates)
    }

    pub fn delete_recipes<I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<commands::CmdResult> {
        let indexes = self.parse_display_indexes(indexes)?;
        commands::delete::run(&mut self.state, &indexes)
    }

    pub fn toggle_favorites<I: AsRef<str>>(&mut self, indexes: &[I]) -> Result<commands::CmdResult> {
        let indexes = self.parse_display_indexes(indexes)?;
        commands::favorite::toggle(&mut self.state, &indexes)
    }

    pub fn export_recipes(&self, out_dir: &Path) -> Result<commands::CmdResult> {
        commands::export::run(&self.state, out_dir)
    }

    pub fn import_recipes<F: FnOnce(usize) -> bool>(
        &mut self,
        path: &Path,
        confirm: F,
    ) -> Result<commands::CmdResult> {
        commands::import::run(&mut self.state, path, confirm)
    }

    pub fn set_api_key(&mut self, key: Option<&str>) -> Result<commands::CmdResult> {
        commands::settings::set_api_key(&mut self.state, key)
    }

    pub fn show_api_key(&self) -> Result<commands::CmdResult> {
        commands::settings::show_api_key(&self.state)
    }

    pub fn set_rules(&mut self, rules: Option<&str>) -> Result<commands::CmdResult> {
        commands::settings::set_rules(&mut self.state, rules)
    }

    pub fn show_rules(&self) -> Result<commands::CmdResult> {
        commands::settings::show_rules(&self.state)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub async fn cook<T: HttpTransport, G: GenerationService>(
        &mut self,
        kitchen: &Kitchen<T, G>,
        input: &str,
        mode: Mode,
    ) -> Result<commands::CmdResult> {
        commands::cook::run(&mut self.state, kitchen, input, mode).await
    }

    pub async fn install_cache<O: AssetOrigin>(&self, origin: O) -> Result<commands::CmdResult> {
        let mut worker = CacheWorker::new(self.cache_storage(), origin);
        commands::cache::install(&mut worker).await
    }

    pub async fn cache_status<O: AssetOrigin>(&self, origin: O) -> Result<commands::CmdResult> {
        let worker = CacheWorker::resume(self.cache_storage(), origin).await?;
        commands::cache::status(&worker).await
    }

    pub async fn cache_fetch<O: AssetOrigin>(
        &self,
        origin: O,
        request: &AssetRequest,
    ) -> Result<commands::CmdResult> {
        let worker = CacheWorker::resume(self.cache_storage(), origin).await?;
        commands::cache::fetch(&worker, request).await
    }

    pub fn paths(&self) -> &commands::FluffPaths {
        &self.paths
    }

    fn parse_display_indexes<I: AsRef<str>>(&self, inputs: &[I]) -> Result<Vec<DisplayIndex>> {
        parse_indexes(inputs, self.state.recipes().len()).map_err(FluffError::Api)
    }

    fn cache_storage(&self) -> FsCacheStorage {
        FsCacheStorage::new(self.paths.cache_dir())
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, FluffPaths, MessageLevel, RecipeUpdate};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::origin::testing::StaticOrigin;
    use crate::offline::{FetchOutcome, ASSET_MANIFEST};
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn api_with(store: InMemoryStore, dir: &Path) -> FluffApi<InMemoryStore> {
        FluffApi::new(AppState::load(store).unwrap(), FluffPaths::new(dir))
    }

    #[test]
    fn create_then_query() {
        let dir = tempfile::tempdir().unwrap();
        let mut api = api_with(InMemoryStore::new(), dir.path());

        api.create_recipe(RecipeDraft::new("Toast", vec!["bread".into()], vec![]))
            .unwrap();

        assert_eq!(api.query().all().len(), 1);
        assert_eq!(api.query().ordered()[0].recipe.title, "Toast");
    }

    #[test]
    fn index_strings_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = StoreFixture::new()
            .with_recipe(1, "A")
            .with_recipe(2, "B")
            .with_recipe(3, "C");
        let mut api = api_with(fixture.store, dir.path());

        let result = api.delete_recipes(&["1-2"]).unwrap();
        assert_eq!(result.affected_recipes.len(), 2);
        assert_eq!(api.query().all().len(), 1);

        assert!(api.toggle_favorites(&["zero"]).is_err());
        assert!(api.view_recipes(&["0"]).is_err());
    }

    #[test]
    fn out_of_range_delete_leaves_collection_alone() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = StoreFixture::new().with_recipe(1, "A").with_recipe(2, "B");
        let mut api = api_with(fixture.store, dir.path());

        assert!(matches!(
            api.delete_recipes(&["1-18446744073709551615"]),
            Err(FluffError::Api(_))
        ));
        assert!(api.delete_recipes(&["1", "3"]).is_err());
        assert_eq!(api.query().all().len(), 2);
    }

    #[test]
    fn favorites_and_view_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = StoreFixture::new().with_recipe(1, "A").with_recipe(2, "B");
        let mut api = api_with(fixture.store, dir.path());

        api.toggle_favorites(&["2"]).unwrap();
        let viewed = api.view_recipes(&["1"]).unwrap();
        assert_eq!(viewed.listed_recipes[0].recipe.title, "A");
        assert!(api.query().get(1).unwrap().is_favorite);
    }

    #[tokio::test]
    async fn cache_commands_use_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let api = api_with(InMemoryStore::new(), dir.path());
        let origin = || {
            ASSET_MANIFEST
                .iter()
                .fold(StaticOrigin::new(), |o, path| o.with_asset(path, path))
        };

        api.install_cache(origin()).await.unwrap();
        assert!(dir.path().join("caches").is_dir());

        let status = api.cache_status(origin()).await.unwrap();
        assert!(status.cache_status.unwrap().is_installed());

        let fetched = api
            .cache_fetch(origin(), &AssetRequest::get("style.css"))
            .await
            .unwrap();
        assert!(matches!(fetched.fetch_outcome, Some(FetchOutcome::Cache(_))));
    }
}
