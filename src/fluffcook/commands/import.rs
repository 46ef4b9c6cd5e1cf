use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FluffError, Result};
use crate::model::Recipe;
use crate::state::AppState;
use crate::store::DataStore;
use std::fs;
use std::path::Path;
use tracing::info;

/// Replaces the collection with the records in `path`.
///
/// `confirm` receives the number of records found and decides whether the
/// overwrite happens. The file is fully parsed first; a malformed file leaves
/// the collection untouched.
pub fn run<S, F>(state: &mut AppState<S>, path: &Path, confirm: F) -> Result<CmdResult>
where
    S: DataStore,
    F: FnOnce(usize) -> bool,
{
    let content = fs::read_to_string(path).map_err(FluffError::Io)?;
    let recipes: Vec<Recipe> = serde_json::from_str(&content).map_err(FluffError::ImportParse)?;

    let mut result = CmdResult::default();
    if !confirm(recipes.len()) {
        result.add_message(CmdMessage::info("Import cancelled."));
        return Ok(result);
    }

    let count = recipes.len();
    state.replace_all(recipes)?;
    info!(count, path = %path.display(), "collection replaced from backup");

    result.add_message(CmdMessage::success(format!("Imported {} recipes.", count)));
    Ok(result.with_affected_recipes(state.recipes().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::export;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn export_then_import_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = StoreFixture::new()
            .with_recipe(1_700_000_000_000, "A")
            .with_favorite(1_700_000_000_005, "B");
        let source = AppState::load(fixture.store).unwrap();
        let path = export::run(&source, dir.path()).unwrap().export_path.unwrap();

        let mut target =
            AppState::load(StoreFixture::new().with_recipe(9, "Replaced").store).unwrap();
        let mut seen = None;
        run(&mut target, &path, |n| {
            seen = Some(n);
            true
        })
        .unwrap();

        assert_eq!(seen, Some(2));
        assert_eq!(target.recipes(), source.recipes());
    }

    #[test]
    fn malformed_file_leaves_collection_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ this is not a backup").unwrap();
        let mut state = AppState::load(StoreFixture::new().with_recipe(1, "Keep").store).unwrap();

        let err = run(&mut state, &path, |_| true).unwrap_err();

        assert!(matches!(err, FluffError::ImportParse(_)));
        assert_eq!(state.recipes().len(), 1);
    }

    #[test]
    fn object_instead_of_array_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obj.json");
        fs::write(&path, r#"{"id": 1, "title": "x"}"#).unwrap();
        let mut state = AppState::load(InMemoryStore::new()).unwrap();

        assert!(matches!(
            run(&mut state, &path, |_| true),
            Err(FluffError::ImportParse(_))
        ));
    }

    #[test]
    fn declined_confirmation_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        fs::write(&path, r#"[{"id": 3, "title": "New"}]"#).unwrap();
        let mut state = AppState::load(StoreFixture::new().with_recipe(1, "Keep").store).unwrap();

        let result = run(&mut state, &path, |_| false).unwrap();

        assert_eq!(result.messages[0].content, "Import cancelled.");
        assert_eq!(state.recipes()[0].title, "Keep");
    }

    #[test]
    fn duplicates_are_kept_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dupes.json");
        fs::write(
            &path,
            r#"[{"id": 3, "title": "Same"}, {"id": 3, "title": "Same"}]"#,
        )
        .unwrap();
        let mut state = AppState::load(InMemoryStore::new()).unwrap();

        run(&mut state, &path, |_| true).unwrap();
        assert_eq!(state.recipes().len(), 2);
    }
}
