use crate::error::{FluffError, Result};
use crate::index::{DisplayIndex, DisplayRecipe};
use crate::model::RecipeId;
use crate::state::AppState;
use crate::store::DataStore;

/// Maps display indexes onto recipe ids against the current ordering.
/// Fails on the first index that does not exist.
pub fn resolve_indexes<S: DataStore>(
    state: &AppState<S>,
    indexes: &[DisplayIndex],
) -> Result<Vec<(DisplayIndex, RecipeId)>> {
    let indexed = state.display_order();

    indexes
        .iter()
        .map(|idx| {
            indexed
                .iter()
                .find(|dr| &dr.index == idx)
                .map(|dr| (*idx, dr.recipe.id))
                .ok_or_else(|| FluffError::Api(format!("Index {} not found", idx)))
        })
        .collect()
}

pub fn recipes_by_indexes<S: DataStore>(
    state: &AppState<S>,
    indexes: &[DisplayIndex],
) -> Result<Vec<DisplayRecipe>> {
    let indexed = state.display_order();
    indexes
        .iter()
        .map(|idx| {
            indexed
                .iter()
                .find(|dr| &dr.index == idx)
                .cloned()
                .ok_or_else(|| FluffError::Api(format!("Index {} not found", idx)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn resolves_against_display_order() {
        let fixture = StoreFixture::new()
            .with_recipe(100, "Old")
            .with_recipe(300, "New")
            .with_favorite(200, "Fav");
        let state = AppState::load(fixture.store).unwrap();

        let resolved =
            resolve_indexes(&state, &[DisplayIndex(1), DisplayIndex(2), DisplayIndex(3)]).unwrap();
        let ids: Vec<_> = resolved.into_iter().map(|(_, id)| id).collect();
        assert_eq!(ids, vec![200, 300, 100]);
    }

    #[test]
    fn unknown_index_is_an_error() {
        let state = AppState::load(StoreFixture::new().with_recipe(1, "A").store).unwrap();
        assert!(resolve_indexes(&state, &[DisplayIndex(2)]).is_err());
        assert!(recipes_by_indexes(&state, &[DisplayIndex(5)]).is_err());
    }
}
