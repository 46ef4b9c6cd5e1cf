use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::DisplayIndex;
use crate::state::AppState;
use crate::store::DataStore;

use super::helpers::resolve_indexes;

/// Permanent removal. All indexes are resolved before anything is deleted,
/// so positions shifting mid-run cannot hit the wrong recipe.
pub fn run<S: DataStore>(state: &mut AppState<S>, indexes: &[DisplayIndex]) -> Result<CmdResult> {
    let resolved = resolve_indexes(state, indexes)?;
    let mut result = CmdResult::default();

    for (display_index, id) in resolved {
        let recipe = state.remove(id)?;
        result.add_message(CmdMessage::success(format!(
            "Recipe deleted ({}): {}",
            display_index, recipe.title
        )));
        result.affected_recipes.push(recipe);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::RECIPES_KEY;
    use crate::model::Recipe;

    #[test]
    fn deletes_by_display_index() {
        let fixture = StoreFixture::new()
            .with_recipe(1_700_000_000_000, "A")
            .with_recipe(1_700_000_000_001, "B")
            .with_recipe(1_700_000_000_002, "C");
        let mut state = AppState::load(fixture.store).unwrap();

        // Oldest is last in display order.
        let result = run(&mut state, &[DisplayIndex(3)]).unwrap();

        assert_eq!(result.affected_recipes[0].id, 1_700_000_000_000);
        assert_eq!(state.recipes().len(), 2);
        let stored: Vec<Recipe> =
            serde_json::from_str(&state.store().get_item(RECIPES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|r| r.id != 1_700_000_000_000));
    }

    #[test]
    fn multiple_indexes_resolve_up_front() {
        let fixture = StoreFixture::new()
            .with_recipe(1, "A")
            .with_recipe(2, "B")
            .with_recipe(3, "C");
        let mut state = AppState::load(fixture.store).unwrap();

        run(&mut state, &[DisplayIndex(1), DisplayIndex(2)]).unwrap();

        let left: Vec<_> = state.recipes().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(left, vec!["A"]);
    }

    #[test]
    fn unknown_index_deletes_nothing() {
        let mut state = AppState::load(StoreFixture::new().with_recipe(1, "A").store).unwrap();
        assert!(run(&mut state, &[DisplayIndex(1), DisplayIndex(4)]).is_err());
        assert_eq!(state.recipes().len(), 1);
    }
}
