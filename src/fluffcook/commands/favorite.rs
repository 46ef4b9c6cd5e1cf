use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::DisplayIndex;
use crate::state::AppState;
use crate::store::DataStore;

use super::helpers::resolve_indexes;

pub fn toggle<S: DataStore>(state: &mut AppState<S>, indexes: &[DisplayIndex]) -> Result<CmdResult> {
    let resolved = resolve_indexes(state, indexes)?;
    let mut result = CmdResult::default();

    for (display_index, id) in resolved {
        let recipe = state.toggle_favorite(id)?;
        let verb = if recipe.is_favorite {
            "favorited"
        } else {
            "unfavorited"
        };
        result.add_message(CmdMessage::success(format!(
            "Recipe {} ({}): {}",
            verb, display_index, recipe.title
        )));
        result.affected_recipes.push(recipe);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::list;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn favorite_moves_to_top() {
        let fixture = StoreFixture::new().with_recipe(1, "Old").with_recipe(2, "New");
        let mut state = AppState::load(fixture.store).unwrap();

        toggle(&mut state, &[DisplayIndex(2)]).unwrap();

        let listed = list::run(&state).unwrap().listed_recipes;
        assert_eq!(listed[0].recipe.title, "Old");
        assert!(listed[0].recipe.is_favorite);
    }

    #[test]
    fn toggling_twice_restores() {
        let mut state = AppState::load(StoreFixture::new().with_recipe(1, "A").store).unwrap();
        toggle(&mut state, &[DisplayIndex(1)]).unwrap();
        let result = toggle(&mut state, &[DisplayIndex(1)]).unwrap();
        assert!(!result.affected_recipes[0].is_favorite);
        assert!(result.messages[0].content.contains("unfavorited"));
    }
}
