use crate::commands::{CmdMessage, CmdResult, RecipeUpdate};
use crate::error::{FluffError, Result};
use crate::model::RecipeDraft;
use crate::state::AppState;
use crate::store::DataStore;

use super::helpers::resolve_indexes;

pub fn run<S: DataStore>(state: &mut AppState<S>, updates: &[RecipeUpdate]) -> Result<CmdResult> {
    let indexes: Vec<_> = updates.iter().map(|u| u.index).collect();
    let resolved = resolve_indexes(state, &indexes)?;

    let drafts: Vec<RecipeDraft> = updates
        .iter()
        .map(|u| RecipeDraft::from_lines(&u.draft.title, &u.draft.ingredients, &u.draft.steps))
        .collect();
    if drafts.iter().any(|d| d.title.is_empty()) {
        return Err(FluffError::Api("Title is required.".to_string()));
    }

    let mut result = CmdResult::default();
    for ((display_index, id), draft) in resolved.into_iter().zip(drafts) {
        let recipe = state.update(id, draft)?;
        result.add_message(CmdMessage::success(format!(
            "Recipe updated ({}): {}",
            display_index, recipe.title
        )));
        result.affected_recipes.push(recipe);
    }

    Ok(result)
}
