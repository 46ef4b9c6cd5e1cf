use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FluffError, Result};
use crate::model::RecipeDraft;
use crate::state::AppState;
use crate::store::DataStore;

/// Manual entry. The title is required; ingredient and step lists may be empty.
pub fn run<S: DataStore>(state: &mut AppState<S>, draft: RecipeDraft) -> Result<CmdResult> {
    let draft = RecipeDraft::from_lines(&draft.title, draft.ingredients, draft.steps);
    if draft.title.is_empty() {
        return Err(FluffError::Api("Title is required.".to_string()));
    }

    let recipe = state.insert(draft)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Recipe saved: {}", recipe.title)));
    Ok(result.with_affected_recipes(vec![recipe]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn creates_recipe_without_lists() {
        let mut state = AppState::load(InMemoryStore::new()).unwrap();

        let result = run(&mut state, RecipeDraft::new("Toast", vec![], vec![])).unwrap();

        assert_eq!(result.affected_recipes[0].title, "Toast");
        assert_eq!(state.recipes().len(), 1);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut state = AppState::load(InMemoryStore::new()).unwrap();

        let err = run(&mut state, RecipeDraft::new("   ", vec!["egg".into()], vec![]));

        assert!(err.is_err());
        assert!(state.recipes().is_empty());
    }

    #[test]
    fn blank_lines_are_dropped() {
        let mut state = AppState::load(InMemoryStore::new()).unwrap();

        run(
            &mut state,
            RecipeDraft::new(
                " Salad ",
                vec!["lettuce".into(), "".into(), " ".into()],
                vec!["".into(), "toss".into()],
            ),
        )
        .unwrap();

        let saved = &state.recipes()[0];
        assert_eq!(saved.title, "Salad");
        assert_eq!(saved.ingredients, vec!["lettuce"]);
        assert_eq!(saved.steps, vec!["toss"]);
    }
}
