use crate::commands::CmdResult;
use crate::error::Result;
use crate::index::DisplayIndex;
use crate::state::AppState;
use crate::store::DataStore;

use super::helpers::recipes_by_indexes;

pub fn run<S: DataStore>(state: &AppState<S>, indexes: &[DisplayIndex]) -> Result<CmdResult> {
    let recipes = recipes_by_indexes(state, indexes)?;
    Ok(CmdResult::default().with_listed_recipes(recipes))
}
