use crate::commands::CmdResult;
use crate::error::Result;
use crate::state::AppState;
use crate::store::DataStore;

pub fn run<S: DataStore>(state: &AppState<S>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listed_recipes(state.display_order()))
}
