use crate::acquire::generate::GenerationService;
use crate::acquire::{CookRequest, Kitchen};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::http::HttpTransport;
use crate::model::Mode;
use crate::state::AppState;
use crate::store::DataStore;

/// Runs the acquisition pipeline and commits the result. Nothing is inserted
/// unless the pipeline produced a valid draft.
pub async fn run<S, T, G>(
    state: &mut AppState<S>,
    kitchen: &Kitchen<T, G>,
    input: &str,
    mode: Mode,
) -> Result<CmdResult>
where
    S: DataStore,
    T: HttpTransport,
    G: GenerationService,
{
    let acquisition = kitchen
        .acquire(CookRequest {
            input,
            mode,
            api_key: state.api_key(),
            custom_rules: state.custom_rules(),
        })
        .await?;

    let mut result = CmdResult::default();
    for warning in &acquisition.warnings {
        result.add_message(CmdMessage::warning(warning.to_string()));
    }

    let recipe = state.insert(acquisition.draft)?;
    result.add_message(CmdMessage::success(format!("Recipe saved: {}", recipe.title)));
    Ok(result.with_affected_recipes(vec![recipe]))
}
