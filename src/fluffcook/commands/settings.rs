use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::state::AppState;
use crate::store::DataStore;

/// Saves the generation-service key, or clears it when `key` is `None` or blank.
pub fn set_api_key<S: DataStore>(state: &mut AppState<S>, key: Option<&str>) -> Result<CmdResult> {
    state.set_api_key(key)?;
    let mut result = CmdResult::default();
    result.add_message(match state.api_key() {
        Some(_) => CmdMessage::success("API key saved."),
        None => CmdMessage::success("API key cleared."),
    });
    Ok(result)
}

/// Reports whether a key is saved without echoing it.
pub fn show_api_key<S: DataStore>(state: &AppState<S>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.add_message(match state.api_key() {
        Some(key) => CmdMessage::info(format!("API key set ({})", mask(key))),
        None => CmdMessage::warning("No API key saved."),
    });
    Ok(result)
}

pub fn set_rules<S: DataStore>(state: &mut AppState<S>, rules: Option<&str>) -> Result<CmdResult> {
    state.set_custom_rules(rules)?;
    let mut result = CmdResult::default();
    result.add_message(match state.custom_rules() {
        Some(_) => CmdMessage::success("Custom rules saved."),
        None => CmdMessage::success("Custom rules cleared."),
    });
    Ok(result)
}

pub fn show_rules<S: DataStore>(state: &AppState<S>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.add_message(match state.custom_rules() {
        Some(rules) => CmdMessage::info(rules),
        None => CmdMessage::info("No custom rules."),
    });
    Ok(result)
}

fn mask(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn key_is_saved_masked_and_cleared() {
        let mut state = AppState::load(InMemoryStore::new()).unwrap();

        set_api_key(&mut state, Some("AIzaSecret1234")).unwrap();
        let shown = show_api_key(&state).unwrap();
        assert_eq!(shown.messages[0].content, "API key set (…1234)");
        assert!(!shown.messages[0].content.contains("Secret"));

        let cleared = set_api_key(&mut state, None).unwrap();
        assert_eq!(cleared.messages[0].content, "API key cleared.");
        assert_eq!(state.api_key(), None);
    }

    #[test]
    fn rules_are_saved_and_cleared() {
        let mut state = AppState::load(InMemoryStore::new()).unwrap();

        set_rules(&mut state, Some("metric units")).unwrap();
        assert_eq!(show_rules(&state).unwrap().messages[0].content, "metric units");

        set_rules(&mut state, Some("  ")).unwrap();
        assert_eq!(state.custom_rules(), None);
    }
}
