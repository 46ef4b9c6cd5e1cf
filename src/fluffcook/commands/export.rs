use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FluffError, Result};
use crate::state::AppState;
use crate::store::DataStore;
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::Path;

pub fn backup_file_name(date: NaiveDate) -> String {
    format!("fluffcook-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Writes the whole collection, in storage order, as indented JSON into
/// `out_dir`. An existing backup from the same day is overwritten.
pub fn run<S: DataStore>(state: &AppState<S>, out_dir: &Path) -> Result<CmdResult> {
    let path = out_dir.join(backup_file_name(Local::now().date_naive()));
    let json = serde_json::to_string_pretty(state.recipes()).map_err(FluffError::Serialization)?;
    fs::write(&path, json).map_err(FluffError::Io)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} recipes to {}",
        state.recipes().len(),
        path.display()
    )));
    Ok(result.with_export_path(path))
}
