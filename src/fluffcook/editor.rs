//! External editor integration for manual create and edit.
//!
//! The buffer is plain markdown-ish text:
//!
//! ```text
//! # Pancakes
//!
//! ## Ingredients
//! - 200 g flour
//! - 2 eggs
//!
//! ## Steps
//! 1. Whisk everything.
//! 2. Fry in butter.
//! ```
//!
//! List markers are optional on the way back in; blank lines are dropped.

use crate::error::{FluffError, Result};
use crate::model::RecipeDraft;
use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

const INGREDIENTS_HEADING: &str = "## Ingredients";
const STEPS_HEADING: &str = "## Steps";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Ingredients,
    Steps,
}

pub fn to_buffer(draft: &RecipeDraft) -> String {
    let mut out = format!("# {}\n\n{}\n", draft.title, INGREDIENTS_HEADING);
    for item in &draft.ingredients {
        out.push_str(&format!("- {}\n", item));
    }
    out.push_str(&format!("\n{}\n", STEPS_HEADING));
    for (i, step) in draft.steps.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, step));
    }
    out
}

/// Parses a buffer back into a draft. The title is the first non-blank line
/// before any section heading; a missing title comes back empty.
pub fn from_buffer(buffer: &str) -> RecipeDraft {
    let mut section = Section::Preamble;
    let mut title = String::new();
    let mut ingredients = Vec::new();
    let mut steps = Vec::new();

    for line in buffer.lines() {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case(INGREDIENTS_HEADING) {
            section = Section::Ingredients;
            continue;
        }
        if trimmed.eq_ignore_ascii_case(STEPS_HEADING) {
            section = Section::Steps;
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        match section {
            Section::Preamble if title.is_empty() => {
                title = trimmed.trim_start_matches('#').trim().to_string();
            }
            Section::Preamble => {}
            Section::Ingredients => ingredients.push(strip_marker(trimmed).to_string()),
            Section::Steps => steps.push(strip_marker(trimmed).to_string()),
        }
    }

    RecipeDraft::from_lines(&title, ingredients, steps)
}

/// Drops a leading `-`, `*` or `12.` list marker.
fn strip_marker(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return rest.trim_start();
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return rest.trim_start();
        }
    }
    line
}

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to common editors.
pub fn get_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(editor) = env::var(var) {
            if !editor.trim().is_empty() {
                return Ok(editor);
            }
        }
    }

    for fallback in &["vim", "vi", "nano"] {
        if Command::new("which")
            .arg(fallback)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            return Ok((*fallback).to_string());
        }
    }

    Err(FluffError::Api(
        "No editor found. Set $EDITOR environment variable.".to_string(),
    ))
}

/// Opens a file in the user's editor and waits for it to close.
pub fn open_in_editor<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let editor = get_editor()?;
    let path = file_path.as_ref();

    // $EDITOR may carry arguments, e.g. "code --wait".
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| FluffError::Api("Empty editor command".to_string()))?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| FluffError::Api(format!("Failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(FluffError::Api(format!(
            "Editor '{}' exited with non-zero status",
            editor
        )));
    }

    fs::read_to_string(path).map_err(FluffError::Io)
}

/// Round-trips a draft through the editor using a temp file.
pub fn edit_draft(initial: &RecipeDraft) -> Result<RecipeDraft> {
    let temp_file = env::temp_dir().join(format!("fluffcook_edit_{}.md", std::process::id()));

    fs::write(&temp_file, to_buffer(initial)).map_err(FluffError::Io)?;
    let result = open_in_editor(&temp_file);
    let _ = fs::remove_file(&temp_file);

    Ok(from_buffer(&result?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pancakes() -> RecipeDraft {
        RecipeDraft::new(
            "Pancakes",
            vec!["200 g flour".into(), "2 eggs".into()],
            vec!["Whisk everything.".into(), "Fry in butter.".into()],
        )
    }

    #[test]
    fn buffer_layout() {
        assert_eq!(
            to_buffer(&pancakes()),
            "# Pancakes\n\n## Ingredients\n- 200 g flour\n- 2 eggs\n\n## Steps\n1. Whisk everything.\n2. Fry in butter.\n"
        );
    }

    #[test]
    fn parses_what_it_writes() {
        assert_eq!(from_buffer(&to_buffer(&pancakes())), pancakes());
    }

    #[test]
    fn empty_draft_buffer_parses_to_empty_lists() {
        let draft = from_buffer(&to_buffer(&RecipeDraft::default()));
        assert_eq!(draft.title, "");
        assert!(draft.ingredients.is_empty());
        assert!(draft.steps.is_empty());
    }

    #[test]
    fn markers_are_optional_and_blank_lines_dropped() {
        let buffer = "Soup\n\n## ingredients\nwater\n\n* salt\n## STEPS\n\nboil\n10. serve\n";
        let draft = from_buffer(buffer);
        assert_eq!(draft.title, "Soup");
        assert_eq!(draft.ingredients, vec!["water", "salt"]);
        assert_eq!(draft.steps, vec!["boil", "serve"]);
    }

    #[test]
    fn numbers_without_marker_are_kept() {
        assert_eq!(strip_marker("2 eggs"), "2 eggs");
        assert_eq!(strip_marker("3.5 cups stock"), "3.5 cups stock");
        assert_eq!(strip_marker("- 3.5 cups stock"), "3.5 cups stock");
    }
}
