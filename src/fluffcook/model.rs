use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recipe identity: milliseconds since the Unix epoch at creation time.
pub type RecipeId = i64;

pub const UNTITLED: &str = "Untitled Recipe";

/// The persisted unit of data.
///
/// Field names serialize in camelCase (`isFavorite`) so backups stay
/// compatible with the browser build of the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Recipe {
    pub fn from_draft(id: RecipeId, draft: RecipeDraft) -> Self {
        Self {
            id,
            title: draft.title,
            ingredients: draft.ingredients,
            steps: draft.steps,
            is_favorite: false,
        }
    }

    /// Creation time derived from the id, when the id is a plausible timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.id)
    }

    /// Plain-text form used for sharing: title, then the two sections.
    pub fn to_plain_text(&self) -> String {
        format!(
            "{}\n\nINGREDIENTS:\n{}\n\nSTEPS:\n{}",
            self.title,
            self.ingredients.join("\n"),
            self.steps.join("\n")
        )
    }
}

/// Recipe content before it is given an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl RecipeDraft {
    pub fn new(title: impl Into<String>, ingredients: Vec<String>, steps: Vec<String>) -> Self {
        Self {
            title: title.into(),
            ingredients,
            steps,
        }
    }

    /// Builds a draft the way the manual editor does: the title is trimmed and
    /// blank ingredient or step lines are dropped.
    pub fn from_lines<I, J>(title: &str, ingredients: I, steps: J) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        J: IntoIterator,
        J::Item: AsRef<str>,
    {
        Self {
            title: title.trim().to_string(),
            ingredients: non_blank_lines(ingredients),
            steps: non_blank_lines(steps),
        }
    }
}

fn non_blank_lines<I>(lines: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|l| !l.as_ref().trim().is_empty())
        .map(|l| l.as_ref().to_string())
        .collect()
}

/// The editable part of an existing recipe.
impl From<&Recipe> for RecipeDraft {
    fn from(recipe: &Recipe) -> Self {
        Self::new(
            recipe.title.clone(),
            recipe.ingredients.clone(),
            recipe.steps.clone(),
        )
    }
}

/// Which flavour of acquisition produced (or will produce) a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Pull a recipe out of a web page or pasted text.
    Extract,
    /// Invent a recipe from a free-form description.
    Generate,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Extract => write!(f, "extraction"),
            Mode::Generate => write!(f, "generation"),
        }
    }
}
