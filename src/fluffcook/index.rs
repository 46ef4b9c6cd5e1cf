//! # Display Ordering
//!
//! The collection is stored newest-first by insertion, but it is never shown
//! that way directly. Every query recomputes the display order:
//!
//! 1. favorites before everything else
//! 2. within each group, descending id (newest first)
//!
//! Each entry gets a 1-based [`DisplayIndex`] so the CLI can address recipes
//! with short numbers (`3`) or ranges (`2-4`). Indexes are positions in the
//! current ordering and shift whenever the collection changes; the stable
//! identity is always the recipe id.

use crate::model::Recipe;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// A user-facing position in the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayIndex(pub usize);

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<usize>() {
            Ok(0) => Err("Indexes start at 1".to_string()),
            Ok(n) => Ok(DisplayIndex(n)),
            Err(_) => Err(format!("Invalid index format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecipe {
    pub recipe: Recipe,
    pub index: DisplayIndex,
}

/// The sort law: favorite first, otherwise higher id first.
pub fn display_cmp(a: &Recipe, b: &Recipe) -> Ordering {
    b.is_favorite
        .cmp(&a.is_favorite)
        .then_with(|| b.id.cmp(&a.id))
}

/// Assigns display indexes to a snapshot of the collection.
pub fn index_recipes(recipes: &[Recipe]) -> Vec<DisplayRecipe> {
    let mut sorted: Vec<&Recipe> = recipes.iter().collect();
    sorted.sort_by(|a, b| display_cmp(a, b));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, recipe)| DisplayRecipe {
            recipe: recipe.clone(),
            index: DisplayIndex(i + 1),
        })
        .collect()
}

/// Parses a single index ("3") or an inclusive range ("3-5"). Anything past
/// `max`, the number of recipes currently shown, is rejected.
pub fn parse_index_or_range(s: &str, max: usize) -> Result<Vec<DisplayIndex>, String> {
    let (start, end) = match s.split_once('-') {
        Some((start, end)) => (DisplayIndex::from_str(start)?, DisplayIndex::from_str(end)?),
        None => {
            let idx = DisplayIndex::from_str(s)?;
            (idx, idx)
        }
    };
    if start > end {
        return Err(format!(
            "Invalid range: start ({}) must be <= end ({})",
            start, end
        ));
    }
    if end.0 > max {
        return Err(format!("Index {} out of range: {} recipes", end, max));
    }
    Ok((start.0..=end.0).map(DisplayIndex).collect())
}

/// Parses every input, expanding ranges, and drops repeats while keeping the
/// first-seen order.
pub fn parse_indexes<I: AsRef<str>>(inputs: &[I], max: usize) -> Result<Vec<DisplayIndex>, String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for input in inputs {
        for idx in parse_index_or_range(input.as_ref(), max)? {
            if seen.insert(idx) {
                out.push(idx);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: i64, fav: bool) -> Recipe {
        Recipe {
            id,
            title: format!("R{}", id),
            ingredients: vec![],
            steps: vec![],
            is_favorite: fav,
        }
    }

    #[test]
    fn favorites_first_then_newest() {
        let recipes = vec![recipe(1, false), recipe(3, false), recipe(2, true), recipe(0, true)];
        let ids: Vec<i64> = index_recipes(&recipes).iter().map(|d| d.recipe.id).collect();
        assert_eq!(ids, vec![2, 0, 3, 1]);
    }

    #[test]
    fn indexes_are_one_based_and_contiguous() {
        let recipes = vec![recipe(10, false), recipe(20, false)];
        let indexed = index_recipes(&recipes);
        assert_eq!(indexed[0].index, DisplayIndex(1));
        assert_eq!(indexed[1].index, DisplayIndex(2));
    }

    #[test]
    fn ordering_is_idempotent() {
        let recipes = vec![recipe(5, false), recipe(9, true), recipe(7, false)];
        assert_eq!(index_recipes(&recipes), index_recipes(&recipes));
    }

    #[test]
    fn sort_law_holds_pairwise() {
        let recipes = vec![
            recipe(4, false),
            recipe(8, true),
            recipe(6, false),
            recipe(2, true),
            recipe(9, false),
        ];
        let ordered = index_recipes(&recipes);
        for pair in ordered.windows(2) {
            let (a, b) = (&pair[0].recipe, &pair[1].recipe);
            if a.is_favorite != b.is_favorite {
                assert!(a.is_favorite);
            } else {
                assert!(a.id > b.id);
            }
        }
    }

    #[test]
    fn parses_single_and_range() {
        assert_eq!(parse_index_or_range("2", 10).unwrap(), vec![DisplayIndex(2)]);
        assert_eq!(
            parse_index_or_range("2-4", 10).unwrap(),
            vec![DisplayIndex(2), DisplayIndex(3), DisplayIndex(4)]
        );
        assert!(parse_index_or_range("4-2", 10).is_err());
        assert!(parse_index_or_range("0", 10).is_err());
        assert!(parse_index_or_range("abc", 10).is_err());
    }

    #[test]
    fn indexes_past_the_collection_are_rejected() {
        assert!(parse_index_or_range("4", 3).is_err());
        assert!(parse_index_or_range("2-4", 3).is_err());
        assert!(parse_index_or_range("1", 0).is_err());
        assert_eq!(parse_index_or_range("3", 3).unwrap(), vec![DisplayIndex(3)]);
    }

    #[test]
    fn huge_ranges_fail_without_expanding() {
        let err = parse_indexes(&["1-18446744073709551615"], 5).unwrap_err();
        assert!(err.contains("out of range"));
        assert!(parse_indexes(&["1-100000000"], 5).is_err());
    }

    #[test]
    fn parse_indexes_dedups() {
        let parsed = parse_indexes(&["1-2", "2", "5"], 5).unwrap();
        assert_eq!(parsed, vec![DisplayIndex(1), DisplayIndex(2), DisplayIndex(5)]);
    }
}
