use chrono::{DateTime, Utc};
use colored::Colorize;
use fluffcook::api::{CmdMessage, MessageLevel};
use fluffcook::config::{AppConfig, CONFIG_KEYS};
use fluffcook::index::DisplayRecipe;
use fluffcook::offline::CacheStatus;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;
const FAVORITE_MARKER: &str = "★";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_recipe_list(recipes: &[DisplayRecipe]) {
    if recipes.is_empty() {
        println!("No recipes yet. Try `fluffcook cook <url>` or `fluffcook generate <idea>`.");
        return;
    }

    for dr in recipes {
        let idx_str = format!("{:>3}. ", dr.index.0);
        let marker = if dr.recipe.is_favorite {
            format!("{} ", FAVORITE_MARKER)
        } else {
            "  ".to_string()
        };
        let summary = format!(
            "{} ({} ingredients, {} steps)",
            dr.recipe.title,
            dr.recipe.ingredients.len(),
            dr.recipe.steps.len()
        );

        let fixed = idx_str.width() + marker.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let shown = truncate_to_width(&summary, available);
        let padding = available.saturating_sub(shown.width());

        let time_ago = dr
            .recipe
            .created_at()
            .map(format_time_ago)
            .unwrap_or_default();

        println!(
            "{}{}{}{}{}",
            marker.yellow(),
            idx_str,
            shown,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

pub(super) fn print_full_recipes(recipes: &[DisplayRecipe]) {
    for (i, dr) in recipes.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        let marker = if dr.recipe.is_favorite {
            format!(" {}", FAVORITE_MARKER)
        } else {
            String::new()
        };
        println!(
            "{} {}{}",
            dr.index.to_string().yellow(),
            dr.recipe.title.bold(),
            marker.yellow()
        );
        println!("--------------------------------");
        println!("{}", "Ingredients".underline());
        for item in &dr.recipe.ingredients {
            println!("  • {}", item);
        }
        println!();
        println!("{}", "Steps".underline());
        for (n, step) in dr.recipe.steps.iter().enumerate() {
            println!("  {}. {}", n + 1, step);
        }
    }
}

pub(super) fn print_plain_recipes(recipes: &[DisplayRecipe]) {
    let texts: Vec<String> = recipes.iter().map(|dr| dr.recipe.to_plain_text()).collect();
    println!("{}", texts.join("\n\n"));
}

pub(super) fn print_config(config: &AppConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{:<22} {}", key.bold(), value);
        }
    }
}

pub(super) fn print_cache_status(status: &CacheStatus) {
    println!("{:<10} {}", "current".bold(), status.current);
    for store in &status.stores {
        let label = if *store == status.current {
            "active".green()
        } else {
            "stale".yellow()
        };
        println!("  {} {}", label, store);
    }
    for path in &status.cached_paths {
        println!("    {}", path.dimmed());
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("Soup", 10), "Soup");
    }

    #[test]
    fn long_text_gets_ellipsis_within_width() {
        let out = truncate_to_width("Spicy vegan chili with beans", 10);
        assert!(out.ends_with('…'));
        assert!(out.width() <= 10);
    }

    #[test]
    fn wide_characters_count_double() {
        let out = truncate_to_width("拉麺拉麺拉麺", 6);
        assert!(out.width() <= 6);
    }

    #[test]
    fn future_timestamps_do_not_panic() {
        let later = Utc::now() + chrono::Duration::hours(1);
        let shown = format_time_ago(later);
        assert_eq!(shown.chars().count(), TIME_WIDTH);
        assert!(!shown.trim().is_empty());
    }
}
