//! Instruction payloads for the generation service.
//!
//! Wording is not part of any contract the rest of the crate relies on. What
//! matters is the output contract each prompt states: a single JSON object
//! with `title`, `ingredients` and `steps`, or an `error` field when the
//! request cannot be satisfied.

use url::Url;

const OUTPUT_CONTRACT: &str = r#"Reply with JSON ONLY, exactly this shape: { "title": "String", "ingredients": ["String"], "steps": ["String"] }.
No markdown, no code fences, no conversation.
If the request cannot be satisfied, reply with { "error": "short reason" } instead."#;

/// What the extraction prompt is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceText {
    /// Raw page HTML, truncated.
    Html(String),
    /// Visible page text after noise stripping, truncated.
    PageText(String),
    /// The page could not be fetched; only its address is known.
    UrlOnly(String),
    /// Text pasted by the user, truncated.
    Pasted(String),
}

impl SourceText {
    fn labelled(&self) -> String {
        match self {
            SourceText::Html(html) => format!("SOURCE HTML: {}", html),
            SourceText::PageText(text) => format!("SOURCE TEXT: {}", text),
            SourceText::UrlOnly(url) => format!(
                "SOURCE URL (page content unavailable, infer from the address): {}",
                url
            ),
            SourceText::Pasted(text) => text.clone(),
        }
    }
}

/// True for absolute http(s) URLs; anything else is treated as pasted text.
pub fn looks_like_url(input: &str) -> bool {
    let input = input.trim();
    if input.contains(char::is_whitespace) {
        return false;
    }
    Url::parse(input)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Cuts `text` to at most `max_chars` characters without splitting one.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

pub fn extraction_prompt(source: &SourceText) -> String {
    format!(
        "You are a professional cookbook editor.\n\
         Analyze the provided text/HTML and extract the recipe it contains.\n\
         \n\
         STRICT RULES:\n\
         1. TRUTH: Use ONLY the provided text. Do not invent ingredients.\n\
         2. FORMATTING: Clean up the output. Remove repetitive prefixes and simplify where necessary.\n\
         3. {}\n\
         \n\
         TEXT TO ANALYZE: {}",
        OUTPUT_CONTRACT,
        source.labelled()
    )
}

pub fn generation_prompt(description: &str, custom_rules: Option<&str>) -> String {
    let rules = match custom_rules.map(str::trim).filter(|r| !r.is_empty()) {
        Some(rules) => format!("USER RULES (always follow these): {}\n\n", rules),
        None => String::new(),
    };
    format!(
        "{}You are a creative chef.\n\
         Invent one complete, cookable recipe for the request below.\n\
         \n\
         STRICT RULES:\n\
         1. Give every ingredient with a quantity.\n\
         2. Write steps in order, one action per step.\n\
         3. {}\n\
         \n\
         REQUEST: {}",
        rules, OUTPUT_CONTRACT, description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_detection() {
        assert!(looks_like_url("https://www.example.com/recipes/chili"));
        assert!(looks_like_url("  http://example.com  "));
        assert!(!looks_like_url("a spicy vegan chili"));
        assert!(!looks_like_url("http is a protocol"));
        assert!(!looks_like_url("ftp://example.com/file"));
        assert!(!looks_like_url("httpbin"));
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("crème brûlée", 5), "crème");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn extraction_prompt_frames_editor_and_contract() {
        let prompt = extraction_prompt(&SourceText::PageText("2 eggs".into()));
        assert!(prompt.contains("cookbook editor"));
        assert!(prompt.contains(r#""ingredients""#));
        assert!(prompt.ends_with("SOURCE TEXT: 2 eggs"));
    }

    #[test]
    fn raw_html_and_url_only_are_labelled() {
        assert!(extraction_prompt(&SourceText::Html("<p>x</p>".into())).contains("SOURCE HTML: <p>x</p>"));
        assert!(extraction_prompt(&SourceText::UrlOnly("https://a.b".into())).contains("https://a.b"));
    }

    #[test]
    fn generation_prompt_prepends_rules() {
        let prompt = generation_prompt("a spicy vegan chili", Some("no cilantro"));
        assert!(prompt.starts_with("USER RULES (always follow these): no cilantro"));
        assert!(prompt.contains("creative chef"));
        assert!(prompt.ends_with("REQUEST: a spicy vegan chili"));
    }

    #[test]
    fn blank_rules_are_ignored() {
        let prompt = generation_prompt("soup", Some("   "));
        assert!(prompt.starts_with("You are a creative chef."));
    }
}
