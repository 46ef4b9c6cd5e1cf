//! HTML noise stripping: pages are reduced to the visible text of their body
//! before they are put into an extraction prompt.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Elements whose whole subtree is dropped before text extraction.
pub const NOISE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "template",
    "iframe",
    "object",
    "embed",
    "svg",
    "canvas",
    "video",
    "audio",
    "nav",
    "header",
    "footer",
    "aside",
    "form",
    "button",
    "[role=navigation]",
    "[role=banner]",
    "[aria-hidden=true]",
    ".ad",
    ".ads",
    ".advert",
    ".advertisement",
    "[id^=ad-]",
    "[class*=sponsor]",
    "#comments",
    ".comments",
    ".comment-list",
    "[id*=comment]",
    "[class*=newsletter]",
    "[class*=social]",
];

static NOISE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&NOISE_SELECTORS.join(", ")).expect("noise selector list is valid CSS")
});

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid selector"));

/// Reduces an HTML document to the whitespace-collapsed text of its body,
/// minus every subtree matched by [`NOISE_SELECTORS`].
pub fn strip_noise(raw_html: &str) -> String {
    let document = Html::parse_document(raw_html);

    let removed: HashSet<_> = document.select(&NOISE).map(|el| el.id()).collect();
    let root = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut text = String::new();
    for node in root.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        if node.ancestors().any(|a| removed.contains(&a.id())) {
            continue;
        }
        text.push_str(fragment);
        text.push(' ');
    }

    collapse_whitespace(&text)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
