pub mod category;
pub mod labels;
pub mod number;
pub mod rich_text;

pub use category::*;
pub use labels::*;
pub use number::*;
pub use rich_text::*;

use html_escape::decode_html_entities;

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// `clean_text`, with empty results mapped to `None`.
pub fn non_empty(text: &str) -> Option<String> {
    let cleaned = clean_text(text);
    (!cleaned.is_empty()).then_some(cleaned)
}
