use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::error::Result;
use crate::scrapers::selector;

static GLOBAL_ASSIGNMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"window\.(?:__NEXT_DATA__|__INITIAL_STATE__|__PRELOADED_STATE__|__APOLLO_STATE__|__NUXT__)\s*=\s*")
        .expect("Invalid global assignment regex")
});

/// Keys that only appear inside the product payload.
const MARKER_KEYS: &[&str] = &["\"information\"", "\"tasting_notes\"", "\"tastingNotes\""];

/// Give up on a marker after this many candidate objects fail to parse.
const MAX_MARKER_ATTEMPTS: usize = 64;

/// Ways an embedded data blob is framed in the page, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognizer {
    /// `window.__NEXT_DATA__ = {...}` and friends.
    GlobalAssignment,
    /// `<script id="__NEXT_DATA__">` or `type="application/json"`.
    NextDataScript,
    /// The biggest balanced object around a product-only key.
    MarkerObject,
    /// `<script type="application/ld+json">`.
    LinkedData,
}

pub const RECOGNIZERS: [Recognizer; 4] = [
    Recognizer::GlobalAssignment,
    Recognizer::NextDataScript,
    Recognizer::MarkerObject,
    Recognizer::LinkedData,
];

impl Recognizer {
    pub fn name(self) -> &'static str {
        match self {
            Recognizer::GlobalAssignment => "global_assignment",
            Recognizer::NextDataScript => "next_data_script",
            Recognizer::MarkerObject => "marker_object",
            Recognizer::LinkedData => "linked_data",
        }
    }

    /// Captured text that might parse as an object, best candidate first.
    fn captures(self, block: &ScriptBlock) -> Vec<String> {
        match self {
            Recognizer::GlobalAssignment => GLOBAL_ASSIGNMENT_REGEX
                .find_iter(&block.text)
                .filter_map(|m| {
                    let start = m.end() + leading_whitespace(&block.text[m.end()..]);
                    let end = balanced_object_end(&block.text, start)?;
                    Some(block.text[start..end].to_string())
                })
                .collect(),
            Recognizer::NextDataScript => {
                let is_next_data = block.id.as_deref() == Some("__NEXT_DATA__")
                    || block.kind.as_deref() == Some("application/json");
                if is_next_data {
                    vec![block.text.trim().to_string()]
                } else {
                    Vec::new()
                }
            }
            Recognizer::MarkerObject => marker_objects(&block.text),
            Recognizer::LinkedData => {
                if block.kind.as_deref() == Some("application/ld+json") {
                    vec![block.text.trim().to_string()]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn parse(self, captured: &str) -> Option<Value> {
        let value = match serde_json::from_str::<Value>(captured) {
            Ok(value) => value,
            Err(e) if self == Recognizer::GlobalAssignment => {
                debug!("Strict parse of {} capture failed ({}), retrying leniently", self, e);
                parse_js_object(captured)?
            }
            Err(e) => {
                debug!("Discarding {} capture: {}", self, e);
                return None;
            }
        };
        value.is_object().then_some(value)
    }
}

impl fmt::Display for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed blob and the recognizer that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedBlob {
    pub recognizer: Recognizer,
    pub value: Value,
}

struct ScriptBlock {
    id: Option<String>,
    kind: Option<String>,
    text: String,
}

/// Find the first embedded object in the page. `Ok(None)` when nothing parses.
pub fn locate(document: &Html) -> Result<Option<LocatedBlob>> {
    let script_selector = selector("script")?;
    let blocks: Vec<ScriptBlock> = document
        .select(&script_selector)
        .map(|script| ScriptBlock {
            id: script.value().attr("id").map(str::to_string),
            kind: script
                .value()
                .attr("type")
                .map(|t| t.trim().to_ascii_lowercase()),
            text: script.text().collect::<String>(),
        })
        .filter(|block| !block.text.trim().is_empty())
        .collect();

    debug!("Scanning {} script blocks for embedded data", blocks.len());

    for recognizer in RECOGNIZERS {
        for block in &blocks {
            for captured in recognizer.captures(block) {
                if let Some(value) = recognizer.parse(&captured) {
                    debug!("Located embedded data via {} ({} bytes)", recognizer, captured.len());
                    return Ok(Some(LocatedBlob { recognizer, value }));
                }
            }
        }
    }

    debug!("No embedded data located");
    Ok(None)
}

/// Every balanced object containing a marker key, outermost first.
fn marker_objects(text: &str) -> Vec<String> {
    let Some(marker_pos) = MARKER_KEYS.iter().filter_map(|m| text.find(m)).min() else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0;
    while pos < marker_pos && candidates.len() < MAX_MARKER_ATTEMPTS {
        if bytes[pos] != b'{' {
            pos += 1;
            continue;
        }
        match balanced_object_end(text, pos) {
            Some(end) if end > marker_pos => {
                candidates.push(text[pos..end].to_string());
                pos += 1;
            }
            // closes before the marker, so nothing inside can contain it
            Some(end) => pos = end,
            None => pos += 1,
        }
    }
    candidates
}

/// End (exclusive) of the object opening at `start`, skipping braces inside strings.
pub(crate) fn balanced_object_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == q {
                quote = None;
            }
            continue;
        }

        match byte {
            b'"' | b'\'' | b'`' => quote = Some(byte),
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a JavaScript object literal: single quotes, unquoted keys, trailing commas.
fn parse_js_object(js: &str) -> Option<Value> {
    serde_json::from_str(&js_to_json(js)).ok()
}

/// Rewrite object literal syntax as JSON, leaving string contents intact.
fn js_to_json(js: &str) -> String {
    let chars: Vec<char> = js.chars().collect();
    let mut out = String::with_capacity(js.len());
    let mut quote: Option<char> = None;
    let mut last_significant = ' ';
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            match c {
                '\\' => {
                    match chars.get(i + 1) {
                        Some('\'') => out.push('\''),
                        Some(next) => {
                            out.push('\\');
                            out.push(*next);
                        }
                        None => out.push('\\'),
                    }
                    i += 2;
                    continue;
                }
                _ if c == q => {
                    out.push('"');
                    quote = None;
                    last_significant = '"';
                }
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                _ => out.push(c),
            }
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' | '`' => {
                quote = Some(c);
                out.push('"');
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace()).copied();
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(',');
                    last_significant = ',';
                }
            }
            _ if is_ident_start(c) && matches!(last_significant, '{' | ',') => {
                let start = i;
                while i < chars.len() && (is_ident_start(chars[i]) || chars[i].is_ascii_digit()) {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                let next = chars[i..].iter().find(|n| !n.is_whitespace()).copied();
                if next == Some(':') {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
                last_significant = 'a';
                continue;
            }
            _ => {
                out.push(c);
                if !c.is_whitespace() {
                    last_significant = c;
                }
            }
        }
        i += 1;
    }
    out
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn leading_whitespace(text: &str) -> usize {
    text.len() - text.trim_start().len()
}
