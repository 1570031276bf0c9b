use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

static IMG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<img\b[^>]*>")
        .expect("Invalid img regex")
});

static STYLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>")
        .expect("Invalid style regex")
});

static SCRIPT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<noscript\b[^>]*>.*?</noscript\s*>|<template\b[^>]*>.*?</template\s*>")
        .expect("Invalid script regex")
});

static EMPTY_CONTAINER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(p|div|span|section|figure|strong|em|b)\b[^>]*>(?:\s|&nbsp;|<br\s*/?>)*</(?:p|div|span|section|figure|strong|em|b)\s*>")
        .expect("Invalid empty container regex")
});

static SPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t\u{a0}]{2,}")
        .expect("Invalid space regex")
});

static SPACE_AROUND_NEWLINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]*\n[ \t]*")
        .expect("Invalid newline regex")
});

static NEWLINE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n{3,}")
        .expect("Invalid newline run regex")
});

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<[^>]+>")
        .expect("Invalid tag regex")
});

/// A titled section of free text found in embedded product data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remark {
    pub title: String,
    pub body: String,
}

/// Clean HTML-valued description text: decode JS escapes, drop images, scripts,
/// style blocks and empty containers, collapse whitespace. Applying it twice changes nothing.
pub fn clean_rich_text(raw: &str) -> String {
    let mut text = decode_escapes(raw);
    text = IMG_REGEX.replace_all(&text, "").into_owned();
    text = STYLE_REGEX.replace_all(&text, "").into_owned();
    text = SCRIPT_REGEX.replace_all(&text, "").into_owned();

    loop {
        let next = EMPTY_CONTAINER_REGEX.replace_all(&text, "").into_owned();
        if next == text {
            break;
        }
        text = next;
    }

    text = text.replace("\r\n", "\n").replace('\r', "\n");
    text = SPACE_RUN_REGEX.replace_all(&text, " ").into_owned();
    text = SPACE_AROUND_NEWLINE_REGEX.replace_all(&text, "\n").into_owned();
    text = NEWLINE_RUN_REGEX.replace_all(&text, "\n\n").into_owned();
    text.trim().to_string()
}

/// Description built from titled remarks, in source order.
pub fn build_remarks_description(remarks: &[Remark]) -> Option<String> {
    let sections: Vec<String> = remarks
        .iter()
        .filter_map(|remark| {
            let title = remark.title.trim();
            let body = clean_rich_text(&remark.body);
            match (title.is_empty(), body.is_empty()) {
                (true, true) => None,
                (true, false) => Some(body),
                (false, true) => Some(format!("<strong>{}</strong>", title)),
                (false, false) => Some(format!("<strong>{}</strong>\n{}", title, body)),
            }
        })
        .collect();

    (!sections.is_empty()).then(|| sections.join("\n\n"))
}

/// Text content of an HTML snippet, used for length thresholds and comparisons.
pub fn plain_text(html: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(html, " ");
    super::clean_text(&decode_html_entities(&without_tags))
}

/// Decode JS string escapes in one left-to-right pass. Escaped backslashes are
/// dropped so the output never forms a new escape.
fn decode_escapes(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        match chars.get(i + 1) {
            Some('u') => match unicode_escape(&chars, i) {
                Some((decoded, len)) => {
                    if decoded != '\\' {
                        out.push(decoded);
                    }
                    i += len;
                }
                None => {
                    out.push('\\');
                    i += 1;
                }
            },
            Some('r') if chars.get(i + 2) == Some(&'\\') && chars.get(i + 3) == Some(&'n') => {
                out.push('\n');
                i += 4;
            }
            Some('n') | Some('r') => {
                out.push('\n');
                i += 2;
            }
            Some('t') => {
                out.push(' ');
                i += 2;
            }
            Some(&c) if matches!(c, '"' | '/' | '\'') => {
                out.push(c);
                i += 2;
            }
            Some('\\') => i += 2,
            _ => {
                out.push('\\');
                i += 1;
            }
        }
    }
    out
}

/// `\uXXXX` at `start`, joined with a following low surrogate when needed.
fn unicode_escape(chars: &[char], start: usize) -> Option<(char, usize)> {
    let unit = hex_unit(chars, start)?;
    if (0xD800..0xDC00).contains(&unit) {
        let low = hex_unit(chars, start + 6).filter(|low| (0xDC00..0xE000).contains(low))?;
        let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(code).map(|c| (c, 12));
    }
    char::from_u32(unit).map(|c| (c, 6))
}

fn hex_unit(chars: &[char], start: usize) -> Option<u32> {
    if chars.get(start) != Some(&'\\') || chars.get(start + 1) != Some(&'u') {
        return None;
    }
    let digits: String = chars.get(start + 2..start + 6)?.iter().collect();
    u32::from_str_radix(&digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_images_styles_and_empty_containers() {
        let raw = "<style>.a{color:red}</style><p><img src=\"a.jpg\"></p><p>Rich   sherry\\nnotes</p><div> <br> </div>";
        assert_eq!(clean_rich_text(raw), "<p>Rich sherry\nnotes</p>");
    }

    #[test]
    fn decodes_unicode_escapes() {
        assert_eq!(clean_rich_text("\\u003cp\\u003e스모키\\u003c/p\\u003e"), "<p>스모키</p>");
    }

    #[test]
    fn decoded_escapes_are_not_decoded_again() {
        for raw in ["\\u005cu0041", "\\\\n", "a\\u005c\\u005cnb", "\\uD83E\\uDD43 dram", "tail\\"] {
            let once = clean_rich_text(raw);
            assert_eq!(clean_rich_text(&once), once, "{}", raw);
        }
        assert_eq!(clean_rich_text("\\u005cu0041"), "u0041");
        assert_eq!(clean_rich_text("\\uD83E\\uDD43 dram"), "\u{1F943} dram");
        assert_eq!(clean_rich_text("<p>a\\r\\nb\\tc \\\"d\\\" e\\/f</p>"), "<p>a\nb c \"d\" e/f</p>");
    }

    #[test]
    fn strips_scripts() {
        let raw = "<p>Honeyed</p><script>track('view')</script><noscript><p>Enable JS</p></noscript><template><p>x</p></template>";
        assert_eq!(clean_rich_text(raw), "<p>Honeyed</p>");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let raw = "<p>Line one</p>\n\n\n\n<p>  Line two  </p><span></span>";
        let once = clean_rich_text(raw);
        assert_eq!(clean_rich_text(&once), once);
        assert_eq!(once, "<p>Line one</p>\n\n<p> Line two </p>");
    }

    #[test]
    fn nested_empty_containers_collapse() {
        assert_eq!(clean_rich_text("<div><p>&nbsp;</p></div>text"), "text");
    }

    #[test]
    fn remarks_are_joined_with_titles_emphasized() {
        let remarks = vec![
            Remark { title: "증류소".into(), body: "<p>1824년 설립</p>".into() },
            Remark { title: "".into(), body: "".into() },
            Remark { title: "추천".into(), body: "<p>온더락</p>".into() },
        ];
        assert_eq!(
            build_remarks_description(&remarks).as_deref(),
            Some("<strong>증류소</strong>\n<p>1824년 설립</p>\n\n<strong>추천</strong>\n<p>온더락</p>")
        );
        assert_eq!(build_remarks_description(&[]), None);
    }

    #[test]
    fn plain_text_drops_markup() {
        assert_eq!(plain_text("<p>Sweet &amp; <b>smoky</b></p>"), "Sweet & smoky");
    }
}
