use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::error::Result;
use crate::models::{
    all_label_terms, Field, LabelValuePair, PartialRecord, LABEL_ABV, LABEL_AGE, LABEL_AROMA,
    LABEL_BRAND, LABEL_CASK, LABEL_COUNTRY, LABEL_FINISH, LABEL_REGION, LABEL_TASTE, LABEL_TYPE,
    LABEL_VOLUME, TASTING_SECTION_TITLES,
};
use crate::parsers::{clean_rich_text, clean_text, matches_label, parse_count, parse_price, parse_rating, plain_text};
use crate::scrapers::selector;

static PRICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}(?:,\d{3})+|\d{3,})\s*원")
        .expect("Invalid price regex")
});

static BARE_RATING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}\.\d{1,2}$")
        .expect("Invalid rating regex")
});

static SLASH_COUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/\s*\d[\d,]*")
        .expect("Invalid slash count regex")
});

static REVIEW_WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)리뷰|후기|평점|reviews?|ratings?")
        .expect("Invalid review word regex")
});

static REVIEW_COUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:리뷰|후기|reviews?)\s*[(\[]?\s*(\d[\d,]*)|(?:^|[^\d.,])(\d[\d,]*)\s*(?:개의?|건의?)?\s*(?:리뷰|후기|reviews?)")
        .expect("Invalid review count regex")
});

static NUMBER_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d[\d,]*")
        .expect("Invalid number regex")
});

static LATIN_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9 .,'’&()\-/:!]*$")
        .expect("Invalid latin name regex")
});

const MAX_ENGLISH_NAME_LEN: usize = 80;
const MAX_PRICE_CONTAINER_LEN: usize = 60;
const MIN_DESCRIPTION_LEN: usize = 30;

const TEXT_ELEMENTS: &str = "dt, dd, th, td, span, div, p, strong, b, em, label, li, h3, h4, h5, h6";
const PRICE_ELEMENTS: &str = "span, strong, em, b, p, div, dd, li, td";
const STRUCK_TAGS: &[&str] = &["del", "s", "strike"];
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Section headings that are not product description.
const SKIPPED_SECTIONS: &[&str] = &[
    "리뷰", "후기", "상품 리뷰", "Reviews", "상품정보", "상품 정보", "기본 정보", "Information",
    "추천 상품", "함께 본 상품", "Related", "배송", "배송 정보", "교환/반품",
];

const DESCRIPTION_CLASS_HINTS: &[&str] = &["description", "desc", "editor", "detail-content", "product-content"];

/// A labeled attribute: which field, which label spellings, how long a value may be.
#[derive(Debug, Clone, Copy)]
pub struct AttributeRule {
    pub field: Field,
    pub labels: &'static [&'static str],
    pub max_len: usize,
}

pub const ATTRIBUTE_RULES: [AttributeRule; 8] = [
    AttributeRule { field: Field::Kind, labels: LABEL_TYPE, max_len: 40 },
    AttributeRule { field: Field::Volume, labels: LABEL_VOLUME, max_len: 20 },
    AttributeRule { field: Field::Abv, labels: LABEL_ABV, max_len: 20 },
    AttributeRule { field: Field::Country, labels: LABEL_COUNTRY, max_len: 30 },
    AttributeRule { field: Field::Region, labels: LABEL_REGION, max_len: 40 },
    AttributeRule { field: Field::Cask, labels: LABEL_CASK, max_len: 80 },
    AttributeRule { field: Field::Age, labels: LABEL_AGE, max_len: 20 },
    AttributeRule { field: Field::Brand, labels: LABEL_BRAND, max_len: 40 },
];

pub const TASTING_RULES: [AttributeRule; 3] = [
    AttributeRule { field: Field::Aroma, labels: LABEL_AROMA, max_len: 300 },
    AttributeRule { field: Field::Taste, labels: LABEL_TASTE, max_len: 300 },
    AttributeRule { field: Field::Finish, labels: LABEL_FINISH, max_len: 300 },
];

/// What the markup contributes to the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlExtraction {
    pub record: PartialRecord,
    pub information: Vec<LabelValuePair>,
    pub tasting_notes: Vec<LabelValuePair>,
}

/// Recover product fields from the DOM. Each field group runs independently.
pub fn extract_html(document: &Html) -> Result<HtmlExtraction> {
    let (korean_name, english_name) = extract_names(document)?;
    let price = extract_price(document)?;
    let (review_rate, review_count) = extract_reviews(document)?;
    let information = extract_rows(document, None, &ATTRIBUTE_RULES)?;
    let tasting_scope = find_tasting_section(document)?;
    let tasting_notes = extract_rows(document, tasting_scope, &TASTING_RULES)?;
    let description = extract_description(document, &information, &tasting_notes)?;
    let image_url = extract_image(document)?;

    let mut fields = vec![
        (Field::KoreanName, korean_name),
        (Field::EnglishName, english_name),
        (Field::Price, price),
        (Field::ReviewRate, review_rate),
        (Field::ReviewCount, review_count),
        (Field::Description, description),
        (Field::ImageUrl, image_url),
    ];
    fields.extend(
        information
            .iter()
            .chain(tasting_notes.iter())
            .filter_map(|row| Some((field_for_label(&row.label)?, Some(row.value.clone())))),
    );

    let record = PartialRecord::from_pairs(
        fields
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field, v))),
    );

    debug!(
        "HTML extraction: {} information rows, {} tasting rows",
        information.len(),
        tasting_notes.len()
    );

    Ok(HtmlExtraction {
        record,
        information,
        tasting_notes,
    })
}

fn field_for_label(label: &str) -> Option<Field> {
    ATTRIBUTE_RULES
        .iter()
        .chain(TASTING_RULES.iter())
        .find(|rule| matches_label(label, rule.labels))
        .map(|rule| rule.field)
}

/// Korean name from the primary heading, English name from a short Latin text near it.
fn extract_names(document: &Html) -> Result<(Option<String>, Option<String>)> {
    let h1 = selector("h1")?;
    let Some(heading) = document.select(&h1).find(|h| !element_text(*h).is_empty()) else {
        return Ok((None, None));
    };

    let korean_name = element_text(heading);
    let english_name = find_latin_near(heading, &korean_name);
    Ok((Some(korean_name), english_name))
}

fn find_latin_near(heading: ElementRef, heading_text: &str) -> Option<String> {
    let accept = |text: String| -> Option<String> {
        (text != heading_text && is_latin_name(&text)).then_some(text)
    };

    // (a) siblings of the heading, including bare text nodes
    for node in heading.next_siblings().chain(heading.prev_siblings()) {
        let texts = match ElementRef::wrap(node) {
            Some(sibling) => candidate_texts(sibling),
            None => node.value().as_text().map(|t| vec![clean_text(t)]).unwrap_or_default(),
        };
        if let Some(found) = texts.into_iter().find_map(accept) {
            return Some(found);
        }
    }

    // (b) the enclosing group, then (c) the group's parent
    let mut group = parent_element(heading);
    for _ in 0..2 {
        let Some(container) = group.filter(|g| !is_document_level(*g)) else {
            break;
        };
        if let Some(found) = loose_texts(container, heading).into_iter().find_map(accept) {
            return Some(found);
        }
        group = parent_element(container);
    }
    None
}

/// Leaf element texts and mixed-content text nodes under `container`, outside `skip`.
fn loose_texts(container: ElementRef, skip: ElementRef) -> Vec<String> {
    container
        .descendants()
        .filter(|node| node.id() != skip.id() && !node.ancestors().any(|a| a.id() == skip.id()))
        .filter_map(|node| match ElementRef::wrap(node) {
            Some(el) if is_leaf(el) && !INVISIBLE_TAGS.contains(&el.value().name()) => {
                Some(element_text(el))
            }
            Some(_) => None,
            None => {
                let parent = node.parent().and_then(ElementRef::wrap)?;
                if is_leaf(parent) || INVISIBLE_TAGS.contains(&parent.value().name()) {
                    return None;
                }
                node.value().as_text().map(|t| clean_text(t))
            }
        })
        .filter(|text| !text.is_empty())
        .collect()
}

fn is_latin_name(text: &str) -> bool {
    let len = text.chars().count();
    (2..=MAX_ENGLISH_NAME_LEN).contains(&len)
        && LATIN_NAME_REGEX.is_match(text)
}

/// First `<n>원` price in the innermost short element mentioning the currency.
fn extract_price(document: &Html) -> Result<Option<String>> {
    let candidates = selector(PRICE_ELEMENTS)?;
    let price = document
        .select(&candidates)
        .filter(|el| !is_inside(*el, STRUCK_TAGS) && !STRUCK_TAGS.contains(&el.value().name()))
        .filter(|el| {
            // innermost: no child element repeats the currency marker
            !el.children()
                .filter_map(ElementRef::wrap)
                .any(|child| child.text().any(|t| t.contains('원')))
        })
        .map(element_text)
        .filter(|text| text.contains('원') && text.chars().count() <= MAX_PRICE_CONTAINER_LEN)
        .find_map(|text| {
            let caps = PRICE_REGEX.captures(&text)?;
            let token = caps.get(1)?.as_str();
            parse_price(token).filter(|v| *v >= 100).map(|_| format!("{}원", token))
        });
    Ok(price)
}

/// Rating from a bare decimal next to a count or review word; count from the review link.
fn extract_reviews(document: &Html) -> Result<(Option<String>, Option<String>)> {
    let candidates = selector("span, strong, em, b, div, p")?;
    let rating = document
        .select(&candidates)
        .filter(|el| is_leaf(*el))
        .find_map(|el| {
            let text = element_text(el);
            if !BARE_RATING_REGEX.is_match(&text) || parse_rating(&text).is_none() {
                return None;
            }
            let context = parent_element(el).map(element_text).unwrap_or_default();
            let rest = context.replacen(&text, "", 1);
            (SLASH_COUNT_REGEX.is_match(&rest) || REVIEW_WORD_REGEX.is_match(&rest)).then_some(text)
        });

    let review_link = selector(r#"a[href*="review"]"#)?;
    let count = document
        .select(&review_link)
        .find_map(|a| {
            let text = element_text(a);
            let token = NUMBER_TOKEN_REGEX.find(&text)?;
            parse_count(token.as_str()).map(|_| token.as_str().to_string())
        })
        .or_else(|| {
            let text = visible_text(document);
            let caps = REVIEW_COUNT_REGEX.captures(&text)?;
            let token = caps.get(1).or_else(|| caps.get(2))?.as_str();
            parse_count(token).map(|_| token.to_string())
        });

    Ok((rating, count))
}

/// Container of the tasting notes section, when the page has one.
fn find_tasting_section(document: &Html) -> Result<Option<ElementRef<'_>>> {
    let headings = selector("h2, h3, h4, h5, strong, span, p, div")?;
    let Some(title) = document
        .select(&headings)
        .find(|el| matches_label(&element_text(*el), TASTING_SECTION_TITLES))
    else {
        return Ok(None);
    };

    let title_len = element_text(title).chars().count();
    let scope = title
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|el| !is_document_level(*el))
        .find(|el| element_text(*el).chars().count() > title_len);
    Ok(scope)
}

/// Apply each rule once, within `scope` or the whole document.
fn extract_rows(
    document: &Html,
    scope: Option<ElementRef>,
    rules: &[AttributeRule],
) -> Result<Vec<LabelValuePair>> {
    let candidates = selector(TEXT_ELEMENTS)?;
    let elements: Vec<ElementRef> = match scope {
        Some(root) => root.select(&candidates).collect(),
        None => document.select(&candidates).collect(),
    };

    Ok(rules
        .iter()
        .filter_map(|rule| resolve_label(&elements, rule))
        .collect())
}

/// Find a label element for `rule` and the value laid out next to it.
fn resolve_label(elements: &[ElementRef], rule: &AttributeRule) -> Option<LabelValuePair> {
    let accept = |text: String| -> Option<String> {
        let len = text.chars().count();
        (len > 0 && len <= rule.max_len && !is_any_label(&text)).then_some(text)
    };

    elements
        .iter()
        .filter(|el| !is_inside(**el, INVISIBLE_TAGS))
        .filter(|el| matches_label(&element_text(**el), rule.labels))
        .find_map(|label_el| {
            let label = element_text(*label_el);
            let value = sibling_value(*label_el, &accept)
                .or_else(|| group_value(*label_el, &accept))
                .or_else(|| group_sibling_value(*label_el, &accept))?;
            debug!("Label {} resolved to {:?}", label, value);
            Some(LabelValuePair::new(label, value))
        })
}

/// (a) following layout siblings, including bare text nodes, up to the next label.
fn sibling_value(label_el: ElementRef, accept: &dyn Fn(String) -> Option<String>) -> Option<String> {
    for node in label_el.next_siblings() {
        let text = match ElementRef::wrap(node) {
            Some(el) => element_text(el),
            None => match node.value().as_text() {
                Some(t) => clean_text(t),
                None => continue,
            },
        };
        if is_any_label(&text) {
            return None;
        }
        if let Some(value) = accept(text) {
            return Some(value);
        }
    }
    None
}

/// (b) leaf elements after the label in its enclosing group, when no other label follows.
fn group_value(label_el: ElementRef, accept: &dyn Fn(String) -> Option<String>) -> Option<String> {
    let group = parent_element(label_el).filter(|g| !is_document_level(*g))?;
    let texts: Vec<String> = group
        .descendants()
        .skip_while(|node| node.id() != label_el.id())
        .filter_map(ElementRef::wrap)
        .filter(|el| el.id() != label_el.id() && is_leaf(*el) && !is_descendant_of(*el, label_el))
        .map(element_text)
        .collect();
    if texts.iter().any(|text| is_any_label(text)) {
        return None;
    }
    texts.into_iter().find_map(accept)
}

/// (c) following siblings of the enclosing group, up to the next labeled row.
fn group_sibling_value(label_el: ElementRef, accept: &dyn Fn(String) -> Option<String>) -> Option<String> {
    let group = parent_element(label_el).filter(|g| !is_document_level(*g))?;
    for sibling in group.next_siblings().filter_map(ElementRef::wrap) {
        let texts = candidate_texts(sibling);
        if texts.iter().any(|text| is_any_label(text)) {
            return None;
        }
        if let Some(value) = texts.into_iter().find_map(accept) {
            return Some(value);
        }
    }
    None
}

/// Section bodies and description-like containers, cleaned and de-duplicated.
fn extract_description(
    document: &Html,
    information: &[LabelValuePair],
    tasting_notes: &[LabelValuePair],
) -> Result<Option<String>> {
    let mut candidates: Vec<String> = Vec::new();

    let headings = selector("h2, h3")?;
    for heading in document.select(&headings) {
        let title = element_text(heading);
        if title.is_empty()
            || is_any_label(&title)
            || matches_label(&title, TASTING_SECTION_TITLES)
            || SKIPPED_SECTIONS.iter().any(|s| matches_label(&title, &[*s]))
        {
            continue;
        }
        let body: String = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|el| !matches!(el.value().name(), "h1" | "h2" | "h3"))
            .filter(|el| !INVISIBLE_TAGS.contains(&el.value().name()))
            .map(|el| el.html())
            .collect::<Vec<_>>()
            .join("\n");
        if !body.trim().is_empty() {
            candidates.push(body);
        }
    }

    let all = selector("div, section, article, p")?;
    for el in document.select(&all) {
        let hinted = el
            .value()
            .classes()
            .any(|class| DESCRIPTION_CLASS_HINTS.iter().any(|hint| class.to_lowercase().contains(hint)));
        if hinted {
            candidates.push(el.inner_html());
        }
    }

    let extracted: Vec<&str> = information
        .iter()
        .chain(tasting_notes.iter())
        .flat_map(|row| [row.label.as_str(), row.value.as_str()])
        .collect();

    let mut accepted: Vec<(String, String)> = Vec::new();
    for raw in candidates {
        let cleaned = clean_rich_text(&raw);
        let plain = plain_text(&cleaned);
        if plain.chars().count() < MIN_DESCRIPTION_LEN || repeats_rows(&plain, &extracted) {
            continue;
        }
        if accepted.iter().any(|(_, seen)| seen.contains(&plain)) {
            continue;
        }
        // a longer candidate replaces the fragments it contains
        accepted.retain(|(_, seen)| !plain.contains(seen.as_str()));
        accepted.push((cleaned, plain));
    }

    if accepted.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        accepted
            .into_iter()
            .map(|(cleaned, _)| cleaned)
            .collect::<Vec<_>>()
            .join("\n\n"),
    ))
}

/// True when the text is little more than the label/value rows already extracted.
fn repeats_rows(plain: &str, extracted: &[&str]) -> bool {
    if extracted.is_empty() {
        return false;
    }
    let mut rest = plain.to_string();
    for fragment in extracted.iter().filter(|f| !f.trim().is_empty()) {
        rest = rest.replace(fragment, "");
    }
    let remaining = rest.chars().filter(|c| !c.is_whitespace()).count();
    remaining < MIN_DESCRIPTION_LEN
}

fn extract_image(document: &Html) -> Result<Option<String>> {
    let og_image = selector(r#"meta[property="og:image"]"#)?;
    Ok(document
        .select(&og_image)
        .filter_map(|meta| meta.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string))
}

fn element_text(el: ElementRef) -> String {
    clean_text(&el.text().collect::<String>())
}

/// A leaf's own text, or each leaf descendant's text.
fn candidate_texts(el: ElementRef) -> Vec<String> {
    if is_leaf(el) {
        return vec![element_text(el)];
    }
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|d| is_leaf(*d) && !INVISIBLE_TAGS.contains(&d.value().name()))
        .map(element_text)
        .collect()
}

fn is_any_label(text: &str) -> bool {
    let terms: Vec<&str> = all_label_terms().collect();
    matches_label(text, &terms) || matches_label(text, TASTING_SECTION_TITLES)
}

fn parent_element(el: ElementRef) -> Option<ElementRef> {
    el.parent().and_then(ElementRef::wrap)
}

fn is_leaf(el: ElementRef) -> bool {
    !el.children().any(|child| child.value().is_element())
}

fn is_document_level(el: ElementRef) -> bool {
    matches!(el.value().name(), "body" | "html")
}

fn is_descendant_of(el: ElementRef, ancestor: ElementRef) -> bool {
    el.ancestors().any(|a| a.id() == ancestor.id())
}

fn is_inside(el: ElementRef, tags: &[&str]) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| tags.contains(&a.value().name()))
}

/// Text of the document outside scripts and styles.
fn visible_text(document: &Html) -> String {
    let parts: Vec<&str> = document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap)?;
            (!INVISIBLE_TAGS.contains(&parent.value().name())).then_some(&**text)
        })
        .collect();
    clean_text(&parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> HtmlExtraction {
        extract_html(&Html::parse_document(html)).expect("built-in selectors are valid")
    }

    #[test]
    fn heading_and_latin_sibling_give_names() {
        let record = extract("<div><h1>맥캘란 18년</h1><p>Macallan 18yo</p></div>").record;
        assert_eq!(record.korean_name.as_deref(), Some("맥캘란 18년"));
        assert_eq!(record.english_name.as_deref(), Some("Macallan 18yo"));
    }

    #[test]
    fn latin_name_in_bare_text_after_heading() {
        let record = extract("<div><h1>맥캘란 18년</h1>Macallan 18yo</div>").record;
        assert_eq!(record.english_name.as_deref(), Some("Macallan 18yo"));

        let mixed = extract("<section><div><h1>아드벡 10년</h1></div><div>Ardbeg 10 Years <em>NEW</em></div></section>").record;
        assert_eq!(mixed.english_name.as_deref(), Some("Ardbeg 10 Years"));
    }

    #[test]
    fn latin_name_found_in_enclosing_group() {
        let html = r#"<section><div class="title"><h1>아드벡 10년</h1></div>
            <div class="sub"><span>Ardbeg 10 Years</span></div></section>"#;
        let record = extract(html).record;
        assert_eq!(record.english_name.as_deref(), Some("Ardbeg 10 Years"));
    }

    #[test]
    fn price_requires_currency_marker_and_large_integer() {
        let html = r#"<div class="info"><span>리뷰 12</span><span>30% 할인</span>
            <p><del>200,000원</del></p><p><strong>150,000원</strong></p></div>"#;
        assert_eq!(extract(html).record.price.as_deref(), Some("150,000원"));
        assert_eq!(extract("<span>12원</span><span>700</span>").record.price, None);
    }

    #[test]
    fn rating_needs_review_context() {
        let html = r#"<div class="rating"><span>4.5</span><span>/ 128</span></div>
            <a href="/products/1/reviews">리뷰 128개</a>"#;
        let record = extract(html).record;
        assert_eq!(record.review_rate.as_deref(), Some("4.5"));
        assert_eq!(record.review_count.as_deref(), Some("128"));

        let lone = extract("<div><span>4.5</span><span>mm</span></div>").record;
        assert_eq!(lone.review_rate, None);
    }

    #[test]
    fn review_count_falls_back_to_phrase_scan() {
        let record = extract("<p>총 1,024개의 리뷰</p>").record;
        assert_eq!(record.review_count.as_deref(), Some("1,024"));
    }

    #[test]
    fn review_count_ignores_rating_digits() {
        let record = extract("<p>평점 4.8 리뷰 52개</p>").record;
        assert_eq!(record.review_count.as_deref(), Some("52"));

        let record = extract("<p>4.8 (52 reviews)</p>").record;
        assert_eq!(record.review_count.as_deref(), Some("52"));
    }

    #[test]
    fn labeled_attributes_use_siblings_and_groups() {
        let html = r#"
            <dl><dt>종류</dt><dd>싱글몰트</dd></dl>
            <ul><li><span>용량</span> 700ml</li></ul>
            <div class="row"><div class="label"><span>도수</span></div><div class="value">43%</div></div>
            <table><tr><th>국가</th><td>스코틀랜드</td></tr></table>"#;
        let extraction = extract(html);
        let record = &extraction.record;
        assert_eq!(record.kind.as_deref(), Some("싱글몰트"));
        assert_eq!(record.volume.as_deref(), Some("700ml"));
        assert_eq!(record.abv.as_deref(), Some("43%"));
        assert_eq!(record.country.as_deref(), Some("스코틀랜드"));
        assert_eq!(extraction.information.len(), 4);
    }

    #[test]
    fn label_next_to_label_is_not_a_value() {
        let html = "<div><span>지역</span><span>캐스크</span></div>";
        let record = extract(html).record;
        assert_eq!(record.region, None);
        assert_eq!(record.cask, None);
    }

    #[test]
    fn empty_value_slot_stays_absent() {
        let listed = extract("<dl><dt>용량</dt><dd>700ml</dd><dt>국가</dt><dd></dd></dl>").record;
        assert_eq!(listed.volume.as_deref(), Some("700ml"));
        assert_eq!(listed.country, None);

        let tabled = extract(
            "<table><tr><th>국가</th><td></td></tr><tr><th>지역</th><td>스페이사이드</td></tr></table>",
        )
        .record;
        assert_eq!(tabled.country, None);
        assert_eq!(tabled.region.as_deref(), Some("스페이사이드"));
    }

    #[test]
    fn value_is_never_taken_from_before_the_label() {
        let record = extract("<div><span>700ml</span><span>국가</span></div>").record;
        assert_eq!(record.country, None);
    }

    #[test]
    fn tasting_notes_scoped_to_section() {
        let html = r#"
            <div class="banner"><span>맛</span><span>오늘의 특가</span></div>
            <section><h3>테이스팅 노트</h3>
              <div><span>향 Aroma</span><p>바닐라, 꿀</p></div>
              <div><span>맛</span><p>셰리, 건포도</p></div>
              <div><span>Finish</span><p>길고 스파이시</p></div>
            </section>"#;
        let extraction = extract(html);
        assert_eq!(extraction.record.aroma.as_deref(), Some("바닐라, 꿀"));
        assert_eq!(extraction.record.taste.as_deref(), Some("셰리, 건포도"));
        assert_eq!(extraction.record.finish.as_deref(), Some("길고 스파이시"));
        assert_eq!(extraction.tasting_notes.len(), 3);
    }

    #[test]
    fn description_from_sections_skips_short_and_repeated_content() {
        let html = r#"
            <h2>상품 설명</h2>
            <p>스페이사이드의 대표 증류소에서 셰리 캐스크로 숙성한 부드럽고 풍부한 위스키입니다.</p>
            <img src="banner.jpg">
            <h2>리뷰</h2><p>최고의 위스키입니다. 다시 구매할 의향이 있습니다. 강력 추천합니다!</p>
            <h2>배송</h2><p>짧음</p>"#;
        let description = extract(html).record.description.unwrap();
        assert!(description.contains("셰리 캐스크"));
        assert!(!description.contains("img"));
        assert!(!description.contains("다시 구매"));
    }

    #[test]
    fn description_sections_skip_scripts() {
        let html = r#"
            <h2>상품 설명</h2>
            <script>window.dataLayer = [{"event": "view_item", "currency": "KRW"}];</script>
            <p>스페이사이드의 대표 증류소에서 셰리 캐스크로 숙성한 부드럽고 풍부한 위스키입니다.</p>
            <noscript><img src="pixel.gif"> tracking pixel fallback for old browsers</noscript>"#;
        let description = extract(html).record.description.unwrap();
        assert!(description.contains("셰리 캐스크"));
        assert!(!description.contains("dataLayer"));
        assert!(!description.contains("tracking pixel"));
    }

    #[test]
    fn og_image_is_used() {
        let html = r#"<head><meta property="og:image" content=" https://img.example/a.jpg "></head>"#;
        assert_eq!(extract(html).record.image_url.as_deref(), Some("https://img.example/a.jpg"));
    }

    #[test]
    fn empty_page_yields_empty_record() {
        let extraction = extract("<html><body><p>점검 중입니다</p></body></html>");
        assert!(extraction.record.is_empty());
        assert!(extraction.information.is_empty());
    }
}
