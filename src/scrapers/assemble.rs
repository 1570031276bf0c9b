use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{Field, NormalizedRecord, PartialRecord, Source};
use crate::parsers::{
    clean_rich_text, derive_brand, infer_country, non_empty, parse_abv, parse_age,
    parse_age_value, parse_count, parse_price, parse_rating, parse_volume_ml, translate_category,
    translate_country, translate_region,
};

/// Both partial records merged field by field, with the source of every kept value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedRecord {
    pub values: BTreeMap<Field, String>,
    pub sources: BTreeMap<Field, Source>,
}

impl MergedRecord {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn used_html(&self) -> bool {
        self.sources.values().any(|s| *s == Source::Html)
    }
}

/// Structured data wins whenever its value is usable; the markup fills the gaps.
pub fn merge(structured: &PartialRecord, html: &PartialRecord) -> MergedRecord {
    let mut merged = MergedRecord::default();
    for field in Field::ALL {
        let picked = [(Source::Structured, structured), (Source::Html, html)]
            .into_iter()
            .find_map(|(source, record)| {
                let value = record.get(field)?;
                is_usable(field, value).then(|| (source, value.trim().to_string()))
            });
        if let Some((source, value)) = picked {
            merged.values.insert(field, value);
            merged.sources.insert(field, source);
        }
    }
    merged
}

/// Non-empty, and for numeric fields, parsable.
fn is_usable(field: Field, value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && (!field.is_numeric() || parses_as_number(field, value))
}

fn parses_as_number(field: Field, value: &str) -> bool {
    match field {
        Field::Age => parse_age_value(value).is_some(),
        Field::Volume => parse_volume_ml(value).is_some(),
        Field::Abv => parse_abv(value).is_some(),
        Field::Price => parse_price(value).is_some(),
        Field::ReviewRate => parse_rating(value).is_some(),
        Field::ReviewCount => parse_count(value).is_some(),
        _ => false,
    }
}

/// Typed record from merged values, or `None` when nothing resolved.
pub fn normalize(merged: &MergedRecord, ref_url: &str) -> Option<NormalizedRecord> {
    let text = |field: Field| merged.get(field).and_then(non_empty);

    let english_name = text(Field::EnglishName);

    // derived from the merged English name first, so brand and age agree with it
    let brand = english_name
        .as_deref()
        .and_then(derive_brand)
        .or_else(|| text(Field::Brand));
    let age = english_name
        .as_deref()
        .and_then(parse_age)
        .or_else(|| merged.get(Field::Age).and_then(parse_age_value));

    let region = text(Field::Region).map(|r| translate_region(&r));
    let country = text(Field::Country)
        .map(|c| translate_country(&c))
        .or_else(|| region.as_deref().and_then(infer_country).map(str::to_string));

    let record = NormalizedRecord {
        english_name,
        korean_name: text(Field::KoreanName),
        brand,
        kind: text(Field::Kind).map(|k| translate_category(&k)),
        age,
        volume: merged.get(Field::Volume).and_then(parse_volume_ml),
        abv: merged.get(Field::Abv).and_then(parse_abv),
        country,
        region,
        cask: text(Field::Cask),
        price: merged.get(Field::Price).and_then(parse_price),
        aroma: text(Field::Aroma),
        taste: text(Field::Taste),
        finish: text(Field::Finish),
        description: merged
            .get(Field::Description)
            .map(clean_rich_text)
            .filter(|d| !d.is_empty()),
        image_url: text(Field::ImageUrl),
        review_rate: merged.get(Field::ReviewRate).and_then(parse_rating),
        review_count: merged.get(Field::ReviewCount).and_then(parse_count),
        ref_url: ref_url.to_string(),
        debug_info: None,
    };

    if record.is_blank() {
        debug!("Every field absent after merge for {}", ref_url);
        return None;
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_value_wins_on_conflict() {
        let structured = PartialRecord { korean_name: Some("A".into()), ..Default::default() };
        let html = PartialRecord {
            korean_name: Some("B".into()),
            cask: Some("Sherry".into()),
            ..Default::default()
        };
        let merged = merge(&structured, &html);
        assert_eq!(merged.get(Field::KoreanName), Some("A"));
        assert_eq!(merged.sources[&Field::KoreanName], Source::Structured);
        assert_eq!(merged.get(Field::Cask), Some("Sherry"));
        assert_eq!(merged.sources[&Field::Cask], Source::Html);
        assert!(merged.used_html());
    }

    #[test]
    fn unparsable_structured_number_falls_back_to_html() {
        let structured = PartialRecord { price: Some("가격 문의".into()), ..Default::default() };
        let html = PartialRecord { price: Some("99,000원".into()), ..Default::default() };
        let merged = merge(&structured, &html);
        assert_eq!(merged.sources[&Field::Price], Source::Html);
        assert_eq!(normalize(&merged, "u").unwrap().price, Some(99_000));
    }

    #[test]
    fn derived_fields_come_from_merged_values() {
        let structured = PartialRecord {
            region: Some("스페이사이드".into()),
            kind: Some("Type:싱글몰트".into()),
            ..Default::default()
        };
        let html = PartialRecord { english_name: Some("Macallan 21yo".into()), ..Default::default() };
        let record = normalize(&merge(&structured, &html), "https://shop.example/p/1").unwrap();
        assert_eq!(record.brand.as_deref(), Some("Macallan"));
        assert_eq!(record.age, Some(21));
        assert_eq!(record.kind.as_deref(), Some("Single Malt"));
        assert_eq!(record.region.as_deref(), Some("Speyside"));
        assert_eq!(record.country.as_deref(), Some("Scotland"));
        assert_eq!(record.ref_url, "https://shop.example/p/1");
    }

    #[test]
    fn explicit_country_is_not_overridden_by_region() {
        let structured = PartialRecord {
            region: Some("Speyside".into()),
            country: Some("영국".into()),
            ..Default::default()
        };
        let record = normalize(&merge(&structured, &PartialRecord::default()), "u").unwrap();
        assert_eq!(record.country.as_deref(), Some("United Kingdom"));
    }

    #[test]
    fn all_absent_is_no_result() {
        let merged = merge(&PartialRecord::default(), &PartialRecord::default());
        assert!(merged.values.is_empty());
        assert_eq!(normalize(&merged, "u"), None);
    }

    #[test]
    fn known_zero_is_kept() {
        let structured = PartialRecord { review_count: Some("0".into()), ..Default::default() };
        let record = normalize(&merge(&structured, &PartialRecord::default()), "u").unwrap();
        assert_eq!(record.review_count, Some(0));
        assert_eq!(record.review_rate, None);
    }
}
