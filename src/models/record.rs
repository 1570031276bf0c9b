use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::LabelValuePair;

/// Canonical output fields, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    EnglishName,
    KoreanName,
    Brand,
    #[serde(rename = "type")]
    Kind,
    Age,
    Volume,
    Abv,
    Country,
    Region,
    Cask,
    Price,
    Aroma,
    Taste,
    Finish,
    Description,
    ImageUrl,
    ReviewRate,
    ReviewCount,
}

impl Field {
    pub const ALL: [Field; 18] = [
        Field::EnglishName,
        Field::KoreanName,
        Field::Brand,
        Field::Kind,
        Field::Age,
        Field::Volume,
        Field::Abv,
        Field::Country,
        Field::Region,
        Field::Cask,
        Field::Price,
        Field::Aroma,
        Field::Taste,
        Field::Finish,
        Field::Description,
        Field::ImageUrl,
        Field::ReviewRate,
        Field::ReviewCount,
    ];

    /// Fields whose raw text must parse as a number to count as present.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Field::Age
                | Field::Volume
                | Field::Abv
                | Field::Price
                | Field::ReviewRate
                | Field::ReviewCount
        )
    }

    pub fn key(self) -> &'static str {
        match self {
            Field::EnglishName => "englishName",
            Field::KoreanName => "koreanName",
            Field::Brand => "brand",
            Field::Kind => "type",
            Field::Age => "age",
            Field::Volume => "volume",
            Field::Abv => "abv",
            Field::Country => "country",
            Field::Region => "region",
            Field::Cask => "cask",
            Field::Price => "price",
            Field::Aroma => "aroma",
            Field::Taste => "taste",
            Field::Finish => "finish",
            Field::Description => "description",
            Field::ImageUrl => "imageUrl",
            Field::ReviewRate => "reviewRate",
            Field::ReviewCount => "reviewCount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which extraction path supplied a merged field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Structured,
    Html,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Structured => write!(f, "structured"),
            Source::Html => write!(f, "html"),
        }
    }
}

/// Single-source draft of the output record. Values are raw text, normalized after the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecord {
    pub english_name: Option<String>,
    pub korean_name: Option<String>,
    pub brand: Option<String>,
    pub kind: Option<String>,
    pub age: Option<String>,
    pub volume: Option<String>,
    pub abv: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub cask: Option<String>,
    pub price: Option<String>,
    pub aroma: Option<String>,
    pub taste: Option<String>,
    pub finish: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub review_rate: Option<String>,
    pub review_count: Option<String>,
}

impl PartialRecord {
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::EnglishName => &self.english_name,
            Field::KoreanName => &self.korean_name,
            Field::Brand => &self.brand,
            Field::Kind => &self.kind,
            Field::Age => &self.age,
            Field::Volume => &self.volume,
            Field::Abv => &self.abv,
            Field::Country => &self.country,
            Field::Region => &self.region,
            Field::Cask => &self.cask,
            Field::Price => &self.price,
            Field::Aroma => &self.aroma,
            Field::Taste => &self.taste,
            Field::Finish => &self.finish,
            Field::Description => &self.description,
            Field::ImageUrl => &self.image_url,
            Field::ReviewRate => &self.review_rate,
            Field::ReviewCount => &self.review_count,
        };
        value.as_deref()
    }

    /// Builds a record from `(field, value)` pairs; later pairs for the same field are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Field, String)>,
    {
        let mut record = PartialRecord::default();
        for (field, value) in pairs {
            let slot = match field {
                Field::EnglishName => &mut record.english_name,
                Field::KoreanName => &mut record.korean_name,
                Field::Brand => &mut record.brand,
                Field::Kind => &mut record.kind,
                Field::Age => &mut record.age,
                Field::Volume => &mut record.volume,
                Field::Abv => &mut record.abv,
                Field::Country => &mut record.country,
                Field::Region => &mut record.region,
                Field::Cask => &mut record.cask,
                Field::Price => &mut record.price,
                Field::Aroma => &mut record.aroma,
                Field::Taste => &mut record.taste,
                Field::Finish => &mut record.finish,
                Field::Description => &mut record.description,
                Field::ImageUrl => &mut record.image_url,
                Field::ReviewRate => &mut record.review_rate,
                Field::ReviewCount => &mut record.review_count,
            };
            if slot.is_none() && !value.trim().is_empty() {
                *slot = Some(value);
            }
        }
        record
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// Diagnostic payload attached on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// The located structured-data blob, `null` when none was found.
    pub structured_data: Option<Value>,
    pub information: Vec<LabelValuePair>,
    pub tasting_notes: Vec<LabelValuePair>,
    pub raw_html: String,
    /// Per-field provenance; empty unless the HTML path supplied something.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_sources: BTreeMap<Field, Source>,
}

/// The public, fully typed product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub english_name: Option<String>,
    pub korean_name: Option<String>,
    pub brand: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub age: Option<u32>,
    /// Millilitres.
    pub volume: Option<u32>,
    /// Percent alcohol by volume.
    pub abv: Option<f64>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub cask: Option<String>,
    /// Korean won.
    pub price: Option<u64>,
    pub aroma: Option<String>,
    pub taste: Option<String>,
    pub finish: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub review_rate: Option<f64>,
    pub review_count: Option<u32>,
    pub ref_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<DebugInfo>,
}

impl NormalizedRecord {
    /// True when no canonical field carries a value.
    pub fn is_blank(&self) -> bool {
        self.english_name.is_none()
            && self.korean_name.is_none()
            && self.brand.is_none()
            && self.kind.is_none()
            && self.age.is_none()
            && self.volume.is_none()
            && self.abv.is_none()
            && self.country.is_none()
            && self.region.is_none()
            && self.cask.is_none()
            && self.price.is_none()
            && self.aroma.is_none()
            && self.taste.is_none()
            && self.finish.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.review_rate.is_none()
            && self.review_count.is_none()
    }

    /// Display name preferring the Korean title.
    pub fn title(&self) -> &str {
        self.korean_name
            .as_deref()
            .or(self.english_name.as_deref())
            .unwrap_or(&self.ref_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_keeps_first_non_empty_value() {
        let record = PartialRecord::from_pairs(vec![
            (Field::Price, "  ".to_string()),
            (Field::Price, "150,000".to_string()),
            (Field::Price, "99,000".to_string()),
        ]);
        assert_eq!(record.get(Field::Price), Some("150,000"));
        assert!(!record.is_empty());
    }

    #[test]
    fn field_keys_match_serialized_names() {
        let json = serde_json::to_value(Field::Kind).unwrap();
        assert_eq!(json, Value::String("type".into()));
        let json = serde_json::to_value(Field::ReviewCount).unwrap();
        assert_eq!(json, Value::String(Field::ReviewCount.key().into()));
    }

    #[test]
    fn only_numeric_fields_are_flagged() {
        let numeric: Vec<_> = Field::ALL.iter().filter(|f| f.is_numeric()).collect();
        assert_eq!(numeric.len(), 6);
        assert!(!Field::Description.is_numeric());
    }
}
