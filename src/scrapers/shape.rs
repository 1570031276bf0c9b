use serde_json::Value;
use tracing::debug;

use crate::models::{
    Field, LabelValuePair, PartialRecord, LABEL_ABV, LABEL_AGE, LABEL_AROMA, LABEL_BRAND,
    LABEL_CASK, LABEL_COUNTRY, LABEL_FINISH, LABEL_REGION, LABEL_TASTE, LABEL_TYPE, LABEL_VOLUME,
};
use crate::parsers::{build_remarks_description, clean_rich_text, clean_text, LabelIndex, Remark};

/// Keys at least one of which a product object carries.
const PRODUCT_KEYS: &[&str] = &["name", "price", "information", "tasting_notes", "tastingNotes", "en_name"];

/// Keys under which a bag may wrap the product.
const WRAPPER_KEYS: &[&str] = &["item", "product", "data"];

const INFORMATION_KEYS: &[&str] = &["information", "informations", "info", "attributes", "specs"];
const TASTING_KEYS: &[&str] = &["tasting_notes", "tastingNotes", "tasting_note", "tastingNote"];
const REMARK_KEYS: &[&str] = &["remarks", "descriptions", "description_sections"];

/// One way of reaching the product object inside a blob.
#[derive(Clone, Copy)]
pub struct Probe {
    pub name: &'static str,
    pub find: fn(&Value) -> Option<&Value>,
}

/// Probe order observed across page variants; the first product-like hit wins.
pub const PROBES: [Probe; 7] = [
    Probe { name: "next_dehydrated_queries", find: probe_next_dehydrated_queries },
    Probe { name: "dehydrated_queries", find: probe_dehydrated_queries },
    Probe { name: "next_page_props", find: probe_next_page_props },
    Probe { name: "page_props", find: probe_page_props },
    Probe { name: "direct_wrapper", find: probe_direct_wrapper },
    Probe { name: "json_ld_graph", find: probe_json_ld_graph },
    Probe { name: "self_object", find: probe_self_object },
];

/// The product object and the probe that reached it.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub probe: &'static str,
    pub product: &'a Value,
}

/// What the embedded data contributes to the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredExtraction {
    pub record: PartialRecord,
    pub information: Vec<LabelValuePair>,
    pub tasting_notes: Vec<LabelValuePair>,
}

pub fn resolve(blob: &Value) -> Option<Resolved<'_>> {
    PROBES.iter().find_map(|probe| {
        let product = (probe.find)(blob)?;
        debug!("Shape resolved by probe {}", probe.name);
        Some(Resolved { probe: probe.name, product })
    })
}

/// Map a resolved product object to a partial record.
pub fn extract_structured(resolved: Option<Resolved<'_>>) -> StructuredExtraction {
    match resolved {
        Some(resolved) => from_product(resolved.product),
        None => StructuredExtraction::default(),
    }
}

pub fn is_product_like(value: &Value) -> bool {
    value
        .as_object()
        .map(|obj| PRODUCT_KEYS.iter().any(|k| obj.contains_key(*k)))
        .unwrap_or(false)
}

/// The product itself, or the product wrapped one level down.
fn unwrap_product(value: &Value) -> Option<&Value> {
    WRAPPER_KEYS
        .iter()
        .filter_map(|k| value.get(*k))
        .find(|inner| is_product_like(inner))
        .or_else(|| is_product_like(value).then_some(value))
}

fn from_queries(queries: Option<&Value>) -> Option<&Value> {
    queries?
        .as_array()?
        .iter()
        .filter_map(|query| query.pointer("/state/data"))
        .find_map(unwrap_product)
}

fn probe_next_dehydrated_queries(blob: &Value) -> Option<&Value> {
    from_queries(blob.pointer("/props/pageProps/dehydratedState/queries"))
}

fn probe_dehydrated_queries(blob: &Value) -> Option<&Value> {
    from_queries(blob.get("queries"))
        .or_else(|| from_queries(blob.pointer("/dehydratedState/queries")))
        .or_else(|| from_queries(blob.pointer("/pageProps/dehydratedState/queries")))
}

fn probe_next_page_props(blob: &Value) -> Option<&Value> {
    unwrap_product(blob.pointer("/props/pageProps")?)
}

fn probe_page_props(blob: &Value) -> Option<&Value> {
    unwrap_product(blob.get("pageProps")?)
}

fn probe_direct_wrapper(blob: &Value) -> Option<&Value> {
    WRAPPER_KEYS
        .iter()
        .filter_map(|k| blob.get(*k))
        .find(|inner| is_product_like(inner))
}

fn probe_json_ld_graph(blob: &Value) -> Option<&Value> {
    blob.get("@graph")?.as_array()?.iter().find(|node| {
        match node.get("@type") {
            Some(Value::String(t)) => t == "Product",
            Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Product")),
            _ => false,
        }
    })
}

fn probe_self_object(blob: &Value) -> Option<&Value> {
    is_product_like(blob).then_some(blob)
}

fn from_product(product: &Value) -> StructuredExtraction {
    let information = pairs_under(product, INFORMATION_KEYS);
    let tasting_notes = pairs_under(product, TASTING_KEYS);
    let info = LabelIndex::new(&information);
    let notes = LabelIndex::new(&tasting_notes);

    let text = |keys: &[&str]| first_text(product, keys);
    let info_or = |keys: &[&str], labels: &[&str]| {
        text(keys).or_else(|| info.resolve(labels).map(clean_text))
    };
    let note_or = |keys: &[&str], labels: &[&str]| {
        text(keys).or_else(|| notes.resolve(labels).map(clean_text))
    };

    let fields = [
        (Field::KoreanName, text(&["name", "korean_name", "koreanName", "name_ko", "kr_name"])),
        (
            Field::EnglishName,
            text(&["en_name", "english_name", "englishName", "name_en", "enName", "sub_name", "subName", "alternateName"]),
        ),
        (Field::Brand, info_or(&["brand", "brand_name", "brandName", "distillery"], LABEL_BRAND)),
        (Field::Kind, info_or(&["category", "category_name", "categoryName", "type", "kind"], LABEL_TYPE)),
        (Field::Age, info_or(&["age", "aged"], LABEL_AGE)),
        (Field::Volume, info_or(&["volume", "capacity"], LABEL_VOLUME)),
        (Field::Abv, info_or(&["abv", "alcohol", "alcohol_degree", "degree"], LABEL_ABV)),
        (Field::Country, info_or(&["country", "origin"], LABEL_COUNTRY)),
        (Field::Region, info_or(&["region"], LABEL_REGION)),
        (Field::Cask, info_or(&["cask", "cask_type"], LABEL_CASK)),
        (Field::Price, text(&["price", "sale_price", "salePrice", "final_price", "original_price"]).or_else(|| offer_price(product))),
        (Field::Aroma, note_or(&["aroma", "nose"], LABEL_AROMA)),
        (Field::Taste, note_or(&["taste", "palate"], LABEL_TASTE)),
        (Field::Finish, note_or(&["finish"], LABEL_FINISH)),
        (Field::Description, description(product)),
        (
            Field::ImageUrl,
            text(&["image_url", "imageUrl", "thumbnail", "thumbnail_url", "image", "images"]),
        ),
        (
            Field::ReviewRate,
            text(&["review_rate", "reviewRate", "rating", "average_rating", "averageRating"])
                .or_else(|| first_text_at(product, "/aggregateRating/ratingValue")),
        ),
        (
            Field::ReviewCount,
            text(&["review_count", "reviewCount", "reviews_count", "rating_count"])
                .or_else(|| first_text_at(product, "/aggregateRating/reviewCount"))
                .or_else(|| first_text_at(product, "/aggregateRating/ratingCount")),
        ),
    ];

    let record = PartialRecord::from_pairs(
        fields
            .into_iter()
            .filter_map(|(field, value)| value.map(|v| (field, v))),
    );

    debug!(
        "Structured product: {} information rows, {} tasting rows",
        information.len(),
        tasting_notes.len()
    );

    StructuredExtraction {
        record,
        information,
        tasting_notes,
    }
}

fn description(product: &Value) -> Option<String> {
    let remarks: Vec<Remark> = REMARK_KEYS
        .iter()
        .filter_map(|k| product.get(*k)?.as_array())
        .flatten()
        .filter_map(|remark| {
            Some(Remark {
                title: first_text(remark, &["title", "label", "name"]).unwrap_or_default(),
                body: raw_text(remark, &["content", "body", "description", "text", "value"])?,
            })
        })
        .collect();

    build_remarks_description(&remarks).or_else(|| {
        let raw = raw_text(product, &["description", "content", "detail", "detail_html"])?;
        let cleaned = clean_rich_text(&raw);
        (!cleaned.is_empty()).then_some(cleaned)
    })
}

fn offer_price(product: &Value) -> Option<String> {
    match product.get("offers")? {
        Value::Array(offers) => offers.iter().find_map(|o| first_text(o, &["price", "lowPrice"])),
        offer => first_text(offer, &["price", "lowPrice"]),
    }
}

/// Label-value rows under the first of `keys` holding an array or a map.
fn pairs_under(product: &Value, keys: &[&str]) -> Vec<LabelValuePair> {
    keys.iter()
        .filter_map(|k| product.get(*k))
        .map(to_pairs)
        .find(|pairs| !pairs.is_empty())
        .unwrap_or_default()
}

fn to_pairs(value: &Value) -> Vec<LabelValuePair> {
    match value {
        Value::Array(rows) => rows
            .iter()
            .filter_map(|row| {
                let label = first_text(row, &["label", "name", "title", "key"])?;
                let value = first_text(row, &["value", "content", "text", "description"])?;
                let alt = first_text(row, &["label_alt", "labelAlt", "label_en", "labelEn", "en_label"]);
                Some(LabelValuePair {
                    label,
                    label_alt: alt,
                    value,
                })
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(label, v)| Some(LabelValuePair::new(label.clone(), scalar_text(v)?)))
            .collect(),
        _ => Vec::new(),
    }
}

fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k))
        .find_map(scalar_text)
}

fn first_text_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(scalar_text)
}

/// Like `first_text` but keeps markup and line breaks.
fn raw_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k)?.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Text form of a scalar; objects yield their `name`/`url`/`value`, arrays their first item.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let cleaned = clean_text(s);
            (!cleaned.is_empty()).then_some(cleaned)
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(scalar_text),
        Value::Object(_) => first_text(value, &["name", "url", "value", "label"]),
        Value::Bool(_) | Value::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn probes_queries_state_data() {
        let blob = json!({
            "props": {"pageProps": {"dehydratedState": {"queries": [
                {"state": {"data": {"banners": []}}},
                {"state": {"data": {"item": {"name": "발베니 12년", "price": 130000}}}}
            ]}}}
        });
        let resolved = resolve(&blob).unwrap();
        assert_eq!(resolved.probe, "next_dehydrated_queries");
        assert_eq!(resolved.product["name"], json!("발베니 12년"));
    }

    #[test]
    fn probes_page_props_wrapper() {
        let blob = json!({"pageProps": {"product": {"name": "Ardbeg 10"}}});
        let resolved = resolve(&blob).unwrap();
        assert_eq!(resolved.probe, "page_props");
        assert_eq!(resolved.product["name"], json!("Ardbeg 10"));
    }

    #[test]
    fn probes_direct_wrapper_before_self() {
        let blob = json!({"name": "page", "item": {"name": "글렌피딕 12년"}});
        let resolved = resolve(&blob).unwrap();
        assert_eq!(resolved.probe, "direct_wrapper");
    }

    #[test]
    fn probes_json_ld_graph() {
        let blob = json!({"@graph": [{"@type": "WebPage"}, {"@type": ["Product"], "name": "Talisker"}]});
        assert_eq!(resolve(&blob).unwrap().probe, "json_ld_graph");
    }

    #[test]
    fn wrong_types_are_not_found() {
        assert!(resolve(&json!({"queries": "nope", "pageProps": 3, "item": []})).is_none());
        assert!(resolve(&json!([1, 2])).is_none());
        assert_eq!(extract_structured(None), StructuredExtraction::default());
    }

    #[test]
    fn maps_information_and_tasting_rows() {
        let blob = json!({"item": {
            "name": "글렌피딕 12년",
            "en_name": "Glenfiddich 12yo",
            "price": "150,000",
            "information": [
                {"label": "용량", "value": "700ml"},
                {"label": "도수", "label_alt": "ABV", "value": "40%"},
                {"label": "지역", "value": "스페이사이드"}
            ],
            "tasting_notes": [
                {"label": "향", "label_alt": "Aroma", "value": "배, 꿀"},
                {"label": "Finish", "value": "긴 여운"}
            ]
        }});
        let extraction = extract_structured(resolve(&blob));
        let record = &extraction.record;
        assert_eq!(record.korean_name.as_deref(), Some("글렌피딕 12년"));
        assert_eq!(record.english_name.as_deref(), Some("Glenfiddich 12yo"));
        assert_eq!(record.price.as_deref(), Some("150,000"));
        assert_eq!(record.volume.as_deref(), Some("700ml"));
        assert_eq!(record.abv.as_deref(), Some("40%"));
        assert_eq!(record.region.as_deref(), Some("스페이사이드"));
        assert_eq!(record.aroma.as_deref(), Some("배, 꿀"));
        assert_eq!(record.finish.as_deref(), Some("긴 여운"));
        assert_eq!(extraction.information.len(), 3);
        assert_eq!(extraction.tasting_notes.len(), 2);
    }

    #[test]
    fn remarks_build_description() {
        let blob = json!({"product": {
            "name": "라가불린 16년",
            "description": "<p>ignored</p>",
            "remarks": [
                {"title": "특징", "content": "<p>피트<img src='x.png'></p>"},
                {"title": "페어링", "content": "<p>훈제 연어</p>"}
            ]
        }});
        let record = extract_structured(resolve(&blob)).record;
        assert_eq!(
            record.description.as_deref(),
            Some("<strong>특징</strong>\n<p>피트</p>\n\n<strong>페어링</strong>\n<p>훈제 연어</p>")
        );
    }

    #[test]
    fn json_ld_offers_and_rating() {
        let blob = json!({
            "@type": "Product",
            "name": "Lagavulin 16",
            "brand": {"@type": "Brand", "name": "Lagavulin"},
            "image": ["https://img.example/l16.jpg"],
            "offers": {"@type": "Offer", "price": "129000"},
            "aggregateRating": {"ratingValue": 4.6, "reviewCount": 212}
        });
        let record = extract_structured(resolve(&blob)).record;
        assert_eq!(record.brand.as_deref(), Some("Lagavulin"));
        assert_eq!(record.price.as_deref(), Some("129000"));
        assert_eq!(record.image_url.as_deref(), Some("https://img.example/l16.jpg"));
        assert_eq!(record.review_rate.as_deref(), Some("4.6"));
        assert_eq!(record.review_count.as_deref(), Some("212"));
    }
}
