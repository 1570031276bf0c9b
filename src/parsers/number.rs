use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d[\d,]*(?:\.\d+)?")
        .expect("Invalid number regex")
});

// "21yo", "21 y.o.", "21yrs"
static AGE_PRIMARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,3})\s*(?:yo|y\.o\.?|yrs?)(?:\b|\s|$)")
        .expect("Invalid age regex")
});

// "18 Year Old", "12 Years"
static AGE_SECONDARY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,3})\s*-?\s*years?\b")
        .expect("Invalid age regex")
});

static LITRE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(?:l|ltr|liter|litre|리터)\s*$")
        .expect("Invalid litre regex")
});

const UNIT_SUFFIXES: &[&str] = &["원", "krw", "ml", "%", "도", "개", "건", "명", "ℓ"];

/// Parse a decimal out of noisy text: thousands separators, currency and unit markers are ignored.
///
/// Returns `None` when nothing numeric is present or the value is negative or not finite.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let mut cleaned = text.trim().to_lowercase();
    if cleaned.is_empty() {
        return None;
    }

    cleaned = cleaned.trim_start_matches(['₩', '$', '약', '~']).trim().to_string();
    for suffix in UNIT_SUFFIXES {
        if let Some(stripped) = cleaned.strip_suffix(suffix) {
            cleaned = stripped.trim_end().to_string();
            break;
        }
    }

    let direct = cleaned.replace(',', "").parse::<f64>().ok();
    let value = match direct {
        Some(v) => v,
        None => {
            let token = NUMBER_REGEX.find(&cleaned)?;
            token.as_str().replace(',', "").parse::<f64>().ok()?
        }
    };

    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Whole-number variant of [`parse_decimal`]; fractional values are rounded.
pub fn parse_integer(text: &str) -> Option<u64> {
    let value = parse_decimal(text)?;
    if value > u64::MAX as f64 {
        return None;
    }
    Some(value.round() as u64)
}

/// "1,234,000원" -> 1234000
pub fn parse_price(text: &str) -> Option<u64> {
    parse_integer(text)
}

/// Volume in millilitres. Litre amounts are scaled.
pub fn parse_volume_ml(text: &str) -> Option<u32> {
    if let Some(caps) = LITRE_REGEX.captures(text) {
        let litres = caps.get(1)?.as_str().parse::<f64>().ok()?;
        return to_u32((litres * 1000.0).round());
    }
    to_u32(parse_decimal(text)?.round())
}

/// Alcohol by volume in percent, 0 to 100.
pub fn parse_abv(text: &str) -> Option<f64> {
    parse_decimal(text).filter(|v| *v <= 100.0)
}

/// Review score on either a 5 or 10 point scale.
pub fn parse_rating(text: &str) -> Option<f64> {
    parse_decimal(text).filter(|v| *v <= 10.0)
}

pub fn parse_count(text: &str) -> Option<u32> {
    parse_integer(text).and_then(|v| u32::try_from(v).ok())
}

/// Age statement from the English name, e.g. "Macallan 21yo" -> 21.
pub fn parse_age(english_name: &str) -> Option<u32> {
    let caps = AGE_PRIMARY_REGEX
        .captures(english_name)
        .or_else(|| AGE_SECONDARY_REGEX.captures(english_name))?;
    caps.get(1)?.as_str().parse::<u32>().ok().filter(|age| *age <= 100)
}

/// Age from a labelled value such as "12년" or "12 years".
pub fn parse_age_value(text: &str) -> Option<u32> {
    parse_age(text).or_else(|| {
        let value = parse_integer(text.trim_end_matches('년').trim_end_matches("숙성"))?;
        u32::try_from(value).ok().filter(|age| *age <= 100)
    })
}

/// Brand portion of the English name: the text before the age statement,
/// or before the first number when there is none.
pub fn derive_brand(english_name: &str) -> Option<String> {
    let cut = AGE_PRIMARY_REGEX
        .find(english_name)
        .or_else(|| AGE_SECONDARY_REGEX.find(english_name))
        .or_else(|| NUMBER_REGEX.find(english_name))
        .map(|m| m.start())?;

    let brand = english_name[..cut]
        .trim()
        .trim_end_matches(|c: char| c == '-' || c == ',' || c == '(' || c.is_whitespace())
        .to_string();

    (!brand.is_empty()).then_some(brand)
}

fn to_u32(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0 && value <= u32::MAX as f64).then_some(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prices_with_separators_and_currency() {
        assert_eq!(parse_price("1,234,000원"), Some(1_234_000));
        assert_eq!(parse_price("150,000"), Some(150_000));
        assert_eq!(parse_price("₩ 89,000"), Some(89_000));
        assert_eq!(parse_price("가격 문의"), None);
    }

    #[test]
    fn parses_abv_and_rejects_out_of_range() {
        assert_eq!(parse_abv("43.0%"), Some(43.0));
        assert_eq!(parse_abv("46 %"), Some(46.0));
        assert_eq!(parse_abv("40도"), Some(40.0));
        assert_eq!(parse_abv("140%"), None);
        assert_eq!(parse_abv("N/A"), None);
    }

    #[test]
    fn unparsable_text_is_absent_not_zero() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("없음"), None);
        assert_eq!(parse_decimal("0"), Some(0.0));
        assert_eq!(parse_decimal("-5"), None);
    }

    #[test]
    fn parses_volume_in_ml_and_litres() {
        assert_eq!(parse_volume_ml("700ml"), Some(700));
        assert_eq!(parse_volume_ml("750 mL"), Some(750));
        assert_eq!(parse_volume_ml("1L"), Some(1000));
        assert_eq!(parse_volume_ml("1.75 리터"), Some(1750));
        assert_eq!(parse_volume_ml("용량 미표기"), None);
    }

    #[test]
    fn ratings_and_counts() {
        assert_eq!(parse_rating("4.5"), Some(4.5));
        assert_eq!(parse_rating("8.7"), Some(8.7));
        assert_eq!(parse_rating("42"), None);
        assert_eq!(parse_count("1,234개"), Some(1234));
        assert_eq!(parse_count("리뷰"), None);
    }

    #[test]
    fn age_from_primary_and_secondary_markers() {
        assert_eq!(parse_age("Macallan 21yo"), Some(21));
        assert_eq!(parse_age("Glen Something 18 Year Old"), Some(18));
        assert_eq!(parse_age("Lagavulin 16 Years"), Some(16));
        assert_eq!(parse_age("Ardbeg Uigeadail"), None);
        assert_eq!(parse_age_value("12년"), Some(12));
    }

    #[test]
    fn brand_is_text_before_age_or_number() {
        assert_eq!(derive_brand("Macallan 21yo").as_deref(), Some("Macallan"));
        assert_eq!(
            derive_brand("Glen Something 18 Year Old").as_deref(),
            Some("Glen Something")
        );
        assert_eq!(derive_brand("Glenfiddich 1990 Vintage").as_deref(), Some("Glenfiddich"));
        assert_eq!(derive_brand("Ardbeg Uigeadail"), None);
    }
}
