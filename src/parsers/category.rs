use once_cell::sync::Lazy;
use std::collections::HashMap;

static CATEGORY_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("싱글몰트", "Single Malt"),
        ("싱글 몰트", "Single Malt"),
        ("싱글몰트 위스키", "Single Malt"),
        ("블렌디드", "Blended"),
        ("블렌디드 위스키", "Blended"),
        ("블렌디드 몰트", "Blended Malt"),
        ("블렌디드몰트", "Blended Malt"),
        ("싱글 그레인", "Single Grain"),
        ("싱글그레인", "Single Grain"),
        ("그레인", "Grain"),
        ("버번", "Bourbon"),
        ("버번 위스키", "Bourbon"),
        ("라이", "Rye"),
        ("라이 위스키", "Rye"),
        ("테네시", "Tennessee"),
        ("테네시 위스키", "Tennessee"),
        ("아이리시", "Irish"),
        ("아이리쉬", "Irish"),
        ("싱글 팟 스틸", "Single Pot Still"),
        ("위스키", "Whisky"),
    ])
});

static REGION_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("스페이사이드", "Speyside"),
        ("하이랜드", "Highland"),
        ("로우랜드", "Lowland"),
        ("아일라", "Islay"),
        ("캠벨타운", "Campbeltown"),
        ("아일랜즈", "Islands"),
        ("스카이", "Skye"),
        ("오크니", "Orkney"),
        ("켄터키", "Kentucky"),
        ("테네시", "Tennessee"),
        ("홋카이도", "Hokkaido"),
        ("야마나시", "Yamanashi"),
        ("오사카", "Osaka"),
        ("이란", "Yilan"),
        ("타즈매니아", "Tasmania"),
    ])
});

static COUNTRY_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("스코틀랜드", "Scotland"),
        ("미국", "USA"),
        ("아일랜드", "Ireland"),
        ("일본", "Japan"),
        ("대만", "Taiwan"),
        ("캐나다", "Canada"),
        ("인도", "India"),
        ("호주", "Australia"),
        ("영국", "United Kingdom"),
        ("프랑스", "France"),
        ("한국", "South Korea"),
        ("대한민국", "South Korea"),
    ])
});

/// Keyed on canonical region names, so it applies after [`translate_region`].
static REGION_COUNTRY_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("speyside", "Scotland"),
        ("highland", "Scotland"),
        ("highlands", "Scotland"),
        ("lowland", "Scotland"),
        ("lowlands", "Scotland"),
        ("islay", "Scotland"),
        ("campbeltown", "Scotland"),
        ("islands", "Scotland"),
        ("skye", "Scotland"),
        ("orkney", "Scotland"),
        ("kentucky", "USA"),
        ("tennessee", "USA"),
        ("hokkaido", "Japan"),
        ("yamanashi", "Japan"),
        ("osaka", "Japan"),
        ("yilan", "Taiwan"),
        ("tasmania", "Australia"),
    ])
});

/// Picks the meaningful half of a "label:value" compound, preferring Hangul text.
pub fn split_compound(raw: &str) -> String {
    let parts: Vec<&str> = raw
        .split([':', '：', '|'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() < 2 {
        return raw.trim().to_string();
    }

    parts
        .iter()
        .rev()
        .find(|p| contains_hangul(p))
        .or(parts.last())
        .map(|p| p.to_string())
        .unwrap_or_default()
}

pub fn translate_category(raw: &str) -> String {
    let term = split_compound(raw);
    if let Some(canonical) = CATEGORY_TABLE.get(term.as_str()) {
        return canonical.to_string();
    }
    // "싱글몰트 스카치 위스키" style labels: longest known prefix wins
    CATEGORY_TABLE
        .iter()
        .filter(|(k, _)| term.starts_with(*k))
        .max_by_key(|(k, _)| k.len())
        .map(|(_, v)| v.to_string())
        .unwrap_or(term)
}

pub fn translate_region(raw: &str) -> String {
    translate(&REGION_TABLE, &split_compound(raw))
}

pub fn translate_country(raw: &str) -> String {
    translate(&COUNTRY_TABLE, &split_compound(raw))
}

/// Country implied by a canonical region name.
pub fn infer_country(region: &str) -> Option<&'static str> {
    REGION_COUNTRY_TABLE
        .get(region.trim().to_lowercase().as_str())
        .copied()
}

pub fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{3131}'..='\u{318E}'))
}

fn translate(table: &HashMap<&'static str, &'static str>, term: &str) -> String {
    let term = term.trim();
    table
        .get(term)
        .map(|canonical| canonical.to_string())
        .unwrap_or_else(|| term.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_terms() {
        assert_eq!(translate_category("싱글몰트"), "Single Malt");
        assert_eq!(translate_region("스페이사이드"), "Speyside");
        assert_eq!(translate_country("스코틀랜드"), "Scotland");
    }

    #[test]
    fn unknown_terms_pass_through() {
        assert_eq!(translate_category("Single Malt"), "Single Malt");
        assert_eq!(translate_region(" 알 수 없음 "), "알 수 없음");
    }

    #[test]
    fn compound_prefers_hangul_segment() {
        assert_eq!(split_compound("Type:싱글몰트"), "싱글몰트");
        assert_eq!(split_compound("Bourbon:버번"), "버번");
        assert_eq!(translate_category("Whisky Type:블렌디드"), "Blended");
        assert_eq!(split_compound("Single Malt"), "Single Malt");
    }

    #[test]
    fn infers_country_from_canonical_region() {
        assert_eq!(infer_country("Speyside"), Some("Scotland"));
        assert_eq!(infer_country(&translate_region("켄터키")), Some("USA"));
        assert_eq!(infer_country("Atlantis"), None);
    }

    #[test]
    fn longest_prefix_match() {
        assert_eq!(translate_category("블렌디드 몰트 스카치"), "Blended Malt");
        assert_eq!(translate_country("인도네시아"), "인도네시아");
    }
}
