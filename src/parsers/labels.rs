use crate::models::LabelValuePair;

/// Lookup over label-value pairs by any of several label spellings.
///
/// Matching ignores case and whitespace and checks both `label` and `label_alt`.
/// When a label repeats, the first pair wins.
#[derive(Debug, Clone, Copy)]
pub struct LabelIndex<'a> {
    pairs: &'a [LabelValuePair],
}

impl<'a> LabelIndex<'a> {
    pub fn new(pairs: &'a [LabelValuePair]) -> Self {
        Self { pairs }
    }

    /// First non-empty value whose label matches one of `candidates`.
    pub fn resolve(&self, candidates: &[&str]) -> Option<&'a str> {
        let wanted: Vec<String> = candidates.iter().map(|c| normalize_label(c)).collect();
        self.pairs
            .iter()
            .filter(|pair| !pair.value.trim().is_empty())
            .find(|pair| {
                let label = normalize_label(&pair.label);
                let alt = pair.label_alt.as_deref().map(normalize_label);
                wanted
                    .iter()
                    .any(|w| *w == label || alt.as_deref() == Some(w.as_str()))
            })
            .map(|pair| pair.value.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Lowercases and drops whitespace and trailing colons: "Volume :" == "volume".
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .trim_end_matches([':', '：'])
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when `text` is one of the labels, or a "localized canonical" pair of them.
pub fn matches_label(text: &str, labels: &[&str]) -> bool {
    let normalized = normalize_label(text);
    if normalized.is_empty() {
        return false;
    }
    if labels.iter().any(|l| normalize_label(l) == normalized) {
        return true;
    }
    // "향 Aroma", "맛 / Palate"
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == '/' || c == '(' || c == ')' || c == '|')
        .filter(|t| !t.trim().is_empty())
        .collect();
    tokens.len() > 1
        && tokens
            .iter()
            .all(|t| labels.iter().any(|l| normalize_label(l) == normalize_label(t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<LabelValuePair> {
        vec![
            LabelValuePair::new("용량", "700ml"),
            LabelValuePair::new("도수", ""),
            LabelValuePair::new("알코올", "43%").with_alt("ABV"),
            LabelValuePair::new("용량", "1000ml"),
        ]
    }

    #[test]
    fn resolves_first_match_by_any_spelling() {
        let pairs = pairs();
        let index = LabelIndex::new(&pairs);
        assert_eq!(index.resolve(&["Volume", "용량"]), Some("700ml"));
        assert_eq!(index.resolve(&["abv"]), Some("43%"));
    }

    #[test]
    fn skips_empty_values() {
        let pairs = pairs();
        let index = LabelIndex::new(&pairs);
        assert_eq!(index.resolve(&["도수", "알코올"]), Some("43%"));
        assert_eq!(index.resolve(&["국가"]), None);
    }

    #[test]
    fn label_matching_tolerates_pairs_and_colons() {
        assert!(matches_label("향 Aroma", &["향", "Aroma", "Nose"]));
        assert!(matches_label("Volume :", &["용량", "Volume"]));
        assert!(!matches_label("바닐라 향", &["향", "Aroma"]));
    }
}
