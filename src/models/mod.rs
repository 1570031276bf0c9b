pub mod page;
pub mod record;

pub use page::*;
pub use record::*;

// Label spellings observed on the source site, Korean first.
pub const LABEL_TYPE: &[&str] = &["종류", "카테고리", "Type", "Category"];
pub const LABEL_VOLUME: &[&str] = &["용량", "Volume", "Size"];
pub const LABEL_ABV: &[&str] = &["도수", "알코올", "알코올 도수", "ABV", "Alcohol"];
pub const LABEL_COUNTRY: &[&str] = &["국가", "원산지", "생산국", "Country", "Origin"];
pub const LABEL_REGION: &[&str] = &["지역", "생산지역", "Region"];
pub const LABEL_CASK: &[&str] = &["캐스크", "숙성 캐스크", "Cask"];
pub const LABEL_AGE: &[&str] = &["숙성년수", "숙성연수", "숙성", "Age"];
pub const LABEL_BRAND: &[&str] = &["브랜드", "증류소", "Brand", "Distillery"];

pub const LABEL_AROMA: &[&str] = &["향", "Aroma", "Nose"];
pub const LABEL_TASTE: &[&str] = &["맛", "Taste", "Palate"];
pub const LABEL_FINISH: &[&str] = &["여운", "피니시", "Finish"];

pub const TASTING_SECTION_TITLES: &[&str] = &["테이스팅 노트", "테이스팅노트", "Tasting Notes", "Tasting Note"];

/// Every label term, used to reject a label when searching for a value.
pub fn all_label_terms() -> impl Iterator<Item = &'static str> {
    [
        LABEL_TYPE,
        LABEL_VOLUME,
        LABEL_ABV,
        LABEL_COUNTRY,
        LABEL_REGION,
        LABEL_CASK,
        LABEL_AGE,
        LABEL_BRAND,
        LABEL_AROMA,
        LABEL_TASTE,
        LABEL_FINISH,
    ]
    .into_iter()
    .flatten()
    .copied()
}
