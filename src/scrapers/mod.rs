use scraper::{Html, Selector};
use tracing::{debug, error};

use crate::error::{ExtractError, Result};
use crate::models::{DebugInfo, LabelValuePair, NormalizedRecord, RawPage};

pub mod assemble;
pub mod html;
pub mod locator;
pub mod shape;

pub use assemble::{merge, normalize, MergedRecord};
pub use html::{extract_html, HtmlExtraction};
pub use locator::{locate, LocatedBlob, Recognizer};
pub use shape::{extract_structured, resolve, Resolved, StructuredExtraction};

/// Parse a built-in CSS selector.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ExtractError::Selector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Attach `debugInfo` to the returned record.
    pub include_debug: bool,
}

/// Everything one extraction produced, before the debug payload is dropped.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub blob: Option<LocatedBlob>,
    pub probe: Option<&'static str>,
    pub structured: StructuredExtraction,
    pub html: HtmlExtraction,
    pub merged: MergedRecord,
}

impl Extraction {
    /// Run every stage over a parsed page.
    pub fn run(document: &Html) -> Result<Self> {
        let blob = locate(document)?;
        let resolved = blob.as_ref().and_then(|b| resolve(&b.value));
        let probe = resolved.map(|r| r.probe);
        let structured = extract_structured(resolved);
        let html = extract_html(document)?;
        let merged = merge(&structured.record, &html.record);

        Ok(Self { blob, probe, structured, html, merged })
    }

    /// Label-value pairs preferring the structured rows.
    fn information(&self) -> Vec<LabelValuePair> {
        prefer_structured(&self.structured.information, &self.html.information)
    }

    fn tasting_notes(&self) -> Vec<LabelValuePair> {
        prefer_structured(&self.structured.tasting_notes, &self.html.tasting_notes)
    }

    pub fn debug_info(&self, raw_html: &str) -> DebugInfo {
        DebugInfo {
            structured_data: self.blob.as_ref().map(|b| b.value.clone()),
            information: self.information(),
            tasting_notes: self.tasting_notes(),
            raw_html: raw_html.to_string(),
            field_sources: if self.merged.used_html() {
                self.merged.sources.clone()
            } else {
                Default::default()
            },
        }
    }
}

fn prefer_structured(structured: &[LabelValuePair], html: &[LabelValuePair]) -> Vec<LabelValuePair> {
    if structured.is_empty() {
        html.to_vec()
    } else {
        structured.to_vec()
    }
}

/// Extract a normalized product record, or `None` when nothing usable was found.
pub fn extract(raw_html: &str, source_url: &str) -> Option<NormalizedRecord> {
    extract_with(&RawPage::new(raw_html, source_url), &ExtractOptions::default())
}

pub fn extract_with(page: &RawPage, options: &ExtractOptions) -> Option<NormalizedRecord> {
    if page.html.trim().is_empty() {
        debug!("Empty page for {}", page.url);
        return None;
    }

    let document = Html::parse_document(&page.html);
    let extraction = match Extraction::run(&document) {
        Ok(extraction) => extraction,
        Err(e) => {
            error!("Extraction failed for {}: {}", page.url, e);
            return None;
        }
    };

    let mut record = normalize(&extraction.merged, &page.url)?;
    if options.include_debug {
        record.debug_info = Some(extraction.debug_info(&page.html));
    }
    Some(record)
}
