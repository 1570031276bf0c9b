//! Product-record extraction for whisky shop pages.
//!
//! Embedded structured data is preferred; the rendered markup fills the gaps.

pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod scrapers;
pub mod utils;

pub use error::{ExtractError, Result};
pub use models::{DebugInfo, Field, LabelValuePair, NormalizedRecord, PartialRecord, RawPage, Source};
pub use scrapers::{extract, extract_with, ExtractOptions};
