use thiserror::Error;

/// Internal invariant violations. Malformed page data is never an error;
/// it shows up as a missing field or a `None` record instead.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid built-in selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
