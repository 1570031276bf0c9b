pub mod http;
pub mod logging;
pub mod source;

pub use http::{create_client, fetch_with_retry};
pub use logging::init_tracing;
pub use source::{source_for, FileSource, HttpSource, PageSource};
