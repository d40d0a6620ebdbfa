//! Internal document collector for sigscout.
//!
//! Recursively scans configured directories for supported file types,
//! extracts searchable plain text per format, caches extractions by
//! (path, mtime), and emits one finding signal per topic-bearing sentence
//! of each relevant document.

pub mod cache;
pub mod collector;
pub mod extract;
pub mod scan;

mod error;

pub use collector::DocsCollector;
pub use error::DocsError;
pub use extract::{extract, DocumentFormat, ExtractedDoc};
