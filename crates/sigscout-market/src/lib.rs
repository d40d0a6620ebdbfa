//! External market collector for sigscout.
//!
//! Gathers news search results, video search results, and syndication feed
//! articles for a topic, concurrently across sub-sources. Providers without
//! configured credentials are replaced by deterministic simulated
//! generators; individual sub-source failures degrade that sub-source to
//! zero items without failing the collector.

pub mod client;
pub mod collector;
pub mod error;
pub mod feeds;
pub mod simulated;

pub use client::{NewsSearchClient, VideoSearchClient};
pub use collector::MarketCollector;
pub use error::MarketError;
