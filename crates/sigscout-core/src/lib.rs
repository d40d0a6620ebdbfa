//! Canonical data model and shared logic for sigscout.
//!
//! Defines the `Signal`/`CollectorResult`/`OrchestrationReport` shapes every
//! layer consumes, the relevance scorer shared by all collectors, the
//! `Collector` capability trait, and configuration loading (env vars plus
//! the `sources.yaml` source list).

pub mod collector;
pub mod config;
pub mod relevance;
pub mod sources;
pub mod types;

mod app_config;
mod error;

pub use app_config::AppConfig;
pub use collector::{Collected, Collector, TopicQuery};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use sources::{load_sources, EndpointConfig, FeedConfig, ScanConfig, SourcesFile};
pub use types::{
    CollectorKind, CollectorResult, CollectorStatus, CrossReference, ExecutiveSummary,
    LlmSynthesis, OrchestrationReport, Priority, Reliability, Signal, SignalKind, SignalStrength,
    Synthesis,
};
