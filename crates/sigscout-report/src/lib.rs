//! Orchestration and synthesis for sigscout.
//!
//! Fans the three collectors out as spawned tasks under a retry/timeout
//! policy, settles all outcomes (partial failure is a report, not an
//! error), and builds the synthesis section, optionally enriched by a
//! text-generation call.

pub mod llm;
pub mod orchestrator;
pub mod retry;
pub mod synthesis;

mod error;

pub use error::{OrchestrateError, ReportError};
pub use llm::TextGenClient;
pub use orchestrator::Orchestrator;
pub use retry::{with_retry_and_timeout, RetryPolicy};
pub use synthesis::Synthesizer;
