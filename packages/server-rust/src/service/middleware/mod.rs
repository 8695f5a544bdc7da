//! Tower middleware layers for the Reverser call pipeline.
//!
//! - [`timeout`]: Per-call deadline enforcement
//! - [`metrics`]: Call timing and counting via `tracing` spans and `metrics`
//! - [`pipeline`]: Composes all layers around the resolved Reverser

pub mod metrics;
pub mod pipeline;
pub mod timeout;

pub use metrics::MetricsLayer;
pub use pipeline::{build_reverser_pipeline, ReverserEndpoint, ReverserPipeline};
pub use timeout::TimeoutLayer;
