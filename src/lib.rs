// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod cli;
pub mod config;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod scoring;

// ---- Re-exports for stable public API ----
pub use crate::models::{GameSnapshot, Genre, Mechanic, Metric, ScoredGame};
pub use crate::pipeline::{run, PipelineContext, RunMode, RunSummary};
pub use crate::scoring::{score_games, ScoringConfig, ScoringWeights};
