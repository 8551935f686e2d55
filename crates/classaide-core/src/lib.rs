//! classaide-core: Fluency scoring, reading sessions, and classroom tools.
//!
//! This crate defines the data model, the reading-fluency scorer, the
//! speech capability traits, localization, and the provider-facing
//! assistant that the rest of classaide builds on.

pub mod assistant;
pub mod community;
pub mod error;
pub mod fluency;
pub mod i18n;
pub mod image;
pub mod model;
pub mod parser;
pub mod prompts;
pub mod report;
pub mod session;
pub mod speech;
pub mod statistics;
pub mod traits;

pub use fluency::{score, AssessmentResult, FluencyScorer, ScorerConfig};
