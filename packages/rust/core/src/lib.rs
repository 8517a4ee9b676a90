//! Core pipeline orchestration and domain logic for quizbook.
//!
//! This crate ties together question loading, corpus aggregation,
//! formatting, and README rewriting into the `generate` workflow.

pub mod corpus;
pub mod format;
pub mod links;
pub mod loader;
pub mod pipeline;
pub mod readme;
