/*
 * Stream Analysis
 *
 * - Domain: descriptor and outcome values
 * - Application: the end-to-end analysis over one or many descriptors
 */

pub mod application;
pub mod domain;

pub use application::StreamStateAnalysis;
pub use domain::{StreamAnalysisOutcome, StreamDescriptor};
