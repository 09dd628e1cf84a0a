//! Phone compare library - side-by-side smartphone spec comparison.
//!
//! This crate provides:
//! - Catalog records and the spec-field schema (`catalog`)
//! - Magnitude extraction, row diffing and the two-item selection (`compare`)
//! - Listing search and ordering (`filters`)
//! - The REST backend client behind trait seams (`sources`)
//! - Session and selection persistence (`session`)
//! - Sign-in, registration and profile flows (`accounts`)
//! - Catalog and user management for administrators (`admin`)
//!
//! Feature flags:
//! - `cli`: Command-line interface

pub mod accounts;
pub mod admin;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod filters;
pub mod session;
pub mod sources;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use catalog::{ProductRecord, RecordId, Segment, SpecFieldDescriptor, SPEC_FIELDS};
pub use compare::{evaluate, extract_magnitude, ComparisonView, SelectionPair};
pub use error::AppError;
