//! # Termo Common Library
//!
//! Shared code for the Termo report generation services including:
//! - Submission data model (project info, object readings, raw field values)
//! - Phase delta diagnostics engine and severity classification
//! - Rendering-context assembly and template selection
//! - Collaborator traits for map rendering and document assembly
//! - Report build orchestration
//! - Configuration loading

pub mod classify;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod fields;
pub mod reading;
pub mod render;
pub mod report;
pub mod template;

pub use classify::Severity;
pub use error::{Error, Result};
