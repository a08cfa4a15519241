//! Core session logic for Scribe.
//!
//! This crate ties the lookup, generation and export crates together into the
//! interactive writing session driven by [`Orchestrator`].

pub mod brief;
pub mod context;
pub mod document;
pub mod extension;
pub mod operator;
pub mod orchestrator;
pub mod outline;
pub mod profile;
pub mod references;
pub mod review;
pub mod sink;
pub mod translation;

#[cfg(test)]
mod testing;

pub use brief::{Brief, BriefField, collect_brief};
pub use context::ContextAccumulator;
pub use document::Document;
pub use extension::{AdHocRequest, RenderedSection};
pub use operator::{Operator, parse_yes_no};
pub use orchestrator::{Orchestrator, ProgressReporter, RunSettings, RunSummary, SilentProgress};
pub use outline::{Outline, PartSpec, SectionSpec};
pub use profile::{AdHocMode, Profile};
pub use references::ReferenceSet;
pub use sink::DocumentSink;
