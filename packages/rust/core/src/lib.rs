//! Core pipeline orchestration for travelkb.
//!
//! Ties the entity source, distance computation, destination crawler, and
//! fact writer into the end-to-end `build_kb` workflow.

pub mod pipeline;

pub use pipeline::{
    BuildKbConfig, BuildKbResult, ProgressReporter, SilentProgress, build_kb, load_records,
    with_distances,
};
