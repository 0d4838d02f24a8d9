//! Command-line layer: token dispatch and the release workflow

pub mod orchestration;

pub use orchestration::{run_release_workflow, Operation, Outcome, ReleaseArgs, TagRequest};
