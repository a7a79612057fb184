//! The `cmdtree` demo front-end.
//!
//! - `entrypoint`: front-end tree, logging setup and `run`
//! - `sample`: the tree `cmdtree parse` checks lines against

pub mod entrypoint;
pub mod sample;

pub use entrypoint::{exit_status, front_end, init_tracing, run};
pub use sample::sample_tree;
