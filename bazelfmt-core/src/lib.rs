//! Embeddable core for the bazelfmt binaries.
//!
//! Provides clap-free, I/O-abstracted pipelines suitable for driving from
//! a CLI or a test harness.
//!
//! # Port traits
//!
//! Subprocess and runfile I/O are abstracted behind port traits in
//! [`ports`]:
//! - [`ProcessHost`](ports::ProcessHost) — synchronous subprocess execution
//! - [`RunfileResolver`](ports::RunfileResolver) — logical path to on-disk path
//!
//! The [`adapters`] module provides the default implementations.
//!
//! # Entry points
//!
//! - [`run_format`](pipeline::run_format) — query the build graph and
//!   format every reachable source through a sandbox (the runner)
//! - [`run_wrapper`](pipeline::run_wrapper) — format an explicit file
//!   list, optionally diffing instead of mutating (the process wrapper)

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod sandbox;
pub mod settings;

pub use pipeline::{FAILURE_EXIT_CODE, ToolError, run_format, run_wrapper};
pub use settings::{FormatSettings, WrapperSettings};
