#![forbid(unsafe_code)]
//! monobuild-core library.
//!
//! Pure planning logic for monorepo builds: the dependency [`graph`], the
//! [`manifest`] formats that produce it, change [`diff`] analysis and the
//! [`selection`] pipeline, tied together by [`plan::Project`]. Nothing here
//! touches git or the process environment; callers pass plain data in.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in [`error`]; `anyhow::Result` only
//!   for [`config`] file loading.
//! - **Logging**: `tracing` macros (`debug!`, `trace!`) and `#[instrument]`
//!   on entry points.

pub mod config;
pub mod diff;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod plan;
pub mod selection;
pub mod set;

pub use error::{LoadError, ManifestError, ScopeError};
pub use graph::{Edge, Graph, Kind};
pub use plan::{Plan, Project};
pub use selection::Scope;
pub use set::VertexSet;
