//! multiversion-lib: build several versions of the same executable side by side
//!
//! Each configured [`entry::BuildEntry`] names a source archive and a
//! destination folder. The [`pipeline::Pipeline`] downloads and unpacks the
//! archive into a workspace, builds it with the external toolchain, gathers
//! the native libraries its pinned dependency ships and publishes everything
//! to the destination.

pub mod artifact;
pub mod consts;
pub mod deps;
pub mod entry;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod report;
pub mod source;
pub mod toolchain;
pub mod util;
pub mod workspace;

pub use error::{BuildError, ErrorKind, Result};
