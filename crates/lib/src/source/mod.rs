//! Getting sources into the workspace: download, unpack, find the source root.

pub mod extract;
pub mod fetch;
pub mod locate;

pub use extract::extract_archive;
pub use fetch::{archive_extension, download_archive};
pub use locate::locate_source_root;
