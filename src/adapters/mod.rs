//! Format adapters - one per supported target file format.
//!
//! Each adapter knows how to read the current build number out of its format
//! (increment-build mode) and how to rewrite the version fields in place.
//! Writes are whole-file read/transform/overwrite cycles; nothing is
//! streamed and nothing survives the process.

use std::fs;
use std::path::Path;

use crate::error::{Result, StampError};
use crate::version::Version;

pub mod android;
pub mod plist;
pub mod source;

pub use android::AndroidAdapter;
pub use plist::PlistAdapter;
pub use source::SourceAdapter;

/// Common surface of the three target-file formats.
pub trait FormatAdapter {
    /// Reads the current build number embedded in the target file.
    ///
    /// Only consulted in increment-build mode; each target contributes its
    /// own current value.
    fn read_current_build(&self, path: &Path) -> Result<u32>;

    /// Rewrites the version fields of the target file in place.
    fn write(&self, path: &Path, version: &Version) -> Result<()>;
}

/// Maps any quick-xml error into the crate error type.
pub(crate) fn xml_err(err: impl std::fmt::Display) -> StampError {
    StampError::xml(err.to_string())
}

/// Returns true when `path` names an existing regular file that is not
/// marked read-only.
pub(crate) fn is_writable_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && !meta.permissions().readonly())
        .unwrap_or(false)
}
