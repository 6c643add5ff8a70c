use std::fs;
use std::path::Path;

use regex::{NoExpand, Regex};

use crate::error::{Result, StampError};
use crate::version::Version;

use super::{is_writable_file, FormatAdapter};

/// Line-anchored pattern for an assembly-version attribute declaration,
/// optionally namespace-qualified. The single capture group is the quoted
/// dotted version string.
const ASSEMBLY_VERSION_PATTERN: &str = r#"(?m)^\s*\[assembly:\s*(?:System\.)?(?:Reflection\.)?AssemblyVersion(?:Attribute)?\s*\(\s*"([^"]+)"\s*\)\s*\]\s*$"#;

/// Same shape for the file-version attribute.
const ASSEMBLY_FILE_VERSION_PATTERN: &str = r#"(?m)^\s*\[assembly:\s*(?:System\.)?(?:Reflection\.)?AssemblyFileVersion(?:Attribute)?\s*\(\s*"([^"]+)"\s*\)\s*\]\s*$"#;

/// Adapter for source files carrying assembly-version attribute
/// declarations.
///
/// Both patterns are compiled once at construction and never mutated.
pub struct SourceAdapter {
    version_re: Regex,
    file_version_re: Regex,
}

impl SourceAdapter {
    pub fn new() -> Result<Self> {
        Ok(SourceAdapter {
            version_re: Regex::new(ASSEMBLY_VERSION_PATTERN)?,
            file_version_re: Regex::new(ASSEMBLY_FILE_VERSION_PATTERN)?,
        })
    }
}

impl FormatAdapter for SourceAdapter {
    fn read_current_build(&self, path: &Path) -> Result<u32> {
        let contents = fs::read_to_string(path)?;
        let captures = self.version_re.captures(&contents).ok_or_else(|| {
            StampError::format(format!(
                "no assembly version declaration found in {}",
                path.display()
            ))
        })?;

        // Build number is the third dotted component of the quoted string
        let quoted = &captures[1];
        let build = quoted.split('.').nth(2).ok_or_else(|| {
            StampError::version(format!("version '{}' has no build component", quoted))
        })?;

        build.parse::<u32>().map_err(|_| {
            StampError::version(format!("build component '{}' is not numeric", build))
        })
    }

    fn write(&self, path: &Path, version: &Version) -> Result<()> {
        let contents = fs::read_to_string(path)?;

        let replacement = format!(
            "[assembly: System.Reflection.AssemblyVersion(\"{}\")]",
            version
        );
        let contents = self
            .version_re
            .replace_all(&contents, NoExpand(&replacement));

        // A file-version declaration is only rewritten where one already
        // exists; replace_all on a non-matching file is a no-op.
        let replacement = format!(
            "[assembly: System.Reflection.AssemblyFileVersion(\"{}\")]",
            version
        );
        let contents = self
            .file_version_re
            .replace_all(&contents, NoExpand(&replacement));

        fs::write(path, contents.as_bytes())?;
        Ok(())
    }
}

/// Validation probe: the path must name an existing writable file whose
/// content carries at least one assembly-version declaration. Any read or
/// pattern failure counts as invalid.
pub fn is_valid_source_file(path: &Path) -> bool {
    if !is_writable_file(path) {
        return false;
    }

    match (SourceAdapter::new(), fs::read_to_string(path)) {
        (Ok(adapter), Ok(contents)) => adapter.version_re.is_match(&contents),
        _ => false,
    }
}
