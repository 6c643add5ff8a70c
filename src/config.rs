use std::path::PathBuf;

/// Resolved command-line state for a single run.
///
/// Built once from the parsed arguments and read-only afterwards. Defaults
/// mirror the option table: major defaults to 1, minor to 0, everything else
/// is absent unless supplied.
#[derive(Debug, Clone)]
pub struct Config {
    pub major: i32,
    pub minor: i32,
    pub build: Option<i32>,
    pub revision: Option<i32>,

    /// Path to the source file carrying assembly-version declarations.
    pub version_path: Option<PathBuf>,
    /// Path to the Android application manifest.
    pub android_manifest_path: Option<PathBuf>,
    /// Path to the iOS property-list bundle descriptor.
    pub touch_plist_path: Option<PathBuf>,

    /// Overrides build with "current build + 1", read per target.
    pub inc_build: bool,
    /// Overrides revision with seconds-since-midnight local time.
    pub revision_stamp: bool,
    /// Inverted naming: when set, the run ends with a pause-for-keypress
    /// rather than exiting immediately.
    pub do_not_exit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            major: 1,
            minor: 0,
            build: None,
            revision: None,
            version_path: None,
            android_manifest_path: None,
            touch_plist_path: None,
            inc_build: false,
            revision_stamp: false,
            do_not_exit: false,
        }
    }
}
