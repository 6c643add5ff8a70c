use chrono::Timelike;

use crate::config::Config;
use crate::error::{Result, StampError};

/// Represents a four-part version number (major.minor.build.revision).
///
/// Every component is non-negative. Composed once per run and immutable
/// afterwards; it only exists to parameterize the format adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Version {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Returns a copy with the build component replaced.
    ///
    /// Used by increment-build mode, where each target contributes its own
    /// current build number.
    pub fn with_build(&self, build: u32) -> Self {
        Version {
            build,
            ..self.clone()
        }
    }

    /// The `major.minor` rendering used for marketing-style version fields
    /// (manifest `versionName`, plist `CFBundleShortVersionString`).
    pub fn short(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// The `build.revision` rendering used for build-counter fields
    /// (manifest `versionCode`, plist `CFBundleVersion`).
    pub fn build_revision(&self) -> String {
        format!("{}.{}", self.build, self.revision)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Composes the base version from the resolved command line.
///
/// Build and revision default to 0 when absent. Revision-stamp mode replaces
/// the revision with the number of seconds since local midnight, always in
/// [0, 86399]. Major and minor are never altered by any mode.
///
/// # Arguments
/// * `config` - Validated command-line state
///
/// # Returns
/// * `Ok(Version)` - The composed base version
/// * `Err` - If any supplied component is negative (unreachable after validation)
pub fn base_version(config: &Config) -> Result<Version> {
    let mut version = Version::new(
        component(config.major, "major")?,
        component(config.minor, "minor")?,
        component(config.build.unwrap_or(0), "build")?,
        component(config.revision.unwrap_or(0), "revision")?,
    );

    if config.revision_stamp {
        version.revision = seconds_since_midnight();
    }

    Ok(version)
}

/// Seconds elapsed since local midnight, for revision-stamp mode.
pub fn seconds_since_midnight() -> u32 {
    let now = chrono::Local::now();
    now.hour() * 3600 + now.minute() * 60 + now.second()
}

fn component(value: i32, name: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| StampError::version(format!("negative {} component: {}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_four_parts() {
        let version = Version::new(2, 3, 4, 5);
        assert_eq!(version.to_string(), "2.3.4.5");
    }

    #[test]
    fn test_short_and_build_revision_renderings() {
        let version = Version::new(1, 2, 9, 0);
        assert_eq!(version.short(), "1.2");
        assert_eq!(version.build_revision(), "9.0");
    }

    #[test]
    fn test_with_build_leaves_other_components() {
        let version = Version::new(1, 2, 3, 4).with_build(10);
        assert_eq!(version, Version::new(1, 2, 10, 4));
    }

    #[test]
    fn test_base_version_defaults_missing_parts_to_zero() {
        let config = Config {
            major: 3,
            minor: 1,
            ..Config::default()
        };
        let version = base_version(&config).unwrap();
        assert_eq!(version, Version::new(3, 1, 0, 0));
    }

    #[test]
    fn test_base_version_uses_supplied_build_and_revision() {
        let config = Config {
            major: 2,
            minor: 3,
            build: Some(4),
            revision: Some(5),
            ..Config::default()
        };
        let version = base_version(&config).unwrap();
        assert_eq!(version, Version::new(2, 3, 4, 5));
    }

    #[test]
    fn test_base_version_rejects_negative_components() {
        let config = Config {
            major: -1,
            ..Config::default()
        };
        let err = base_version(&config).unwrap_err();
        assert!(err.to_string().contains("major"));
    }

    #[test]
    fn test_revision_stamp_overrides_supplied_revision() {
        let config = Config {
            build: Some(1),
            revision: Some(123_456),
            revision_stamp: true,
            ..Config::default()
        };
        let version = base_version(&config).unwrap();
        assert!(version.revision <= 86_399);
    }

    #[test]
    fn test_seconds_since_midnight_range() {
        let seconds = seconds_since_midnight();
        assert!(seconds <= 86_399);
    }

    #[test]
    fn test_revision_stamp_never_touches_major_minor_build() {
        let config = Config {
            major: 7,
            minor: 8,
            build: Some(9),
            revision_stamp: true,
            ..Config::default()
        };
        let version = base_version(&config).unwrap();
        assert_eq!(version.major, 7);
        assert_eq!(version.minor, 8);
        assert_eq!(version.build, 9);
    }
}
