use crate::adapters::{android, plist, source};
use crate::config::Config;

/// Checks the resolved command line for consistency and each supplied target
/// for existence, writability, and format fitness.
///
/// All rules are independent; failures accumulate rather than
/// short-circuiting so the user sees every problem at once. An empty result
/// means the configuration is valid.
///
/// Note the wording: zero is accepted for major and minor (the default minor
/// is 0) even though the messages say "positive".
pub fn validate(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    if config.major < 0 {
        errors.push("You must supply a positive major version number.".to_string());
    }
    if config.minor < 0 {
        errors.push("You must supply a positive minor version number.".to_string());
    }
    if config.build.is_none() && !config.inc_build {
        errors.push(
            "You must supply a numeric build number (or set the increment-build flag)."
                .to_string(),
        );
    }

    // The source target is mandatory; the other two are optional.
    match &config.version_path {
        Some(path) if source::is_valid_source_file(path) => {}
        _ => errors.push(
            "You must supply a valid path to a writable source file containing assembly version information."
                .to_string(),
        ),
    }

    if let Some(path) = &config.android_manifest_path {
        if !android::is_valid_manifest(path) {
            errors.push(
                "You must supply a valid path to a writable Android manifest file.".to_string(),
            );
        }
    }

    if let Some(path) = &config.touch_plist_path {
        if !plist::is_valid_plist(path) {
            errors.push(
                "You must supply a valid path to a writable plist file containing version information."
                    .to_string(),
            );
        }
    }

    errors
}
