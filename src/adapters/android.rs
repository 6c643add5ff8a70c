use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, StampError};
use crate::version::Version;

use super::{is_writable_file, xml_err, FormatAdapter};

const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

/// Adapter for Android application manifests.
///
/// Versions live in two namespaced attributes on the document root:
/// `versionCode` holds `build.revision` and `versionName` holds
/// `major.minor`. The rewrite streams events through, so the XML
/// declaration, comments, and all nested markup pass untouched.
pub struct AndroidAdapter;

impl FormatAdapter for AndroidAdapter {
    fn read_current_build(&self, path: &Path) -> Result<u32> {
        let contents = fs::read_to_string(path)?;
        let mut reader = Reader::from_str(&contents);

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Start(e) | Event::Empty(e) => {
                    let prefix = android_prefix(&e)?;
                    let key = format!("{}:versionCode", prefix);
                    let value = attribute_value(&e, &key)?.ok_or_else(|| {
                        StampError::format(format!("manifest root has no {} attribute", key))
                    })?;

                    // Integer portion before the first dot
                    let code = value.split('.').next().unwrap_or_default();
                    return code.parse::<u32>().map_err(|_| {
                        StampError::version(format!("versionCode '{}' is not numeric", value))
                    });
                }
                Event::Eof => {
                    return Err(StampError::xml("document has no root element"));
                }
                _ => {}
            }
        }
    }

    fn write(&self, path: &Path, version: &Version) -> Result<()> {
        let contents = fs::read_to_string(path)?;
        let mut reader = Reader::from_str(&contents);
        let mut writer = Writer::new(Vec::new());
        let mut root_done = false;

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Eof => break,
                Event::Start(e) if !root_done => {
                    root_done = true;
                    let rewritten = rewrite_root(&e, version)?;
                    writer.write_event(Event::Start(rewritten)).map_err(xml_err)?;
                }
                Event::Empty(e) if !root_done => {
                    root_done = true;
                    let rewritten = rewrite_root(&e, version)?;
                    writer.write_event(Event::Empty(rewritten)).map_err(xml_err)?;
                }
                event => writer.write_event(event).map_err(xml_err)?,
            }
        }

        if !root_done {
            return Err(StampError::xml("document has no root element"));
        }

        fs::write(path, writer.into_inner())?;
        Ok(())
    }
}

/// Rebuilds the root start tag with `versionCode` and `versionName` set,
/// creating either attribute when it is missing.
fn rewrite_root(root: &BytesStart, version: &Version) -> Result<BytesStart<'static>> {
    let prefix = android_prefix(root)?;
    let code_key = format!("{}:versionCode", prefix);
    let name_key = format!("{}:versionName", prefix);
    let code_value = version.build_revision();
    let name_value = version.short();

    let mut rewritten =
        BytesStart::new(String::from_utf8_lossy(root.name().as_ref()).into_owned());
    let mut has_code = false;
    let mut has_name = false;

    for attr in root.attributes() {
        let attr = attr.map_err(xml_err)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key == code_key {
            rewritten.push_attribute((key.as_str(), code_value.as_str()));
            has_code = true;
        } else if key == name_key {
            rewritten.push_attribute((key.as_str(), name_value.as_str()));
            has_name = true;
        } else {
            let value = attr.unescape_value().map_err(xml_err)?;
            rewritten.push_attribute((key.as_str(), value.as_ref()));
        }
    }

    if !has_code {
        rewritten.push_attribute((code_key.as_str(), code_value.as_str()));
    }
    if !has_name {
        rewritten.push_attribute((name_key.as_str(), name_value.as_str()));
    }

    Ok(rewritten)
}

/// Resolves which prefix the root element binds to the Android namespace.
fn android_prefix(root: &BytesStart) -> Result<String> {
    for attr in root.attributes() {
        let attr = attr.map_err(xml_err)?;
        let key = attr.key.as_ref();
        if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            if attr.unescape_value().map_err(xml_err)?.as_ref() == ANDROID_NS {
                return Ok(String::from_utf8_lossy(prefix).into_owned());
            }
        }
    }
    Err(StampError::xml(
        "manifest root does not declare the Android namespace",
    ))
}

fn attribute_value(element: &BytesStart, key: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(xml_err)?;
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(attr.unescape_value().map_err(xml_err)?.into_owned()));
        }
    }
    Ok(None)
}

/// Validation probe: an existing writable file whose document root is named
/// `manifest`. Any parse failure counts as invalid.
pub fn is_valid_manifest(path: &Path) -> bool {
    if !is_writable_file(path) {
        return false;
    }
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    root_is_manifest(&contents).unwrap_or(false)
}

fn root_is_manifest(contents: &str) -> Result<bool> {
    let mut reader = Reader::from_str(contents);
    let mut root_name: Option<bool> = None;

    // Scan the whole document so malformed markup after the root still
    // fails the probe.
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e) => {
                if root_name.is_none() {
                    root_name = Some(e.name().as_ref() == b"manifest");
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(root_name.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.example.app" android:versionCode="7.0" android:versionName="1.0">
    <application android:label="Example"/>
</manifest>"#;

    fn fixture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_current_build() {
        let file = fixture(MANIFEST);
        assert_eq!(AndroidAdapter.read_current_build(file.path()).unwrap(), 7);
    }

    #[test]
    fn test_read_current_build_without_dot() {
        let manifest = MANIFEST.replace("7.0", "42");
        let file = fixture(&manifest);
        assert_eq!(AndroidAdapter.read_current_build(file.path()).unwrap(), 42);
    }

    #[test]
    fn test_read_current_build_missing_attribute_fails() {
        let manifest = r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android"/>"#;
        let file = fixture(manifest);
        let err = AndroidAdapter.read_current_build(file.path()).unwrap_err();
        assert!(err.to_string().contains("versionCode"));
    }

    #[test]
    fn test_write_rewrites_version_attributes() {
        let file = fixture(MANIFEST);
        AndroidAdapter
            .write(file.path(), &Version::new(1, 2, 9, 0))
            .unwrap();

        let rewritten = fs::read_to_string(file.path()).unwrap();
        assert!(rewritten.contains(r#"android:versionCode="9.0""#));
        assert!(rewritten.contains(r#"android:versionName="1.2""#));
        assert!(rewritten.contains(r#"package="com.example.app""#));
        assert!(rewritten.contains(r#"<application android:label="Example"/>"#));
    }

    #[test]
    fn test_write_creates_missing_version_attributes() {
        let manifest = r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.example.app"/>"#;
        let file = fixture(manifest);
        AndroidAdapter
            .write(file.path(), &Version::new(2, 1, 5, 3))
            .unwrap();

        let rewritten = fs::read_to_string(file.path()).unwrap();
        assert!(rewritten.contains(r#"android:versionCode="5.3""#));
        assert!(rewritten.contains(r#"android:versionName="2.1""#));
    }

    #[test]
    fn test_write_honors_custom_namespace_prefix() {
        let manifest = r#"<manifest xmlns:a="http://schemas.android.com/apk/res/android" a:versionCode="1.0"><application/></manifest>"#;
        let file = fixture(manifest);
        AndroidAdapter
            .write(file.path(), &Version::new(3, 0, 8, 1))
            .unwrap();

        let rewritten = fs::read_to_string(file.path()).unwrap();
        assert!(rewritten.contains(r#"a:versionCode="8.1""#));
        assert!(rewritten.contains(r#"a:versionName="3.0""#));
        assert_eq!(AndroidAdapter.read_current_build(file.path()).unwrap(), 8);
    }

    #[test]
    fn test_write_fails_without_android_namespace() {
        let file = fixture("<manifest package=\"com.example.app\"/>");
        let err = AndroidAdapter
            .write(file.path(), &Version::new(1, 0, 0, 0))
            .unwrap_err();
        assert!(err.to_string().contains("Android namespace"));
    }

    #[test]
    fn test_is_valid_manifest() {
        let file = fixture(MANIFEST);
        assert!(is_valid_manifest(file.path()));
    }

    #[test]
    fn test_is_valid_manifest_rejects_wrong_root() {
        let file = fixture(r#"<resources xmlns:android="http://schemas.android.com/apk/res/android"/>"#);
        assert!(!is_valid_manifest(file.path()));
    }

    #[test]
    fn test_is_valid_manifest_rejects_malformed_document() {
        let file = fixture("<manifest><application></manifest>");
        assert!(!is_valid_manifest(file.path()));
    }

    #[test]
    fn test_is_valid_manifest_rejects_missing_file() {
        assert!(!is_valid_manifest(Path::new("/no/such/AndroidManifest.xml")));
    }
}
