use std::fs;
use std::path::Path;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, StampError};
use crate::version::Version;

use super::{is_writable_file, xml_err, FormatAdapter};

const SHORT_VERSION_KEY: &str = "CFBundleShortVersionString";
const BUNDLE_VERSION_KEY: &str = "CFBundleVersion";

/// Adapter for Apple property-list bundle descriptors.
///
/// A plist dictionary is a flat sequence of `<key>` elements, each paired
/// with its next sibling element as the value. Only keys directly under the
/// top-level `plist/dict` are considered. `CFBundleShortVersionString`
/// carries `major.minor` and `CFBundleVersion` carries `build.revision`.
/// Rewrites stream events through, so the XML declaration, the DOCTYPE, and
/// every other entry pass untouched.
pub struct PlistAdapter;

impl FormatAdapter for PlistAdapter {
    fn read_current_build(&self, path: &Path) -> Result<u32> {
        let contents = fs::read_to_string(path)?;
        let mut reader = Reader::from_str(&contents);

        let mut stack: Vec<String> = Vec::new();
        let mut capture_key = false;
        let mut key_text = String::new();
        let mut pending = false;
        let mut capture_value = false;
        let mut value_text = String::new();

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Start(e) => {
                    let name = element_name(&e);
                    if stack == ["plist", "dict"] {
                        if pending {
                            pending = false;
                            capture_value = true;
                            value_text.clear();
                        } else if name == "key" {
                            capture_key = true;
                            key_text.clear();
                        }
                    }
                    stack.push(name);
                }
                Event::Empty(_) => {
                    if pending && stack == ["plist", "dict"] {
                        return Err(StampError::version(format!(
                            "{} value is empty",
                            BUNDLE_VERSION_KEY
                        )));
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(xml_err)?;
                    if capture_key {
                        key_text.push_str(&text);
                    } else if capture_value {
                        value_text.push_str(&text);
                    }
                }
                Event::End(_) => {
                    stack.pop();
                    if stack == ["plist", "dict"] {
                        if capture_value {
                            // Integer portion before the first dot
                            let build = value_text.split('.').next().unwrap_or_default();
                            return build.parse::<u32>().map_err(|_| {
                                StampError::version(format!(
                                    "{} '{}' is not numeric",
                                    BUNDLE_VERSION_KEY, value_text
                                ))
                            });
                        }
                        if capture_key {
                            capture_key = false;
                            pending = key_text == BUNDLE_VERSION_KEY;
                        }
                    }
                }
                Event::Eof => {
                    return Err(StampError::format(format!(
                        "{} key not found in plist",
                        BUNDLE_VERSION_KEY
                    )));
                }
                _ => {}
            }
        }
    }

    fn write(&self, path: &Path, version: &Version) -> Result<()> {
        let contents = fs::read_to_string(path)?;
        let short_value = version.short();
        let bundle_value = version.build_revision();

        let mut reader = Reader::from_str(&contents);
        let mut writer = Writer::new(Vec::new());

        let mut stack: Vec<String> = Vec::new();
        let mut capture_key = false;
        let mut key_text = String::new();
        // Replacement text destined for the next sibling element, set when a
        // version key closes.
        let mut pending: Option<&str> = None;
        // Depth counter while dropping a value element's original content.
        let mut skip_depth = 0usize;

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Eof => break,
                Event::Start(e) => {
                    let name = element_name(&e);
                    if skip_depth > 0 {
                        skip_depth += 1;
                        stack.push(name);
                        continue;
                    }
                    if stack == ["plist", "dict"] {
                        if let Some(text) = pending.take() {
                            writer.write_event(Event::Start(e)).map_err(xml_err)?;
                            writer
                                .write_event(Event::Text(BytesText::new(text)))
                                .map_err(xml_err)?;
                            skip_depth = 1;
                            stack.push(name);
                            continue;
                        }
                        if name == "key" {
                            capture_key = true;
                            key_text.clear();
                        }
                    }
                    stack.push(name);
                    writer.write_event(Event::Start(e)).map_err(xml_err)?;
                }
                Event::Empty(e) => {
                    if skip_depth > 0 {
                        continue;
                    }
                    if stack == ["plist", "dict"] {
                        if let Some(text) = pending.take() {
                            // Expand a self-closing value into one with text
                            let name = element_name(&e);
                            writer.write_event(Event::Start(e)).map_err(xml_err)?;
                            writer
                                .write_event(Event::Text(BytesText::new(text)))
                                .map_err(xml_err)?;
                            writer
                                .write_event(Event::End(BytesEnd::new(name)))
                                .map_err(xml_err)?;
                            continue;
                        }
                    }
                    writer.write_event(Event::Empty(e)).map_err(xml_err)?;
                }
                Event::Text(t) => {
                    if skip_depth > 0 {
                        continue;
                    }
                    if capture_key {
                        key_text.push_str(&t.unescape().map_err(xml_err)?);
                    }
                    writer.write_event(Event::Text(t)).map_err(xml_err)?;
                }
                Event::End(e) => {
                    if skip_depth > 0 {
                        skip_depth -= 1;
                        stack.pop();
                        if skip_depth == 0 {
                            writer.write_event(Event::End(e)).map_err(xml_err)?;
                        }
                        continue;
                    }
                    stack.pop();
                    if capture_key && stack == ["plist", "dict"] {
                        capture_key = false;
                        pending = match key_text.as_str() {
                            SHORT_VERSION_KEY => Some(short_value.as_str()),
                            BUNDLE_VERSION_KEY => Some(bundle_value.as_str()),
                            _ => None,
                        };
                    }
                    writer.write_event(Event::End(e)).map_err(xml_err)?;
                }
                event => writer.write_event(event).map_err(xml_err)?,
            }
        }

        fs::write(path, writer.into_inner())?;
        Ok(())
    }
}

fn element_name(element: &BytesStart) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

/// Validation probe: an existing writable file with a `plist` DOCTYPE where
/// any present version key is followed by a `<string>` sibling. Any parse
/// failure counts as invalid.
pub fn is_valid_plist(path: &Path) -> bool {
    if !is_writable_file(path) {
        return false;
    }
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    check_document(&contents).unwrap_or(false)
}

fn check_document(contents: &str) -> Result<bool> {
    let mut reader = Reader::from_str(contents);

    let mut has_plist_doctype = false;
    let mut stack: Vec<String> = Vec::new();
    let mut capture_key = false;
    let mut key_text = String::new();
    let mut expect_string = false;
    let mut ok = true;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::DocType(t) => {
                let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                if text.split_whitespace().next() == Some("plist") {
                    has_plist_doctype = true;
                }
            }
            Event::Start(e) => {
                let name = element_name(&e);
                if stack == ["plist", "dict"] {
                    if expect_string {
                        expect_string = false;
                        if name != "string" {
                            ok = false;
                        }
                    } else if name == "key" {
                        capture_key = true;
                        key_text.clear();
                    }
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                if expect_string && stack == ["plist", "dict"] {
                    expect_string = false;
                    if element_name(&e) != "string" {
                        ok = false;
                    }
                }
            }
            Event::Text(t) => {
                if capture_key {
                    key_text.push_str(&t.unescape().map_err(xml_err)?);
                }
            }
            Event::End(_) => {
                stack.pop();
                if capture_key && stack == ["plist", "dict"] {
                    capture_key = false;
                    if key_text == SHORT_VERSION_KEY || key_text == BUNDLE_VERSION_KEY {
                        expect_string = true;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // A version key as the very last node has no value sibling
    if expect_string {
        ok = false;
    }

    Ok(has_plist_doctype && ok)
}
