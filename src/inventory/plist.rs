//! Info.plist reading
//!
//! Both XML and binary (`bplist00`) property lists are understood.

use anyhow::{anyhow, Context, Result};
use plist::Value;
use std::io::Cursor;

/// Bundle metadata read from `Contents/Info.plist`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleInfo {
    pub version: String,
    pub bundle_identifier: String,
    pub copyright: String,
    pub description: String,
}

/// Parses a property list in any supported encoding into bundle metadata.
pub fn parse_info_plist(bytes: &[u8]) -> Result<BundleInfo> {
    let value = Value::from_reader(Cursor::new(bytes)).context("Invalid property list")?;
    let dict = value
        .as_dictionary()
        .ok_or_else(|| anyhow!("Property list does not contain a top-level dictionary"))?;

    let lookup = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| dict.get(*k).and_then(scalar_text))
            .unwrap_or_default()
    };

    Ok(BundleInfo {
        version: lookup(&["CFBundleShortVersionString", "CFBundleVersion"]),
        bundle_identifier: lookup(&["CFBundleIdentifier"]),
        copyright: lookup(&["NSHumanReadableCopyright"]),
        description: lookup(&["CFBundleDescription", "CFBundleGetInfoString"]),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(r) => Some(r.to_string()),
        _ => None,
    }
}
