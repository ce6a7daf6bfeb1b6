//! Structured extraction of `{name: description}` mappings from free text
//!
//! Generation tools rarely return clean JSON. Their output may wrap the object in
//! commentary, fence it in one or more markdown code blocks, restate it with
//! corrections, or truncate it. [`extract`] walks an ordered chain of [`Tier`]s and
//! returns the first non-empty mapping any of them recovers:
//!
//! 1. fenced code blocks, newest first (strict parse, then line scrape)
//! 2. balanced brace-delimited objects, newest first (strict parse only)
//! 3. the span from the first `{` to the last `}` (strict parse, then line scrape)
//!
//! Every strict parse goes through [`parse_string_map`], so an object is only ever
//! accepted when it is non-empty and every value is a string.
//!
//! # Example
//!
//! ```
//! use appscribe::extract::extract;
//!
//! let text = "Here you go:\n```json\n{\"Safari\": \"Web browser\"}\n```\nEnjoy!";
//! let found = extract(text);
//! assert_eq!(found.get("Safari").map(String::as_str), Some("Web browser"));
//! ```

mod scrape;
mod tiers;

pub use scrape::scrape_key_values;
pub use tiers::{bounded_tier, brace_scan_tier, fenced_block_tier, Tier, TIERS};

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Application name to generated description
pub type ExtractionResult = BTreeMap<String, String>;

/// Recovers a name→description mapping from arbitrary text.
///
/// Never fails: when no tier finds anything the result is empty.
pub fn extract(text: &str) -> ExtractionResult {
    for tier in TIERS.iter() {
        if let Some(found) = (tier.run)(text) {
            debug!(tier = tier.name, entries = found.len(), "Extraction tier matched");
            return found;
        }
        trace!(tier = tier.name, "Extraction tier yielded nothing");
    }

    debug!(text_len = text.len(), "No extraction tier matched");
    ExtractionResult::new()
}

/// Strictly parses `candidate` as JSON and validates it with [`as_string_map`].
pub fn parse_string_map(candidate: &str) -> Option<ExtractionResult> {
    let value: Value = serde_json::from_str(candidate.trim()).ok()?;
    as_string_map(value)
}

/// Accepts a JSON value only if it is a non-empty object whose values are all strings.
///
/// Anything else (arrays, scalars, `{}`, nested objects, numbers) is treated as a
/// false positive, e.g. an unrelated object quoted in the tool's commentary.
pub fn as_string_map(value: Value) -> Option<ExtractionResult> {
    let Value::Object(object) = value else {
        return None;
    };
    if object.is_empty() {
        return None;
    }

    object
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(description) => Some((key, description)),
            _ => None,
        })
        .collect()
}

pub(crate) fn non_empty(result: ExtractionResult) -> Option<ExtractionResult> {
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}
