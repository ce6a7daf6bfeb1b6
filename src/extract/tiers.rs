//! Ordered extraction strategies

use super::{non_empty, parse_string_map, scrape_key_values, ExtractionResult};
use regex::Regex;
use std::sync::OnceLock;

/// One strategy in the extraction chain
#[derive(Debug, Clone, Copy)]
pub struct Tier {
    /// Name used in logs
    pub name: &'static str,
    /// Returns `None` when the strategy found nothing usable
    pub run: fn(&str) -> Option<ExtractionResult>,
}

/// The extraction chain, most specific evidence first
pub const TIERS: [Tier; 3] = [
    Tier {
        name: "fenced_block",
        run: fenced_block_tier,
    },
    Tier {
        name: "brace_scan",
        run: brace_scan_tier,
    },
    Tier {
        name: "bounded",
        run: bounded_tier,
    },
];

fn fence_regex() -> &'static Regex {
    static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    FENCE_REGEX.get_or_init(|| {
        Regex::new(r"(?i)```(?:json)?[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```")
            .expect("Invalid fenced block regex")
    })
}

/// Bodies of all fenced code blocks, in order of appearance
pub(crate) fn fenced_blocks(text: &str) -> Vec<&str> {
    fence_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str())
        .collect()
}

/// Top-level `{...}` spans with balanced braces, in order of appearance.
///
/// Braces inside JSON string literals are ignored. An object that never closes
/// (truncated output) produces no span.
pub(crate) fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = idx;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=idx]);
                }
            }
            _ => {}
        }
    }

    spans
}

/// Newest fenced block that strict-parses or scrapes to a non-empty mapping.
pub fn fenced_block_tier(text: &str) -> Option<ExtractionResult> {
    fenced_blocks(text)
        .into_iter()
        .rev()
        .find_map(|block| parse_string_map(block).or_else(|| non_empty(scrape_key_values(block))))
}

/// Newest balanced object that strict-parses to a flat string map.
pub fn brace_scan_tier(text: &str) -> Option<ExtractionResult> {
    balanced_objects(text)
        .into_iter()
        .rev()
        .find_map(parse_string_map)
}

/// Span from the first `{` to the last `}`, strict-parsed or scraped.
pub fn bounded_tier(text: &str) -> Option<ExtractionResult> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }

    let span = &text[first..=last];
    parse_string_map(span).or_else(|| non_empty(scrape_key_values(span)))
}
