//! Terminal control sequence removal for generation tool output

use regex::Regex;
use std::sync::OnceLock;

/// Removes ANSI escape sequences (CSI colour/cursor codes and OSC titles/links)
/// so that downstream extraction only sees printable text.
pub fn strip_ansi(text: &str) -> String {
    static ANSI_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ANSI_REGEX.get_or_init(|| {
        Regex::new(r"\x1b\[[0-9;?]*[a-zA-Z]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)")
            .expect("Invalid ANSI escape regex")
    });

    re.replace_all(text, "").into_owned()
}
