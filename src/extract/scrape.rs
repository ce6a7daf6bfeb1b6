//! Line-oriented key/value recovery for JSON that fails to parse as a whole

use super::ExtractionResult;
use regex::Regex;
use std::sync::OnceLock;

fn line_regex() -> &'static Regex {
    static LINE_REGEX: OnceLock<Regex> = OnceLock::new();
    LINE_REGEX.get_or_init(|| {
        Regex::new(r#"^"((?:[^"\\]|\\.)+)"\s*:\s*"((?:[^"\\]|\\.)*)"\s*,?$"#)
            .expect("Invalid key/value line regex")
    })
}

/// Decodes JSON escapes in a quoted fragment, keeping the raw text when invalid.
fn unescape(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", raw)).unwrap_or_else(|_| raw.to_string())
}

/// Trims a line and peels one opening `{` and one closing `}` off its ends, so the
/// first and last pairs of a compact object are still candidates.
fn strip_object_delimiters(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix('{').map(str::trim_start).unwrap_or(line);
    line.strip_suffix('}').map(str::trim_end).unwrap_or(line)
}

/// Collects every line shaped like `"key": "value",` into a mapping.
///
/// Each line is trimmed, loses one surrounding object brace, and must then match in
/// full. Later duplicates overwrite earlier ones. Multi-line values, nested objects
/// and arrays are not recovered.
pub fn scrape_key_values(text: &str) -> ExtractionResult {
    let re = line_regex();
    let mut result = ExtractionResult::new();

    for line in text.lines() {
        if let Some(caps) = re.captures(strip_object_delimiters(line)) {
            result.insert(unescape(&caps[1]), unescape(&caps[2]));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        trailing_comma = { r#"  "Skim": "PDF viewer","#, "Skim", "PDF viewer" },
        no_comma = { r#""Skim": "PDF viewer""#, "Skim", "PDF viewer" },
        tight_colon = { r#""Skim":"PDF viewer""#, "Skim", "PDF viewer" },
        empty_value = { r#""Skim": """#, "Skim", "" },
        escaped_quote = { r#""Safari": "Apple's \"fast\" browser","#, "Safari", "Apple's \"fast\" browser" },
        unicode_escape = { r#""Caf\u00e9": "Coffee app""#, "Café", "Coffee app" },
        spaces_in_key = { r#""Synology Drive Client": "File sync","#, "Synology Drive Client", "File sync" },
        opening_brace = { r#"{"Skim": "PDF viewer","#, "Skim", "PDF viewer" },
        closing_brace = { r#"  "Skim": "PDF viewer"}"#, "Skim", "PDF viewer" },
        single_line_object = { r#"{ "Skim": "PDF viewer" }"#, "Skim", "PDF viewer" },
        brace_in_value = { r#""Skim": "PDF {viewer}""#, "Skim", "PDF {viewer}" },
    )]
    fn test_scrape_single_line(line: &str, key: &str, value: &str) {
        let result = scrape_key_values(line);
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(key).map(String::as_str), Some(value));
    }

    #[parameterized(
        unescaped_quote = { r#""B": "He said "hi" there","# },
        trailing_garbage = { r#""B": "value" and more"# },
        number_value = { r#""B": 3,"# },
        nested_object = { r#""B": {"# },
        empty_key = { r#""": "value""# },
        brace_line = { "{" },
        closing_brace_unescaped_quote = { r#""B": "He said "hi" there"}"# },
        nested_close = { r#""B": "x"}}"# },
        prose = { "Here are the descriptions you asked for:" },
    )]
    fn test_scrape_rejects_line(line: &str) {
        assert!(scrape_key_values(line).is_empty());
    }

    #[test]
    fn test_scrape_later_duplicate_wins() {
        let text = "\"A\": \"first\",\n\"A\": \"rephrased\",";
        let result = scrape_key_values(text);
        assert_eq!(result.get("A").map(String::as_str), Some("rephrased"));
    }

    #[test]
    fn test_scrape_invalid_escape_kept_raw() {
        let result = scrape_key_values(r#""A": "path C:\q","#);
        assert_eq!(result.get("A").map(String::as_str), Some(r"path C:\q"));
    }

    #[test]
    fn test_scrape_block() {
        let block = "{\n  \"A\": \"one\",\n  \"B\": \"two\"\n}";
        let result = scrape_key_values(block);
        assert_eq!(result.len(), 2);
    }
}
