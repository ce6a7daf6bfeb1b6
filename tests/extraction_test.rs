//! Extraction against captured generation tool output
//!
//! The transcripts below mirror what a chat-style CLI prints when asked for a JSON
//! object: session banners, ANSI styling, fenced blocks, restated answers and
//! truncated or malformed lines.

use appscribe::{extract, strip_ansi, ExtractionResult};
use yare::parameterized;

const SESSION_BANNER: &str = "starting session | provider: github_copilot model: gpt-4o\n\
logging to /Users/someone/.local/share/goose/sessions/20250712_183856.jsonl\n\
working directory: /Users/someone/Projects/catalog\n";

fn with_banner(body: &str) -> String {
    format!("{}{}", SESSION_BANNER, body)
}

fn names(result: &ExtractionResult) -> Vec<&str> {
    result.keys().map(String::as_str).collect()
}

#[test]
fn test_session_output_with_ten_applications() {
    let response = with_banner(concat!(
        "```json\n",
        "{\n",
        "  \"Safari\": \"Safari is Apple's native web browser.\",\n",
        "  \"Scribus\": \"Scribus is an open-source desktop publishing application.\",\n",
        "  \"Service Station\": \"Service Station customizes the context menu.\",\n",
        "  \"Skim\": \"Skim is a lightweight PDF viewer and annotation tool.\",\n",
        "  \"Skitch\": \"Skitch is a screenshot and annotation app.\",\n",
        "  \"Slack\": \"Slack is a collaborative communication platform.\",\n",
        "  \"Spatial Media Metadata Injector\": \"Embeds spatial metadata into 360-degree videos.\",\n",
        "  \"Steam\": \"Steam is a gaming platform.\",\n",
        "  \"Syncthing\": \"Syncthing synchronizes files across devices.\",\n",
        "  \"Synology Drive Client\": \"Syncs a Mac with a Synology NAS.\"\n",
        "}\n",
        "```"
    ));

    let result = extract(&response);
    assert_eq!(result.len(), 10);
    assert_eq!(result["Safari"], "Safari is Apple's native web browser.");
    assert_eq!(result["Synology Drive Client"], "Syncs a Mac with a Synology NAS.");
}

#[test]
fn test_ansi_styled_session_output() {
    let raw = format!(
        "\x1b[2m{}\x1b[0m\x1b[1;32m```json\x1b[0m\n{{\n  \"AdBlock\": \"Blocks ads.\",\n  \"Ableton Live 11 Suite\": \"Music production.\"\n}}\n\x1b[1;32m```\x1b[0m\n",
        SESSION_BANNER
    );

    let result = extract(&strip_ansi(&raw));
    assert_eq!(names(&result), vec!["Ableton Live 11 Suite", "AdBlock"]);
}

#[parameterized(
    fenced = { "```json\n{\n  \"App1\": \"Description 1\",\n  \"App2\": \"Description 2\"\n}\n```" },
    bare_with_commentary = { "Some text before\n{\n  \"App1\": \"Description 1\",\n  \"App2\": \"Description 2\"\n}\nSome text after" },
    untagged_fence = { "```\n{\"App1\": \"Description 1\", \"App2\": \"Description 2\"}\n```" },
    uppercase_tag_crlf = { "```JSON\r\n{\"App1\": \"Description 1\", \"App2\": \"Description 2\"}\r\n```" },
    indented_closing_fence = { "```json  \n{\"App1\": \"Description 1\", \"App2\": \"Description 2\"}\n   ```" },
)]
fn test_response_shapes(response: &str) {
    let result = extract(response);
    assert_eq!(result.len(), 2);
    assert_eq!(result["App1"], "Description 1");
    assert_eq!(result["App2"], "Description 2");
}

#[test]
fn test_restated_answer_uses_latest_block() {
    let response = concat!(
        "First attempt:\n",
        "```json\n{\"Skim\": \"A PDF tool\"}\n```\n",
        "Actually, here is a better description:\n",
        "```json\n{\"Skim\": \"A PDF reader and note-taker for research papers\"}\n```\n"
    );

    assert_eq!(
        extract(response)["Skim"],
        "A PDF reader and note-taker for research papers"
    );
}

#[test]
fn test_unescaped_quote_only_loses_its_line() {
    let response = with_banner(concat!(
        "```json\n",
        "{\n",
        "  \"Steam\": \"Steam is a gaming platform.\",\n",
        "  \"Keynote\": \"Apple's \"presentation\" app.\",\n",
        "  \"Syncthing\": \"Continuous file synchronization.\"\n",
        "}\n",
        "```"
    ));

    let result = extract(&response);
    assert_eq!(names(&result), vec!["Steam", "Syncthing"]);
}

#[test]
fn test_unescaped_quote_keeps_pair_on_closing_brace_line() {
    let response = concat!(
        "```json\n",
        "{\n",
        "  \"Steam\": \"Steam is a gaming platform.\",\n",
        "  \"Keynote\": \"Apple's \"presentation\" app.\",\n",
        "  \"Syncthing\": \"Continuous file synchronization.\"}\n",
        "```"
    );

    let result = extract(response);
    assert_eq!(names(&result), vec!["Steam", "Syncthing"]);
    assert_eq!(result["Syncthing"], "Continuous file synchronization.");
}

#[test]
fn test_unescaped_quote_keeps_pair_on_opening_brace_line() {
    let response = concat!(
        "Here are the descriptions:\n",
        "{\"Steam\": \"Steam is a gaming platform.\",\n",
        "\"Keynote\": \"Apple's \"presentation\" app.\",\n",
        "\"Syncthing\": \"Continuous file synchronization.\"\n",
        "}\n"
    );

    let result = extract(response);
    assert_eq!(names(&result), vec!["Steam", "Syncthing"]);
    assert_eq!(result["Steam"], "Steam is a gaming platform.");
}

#[test]
fn test_truncated_output_recovers_complete_lines() {
    let response = with_banner(concat!(
        "{\n",
        "  \"Safari\": \"Web browser.\",\n",
        "  \"Slack\": \"Team chat.\",\n",
        "  \"Steam\": \"Gaming pla"
    ));

    // No closing brace anywhere: every tier comes up empty
    assert!(extract(&response).is_empty());

    let closed = format!("{}\n}}", response);
    let result = extract(&closed);
    assert_eq!(names(&result), vec!["Safari", "Slack"]);
}

#[parameterized(
    number_value = { "{\"A\": 3}" },
    nested_value = { "```json\n{\"A\": {\"text\": \"d\"}}\n```" },
    empty_object = { "```json\n{}\n```" },
    array = { "[\"Safari\", \"Slack\"]" },
    prose_only = { "I'm sorry, I can't help with that." },
    empty = { "" },
)]
fn test_unusable_responses_yield_nothing(response: &str) {
    assert!(extract(response).is_empty());
}

#[test]
fn test_extraction_is_deterministic() {
    let response = with_banner("```json\n{\"B\": \"2\", \"A\": \"1\"}\n```\n{\"C\": \"3\"}");
    let first = extract(&response);
    for _ in 0..5 {
        assert_eq!(extract(&response), first);
    }
    assert_eq!(names(&first), vec!["A", "B"]);
}
