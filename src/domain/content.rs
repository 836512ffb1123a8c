use crate::domain::{ContentBlock, Event, Role, StandardTool, same_file};
use regex::Regex;
use std::sync::LazyLock;

/// The reconstructed content of a file at a point in the timeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedContent {
    pub content: String,
    /// The path as spelled by the matching event, not the query.
    pub file_path: String,
    pub event_index: usize,
    pub timestamp_ms: Option<i64>,
}

/// Find the content of `target_path` nearest to `pivot_index`: backward from
/// the pivot (inclusive) first, then forward. The backward hit is the most
/// recent known state of the file as of this point in the story, so it wins
/// over an equidistant forward hit. Returns `None` for an empty log, a blank
/// target, or when no file-mutating evidence references the path.
pub fn resolve_content_near(
    events: &[Event],
    target_path: &str,
    pivot_index: usize,
) -> Option<ResolvedContent> {
    if events.is_empty() || target_path.trim().is_empty() {
        return None;
    }
    let pivot = pivot_index.min(events.len() - 1);
    scan_backward(events, target_path, pivot).or_else(|| scan_forward(events, target_path, pivot))
}

fn scan_backward(events: &[Event], target_path: &str, pivot: usize) -> Option<ResolvedContent> {
    (0..=pivot)
        .rev()
        .find_map(|index| content_at(events, index, target_path))
}

fn scan_forward(events: &[Event], target_path: &str, pivot: usize) -> Option<ResolvedContent> {
    (pivot + 1..events.len()).find_map(|index| content_at(events, index, target_path))
}

fn content_at(events: &[Event], index: usize, target_path: &str) -> Option<ResolvedContent> {
    let event = &events[index];
    // User turns cannot mutate files.
    if event.role != Role::Assistant {
        return None;
    }
    for block in &event.blocks {
        match block {
            ContentBlock::ToolInvocation(invocation) => {
                let Some(standard) = &invocation.standard else {
                    continue;
                };
                if let Some((path, content)) = mutation_content(standard, target_path) {
                    return Some(resolved(path, content, index, event));
                }
            }
            ContentBlock::ToolResult(result) => {
                let Some(path) = &result.associated_file_path else {
                    continue;
                };
                if !same_file(path, target_path) {
                    continue;
                }
                let cleaned = strip_line_number_prefixes(&result.output);
                if cleaned.trim().is_empty() {
                    continue;
                }
                return Some(resolved(path.clone(), cleaned, index, event));
            }
            _ => {}
        }
    }
    None
}

fn mutation_content<'a>(
    standard: &'a StandardTool,
    target_path: &str,
) -> Option<(String, &'a str)> {
    match standard {
        StandardTool::FileWrite { path, content } if same_file(path, target_path) => {
            non_blank(content.as_str()).map(|text| (path.clone(), text))
        }
        StandardTool::FileEdit {
            path,
            old_string,
            new_string,
        } if same_file(path, target_path) => new_string
            .as_deref()
            .and_then(non_blank)
            .or_else(|| old_string.as_deref().and_then(non_blank))
            .map(|text| (path.clone(), text)),
        _ => None,
    }
}

fn non_blank(text: &str) -> Option<&str> {
    if text.trim().is_empty() { None } else { Some(text) }
}

fn resolved(file_path: String, content: impl Into<String>, index: usize, event: &Event) -> ResolvedContent {
    ResolvedContent {
        content: content.into(),
        file_path,
        event_index: index,
        timestamp_ms: event.timestamp_ms(),
    }
}

// A line like "  42→fn main() {" or "7|fn main() {" as echoed by file-reading
// tools.
static LINE_NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[→|]").expect("valid line-number regex"));

/// Strip echoed line-number prefixes from tool output. Only applied when at
/// least half of the non-blank lines carry the prefix; genuine content that
/// merely starts with a digit is left alone.
pub fn strip_line_number_prefixes(text: &str) -> String {
    let non_blank_lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if non_blank_lines.is_empty() {
        return text.to_string();
    }
    let matching = non_blank_lines
        .iter()
        .filter(|line| LINE_NUMBER_PREFIX.is_match(line))
        .count();
    if matching * 2 < non_blank_lines.len() {
        return text.to_string();
    }
    text.lines()
        .map(|line| LINE_NUMBER_PREFIX.replace(line, "").into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ToolInvocation, ToolResult};

    fn write_event(path: &str, content: &str) -> Event {
        Event {
            id: "w".to_string(),
            role: Role::Assistant,
            timestamp: "2026-02-19T00:00:00Z".to_string(),
            blocks: vec![ContentBlock::ToolInvocation(ToolInvocation {
                name: "Write".to_string(),
                input: serde_json::Value::Null,
                standard: Some(StandardTool::FileWrite {
                    path: path.to_string(),
                    content: content.to_string(),
                }),
            })],
        }
    }

    fn chatter(role: Role) -> Event {
        Event {
            id: "t".to_string(),
            role,
            timestamp: "2026-02-19T00:00:01Z".to_string(),
            blocks: vec![ContentBlock::Text {
                text: "some narration".to_string(),
            }],
        }
    }

    #[test]
    fn finds_write_through_any_path_spelling() {
        let events = vec![write_event("./src/app.ts", "const app = 1;")];
        for target in ["src/app.ts", "/src/app.ts", "SRC/APP.TS", "./src/app.ts"] {
            let found = resolve_content_near(&events, target, 0).expect("content");
            assert_eq!(found.content, "const app = 1;", "target: {target}");
            assert_eq!(found.file_path, "./src/app.ts");
            assert_eq!(found.event_index, 0);
            assert_eq!(found.timestamp_ms, Some(1_771_459_200_000));
        }
    }

    #[test]
    fn backward_match_beats_forward_match() {
        let events = vec![
            write_event("src/app.ts", "v1"),
            chatter(Role::User),
            write_event("src/app.ts", "v2"),
        ];
        let found = resolve_content_near(&events, "src/app.ts", 1).expect("content");
        assert_eq!(found.content, "v1");
        assert_eq!(found.event_index, 0);
    }

    #[test]
    fn falls_forward_when_nothing_is_behind() {
        let events = vec![chatter(Role::User), write_event("src/app.ts", "v1")];
        let found = resolve_content_near(&events, "src/app.ts", 0).expect("content");
        assert_eq!(found.content, "v1");
        assert_eq!(found.event_index, 1);
    }

    #[test]
    fn user_events_never_match() {
        let mut tool_result_on_user = chatter(Role::User);
        tool_result_on_user.blocks = vec![ContentBlock::ToolResult(ToolResult {
            output: "const app = 1;".to_string(),
            is_error: false,
            associated_file_path: Some("src/app.ts".to_string()),
        })];
        let events = vec![tool_result_on_user];
        assert_eq!(resolve_content_near(&events, "src/app.ts", 0), None);
    }

    #[test]
    fn edit_prefers_new_string_over_old() {
        let edit = |old: Option<&str>, new: Option<&str>| Event {
            id: "e".to_string(),
            role: Role::Assistant,
            timestamp: "2026-02-19T00:00:00Z".to_string(),
            blocks: vec![ContentBlock::ToolInvocation(ToolInvocation {
                name: "Edit".to_string(),
                input: serde_json::Value::Null,
                standard: Some(StandardTool::FileEdit {
                    path: "src/app.ts".to_string(),
                    old_string: old.map(str::to_string),
                    new_string: new.map(str::to_string),
                }),
            })],
        };

        let events = vec![edit(Some("old body"), Some("new body"))];
        let found = resolve_content_near(&events, "src/app.ts", 0).expect("content");
        assert_eq!(found.content, "new body");

        let events = vec![edit(Some("old body"), None)];
        let found = resolve_content_near(&events, "src/app.ts", 0).expect("content");
        assert_eq!(found.content, "old body");

        let events = vec![edit(None, Some("   "))];
        assert_eq!(resolve_content_near(&events, "src/app.ts", 0), None);
    }

    #[test]
    fn blank_write_content_is_not_a_match() {
        let events = vec![
            write_event("src/app.ts", "   "),
            write_event("src/app.ts", "real content"),
        ];
        let found = resolve_content_near(&events, "src/app.ts", 1).expect("content");
        assert_eq!(found.event_index, 1);
        assert_eq!(found.content, "real content");
    }

    #[test]
    fn tool_result_fallback_applies_prefix_cleanup() {
        let result = Event {
            id: "r".to_string(),
            role: Role::Assistant,
            timestamp: "2026-02-19T00:00:02Z".to_string(),
            blocks: vec![ContentBlock::ToolResult(ToolResult {
                output: "  1→const app = 1;\n  2→export default app;".to_string(),
                is_error: false,
                associated_file_path: Some("src/app.ts".to_string()),
            })],
        };
        let events = vec![result];
        let found = resolve_content_near(&events, "src/app.ts", 0).expect("content");
        assert_eq!(found.content, "const app = 1;\nexport default app;");
    }

    #[test]
    fn guards_short_circuit_to_none() {
        assert_eq!(resolve_content_near(&[], "src/app.ts", 0), None);
        let events = vec![write_event("src/app.ts", "v1")];
        assert_eq!(resolve_content_near(&events, "", 0), None);
        assert_eq!(resolve_content_near(&events, "   ", 0), None);
        assert_eq!(resolve_content_near(&events, "src/unrelated.ts", 0), None);
    }

    #[test]
    fn repeated_queries_are_deterministic() {
        let events = vec![
            write_event("src/app.ts", "v1"),
            write_event("src/app.ts", "v2"),
        ];
        let first = resolve_content_near(&events, "src/app.ts", 1);
        let second = resolve_content_near(&events, "src/app.ts", 1);
        assert_eq!(first, second);
    }

    #[test]
    fn strips_arrow_and_pipe_prefixes() {
        let text = "  1→line one\n  2→line two\n\n  3→line three";
        assert_eq!(
            strip_line_number_prefixes(text),
            "line one\nline two\n\nline three"
        );
        assert_eq!(strip_line_number_prefixes("7|let x = 1;"), "let x = 1;");
    }

    #[test]
    fn cleanup_is_a_no_op_on_clean_text() {
        let clean = "fn main() {\n    println!(\"hi\");\n}";
        assert_eq!(strip_line_number_prefixes(clean), clean);
        // Idempotent: stripping twice equals stripping once.
        let noisy = "  1→a\n  2→b";
        let once = strip_line_number_prefixes(noisy);
        assert_eq!(strip_line_number_prefixes(&once), once);
    }

    #[test]
    fn cleanup_requires_half_of_lines_to_match() {
        // One of three non-blank lines carries a prefix; leave it alone.
        let mixed = "1→looks prefixed\nplain line\nanother plain line";
        assert_eq!(strip_line_number_prefixes(mixed), mixed);
        // Two of three is at least half; strip.
        let mostly = "1→a\n2→b\nplain";
        assert_eq!(strip_line_number_prefixes(mostly), "a\nb\nplain");
    }
}
