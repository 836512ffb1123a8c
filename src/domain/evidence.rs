use crate::domain::{ContentBlock, Event, ToolInvocation, is_valid_file_path};
use regex::Regex;
use std::sync::LazyLock;

/// How directly a resolved path was evidenced. Total order: High beats
/// Medium beats Low.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathSource {
    ToolInvocation,
    ToolResult,
    CodeBlockAnnotation,
    CommentAnnotation,
    TextMatch,
    /// Found at an earlier or later event than the pivot, not at the pivot
    /// itself.
    History,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathResolution {
    pub path: String,
    pub source: PathSource,
    pub confidence: Confidence,
}

type Extractor = fn(&Event) -> Option<PathResolution>;

/// Evidence strategies in priority order; the first one that yields a
/// validator-passing path wins. New strategies slot in here without touching
/// the existing ones.
const EXTRACTORS: &[Extractor] = &[
    from_tool_invocations,
    from_tool_results,
    from_code_fence_annotations,
    from_comment_annotations,
    from_free_text,
];

/// Resolve the file path a single event is about, if any.
pub fn resolve_path_for_event(event: &Event) -> Option<PathResolution> {
    EXTRACTORS.iter().find_map(|extractor| extractor(event))
}

/// Resolve the file path in view at `pivot_index`: the pivot event first,
/// then strictly backward to the start of the log, then forward from the
/// pivot to the end. Backward hits always beat forward hits; recent-past
/// evidence is the stronger signal of what is currently being discussed.
/// Hits away from the pivot are re-tagged [`PathSource::History`].
pub fn resolve_path_near(events: &[Event], pivot_index: usize) -> Option<PathResolution> {
    if events.is_empty() {
        return None;
    }
    let pivot = pivot_index.min(events.len() - 1);
    let (index, mut resolution) =
        scan_backward(events, pivot).or_else(|| scan_forward(events, pivot))?;
    if index != pivot {
        resolution.source = PathSource::History;
    }
    Some(resolution)
}

fn scan_backward(events: &[Event], pivot: usize) -> Option<(usize, PathResolution)> {
    (0..=pivot)
        .rev()
        .find_map(|index| resolve_path_for_event(&events[index]).map(|found| (index, found)))
}

fn scan_forward(events: &[Event], pivot: usize) -> Option<(usize, PathResolution)> {
    (pivot + 1..events.len())
        .find_map(|index| resolve_path_for_event(&events[index]).map(|found| (index, found)))
}

fn from_tool_invocations(event: &Event) -> Option<PathResolution> {
    for block in &event.blocks {
        let ContentBlock::ToolInvocation(invocation) = block else {
            continue;
        };
        if let Some(path) = invocation_path(invocation) {
            return Some(PathResolution {
                path,
                source: PathSource::ToolInvocation,
                confidence: Confidence::High,
            });
        }
    }
    None
}

fn invocation_path(invocation: &ToolInvocation) -> Option<String> {
    if let Some(standard) = &invocation.standard {
        if let Some(path) = standard.path() {
            if is_valid_file_path(path) {
                return Some(path.trim().to_string());
            }
        }
    }
    for field in path_fields_for_tool(&invocation.name) {
        let Some(value) = invocation.input.get(field).and_then(|v| v.as_str()) else {
            continue;
        };
        if is_valid_file_path(value) {
            return Some(value.trim().to_string());
        }
    }
    None
}

/// Raw-input fields that may carry a path, per tool name. Only consulted
/// when the session store attached no Standard Tool.
fn path_fields_for_tool(name: &str) -> &'static [&'static str] {
    match name {
        "Read" | "Write" | "Edit" | "MultiEdit" | "NotebookEdit" => {
            &["file_path", "filePath", "path"]
        }
        "Grep" | "Glob" => &["path"],
        _ => &["file_path", "filePath", "path", "filename"],
    }
}

fn from_tool_results(event: &Event) -> Option<PathResolution> {
    for block in &event.blocks {
        let ContentBlock::ToolResult(result) = block else {
            continue;
        };
        let Some(path) = &result.associated_file_path else {
            continue;
        };
        if is_valid_file_path(path) {
            return Some(PathResolution {
                path: path.clone(),
                source: PathSource::ToolResult,
                confidence: Confidence::High,
            });
        }
    }
    None
}

// ```ts:src/app.ts — language token, colon, path until whitespace/backtick.
static FENCE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+#-]+:([^\s`]+)").expect("valid fence regex"));

static COMMENT_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?://\s*file(?:path)?:|/\*\s*filepath:|#\s*filepath:|<!--\s*filepath:)\s*([^\s*`]+)")
        .expect("valid comment regex")
});

// Backticked, quoted, or bare path-shaped tokens ending in a 1-10 character
// extension. Group 1 covers the delimited forms, group 2 the bare form.
static FREE_TEXT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"[`"']([^`"'\s]+\.[A-Za-z0-9]{1,10})[`"']|(?:^|[\s(\[{,])((?:\.{1,2}/|/)?[A-Za-z0-9_@~.-]+(?:/[A-Za-z0-9_@~.-]+)*\.[A-Za-z0-9]{1,10})\b"#,
    )
    .expect("valid free-text regex")
});

fn from_code_fence_annotations(event: &Event) -> Option<PathResolution> {
    first_text_capture(event, &FENCE_ANNOTATION).map(|path| PathResolution {
        path,
        source: PathSource::CodeBlockAnnotation,
        confidence: Confidence::Medium,
    })
}

fn from_comment_annotations(event: &Event) -> Option<PathResolution> {
    first_text_capture(event, &COMMENT_ANNOTATION).map(|path| PathResolution {
        path,
        source: PathSource::CommentAnnotation,
        confidence: Confidence::Medium,
    })
}

fn from_free_text(event: &Event) -> Option<PathResolution> {
    let mut seen: Vec<String> = Vec::new();
    for text in text_blocks(event) {
        for captures in FREE_TEXT_PATH.captures_iter(text) {
            let Some(token) = captures.get(1).or_else(|| captures.get(2)) else {
                continue;
            };
            let candidate = token.as_str().trim().to_string();
            if seen.contains(&candidate) {
                continue;
            }
            seen.push(candidate.clone());
            if is_valid_file_path(&candidate) {
                return Some(PathResolution {
                    path: candidate,
                    source: PathSource::TextMatch,
                    confidence: Confidence::Low,
                });
            }
        }
    }
    None
}

fn first_text_capture(event: &Event, pattern: &Regex) -> Option<String> {
    for text in text_blocks(event) {
        for captures in pattern.captures_iter(text) {
            let Some(token) = captures.get(1) else {
                continue;
            };
            let candidate = token.as_str().trim();
            if is_valid_file_path(candidate) {
                return Some(candidate.to_string());
            }
        }
    }
    None
}

fn text_blocks(event: &Event) -> impl Iterator<Item = &str> {
    event.blocks.iter().filter_map(|block| match block {
        ContentBlock::Text { text } => Some(text.as_str()),
        _ => None,
    })
}
