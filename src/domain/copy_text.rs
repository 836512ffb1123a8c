use crate::domain::{ContentBlock, Event, StandardTool, ToolInvocation};
use serde_json::Value;

/// Raw-input fields consulted for unclassified tools, most specific first.
/// Purely structural payloads (e.g. a bare todo list) carry none of these and
/// deliberately contribute nothing.
const RAW_BODY_FIELDS: &[&str] = &["url", "query", "description", "content", "message", "text"];

/// The meaningful payload of an event for clipboard/export use: one string
/// per block, blank-line separated, in block order.
pub fn extract_copyable_body(event: &Event) -> String {
    let mut parts: Vec<String> = Vec::new();
    for block in &event.blocks {
        let text = match block {
            ContentBlock::Text { text }
            | ContentBlock::Thinking { text }
            | ContentBlock::Reference { text } => text.trim().to_string(),
            ContentBlock::ToolInvocation(invocation) => invocation_body(invocation),
            // Verbatim: line-number cleanup belongs to content resolution,
            // not to copy/export.
            ContentBlock::ToolResult(result) => result.output.clone(),
            ContentBlock::CodeDiff { diff } => diff.clone(),
            ContentBlock::Image => String::new(),
        };
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join("\n\n")
}

/// Whether the event holds any block kind that can contribute copy text.
/// This checks kind eligibility only; the extracted body may still be empty.
pub fn has_copiable_content(event: &Event) -> bool {
    event.blocks.iter().any(|block| {
        matches!(
            block,
            ContentBlock::Text { .. }
                | ContentBlock::Thinking { .. }
                | ContentBlock::Reference { .. }
                | ContentBlock::ToolInvocation(_)
                | ContentBlock::ToolResult(_)
                | ContentBlock::CodeDiff { .. }
        )
    })
}

fn invocation_body(invocation: &ToolInvocation) -> String {
    match &invocation.standard {
        Some(StandardTool::ShellExec { command }) => command.clone(),
        Some(StandardTool::FileRead { path })
        | Some(StandardTool::FileWrite { path, .. })
        | Some(StandardTool::FileEdit { path, .. }) => path.clone(),
        Some(StandardTool::ContentSearch { pattern, .. }) => pattern.clone(),
        Some(StandardTool::FileSearch { glob, .. }) => glob.clone(),
        Some(StandardTool::SkillInvoke { .. }) | Some(StandardTool::Other) | None => {
            raw_input_body(&invocation.input)
        }
    }
}

fn raw_input_body(input: &Value) -> String {
    for field in RAW_BODY_FIELDS {
        let Some(text) = input.get(field).and_then(|v| v.as_str()) else {
            continue;
        };
        if !text.trim().is_empty() {
            return text.trim().to_string();
        }
    }
    String::new()
}
