use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a session log. Events are produced by the session store,
/// ordered by position, and never mutated here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub role: Role,
    /// RFC 3339 timestamp, non-decreasing across the log by construction.
    pub timestamp: String,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

impl Event {
    pub fn timestamp_ms(&self) -> Option<i64> {
        parse_rfc3339_to_unix_ms(&self.timestamp)
    }
}

/// One typed unit inside an event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Thinking { text: String },
    Reference { text: String },
    ToolInvocation(ToolInvocation),
    ToolResult(ToolResult),
    CodeDiff { diff: String },
    Image,
}

/// A tool call as recorded in the log. `name` and `input` are whatever the
/// originating agent emitted; `standard` is the session store's normalized
/// reading of the call, attached only when the store recognized the tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<StandardTool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub is_error: bool,
    /// Set by the session store when it correlated this result with the
    /// invocation that produced it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_file_path: Option<String>,
}

/// Normalized tool semantics, independent of the originating agent's raw
/// naming. The open tool-name space collapses to this closed union upstream;
/// unrecognized calls arrive as `Other` with name and input still available
/// on the enclosing [`ToolInvocation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum StandardTool {
    ShellExec {
        command: String,
    },
    FileRead {
        path: String,
    },
    FileWrite {
        path: String,
        content: String,
    },
    FileEdit {
        path: String,
        #[serde(default)]
        old_string: Option<String>,
        #[serde(default)]
        new_string: Option<String>,
    },
    ContentSearch {
        pattern: String,
        #[serde(default)]
        path: Option<String>,
    },
    FileSearch {
        glob: String,
        #[serde(default)]
        path: Option<String>,
    },
    SkillInvoke {
        skill: String,
    },
    Other,
}

impl StandardTool {
    /// The file path this tool operates on, when its semantics carry one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::FileRead { path }
            | Self::FileWrite { path, .. }
            | Self::FileEdit { path, .. } => Some(path),
            Self::ContentSearch { path, .. } | Self::FileSearch { path, .. } => path.as_deref(),
            Self::ShellExec { .. } | Self::SkillInvoke { .. } | Self::Other => None,
        }
    }
}

pub fn parse_rfc3339_to_unix_ms(value: &str) -> Option<i64> {
    let timestamp = OffsetDateTime::parse(value, &Rfc3339).ok()?;
    let ms: i128 = timestamp.unix_timestamp_nanos() / 1_000_000;
    i64::try_from(ms).ok()
}
