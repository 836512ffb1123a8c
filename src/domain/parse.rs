use crate::domain::Event;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Decode one standardized event from a JSONL line.
pub fn parse_event_line(line: &str) -> Result<Event, ParseError> {
    let event: Event = serde_json::from_str(line)?;
    if event.id.trim().is_empty() {
        return Err(ParseError::MissingField("id"));
    }
    Ok(event)
}

/// Decode a whole session log (one event per line, blank lines skipped).
pub fn parse_session_log(text: &str) -> Result<Vec<Event>, ParseError> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_event_line)
        .collect()
}
