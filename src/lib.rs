//! Session content resolution engine for recorded AI-coding-agent sessions.
//!
//! Given an ordered, immutable log of session events ([`Event`]), the engine
//! answers two questions with no I/O and no user interaction:
//!
//! - which file path, if any, an event (or a nearby event) is about
//!   ([`resolve_path_for_event`], [`resolve_path_near`]), and
//! - what the content of a file was at a point in the timeline
//!   ([`resolve_content_near`]), plus the canonical copyable payload of a
//!   single event ([`extract_copyable_body`], [`has_copiable_content`]).
//!
//! Every entry point is a pure function over `(events, index[, path])`.
//! Absence of evidence is an expected outcome, represented by `None` or an
//! empty string, never an error.

pub mod domain;

pub use domain::*;
