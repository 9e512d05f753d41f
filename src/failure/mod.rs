pub mod adapter;

use std::collections::BTreeMap;

/// Structured field holding the offending token of a no-match failure.
pub const TOKEN_FIELD: &str = "token";
/// Structured field holding the cell list of a circular-reference failure.
pub const CELLS_FIELD: &str = "cells";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
pub enum FailureKind {
    ExpressionParseFailure,
    SpreadsheetFailure,
    NullReferenceFailure,
    Generic,
}

/// Normalized view of a raised failure.
///
/// Fields are private: once built, a descriptor is read-only.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDescriptor {
    kind: FailureKind,
    message: String,
    stack_frames: Vec<String>,
    structured_fields: BTreeMap<String, String>,
}

impl FailureDescriptor {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stack_frames: Vec::new(),
            structured_fields: BTreeMap::new(),
        }
    }

    pub fn with_stack_frames<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stack_frames = frames.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.structured_fields.insert(name.into(), value.into());
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack_frames(&self) -> &[String] {
        &self.stack_frames
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.structured_fields.get(name).map(String::as_str)
    }

    pub fn token(&self) -> Option<&str> {
        self.field(TOKEN_FIELD)
    }

    pub fn cells(&self) -> Option<&str> {
        self.field(CELLS_FIELD)
    }

    pub fn is_spreadsheet_failure(&self) -> bool {
        self.kind == FailureKind::SpreadsheetFailure
    }

    /// Case-sensitive; an empty trace never matches.
    pub fn stack_trace_contains(&self, needle: &str) -> bool {
        self.stack_frames.iter().any(|frame| frame.contains(needle))
    }
}
