use crate::classify::rules::NULL_REFERENCE_MESSAGE;
use crate::error::Error;
use crate::failure::{CELLS_FIELD, FailureDescriptor, FailureKind, TOKEN_FIELD};
use crate::types::RaisedFailure;

pub const EXPRESSION_PARSE_FAILURE_TYPE: &str = "ExpressionParseException";
pub const SPREADSHEET_FAILURE_TYPE: &str = "SpreadsheetException";

/// Resolve the failure kind once, from the raised failure's runtime type name.
///
/// Null-reference failures have no distinguishing type and are recognized by
/// their message text instead.
pub fn kind_for(failure_type: &str, message: &str) -> FailureKind {
    match failure_type {
        EXPRESSION_PARSE_FAILURE_TYPE => FailureKind::ExpressionParseFailure,
        SPREADSHEET_FAILURE_TYPE => FailureKind::SpreadsheetFailure,
        _ if message == NULL_REFERENCE_MESSAGE => FailureKind::NullReferenceFailure,
        _ => FailureKind::Generic,
    }
}

pub fn split_stack_trace(stack_trace: Option<&str>) -> Vec<String> {
    match stack_trace {
        Some(trace) if !trace.is_empty() => trace.split('\n').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

pub fn parse_token(value: &serde_json::Value) -> Result<String, Error> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::Parse {
            reason: format!("token is not a scalar: {other}"),
        }),
    }
}

pub fn parse_cells(value: &serde_json::Value) -> Result<String, Error> {
    if let Some(s) = value.as_str() {
        return Ok(s.to_string());
    }

    let arr = value.as_array().ok_or_else(|| Error::Parse {
        reason: "cells is neither a string nor an array".into(),
    })?;
    if arr.is_empty() {
        return Err(Error::Parse {
            reason: "cells array is empty".into(),
        });
    }

    let mut ids = Vec::with_capacity(arr.len());
    for item in arr {
        let id = item.as_str().ok_or_else(|| Error::Parse {
            reason: format!("cell id is not a string: {item}"),
        })?;
        ids.push(id);
    }
    Ok(ids.join(","))
}

/// Build the descriptor for a raised failure. Never fails: a structured field
/// that cannot be read is left out so the rules depending on it do not match.
pub fn describe(raised: &RaisedFailure) -> FailureDescriptor {
    let kind = kind_for(&raised.failure_type, &raised.message);
    let mut failure = FailureDescriptor::new(kind, raised.message.clone())
        .with_stack_frames(split_stack_trace(raised.stack_trace.as_deref()));

    if kind != FailureKind::SpreadsheetFailure {
        return failure;
    }

    let structured = [
        (TOKEN_FIELD, raised.token.as_ref().map(parse_token)),
        (CELLS_FIELD, raised.cells.as_ref().map(parse_cells)),
    ];
    for (name, parsed) in structured {
        match parsed {
            Some(Ok(value)) => failure = failure.with_field(name, value),
            Some(Err(err)) => {
                tracing::warn!(structured_field = name, %err, "dropping unreadable structured field");
            }
            None => {}
        }
    }
    failure
}

impl From<&RaisedFailure> for FailureDescriptor {
    fn from(raised: &RaisedFailure) -> Self {
        describe(raised)
    }
}
