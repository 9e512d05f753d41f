use crate::enrich::WorkbookMetadata;

/// A failure raised by the formula evaluation engine, as reported across the
/// evaluation boundary.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RaisedFailure {
    /// Runtime type name of the raised failure (e.g. `"SpreadsheetException"`).
    pub failure_type: String,
    /// Description text of the failure.
    pub message: String,
    /// Raw stack trace text, one frame per line.
    #[serde(default)]
    pub stack_trace: Option<String>,
    /// Offending token, carried by structured spreadsheet failures.
    #[serde(default)]
    pub token: Option<serde_json::Value>,
    /// Cells involved in the failure, either a single string or a list of cell ids.
    #[serde(default)]
    pub cells: Option<serde_json::Value>,
}

/// Workbook metadata held as plain data.
///
/// Used when the caller has already read the formula name and presentation out
/// of the workbook, e.g. across the wasm boundary.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct WorkbookSnapshot {
    /// Name of the tax formula whose evaluation failed.
    pub formula_name: String,
    /// Opaque presentation value, passed through untouched.
    #[serde(default)]
    pub presentation: serde_json::Value,
}

impl WorkbookMetadata for WorkbookSnapshot {
    type Presentation = serde_json::Value;

    fn formula_name(&self) -> String {
        self.formula_name.clone()
    }

    fn presentation(&self) -> Self::Presentation {
        self.presentation.clone()
    }
}
