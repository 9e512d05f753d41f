use crate::classify::Classifier;
use crate::failure::{FailureDescriptor, FailureKind};

pub const CIRCULAR_REFERENCE_PREFIX: &str = "Circular Reference";
pub const NULL_REFERENCE_MESSAGE: &str = "Object reference not set to an instance of an object";
pub const LOOKUP_FRAME_MARKER: &str = "VLookup";
pub const NO_MATCHES_MESSAGE: &str = "No matches found";
pub const MISSING_LOOKUP_TABLE_MESSAGE: &str = "Missing Lookup Table";
pub const FALLBACK_NAME: &str = "fallback";

/// The specific rules of the standard chain, in evaluation order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum StandardRule {
    InvalidExpression,
    CircularReference,
    MissingLookupTable,
    NoMatch,
}

impl StandardRule {
    pub fn classifier(self) -> &'static dyn Classifier {
        match self {
            Self::InvalidExpression => &InvalidExpressionClassifier,
            Self::CircularReference => &CircularReferenceClassifier,
            Self::MissingLookupTable => &MissingLookupTableClassifier,
            Self::NoMatch => &NoMatchClassifier,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidExpressionClassifier;

impl Classifier for InvalidExpressionClassifier {
    fn name(&self) -> &'static str {
        StandardRule::InvalidExpression.into()
    }

    fn applies(&self, failure: &FailureDescriptor) -> bool {
        failure.kind() == FailureKind::ExpressionParseFailure
    }

    fn render(&self, formula_name: &str, _failure: &FailureDescriptor) -> String {
        format!(
            "Invalid expression found in tax formula [{formula_name}]. Check that separators and delimiters use the English locale."
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CircularReferenceClassifier;

impl Classifier for CircularReferenceClassifier {
    fn name(&self) -> &'static str {
        StandardRule::CircularReference.into()
    }

    fn applies(&self, failure: &FailureDescriptor) -> bool {
        failure.is_spreadsheet_failure()
            && failure.message().starts_with(CIRCULAR_REFERENCE_PREFIX)
            && failure.cells().is_some()
    }

    fn render(&self, formula_name: &str, failure: &FailureDescriptor) -> String {
        let Some(cells) = failure.cells() else {
            return failure.message().to_string();
        };
        format!(
            "Circular Reference in spreadsheet related to formula '{formula_name}'. Cells: {cells}"
        )
    }
}

/// Lookup against a missing table surfaces as a bare null reference raised
/// from inside the lookup function; only the stack tells it apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingLookupTableClassifier;

impl Classifier for MissingLookupTableClassifier {
    fn name(&self) -> &'static str {
        StandardRule::MissingLookupTable.into()
    }

    fn applies(&self, failure: &FailureDescriptor) -> bool {
        failure.message() == NULL_REFERENCE_MESSAGE
            && failure.stack_trace_contains(LOOKUP_FRAME_MARKER)
    }

    fn render(&self, _formula_name: &str, _failure: &FailureDescriptor) -> String {
        MISSING_LOOKUP_TABLE_MESSAGE.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoMatchClassifier;

impl Classifier for NoMatchClassifier {
    fn name(&self) -> &'static str {
        StandardRule::NoMatch.into()
    }

    fn applies(&self, failure: &FailureDescriptor) -> bool {
        failure.is_spreadsheet_failure()
            && failure.message() == NO_MATCHES_MESSAGE
            && failure.token().is_some()
    }

    fn render(&self, formula_name: &str, failure: &FailureDescriptor) -> String {
        let Some(token) = failure.token() else {
            return failure.message().to_string();
        };
        format!("No match found for token [{token}] related to formula '{formula_name}'.")
    }
}

/// Last-resort rule: always applies and shows the failure text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackClassifier;

impl Classifier for FallbackClassifier {
    fn name(&self) -> &'static str {
        FALLBACK_NAME
    }

    fn applies(&self, _failure: &FailureDescriptor) -> bool {
        true
    }

    fn render(&self, _formula_name: &str, failure: &FailureDescriptor) -> String {
        failure.message().to_string()
    }
}
