use crate::classify::chain::ClassifierChain;
use crate::failure::FailureDescriptor;
use crate::types::RaisedFailure;

/// Read-only view of the workbook whose formula failed.
///
/// Both accessors must be free of side effects and return stable values for a
/// given workbook snapshot.
pub trait WorkbookMetadata {
    /// Opaque value describing how the error should be displayed.
    type Presentation;

    fn formula_name(&self) -> String;

    fn presentation(&self) -> Self::Presentation;
}

/// User-facing description of a failed formula evaluation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResult<P> {
    pub formula_name: String,
    pub message: String,
    pub presentation: P,
}

/// Turns a failure into an [`ErrorResult`] by running it through a
/// [`ClassifierChain`].
///
/// Enrichment has no failure mode of its own: the chain always yields a
/// classifier, and rules that cannot read what they need do not match.
#[derive(Debug, Clone, Copy)]
pub struct ErrorEnricher<'a> {
    chain: &'a ClassifierChain,
}

impl ErrorEnricher<'static> {
    pub fn standard() -> Self {
        Self {
            chain: ClassifierChain::shared(),
        }
    }
}

impl Default for ErrorEnricher<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> ErrorEnricher<'a> {
    pub fn with_chain(chain: &'a ClassifierChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &'a ClassifierChain {
        self.chain
    }

    pub fn enrich<W>(
        &self,
        workbook: &W,
        failure: &FailureDescriptor,
    ) -> ErrorResult<W::Presentation>
    where
        W: WorkbookMetadata + ?Sized,
    {
        let formula_name = workbook.formula_name();
        let presentation = workbook.presentation();

        let classifier = self.chain.find_first_match(failure);
        let message = classifier.render(&formula_name, failure);
        tracing::debug!(
            formula_name = %formula_name,
            classifier = classifier.name(),
            "enriched formula failure"
        );

        ErrorResult {
            formula_name,
            message,
            presentation,
        }
    }

    pub fn enrich_raised<W>(
        &self,
        workbook: &W,
        raised: &RaisedFailure,
    ) -> ErrorResult<W::Presentation>
    where
        W: WorkbookMetadata + ?Sized,
    {
        self.enrich(workbook, &FailureDescriptor::from(raised))
    }
}

/// Enrich with the process-wide standard chain.
pub fn enrich_error<W>(workbook: &W, failure: &FailureDescriptor) -> ErrorResult<W::Presentation>
where
    W: WorkbookMetadata + ?Sized,
{
    ErrorEnricher::standard().enrich(workbook, failure)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::classify::Classifier;
    use crate::failure::{CELLS_FIELD, FailureKind, TOKEN_FIELD};
    use crate::types::WorkbookSnapshot;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Panel {
        Inline,
        Dialog,
    }

    struct TaxWorkbook {
        formula: &'static str,
        panel: Panel,
        reads: Cell<u32>,
    }

    impl TaxWorkbook {
        fn new(formula: &'static str) -> Self {
            Self {
                formula,
                panel: Panel::Dialog,
                reads: Cell::new(0),
            }
        }
    }

    impl WorkbookMetadata for TaxWorkbook {
        type Presentation = Panel;

        fn formula_name(&self) -> String {
            self.reads.set(self.reads.get() + 1);
            self.formula.to_string()
        }

        fn presentation(&self) -> Panel {
            self.panel
        }
    }

    #[test]
    fn invalid_expression_scenario() {
        let failure = FailureDescriptor::new(FailureKind::ExpressionParseFailure, "bad token");
        let result = enrich_error(&TaxWorkbook::new("VAT_RATE"), &failure);
        assert_eq!(
            result,
            ErrorResult {
                formula_name: "VAT_RATE".to_string(),
                message: "Invalid expression found in tax formula [VAT_RATE]. Check that separators and delimiters use the English locale.".to_string(),
                presentation: Panel::Dialog,
            }
        );
    }

    #[test]
    fn circular_reference_scenario() {
        let failure =
            FailureDescriptor::new(FailureKind::SpreadsheetFailure, "Circular Reference detected")
                .with_field(CELLS_FIELD, "A1,B2");
        let result = enrich_error(&TaxWorkbook::new("TOTAL"), &failure);
        assert_eq!(
            result.message,
            "Circular Reference in spreadsheet related to formula 'TOTAL'. Cells: A1,B2"
        );
    }

    #[test]
    fn missing_lookup_table_scenario_ignores_formula_name() {
        let failure = FailureDescriptor::new(
            FailureKind::NullReferenceFailure,
            "Object reference not set to an instance of an object",
        )
        .with_stack_frames(["at VLookup(...)", "at Main()"]);

        for formula in ["RATE", "TOTAL", ""] {
            let result = enrich_error(&TaxWorkbook::new(formula), &failure);
            assert_eq!(result.message, "Missing Lookup Table");
            assert_eq!(result.formula_name, formula);
        }
    }

    #[test]
    fn no_match_scenario() {
        let failure = FailureDescriptor::new(FailureKind::SpreadsheetFailure, "No matches found")
            .with_field(TOKEN_FIELD, "XYZ");
        let result = enrich_error(&TaxWorkbook::new("LOOKUP"), &failure);
        assert_eq!(
            result.message,
            "No match found for token [XYZ] related to formula 'LOOKUP'."
        );
    }

    #[test]
    fn fallback_scenario_passes_message_through() {
        let failure = FailureDescriptor::new(FailureKind::Generic, "disk full");
        let result = enrich_error(&TaxWorkbook::new("ANY"), &failure);
        assert_eq!(result.message, "disk full");
    }

    #[test]
    fn no_match_message_on_unstructured_failure_is_shown_verbatim() {
        let failure = FailureDescriptor::new(FailureKind::Generic, "No matches found");
        let result = enrich_error(&TaxWorkbook::new("LOOKUP"), &failure);
        assert_eq!(result.message, "No matches found");
    }

    #[test]
    fn enrichment_is_idempotent() {
        let workbook = TaxWorkbook::new("TOTAL");
        let failure =
            FailureDescriptor::new(FailureKind::SpreadsheetFailure, "Circular Reference detected")
                .with_field(CELLS_FIELD, "A1,B2");
        let enricher = ErrorEnricher::standard();
        let first = enricher.enrich(&workbook, &failure);
        let second = enricher.enrich(&workbook, &failure);
        assert_eq!(first, second);
    }

    #[test]
    fn presentation_is_passed_through_untouched() {
        let workbook = TaxWorkbook {
            panel: Panel::Inline,
            ..TaxWorkbook::new("RATE")
        };
        let failure = FailureDescriptor::new(FailureKind::Generic, "disk full");
        let result = ErrorEnricher::default().enrich(&workbook, &failure);
        assert_eq!(result.presentation, Panel::Inline);
        assert_eq!(workbook.reads.get(), 1);
    }

    #[test]
    fn custom_chain_is_consulted() {
        struct Shouting;

        impl Classifier for Shouting {
            fn name(&self) -> &'static str {
                "shouting"
            }

            fn applies(&self, failure: &FailureDescriptor) -> bool {
                failure.kind() == FailureKind::Generic
            }

            fn render(&self, formula_name: &str, failure: &FailureDescriptor) -> String {
                format!("{formula_name}: {}", failure.message().to_uppercase())
            }
        }

        let chain = ClassifierChain::builder()
            .standard_rules()
            .rule(Shouting)
            .build();
        let enricher = ErrorEnricher::with_chain(&chain);
        assert_eq!(enricher.chain().len(), 5);

        let failure = FailureDescriptor::new(FailureKind::Generic, "disk full");
        let result = enricher.enrich(&TaxWorkbook::new("RATE"), &failure);
        assert_eq!(result.message, "RATE: DISK FULL");

        let failure = FailureDescriptor::new(FailureKind::ExpressionParseFailure, "bad token");
        let result = enricher.enrich(&TaxWorkbook::new("RATE"), &failure);
        assert!(result.message.starts_with("Invalid expression found"));
    }

    #[test]
    fn raised_failure_is_described_before_classification() {
        let workbook = WorkbookSnapshot {
            formula_name: "TOTAL".to_string(),
            presentation: serde_json::json!({"panel": "formula-errors"}),
        };
        let raised = RaisedFailure {
            failure_type: "SpreadsheetException".to_string(),
            message: "Circular Reference detected".to_string(),
            stack_trace: None,
            token: None,
            cells: Some(serde_json::json!(["A1", "B2"])),
        };
        let result = ErrorEnricher::standard().enrich_raised(&workbook, &raised);
        assert_eq!(
            result.message,
            "Circular Reference in spreadsheet related to formula 'TOTAL'. Cells: A1,B2"
        );
        assert_eq!(
            result.presentation,
            serde_json::json!({"panel": "formula-errors"})
        );
    }

    #[test]
    fn result_serializes_with_camel_case_keys() {
        let result = ErrorResult {
            formula_name: "RATE".to_string(),
            message: "disk full".to_string(),
            presentation: serde_json::json!("inline"),
        };
        assert_eq!(
            serde_json::to_value(&result).ok(),
            Some(serde_json::json!({
                "formulaName": "RATE",
                "message": "disk full",
                "presentation": "inline"
            }))
        );
    }
}
