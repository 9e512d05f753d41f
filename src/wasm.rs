use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::classify::chain::ClassifierChain;
use crate::enrich::ErrorEnricher;
use crate::error::Error;
use crate::failure::FailureDescriptor;
use crate::types::{RaisedFailure, WorkbookSnapshot};

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

fn parse_json<T: DeserializeOwned>(json: &str) -> Result<T, Error> {
    Ok(serde_json::from_str(json)?)
}

/// Enrich a raised failure reported as JSON against workbook metadata reported as JSON.
#[wasm_bindgen]
pub fn enrich_json(workbook_json: &str, failure_json: &str) -> JsValue {
    let workbook: WorkbookSnapshot = match parse_json(workbook_json) {
        Ok(w) => w,
        Err(err) => return error_result(&err),
    };
    let raised: RaisedFailure = match parse_json(failure_json) {
        Ok(r) => r,
        Err(err) => return error_result(&err),
    };

    to_js(&ErrorEnricher::standard().enrich_raised(&workbook, &raised))
}

/// Report which rule a raised failure would be classified under.
#[wasm_bindgen]
pub fn classify_json(failure_json: &str) -> JsValue {
    let raised: RaisedFailure = match parse_json(failure_json) {
        Ok(r) => r,
        Err(err) => return error_result(&err),
    };

    let failure = FailureDescriptor::from(&raised);
    let classifier = ClassifierChain::shared().find_first_match(&failure);
    to_js(&serde_json::json!({
        "classifier": classifier.name(),
        "kind": failure.kind().as_ref(),
    }))
}

/// Return the normalized descriptor derived from a raised failure.
#[wasm_bindgen]
pub fn describe_json(failure_json: &str) -> JsValue {
    match parse_json::<RaisedFailure>(failure_json) {
        Ok(raised) => to_js(&FailureDescriptor::from(&raised)),
        Err(err) => error_result(&err),
    }
}

/// Rule names in evaluation order, fallback last.
#[wasm_bindgen]
pub fn get_rules() -> JsValue {
    let chain = ClassifierChain::shared();
    let mut names = chain.rule_names();
    names.push(chain.fallback().name());
    to_js(&names)
}

fn error_result(err: &Error) -> JsValue {
    to_js(&serde_json::json!({"error": err.to_string()}))
}
