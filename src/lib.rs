#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod classify;
pub mod enrich;
pub mod error;
pub mod failure;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use classify::Classifier;
pub use classify::chain::{ClassifierChain, ClassifierChainBuilder};
pub use classify::rules::{
    CircularReferenceClassifier, FallbackClassifier, InvalidExpressionClassifier,
    MissingLookupTableClassifier, NoMatchClassifier, StandardRule,
};
pub use enrich::{ErrorEnricher, ErrorResult, WorkbookMetadata, enrich_error};
pub use error::Error;
pub use failure::adapter::describe;
pub use failure::{FailureDescriptor, FailureKind};
pub use types::{RaisedFailure, WorkbookSnapshot};
