pub mod chain;
pub mod rules;

use crate::failure::FailureDescriptor;

/// A single recognize-and-render rule.
///
/// Implementations hold no state, so one instance can serve any number of
/// concurrent callers.
pub trait Classifier: Send + Sync {
    /// Stable identifier, used for logging and for reporting which rule matched.
    fn name(&self) -> &'static str;

    fn applies(&self, failure: &FailureDescriptor) -> bool;

    fn render(&self, formula_name: &str, failure: &FailureDescriptor) -> String;
}

impl<T: Classifier + ?Sized> Classifier for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn applies(&self, failure: &FailureDescriptor) -> bool {
        (**self).applies(failure)
    }

    fn render(&self, formula_name: &str, failure: &FailureDescriptor) -> String {
        (**self).render(formula_name, failure)
    }
}
