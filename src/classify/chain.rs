use std::sync::LazyLock;

use strum::IntoEnumIterator;

use crate::classify::Classifier;
use crate::classify::rules::{FallbackClassifier, StandardRule};
use crate::failure::FailureDescriptor;

static SHARED: LazyLock<ClassifierChain> = LazyLock::new(ClassifierChain::standard);

/// Ordered rules plus a mandatory fallback.
///
/// Rule priority is list position; the fallback is held outside the list so
/// it can only ever be consulted last. A chain cannot be modified once built.
pub struct ClassifierChain {
    rules: Vec<Box<dyn Classifier>>,
    fallback: FallbackClassifier,
}

impl ClassifierChain {
    pub fn builder() -> ClassifierChainBuilder {
        ClassifierChainBuilder { rules: Vec::new() }
    }

    pub fn standard() -> Self {
        Self::builder().standard_rules().build()
    }

    /// Process-wide standard chain, built on first use.
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// First rule that applies, or the fallback. Never "no match".
    pub fn find_first_match(&self, failure: &FailureDescriptor) -> &dyn Classifier {
        let classifier = self
            .rules
            .iter()
            .map(Box::as_ref)
            .find(|rule| (**rule).applies(failure))
            .unwrap_or(&self.fallback as &dyn Classifier);
        tracing::trace!(
            classifier = classifier.name(),
            kind = %failure.kind(),
            "classifier matched"
        );
        classifier
    }

    /// Names of the specific rules in evaluation order, fallback excluded.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn fallback(&self) -> &dyn Classifier {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for ClassifierChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ClassifierChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierChain")
            .field("rules", &self.rule_names())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

/// Collects rules in priority order. `build` appends the fallback.
#[derive(Default)]
pub struct ClassifierChainBuilder {
    rules: Vec<Box<dyn Classifier>>,
}

impl ClassifierChainBuilder {
    pub fn rule<C: Classifier + 'static>(mut self, classifier: C) -> Self {
        self.rules.push(Box::new(classifier));
        self
    }

    pub fn standard_rules(self) -> Self {
        StandardRule::iter().fold(self, |builder, rule| builder.rule(rule.classifier()))
    }

    pub fn build(self) -> ClassifierChain {
        ClassifierChain {
            rules: self.rules,
            fallback: FallbackClassifier,
        }
    }
}
