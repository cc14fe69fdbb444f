use tracing::trace;

use super::ClassifierError;
use super::ImageClassifier;

/// Classifier that always gives the same answer
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClassifier {
    cat: bool,
}

impl FixedClassifier {
    pub fn new(cat: bool) -> Self {
        Self { cat }
    }
}

impl ImageClassifier for FixedClassifier {
    fn image_contains_cat(&mut self) -> Result<bool, ClassifierError> {
        trace!(cat = self.cat, "fixed classifier answered");
        Ok(self.cat)
    }
}

/// Classifier that replays a sequence of answers, starting over once the
/// sequence is exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedClassifier {
    script: Vec<bool>,
    next: usize,
}

impl ScriptedClassifier {
    /// Create a classifier from a non-empty answer sequence
    pub fn new(script: Vec<bool>) -> Result<Self, ClassifierError> {
        if script.is_empty() {
            return Err(ClassifierError::EmptyScript);
        }
        Ok(Self { script, next: 0 })
    }
}

impl ImageClassifier for ScriptedClassifier {
    fn image_contains_cat(&mut self) -> Result<bool, ClassifierError> {
        let cat = self.script[self.next];
        self.next = (self.next + 1) % self.script.len();
        trace!(cat, position = self.next, "scripted classifier answered");
        Ok(cat)
    }
}
