//! Image classification boundary for catpoint.
//!
//! The security controller only ever asks one question of the camera: does the
//! current image contain a cat? How that question is answered is up to the
//! [`ImageClassifier`] implementation. This crate ships deterministic
//! classifiers that stand in for a real recognition backend, and the
//! configuration block used to pick one at startup.

mod config;
mod fake;

pub use config::ClassifierConfig;
pub use fake::FixedClassifier;
pub use fake::ScriptedClassifier;

/// Errors reported by image classifiers
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Scripted classifier needs at least one answer")]
    EmptyScript,

    #[error("Image classification failed: {0}")]
    Failed(String),
}

/// Capability that decides whether the current camera image shows a cat.
///
/// Image acquisition is the implementation's concern; callers supply no
/// arguments and only see the boolean verdict.
pub trait ImageClassifier: Send {
    /// Classify the current image
    fn image_contains_cat(&mut self) -> Result<bool, ClassifierError>;
}

impl<T: ImageClassifier + ?Sized> ImageClassifier for Box<T> {
    fn image_contains_cat(&mut self) -> Result<bool, ClassifierError> {
        (**self).image_contains_cat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_classifier_delegates() {
        let mut classifier: Box<dyn ImageClassifier> = Box::new(FixedClassifier::new(true));
        assert!(classifier.image_contains_cat().unwrap());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ClassifierError::EmptyScript.to_string(),
            "Scripted classifier needs at least one answer"
        );
        assert_eq!(
            ClassifierError::Failed("camera offline".to_string()).to_string(),
            "Image classification failed: camera offline"
        );
    }
}
