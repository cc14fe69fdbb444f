use serde::Deserialize;

use super::ClassifierError;
use super::FixedClassifier;
use super::ImageClassifier;
use super::ScriptedClassifier;

/// Classifier selection, as found under `[camera.classifier]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassifierConfig {
    /// Always answer `cat`
    Fixed {
        #[serde(default)]
        cat: bool,
    },

    /// Replay `sequence`, cycling
    Scripted { sequence: Vec<bool> },
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::Fixed { cat: false }
    }
}

impl ClassifierConfig {
    /// Construct the configured classifier
    pub fn build(&self) -> Result<Box<dyn ImageClassifier>, ClassifierError> {
        match self {
            Self::Fixed { cat } => Ok(Box::new(FixedClassifier::new(*cat))),
            Self::Scripted { sequence } => Ok(Box::new(ScriptedClassifier::new(sequence.clone())?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Camera {
        classifier: ClassifierConfig,
    }

    #[test]
    fn test_parse_fixed() {
        let camera: Camera = toml::from_str(
            r#"
            [classifier]
            kind = "fixed"
            cat = true
            "#,
        )
        .unwrap();
        assert_eq!(camera.classifier, ClassifierConfig::Fixed { cat: true });
    }

    #[test]
    fn test_parse_fixed_defaults_to_no_cat() {
        let camera: Camera = toml::from_str(
            r#"
            [classifier]
            kind = "fixed"
            "#,
        )
        .unwrap();
        assert_eq!(camera.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_parse_scripted_and_build() {
        let camera: Camera = toml::from_str(
            r#"
            [classifier]
            kind = "scripted"
            sequence = [false, true]
            "#,
        )
        .unwrap();

        let mut classifier = camera.classifier.build().unwrap();
        assert!(!classifier.image_contains_cat().unwrap());
        assert!(classifier.image_contains_cat().unwrap());
        assert!(!classifier.image_contains_cat().unwrap());
    }

    #[test]
    fn test_build_empty_script_fails() {
        let config = ClassifierConfig::Scripted {
            sequence: Vec::new(),
        };
        assert!(matches!(config.build(), Err(ClassifierError::EmptyScript)));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result: Result<Camera, _> = toml::from_str(
            r#"
            [classifier]
            kind = "neural"
            "#,
        );
        assert!(result.is_err());
    }
}
