//! Inference dispatcher
//!
//! Validates a feature vector against its disease schema, invokes the
//! registry's classifier and turns the raw scalar into an [`Outcome`].
//! Every failure is returned to the caller; nothing here is fatal.

use crate::errors::{Result, SmartMedError};
use crate::inference::schema::{FeatureSchema, FeatureVector};
use crate::models::{Disease, ModelRegistry};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// Binary prediction outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Positive,
    Negative,
}

impl Outcome {
    /// Map a classifier's raw output: exactly 1 is positive, anything else negative
    pub fn from_raw(raw: f64) -> Self {
        if raw == 1.0 {
            Outcome::Positive
        } else {
            Outcome::Negative
        }
    }
}

/// Result of one prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub disease: Disease,
    pub outcome: Outcome,
}

impl PredictionResult {
    /// Disease-specific label, e.g. "Diabetes Detected"
    pub fn label(&self) -> &'static str {
        match self.outcome {
            Outcome::Positive => self.disease.positive_label(),
            Outcome::Negative => self.disease.negative_label(),
        }
    }

    pub fn is_positive(&self) -> bool {
        self.outcome == Outcome::Positive
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prediction: {}", self.label())
    }
}

/// Dispatches prediction requests to the registry's classifiers
#[derive(Clone)]
pub struct InferenceDispatcher {
    registry: Arc<ModelRegistry>,
}

impl InferenceDispatcher {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Run one prediction
    pub fn predict(&self, disease: Disease, vector: &FeatureVector) -> Result<PredictionResult> {
        let result = self.try_predict(disease, vector);
        if let Err(e) = &result {
            error!(disease = disease.key(), error = %e, "Prediction failed");
        }
        result
    }

    fn try_predict(&self, disease: Disease, vector: &FeatureVector) -> Result<PredictionResult> {
        let schema = FeatureSchema::for_disease(disease);

        if vector.len() != schema.len() {
            return Err(SmartMedError::ArityMismatch {
                disease,
                expected: schema.len(),
                actual: vector.len(),
            });
        }

        if let Some((spec, _)) = schema
            .fields
            .iter()
            .zip(vector.values())
            .find(|(_, v)| !v.is_finite())
        {
            return Err(SmartMedError::NonFiniteFeature {
                feature: spec.name.to_string(),
            });
        }

        let classifier = self.registry.get(disease);
        let raw = classifier.predict(vector.values())?;
        let outcome = Outcome::from_raw(raw);

        debug!(disease = disease.key(), raw, ?outcome, "Prediction complete");
        Ok(PredictionResult { disease, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classifier, ClassifierHandle};
    use std::collections::HashMap;

    struct Fixed(f64);

    impl Classifier for Fixed {
        fn predict(&self, _features: &[f64]) -> Result<f64> {
            Ok(self.0)
        }
        fn n_features(&self) -> usize {
            0
        }
        fn kind(&self) -> &str {
            "fixed"
        }
    }

    fn dispatcher(raw: f64) -> InferenceDispatcher {
        let classifiers: HashMap<Disease, ClassifierHandle> = Disease::ALL
            .iter()
            .map(|d| (*d, Arc::new(Fixed(raw)) as ClassifierHandle))
            .collect();
        InferenceDispatcher::new(Arc::new(
            ModelRegistry::from_classifiers(classifiers).unwrap(),
        ))
    }

    #[test]
    fn test_outcome_from_raw() {
        assert_eq!(Outcome::from_raw(1.0), Outcome::Positive);
        assert_eq!(Outcome::from_raw(0.0), Outcome::Negative);
        assert_eq!(Outcome::from_raw(2.0), Outcome::Negative);
        assert_eq!(Outcome::from_raw(-1.0), Outcome::Negative);
        assert_eq!(Outcome::from_raw(f64::NAN), Outcome::Negative);
    }

    #[test]
    fn test_labels() {
        let result = PredictionResult {
            disease: Disease::HeartDisease,
            outcome: Outcome::Positive,
        };
        assert_eq!(result.label(), "Heart Disease Detected");
        assert_eq!(result.to_string(), "Prediction: Heart Disease Detected");
    }

    #[test]
    fn test_arity_checked_before_classifier() {
        let d = dispatcher(1.0);
        let err = d
            .predict(Disease::Parkinsons, &FeatureVector::new(vec![1.0; 13]))
            .unwrap_err();
        assert!(matches!(
            err,
            SmartMedError::ArityMismatch {
                expected: 14,
                actual: 13,
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let d = dispatcher(1.0);
        let mut values = vec![1.0; 14];
        values[3] = f64::INFINITY;
        let err = d
            .predict(Disease::Parkinsons, &FeatureVector::new(values))
            .unwrap_err();
        match err {
            SmartMedError::NonFiniteFeature { feature } => assert_eq!(feature, "MDVP:Jitter(%)"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
