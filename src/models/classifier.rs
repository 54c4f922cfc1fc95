//! Classifier capability and the JSON linear model artifact
//!
//! The rest of the crate only sees [`Classifier`]: a read-only handle that
//! maps a feature slice to a raw scalar label. [`LinearModel`] is the
//! artifact format shipped in `saved_models/`, a linear SVM or logistic
//! regression exported with its standard scaler.

use crate::errors::{Result, SmartMedError};
use crate::models::Disease;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A pre-trained binary classifier
pub trait Classifier: Send + Sync {
    /// Raw predicted label for one feature vector (1.0 means positive)
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Number of features the classifier was trained with
    fn n_features(&self) -> usize;

    /// Short backend identifier for diagnostics
    fn kind(&self) -> &str;
}

/// Decision rule of a linear model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearKind {
    /// Positive when the decision function is >= 0
    LinearSvm,
    /// Positive when sigmoid(decision) >= threshold
    Logistic,
}

/// Per-feature standardisation applied before the dot product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

fn default_threshold() -> f64 {
    0.5
}

/// Linear model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub disease: Option<Disease>,
    pub kind: LinearKind,
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LinearModel {
    /// Read and validate an artifact file
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| SmartMedError::ArtifactUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let model: LinearModel =
            serde_json::from_str(&contents).map_err(|e| SmartMedError::ArtifactCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        model
            .validate()
            .map_err(|reason| SmartMedError::ArtifactCorrupt {
                path: path.to_path_buf(),
                reason,
            })?;

        Ok(model)
    }

    /// Structural checks done once at load time
    pub fn validate(&self) -> std::result::Result<(), String> {
        let n = self.coefficients.len();
        if n == 0 {
            return Err("model has no coefficients".to_string());
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != n {
            return Err(format!(
                "{} feature names for {} coefficients",
                self.feature_names.len(),
                n
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients must be finite".to_string());
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != n || scaler.scale.len() != n {
                return Err(format!(
                    "scaler has {} means and {} scales for {} coefficients",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    n
                ));
            }
            if scaler.scale.iter().any(|s| !s.is_finite() || *s == 0.0)
                || scaler.mean.iter().any(|m| !m.is_finite())
            {
                return Err("scaler values must be finite and scales non-zero".to_string());
            }
        }
        if self.kind == LinearKind::Logistic && !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("threshold {} outside [0, 1]", self.threshold));
        }
        Ok(())
    }

    /// Signed distance from the separating hyperplane
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        let dot: f64 = match &self.scaler {
            Some(scaler) => features
                .iter()
                .zip(&scaler.mean)
                .zip(&scaler.scale)
                .zip(&self.coefficients)
                .map(|(((x, m), s), w)| w * (x - m) / s)
                .sum(),
            None => features
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| w * x)
                .sum(),
        };
        dot + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(SmartMedError::ClassifierError(format!(
                "X has {} features, but the model is expecting {} features as input",
                features.len(),
                self.coefficients.len()
            )));
        }

        let decision = self.decision_function(features);
        if !decision.is_finite() {
            return Err(SmartMedError::ClassifierError(
                "decision function overflowed".to_string(),
            ));
        }

        let positive = match self.kind {
            LinearKind::LinearSvm => decision >= 0.0,
            LinearKind::Logistic => sigmoid(decision) >= self.threshold,
        };
        Ok(if positive { 1.0 } else { 0.0 })
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn kind(&self) -> &str {
        match self.kind {
            LinearKind::LinearSvm => "linear_svm",
            LinearKind::Logistic => "logistic",
        }
    }
}
