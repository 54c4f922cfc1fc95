//! Model registry
//!
//! Holds one classifier per disease. Built once at startup and shared
//! read-only behind an `Arc`; there is no reload path.

use crate::errors::{Result, SmartMedError};
use crate::inference::schema::FeatureSchema;
use crate::models::classifier::{Classifier, LinearModel};
use crate::models::Disease;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handle to a loaded classifier
pub type ClassifierHandle = Arc<dyn Classifier>;

/// Registry of loaded classifiers, complete for every [`Disease`]
pub struct ModelRegistry {
    classifiers: HashMap<Disease, ClassifierHandle>,
}

impl ModelRegistry {
    /// Load every artifact. Any missing or corrupt file fails the whole load.
    pub fn load(paths: &HashMap<Disease, PathBuf>) -> Result<Self> {
        let mut classifiers: HashMap<Disease, ClassifierHandle> = HashMap::new();

        for disease in Disease::ALL {
            let path = paths
                .get(&disease)
                .ok_or(SmartMedError::ArtifactMissing { disease })?;

            let model = Self::load_artifact(disease, path)?;
            info!(
                disease = disease.key(),
                path = %path.display(),
                kind = model.kind(),
                features = model.n_features(),
                "Loaded classifier"
            );
            classifiers.insert(disease, Arc::new(model));
        }

        Ok(Self { classifiers })
    }

    /// Load artifacts named `<disease>_model.json` from one directory
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let paths = Disease::ALL
            .iter()
            .map(|d| (*d, dir.join(d.artifact_file_name())))
            .collect();
        Self::load(&paths)
    }

    /// Read one artifact and check it against the disease's form
    pub(crate) fn load_artifact(disease: Disease, path: &Path) -> Result<LinearModel> {
        debug!(disease = disease.key(), path = %path.display(), "Reading artifact");
        let model = LinearModel::load(path)?;

        if let Some(declared) = model.disease {
            if declared != disease {
                return Err(SmartMedError::ArtifactCorrupt {
                    path: path.to_path_buf(),
                    reason: format!("artifact is for {}, expected {}", declared, disease),
                });
            }
        }

        let schema = FeatureSchema::for_disease(disease);
        let expected = schema.len();
        if model.n_features() != expected {
            return Err(SmartMedError::ArtifactCorrupt {
                path: path.to_path_buf(),
                reason: format!(
                    "model has {} features, {} form has {}",
                    model.n_features(),
                    disease,
                    expected
                ),
            });
        }

        // Weights are positional, so recorded names must follow the form order
        if !model.feature_names.is_empty() && model.feature_names != schema.names() {
            return Err(SmartMedError::ArtifactCorrupt {
                path: path.to_path_buf(),
                reason: format!("feature names do not match the {} form order", disease),
            });
        }

        Ok(model)
    }

    /// Build a registry from already constructed classifiers.
    ///
    /// Every disease must be present.
    pub fn from_classifiers(classifiers: HashMap<Disease, ClassifierHandle>) -> Result<Self> {
        for disease in Disease::ALL {
            if !classifiers.contains_key(&disease) {
                return Err(SmartMedError::ArtifactMissing { disease });
            }
        }
        Ok(Self { classifiers })
    }

    /// Classifier for a disease
    pub fn get(&self, disease: Disease) -> ClassifierHandle {
        // Construction guarantees every disease is present
        Arc::clone(&self.classifiers[&disease])
    }

    /// Number of loaded classifiers
    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    /// Always false for a constructed registry
    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut diseases: Vec<&str> = self.classifiers.keys().map(|d| d.key()).collect();
        diseases.sort_unstable();
        f.debug_struct("ModelRegistry")
            .field("diseases", &diseases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64, usize);

    impl Classifier for Fixed {
        fn predict(&self, _features: &[f64]) -> Result<f64> {
            Ok(self.0)
        }
        fn n_features(&self) -> usize {
            self.1
        }
        fn kind(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_from_classifiers_requires_all() {
        let mut map: HashMap<Disease, ClassifierHandle> = HashMap::new();
        map.insert(Disease::Diabetes, Arc::new(Fixed(1.0, 8)));
        map.insert(Disease::HeartDisease, Arc::new(Fixed(0.0, 13)));

        let err = ModelRegistry::from_classifiers(map.clone()).err().unwrap();
        assert!(matches!(
            err,
            SmartMedError::ArtifactMissing { disease: Disease::Parkinsons }
        ));

        map.insert(Disease::Parkinsons, Arc::new(Fixed(0.0, 14)));
        let registry = ModelRegistry::from_classifiers(map).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(Disease::Diabetes).predict(&[]).unwrap(), 1.0);
    }

    #[test]
    fn test_load_missing_path_entry() {
        let paths = HashMap::new();
        let err = ModelRegistry::load(&paths).err().unwrap();
        assert!(matches!(err, SmartMedError::ArtifactMissing { .. }));
    }

    #[test]
    fn test_feature_names_must_follow_form_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("diabetes_model.json");
        let mut names = FeatureSchema::for_disease(Disease::Diabetes).names();
        let write = |names: &[&str]| {
            let json = serde_json::json!({
                "disease": "diabetes",
                "kind": "linear_svm",
                "feature_names": names,
                "coefficients": vec![0.1; names.len()],
                "intercept": -0.5,
            });
            std::fs::write(&path, json.to_string()).unwrap();
        };

        write(&names);
        assert!(ModelRegistry::load_artifact(Disease::Diabetes, &path).is_ok());

        // Pregnancies first, Age last
        let last = names.len() - 1;
        names.swap(0, last);
        write(&names);
        let err = ModelRegistry::load_artifact(Disease::Diabetes, &path)
            .err()
            .unwrap();
        assert!(matches!(err, SmartMedError::ArtifactCorrupt { .. }));
        assert!(err.to_string().contains("form order"));
    }

    #[test]
    fn test_debug_lists_diseases() {
        let mut map: HashMap<Disease, ClassifierHandle> = HashMap::new();
        map.insert(Disease::Diabetes, Arc::new(Fixed(1.0, 8)));
        map.insert(Disease::HeartDisease, Arc::new(Fixed(0.0, 13)));
        map.insert(Disease::Parkinsons, Arc::new(Fixed(0.0, 14)));
        let registry = ModelRegistry::from_classifiers(map).unwrap();

        assert_eq!(
            format!("{:?}", registry),
            r#"ModelRegistry { diseases: ["diabetes", "heart_disease", "parkinsons"] }"#
        );
    }
}
