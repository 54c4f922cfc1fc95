//! Feature schemas for each disease form
//!
//! Field order matches the column order the classifiers were trained on.

use crate::models::Disease;
use serde::Serialize;
use std::fmt;

/// Numeric kind of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Integer,
    Float,
}

/// One named, typed, optionally bounded field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSpec {
    /// Column name used in training
    pub name: &'static str,
    /// Prompt shown on the form
    pub label: &'static str,
    pub kind: FeatureKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FeatureSpec {
    const fn int(name: &'static str, label: &'static str, min: f64, max: Option<f64>) -> Self {
        Self {
            name,
            label,
            kind: FeatureKind::Integer,
            min: Some(min),
            max,
        }
    }

    const fn float(name: &'static str, label: &'static str, min: Option<f64>) -> Self {
        Self {
            name,
            label,
            kind: FeatureKind::Float,
            min,
            max: None,
        }
    }

    /// Parse and bound-check raw text entered for this field
    pub fn parse_value(&self, raw: &str) -> Result<f64, String> {
        let raw = raw.trim();
        let value = match self.kind {
            FeatureKind::Integer => raw
                .parse::<i64>()
                .map(|v| v as f64)
                .map_err(|_| format!("{} must be a whole number", self.label))?,
            FeatureKind::Float => raw
                .parse::<f64>()
                .map_err(|_| format!("{} must be a number", self.label))?,
        };
        self.check(value)?;
        Ok(value)
    }

    /// Check kind and bounds of an already numeric value
    pub fn check(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("{} must be a finite number", self.label));
        }
        if self.kind == FeatureKind::Integer && value.fract() != 0.0 {
            return Err(format!("{} must be a whole number", self.label));
        }
        if let Some(min) = self.min {
            if value < min {
                return Err(format!("{} must be at least {}", self.label, min));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(format!("{} must be at most {}", self.label, max));
            }
        }
        Ok(())
    }

    /// Human readable bounds, e.g. `0..=3` or `>= 0`
    pub fn bounds_hint(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("{}..={}", min, max),
            (Some(min), None) => format!(">= {}", min),
            (None, Some(max)) => format!("<= {}", max),
            (None, None) => "any".to_string(),
        }
    }
}

impl fmt::Display for FeatureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            FeatureKind::Integer => "integer",
            FeatureKind::Float => "float",
        };
        write!(f, "{} ({}, {})", self.label, kind, self.bounds_hint())
    }
}

const DIABETES_FIELDS: [FeatureSpec; 8] = [
    FeatureSpec::int("Pregnancies", "Number of Pregnancies", 0.0, None),
    FeatureSpec::int("Glucose", "Glucose Level", 0.0, None),
    FeatureSpec::int("BloodPressure", "Blood Pressure", 0.0, None),
    FeatureSpec::int("SkinThickness", "Skin Thickness", 0.0, None),
    FeatureSpec::int("Insulin", "Insulin Level", 0.0, None),
    FeatureSpec::float("BMI", "BMI", Some(0.0)),
    FeatureSpec::float(
        "DiabetesPedigreeFunction",
        "Diabetes Pedigree Function",
        Some(0.0),
    ),
    FeatureSpec::int("Age", "Age", 0.0, None),
];

const HEART_DISEASE_FIELDS: [FeatureSpec; 13] = [
    FeatureSpec::int("age", "Age", 0.0, None),
    FeatureSpec::int("sex", "Sex (0 = Female, 1 = Male)", 0.0, Some(1.0)),
    FeatureSpec::int("cp", "Chest Pain Type (0-3)", 0.0, Some(3.0)),
    FeatureSpec::int("trestbps", "Resting Blood Pressure", 0.0, None),
    FeatureSpec::int("chol", "Cholesterol Level", 0.0, None),
    FeatureSpec::int(
        "fbs",
        "Fasting Blood Sugar > 120 mg/dl (0 = No, 1 = Yes)",
        0.0,
        Some(1.0),
    ),
    FeatureSpec::int("restecg", "Resting ECG Results (0-2)", 0.0, Some(2.0)),
    FeatureSpec::int("thalach", "Max Heart Rate Achieved", 0.0, None),
    FeatureSpec::int(
        "exang",
        "Exercise Induced Angina (0 = No, 1 = Yes)",
        0.0,
        Some(1.0),
    ),
    FeatureSpec::float("oldpeak", "ST Depression Induced by Exercise", Some(0.0)),
    FeatureSpec::int(
        "slope",
        "Slope of Peak Exercise ST Segment (0-2)",
        0.0,
        Some(2.0),
    ),
    FeatureSpec::int("ca", "Number of Major Vessels Colored (0-4)", 0.0, Some(4.0)),
    FeatureSpec::int("thal", "Thalassemia (0-3)", 0.0, Some(3.0)),
];

const PARKINSONS_FIELDS: [FeatureSpec; 14] = [
    FeatureSpec::float("MDVP:Fo(Hz)", "MDVP:Fo(Hz)", None),
    FeatureSpec::float("MDVP:Fhi(Hz)", "MDVP:Fhi(Hz)", None),
    FeatureSpec::float("MDVP:Flo(Hz)", "MDVP:Flo(Hz)", None),
    FeatureSpec::float("MDVP:Jitter(%)", "MDVP:Jitter(%)", None),
    FeatureSpec::float("MDVP:Jitter(Abs)", "MDVP:Jitter(Abs)", None),
    FeatureSpec::float("MDVP:RAP", "MDVP:RAP", None),
    FeatureSpec::float("MDVP:PPQ", "MDVP:PPQ", None),
    FeatureSpec::float("Jitter:DDP", "Jitter:DDP", None),
    FeatureSpec::float("MDVP:Shimmer", "MDVP:Shimmer", None),
    FeatureSpec::float("MDVP:Shimmer(dB)", "MDVP:Shimmer(dB)", None),
    FeatureSpec::float("Shimmer:APQ3", "Shimmer:APQ3", None),
    FeatureSpec::float("Shimmer:APQ5", "Shimmer:APQ5", None),
    FeatureSpec::float("MDVP:APQ", "MDVP:APQ", None),
    FeatureSpec::float("Shimmer:DDA", "Shimmer:DDA", None),
];

static DIABETES_SCHEMA: FeatureSchema = FeatureSchema {
    disease: Disease::Diabetes,
    fields: &DIABETES_FIELDS,
};

static HEART_DISEASE_SCHEMA: FeatureSchema = FeatureSchema {
    disease: Disease::HeartDisease,
    fields: &HEART_DISEASE_FIELDS,
};

static PARKINSONS_SCHEMA: FeatureSchema = FeatureSchema {
    disease: Disease::Parkinsons,
    fields: &PARKINSONS_FIELDS,
};

/// Ordered field contract for one disease
#[derive(Debug, Serialize)]
pub struct FeatureSchema {
    pub disease: Disease,
    pub fields: &'static [FeatureSpec],
}

impl FeatureSchema {
    /// Static schema for a disease
    pub fn for_disease(disease: Disease) -> &'static FeatureSchema {
        match disease {
            Disease::Diabetes => &DIABETES_SCHEMA,
            Disease::HeartDisease => &HEART_DISEASE_SCHEMA,
            Disease::Parkinsons => &PARKINSONS_SCHEMA,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in training order
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Check every value of a vector against its field.
    ///
    /// Returns the first violation.
    pub fn check(&self, vector: &FeatureVector) -> Result<(), String> {
        if vector.len() != self.len() {
            return Err(format!(
                "{} expects {} values, got {}",
                self.disease,
                self.len(),
                vector.len()
            ));
        }
        for (spec, value) in self.fields.iter().zip(vector.values()) {
            spec.check(*value)?;
        }
        Ok(())
    }
}

/// Ordered numeric values for one prediction request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, value: f64) {
        self.0.push(value);
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lengths() {
        assert_eq!(FeatureSchema::for_disease(Disease::Diabetes).len(), 8);
        assert_eq!(FeatureSchema::for_disease(Disease::HeartDisease).len(), 13);
        assert_eq!(FeatureSchema::for_disease(Disease::Parkinsons).len(), 14);
    }

    #[test]
    fn test_schema_order() {
        let names = FeatureSchema::for_disease(Disease::Diabetes).names();
        assert_eq!(names.first(), Some(&"Pregnancies"));
        assert_eq!(names.last(), Some(&"Age"));

        let heart = FeatureSchema::for_disease(Disease::HeartDisease).names();
        assert_eq!(heart[9], "oldpeak");
        assert_eq!(heart[12], "thal");
    }

    #[test]
    fn test_parse_integer_field() {
        let cp = &FeatureSchema::for_disease(Disease::HeartDisease).fields[2];
        assert_eq!(cp.parse_value("3").unwrap(), 3.0);
        assert!(cp.parse_value("4").is_err());
        assert!(cp.parse_value("-1").is_err());
        assert!(cp.parse_value("1.5").is_err());
        assert!(cp.parse_value("abc").is_err());
    }

    #[test]
    fn test_parse_float_field() {
        let bmi = &FeatureSchema::for_disease(Disease::Diabetes).fields[5];
        assert_eq!(bmi.parse_value(" 28.5 ").unwrap(), 28.5);
        assert!(bmi.parse_value("-0.1").is_err());
        assert!(bmi.parse_value("NaN").is_err());

        let fo = &FeatureSchema::for_disease(Disease::Parkinsons).fields[0];
        assert_eq!(fo.parse_value("-3.25").unwrap(), -3.25);
    }

    #[test]
    fn test_check_vector() {
        let schema = FeatureSchema::for_disease(Disease::Diabetes);
        let ok = FeatureVector::new(vec![2.0, 130.0, 70.0, 20.0, 85.0, 28.5, 0.3, 35.0]);
        assert!(schema.check(&ok).is_ok());

        let short = FeatureVector::new(vec![2.0, 130.0]);
        assert!(schema.check(&short).is_err());

        let fractional = FeatureVector::new(vec![2.5, 130.0, 70.0, 20.0, 85.0, 28.5, 0.3, 35.0]);
        assert!(schema.check(&fractional).is_err());
    }

    #[test]
    fn test_bounds_hint() {
        let heart = FeatureSchema::for_disease(Disease::HeartDisease);
        assert_eq!(heart.fields[1].bounds_hint(), "0..=1");
        assert_eq!(heart.fields[0].bounds_hint(), ">= 0");
        assert_eq!(
            FeatureSchema::for_disease(Disease::Parkinsons).fields[3].bounds_hint(),
            "any"
        );
    }
}
