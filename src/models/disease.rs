//! The three supported diseases and their display labels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A disease with a dedicated classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    Diabetes,
    HeartDisease,
    Parkinsons,
}

impl Disease {
    /// All diseases in navigation order
    pub const ALL: [Disease; 3] = [Disease::Diabetes, Disease::HeartDisease, Disease::Parkinsons];

    /// Stable identifier used in config keys and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::HeartDisease => "heart_disease",
            Disease::Parkinsons => "parkinsons",
        }
    }

    /// Name shown in page titles and labels
    pub fn display_name(&self) -> &'static str {
        match self {
            Disease::Diabetes => "Diabetes",
            Disease::HeartDisease => "Heart Disease",
            Disease::Parkinsons => "Parkinson's",
        }
    }

    /// Label for a positive prediction
    pub fn positive_label(&self) -> &'static str {
        match self {
            Disease::Diabetes => "Diabetes Detected",
            Disease::HeartDisease => "Heart Disease Detected",
            Disease::Parkinsons => "Parkinson's Detected",
        }
    }

    /// Label for a negative prediction
    pub fn negative_label(&self) -> &'static str {
        match self {
            Disease::Diabetes => "No Diabetes",
            Disease::HeartDisease => "No Heart Disease",
            Disease::Parkinsons => "No Parkinson's",
        }
    }

    /// Default artifact file name inside the models directory
    pub fn artifact_file_name(&self) -> String {
        format!("{}_model.json", self.key())
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Disease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "diabetes" => Ok(Disease::Diabetes),
            "heart" | "heart_disease" => Ok(Disease::HeartDisease),
            "parkinsons" | "parkinson's" | "parkinson" => Ok(Disease::Parkinsons),
            other => Err(format!(
                "Unknown disease '{}'. Expected one of: diabetes, heart, parkinsons",
                other
            )),
        }
    }
}
