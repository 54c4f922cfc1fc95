//! Classifier models
//!
//! This module provides:
//! - The supported diseases and their labels
//! - The classifier capability and JSON artifact format
//! - The registry that loads all classifiers at startup

pub mod classifier;
pub mod disease;
pub mod registry;

// Re-export key types for convenience
pub use classifier::{Classifier, LinearKind, LinearModel, StandardScaler};
pub use disease::Disease;
pub use registry::{ClassifierHandle, ModelRegistry};
