//! Inference module
//!
//! Feature schemas for the three prediction forms and the dispatcher that
//! runs a filled form through its classifier.

pub mod dispatcher;
pub mod schema;

pub use dispatcher::{InferenceDispatcher, Outcome, PredictionResult};
pub use schema::{FeatureKind, FeatureSchema, FeatureSpec, FeatureVector};
