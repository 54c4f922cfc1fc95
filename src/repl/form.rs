//! Step-wise prediction form
//!
//! Prompts one field at a time in schema order. Invalid entries are
//! rejected and the same field is asked again; the completed vector is
//! handed back once every field holds a valid value.

use crate::inference::schema::{FeatureSchema, FeatureSpec, FeatureVector};
use crate::models::Disease;

/// Outcome of submitting one field value
#[derive(Debug, Clone, PartialEq)]
pub enum FormStep {
    /// Value accepted, more fields remain
    Next,
    /// Value rejected, same field again
    Invalid(String),
    /// Every field filled
    Complete(FeatureVector),
}

/// Progress through one disease form
#[derive(Debug, Clone)]
pub struct FormState {
    schema: &'static FeatureSchema,
    values: FeatureVector,
}

impl FormState {
    pub fn new(disease: Disease) -> Self {
        Self {
            schema: FeatureSchema::for_disease(disease),
            values: FeatureVector::default(),
        }
    }

    pub fn disease(&self) -> Disease {
        self.schema.disease
    }

    /// Field waiting for input, None once complete
    pub fn current_field(&self) -> Option<&'static FeatureSpec> {
        self.schema.fields.get(self.values.len())
    }

    /// 1-based position of the current field and total count
    pub fn position(&self) -> (usize, usize) {
        (self.values.len() + 1, self.schema.len())
    }

    /// Submit raw text for the current field
    pub fn submit(&mut self, raw: &str) -> FormStep {
        let spec = match self.current_field() {
            Some(spec) => spec,
            None => return FormStep::Complete(self.values.clone()),
        };

        match spec.parse_value(raw) {
            Ok(value) => {
                self.values.push(value);
                if self.values.len() == self.schema.len() {
                    FormStep::Complete(std::mem::take(&mut self.values))
                } else {
                    FormStep::Next
                }
            }
            Err(message) => FormStep::Invalid(message),
        }
    }

    /// Start over from the first field
    pub fn reset(&mut self) {
        self.values = FeatureVector::default();
    }

    /// Prompt text for the current field
    pub fn prompt(&self) -> String {
        match self.current_field() {
            Some(spec) => {
                let (index, total) = self.position();
                format!("[{}/{}] {} ({}): ", index, total, spec.label, spec.bounds_hint())
            }
            None => String::new(),
        }
    }
}
