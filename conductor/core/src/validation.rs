//! Form Validation
//!
//! Every field is required. A field counts as blank when its trimmed value is
//! empty; the tone selector is included so a blanked-out raw tone is reported
//! the same way as a blank text field.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::{Field, PitchInput};

/// Per-field validation errors
///
/// Empty means the input is valid. Iteration follows form order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: BTreeMap<Field, String>,
}

impl ValidationResult {
    /// Check if the result indicates valid input
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error message for a field, if it failed
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Fields that failed, in form order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }

    /// (field, message) pairs in form order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Number of failed fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when no field failed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn require(&mut self, field: Field, value: &str) {
        if value.trim().is_empty() {
            self.errors.insert(field, format!("{field} is required."));
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for message in self.errors.values() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}

/// Validate a form, reporting every blank field
#[must_use]
pub fn validate(input: &PitchInput) -> ValidationResult {
    let mut result = ValidationResult::default();
    for field in Field::ALL {
        result.require(field, input.get(field));
    }
    result
}
