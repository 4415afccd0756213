//! Form validation for the four flower measurements
//!
//! Fields are checked one at a time in declared order (sepal length, sepal
//! width, petal length, petal width). Each field must be present, parse as a
//! float, and fall within (0, 10] cm. The first failure ends validation;
//! errors are never aggregated.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::measurement::{Field, MeasurementSet};

/// Smallest rejected value (exclusive lower bound)
pub const MIN_EXCLUSIVE_CM: f64 = 0.0;
/// Largest accepted value (inclusive upper bound)
pub const MAX_INCLUSIVE_CM: f64 = 10.0;

/// Field-level validation failure
///
/// Display text is the user-facing message shown above the form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Error: {0} is required")]
    MissingField(Field),

    #[error("Error: {0} must be a valid number")]
    InvalidNumber(Field),

    #[error("Error: {0} must be between 0 and 10 cm")]
    OutOfRange(Field),
}

impl ValidationError {
    /// The field that failed
    pub fn field(&self) -> Field {
        match *self {
            ValidationError::MissingField(field)
            | ValidationError::InvalidNumber(field)
            | ValidationError::OutOfRange(field) => field,
        }
    }
}

/// Raw submitted form values keyed by form field name
pub trait FormInput {
    fn value(&self, key: &str) -> Option<&str>;
}

impl FormInput for HashMap<String, String> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl FormInput for BTreeMap<String, String> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl FormInput for [(&str, &str)] {
    fn value(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// Validate a submitted form into a `MeasurementSet`
pub fn validate<F>(form: &F) -> Result<MeasurementSet, ValidationError>
where
    F: FormInput + ?Sized,
{
    let mut values = [0.0; 4];
    for field in Field::ALL {
        values[field.position()] = validate_field(field, form.value(field.form_key()))?;
    }
    Ok(MeasurementSet::from_array(values))
}

/// Validate a single raw value for `field`
pub fn validate_field(field: Field, raw: Option<&str>) -> Result<f64, ValidationError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ValidationError::MissingField(field)),
    };

    // Rust's float parser accepts "NaN"; a NaN would slip past both range
    // comparisons, so it is reported as not-a-number.
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber(field))?;
    if value.is_nan() {
        return Err(ValidationError::InvalidNumber(field));
    }

    if value <= MIN_EXCLUSIVE_CM || value > MAX_INCLUSIVE_CM {
        return Err(ValidationError::OutOfRange(field));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_open_closed() {
        assert_eq!(
            validate_field(Field::SepalLength, Some("0")),
            Err(ValidationError::OutOfRange(Field::SepalLength))
        );
        assert_eq!(validate_field(Field::SepalLength, Some("10")), Ok(10.0));
        assert_eq!(
            validate_field(Field::SepalLength, Some("10.0001")),
            Err(ValidationError::OutOfRange(Field::SepalLength))
        );
        assert_eq!(validate_field(Field::SepalLength, Some("0.0001")), Ok(0.0001));
    }

    #[test]
    fn test_surrounding_whitespace_is_accepted() {
        assert_eq!(validate_field(Field::PetalWidth, Some(" 0.2 ")), Ok(0.2));
    }

    #[test]
    fn test_whitespace_only_is_invalid_number() {
        assert_eq!(
            validate_field(Field::PetalWidth, Some("   ")),
            Err(ValidationError::InvalidNumber(Field::PetalWidth))
        );
    }

    #[test]
    fn test_non_finite_values() {
        assert_eq!(
            validate_field(Field::SepalWidth, Some("NaN")),
            Err(ValidationError::InvalidNumber(Field::SepalWidth))
        );
        assert_eq!(
            validate_field(Field::SepalWidth, Some("inf")),
            Err(ValidationError::OutOfRange(Field::SepalWidth))
        );
        assert_eq!(
            validate_field(Field::SepalWidth, Some("-inf")),
            Err(ValidationError::OutOfRange(Field::SepalWidth))
        );
    }

    #[test]
    fn test_messages_name_the_field() {
        assert_eq!(
            ValidationError::MissingField(Field::SepalLength).to_string(),
            "Error: Sepal Length is required"
        );
        assert_eq!(
            ValidationError::InvalidNumber(Field::PetalLength).to_string(),
            "Error: Petal Length must be a valid number"
        );
        assert_eq!(
            ValidationError::OutOfRange(Field::PetalWidth).to_string(),
            "Error: Petal Width must be between 0 and 10 cm"
        );
    }

    #[test]
    fn test_slice_form_input() {
        let form: &[(&str, &str)] = &[
            ("sepal_length", "5.1"),
            ("sepal_width", "3.5"),
            ("petal_length", "1.4"),
            ("petal_width", "0.2"),
        ];
        let set = validate(form).unwrap();
        assert_eq!(set.as_array(), [5.1, 3.5, 1.4, 0.2]);
    }
}
