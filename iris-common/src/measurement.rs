//! Flower measurement types
//!
//! The four measurements are always handled in the declared order below.
//! That order drives validation short-circuiting and the first four
//! positions of every feature vector.

use serde::Serialize;
use std::fmt;

/// One of the four required form inputs, in declared order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl Field {
    /// All fields in declared order
    pub const ALL: [Field; 4] = [
        Field::SepalLength,
        Field::SepalWidth,
        Field::PetalLength,
        Field::PetalWidth,
    ];

    /// Form-encoded key submitted by the input form
    pub fn form_key(self) -> &'static str {
        match self {
            Field::SepalLength => "sepal_length",
            Field::SepalWidth => "sepal_width",
            Field::PetalLength => "petal_length",
            Field::PetalWidth => "petal_width",
        }
    }

    /// Human-readable name used in messages ("Sepal Length")
    pub fn display_name(self) -> &'static str {
        match self {
            Field::SepalLength => "Sepal Length",
            Field::SepalWidth => "Sepal Width",
            Field::PetalLength => "Petal Length",
            Field::PetalWidth => "Petal Width",
        }
    }

    /// Position of this field in the feature vector
    pub fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Validated measurements in centimeters, each within (0, 10]
///
/// Only `validation::validate` constructs these from user input, so holding
/// a `MeasurementSet` means the range invariant already holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementSet {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
}

impl MeasurementSet {
    pub(crate) fn from_array(values: [f64; 4]) -> Self {
        let [sepal_length, sepal_width, petal_length, petal_width] = values;
        Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        }
    }

    pub fn sepal_length(&self) -> f64 {
        self.sepal_length
    }

    pub fn sepal_width(&self) -> f64 {
        self.sepal_width
    }

    pub fn petal_length(&self) -> f64 {
        self.petal_length
    }

    pub fn petal_width(&self) -> f64 {
        self.petal_width
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::SepalLength => self.sepal_length,
            Field::SepalWidth => self.sepal_width,
            Field::PetalLength => self.petal_length,
            Field::PetalWidth => self.petal_width,
        }
    }

    /// Values in declared field order
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }

    /// `(field, value)` pairs in declared order, for display
    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_positions_follow_declared_order() {
        for (expected, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.position(), expected);
        }
    }

    #[test]
    fn test_display_name_title_cases_form_key() {
        assert_eq!(Field::SepalLength.form_key(), "sepal_length");
        assert_eq!(Field::SepalLength.to_string(), "Sepal Length");
        assert_eq!(Field::PetalWidth.display_name(), "Petal Width");
    }

    #[test]
    fn test_iter_yields_values_in_order() {
        let set = MeasurementSet::from_array([5.1, 3.5, 1.4, 0.2]);
        let pairs: Vec<_> = set.iter().collect();
        assert_eq!(pairs[0], (Field::SepalLength, 5.1));
        assert_eq!(pairs[3], (Field::PetalWidth, 0.2));
        assert_eq!(set.as_array(), [5.1, 3.5, 1.4, 0.2]);
    }
}
