//! Integration tests for form validation
//!
//! Tests cover:
//! - Missing or empty fields produce MissingField naming the field
//! - Unparseable values produce InvalidNumber
//! - Values <= 0 or > 10 produce OutOfRange
//! - Fields are checked in declared order and only the first error is reported

use std::collections::HashMap;

use iris_common::{validate, Field, ValidationError};

/// Test helper: Build a form from key/value pairs
fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Test helper: A fully valid setosa submission
fn valid_form() -> HashMap<String, String> {
    form(&[
        ("sepal_length", "5.1"),
        ("sepal_width", "3.5"),
        ("petal_length", "1.4"),
        ("petal_width", "0.2"),
    ])
}

#[test]
fn test_valid_form_produces_measurements() {
    let set = validate(&valid_form()).expect("valid form should pass");
    assert_eq!(set.sepal_length(), 5.1);
    assert_eq!(set.sepal_width(), 3.5);
    assert_eq!(set.petal_length(), 1.4);
    assert_eq!(set.petal_width(), 0.2);
}

#[test]
fn test_each_absent_field_is_missing() {
    for field in Field::ALL {
        let mut input = valid_form();
        input.remove(field.form_key());

        let err = validate(&input).unwrap_err();
        assert_eq!(err, ValidationError::MissingField(field));
        assert!(err.to_string().contains(field.display_name()));
    }
}

#[test]
fn test_each_empty_field_is_missing() {
    for field in Field::ALL {
        let mut input = valid_form();
        input.insert(field.form_key().to_string(), String::new());

        assert_eq!(validate(&input), Err(ValidationError::MissingField(field)));
    }
}

#[test]
fn test_unparseable_values_are_invalid_numbers() {
    for field in Field::ALL {
        for bad in ["abc", "1,5", "5.1cm", "--1", "0x10", "NaN"] {
            let mut input = valid_form();
            input.insert(field.form_key().to_string(), bad.to_string());

            let err = validate(&input).unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidNumber(field),
                "value {:?} in {} should not parse",
                bad,
                field.form_key()
            );
            assert_eq!(
                err.to_string(),
                format!("Error: {} must be a valid number", field.display_name())
            );
        }
    }
}

#[test]
fn test_out_of_range_values() {
    for field in Field::ALL {
        for bad in ["0", "-1", "10.5", "-0.0", "1e3", "inf"] {
            let mut input = valid_form();
            input.insert(field.form_key().to_string(), bad.to_string());

            let err = validate(&input).unwrap_err();
            assert_eq!(
                err,
                ValidationError::OutOfRange(field),
                "value {:?} in {}",
                bad,
                field.form_key()
            );
            assert_eq!(
                err.to_string(),
                format!("Error: {} must be between 0 and 10 cm", field.display_name())
            );
        }
    }
}

#[test]
fn test_boundary_value_ten_is_accepted_for_every_field() {
    for field in Field::ALL {
        let mut input = valid_form();
        input.insert(field.form_key().to_string(), "10".to_string());

        assert_eq!(validate(&input).unwrap().get(field), 10.0);
    }
}

#[test]
fn test_scientific_notation_in_range_is_accepted() {
    let mut input = valid_form();
    input.insert("petal_width".to_string(), "2e-1".to_string());

    assert_eq!(validate(&input).unwrap().petal_width(), 0.2);
}

#[test]
fn test_first_invalid_field_wins() {
    // Sepal width and petal width both out of range: sepal width is declared first
    let input = form(&[
        ("sepal_length", "5.1"),
        ("sepal_width", "11"),
        ("petal_length", "1.4"),
        ("petal_width", "-3"),
    ]);
    assert_eq!(validate(&input), Err(ValidationError::OutOfRange(Field::SepalWidth)));

    // Mixed error kinds: the earlier field is reported whatever its kind
    let input = form(&[
        ("sepal_length", "abc"),
        ("sepal_width", "3.5"),
        ("petal_width", "0.2"),
    ]);
    assert_eq!(validate(&input), Err(ValidationError::InvalidNumber(Field::SepalLength)));
}

#[test]
fn test_empty_form_reports_sepal_length() {
    let err = validate(&HashMap::new()).unwrap_err();
    assert_eq!(err.field(), Field::SepalLength);
    assert_eq!(err.to_string(), "Error: Sepal Length is required");
}

#[test]
fn test_extra_fields_are_ignored() {
    let mut input = valid_form();
    input.insert("csrf".to_string(), "token".to_string());

    assert!(validate(&input).is_ok());
}
