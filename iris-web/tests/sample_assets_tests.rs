//! Checks the sample assets shipped in `model/` load and agree with each other

use std::path::PathBuf;

use iris_common::{validate, FeatureSchema, ModelProvider, Predictor, SpeciesCatalog};

fn asset(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("model")
        .join(name)
}

fn sample_predictor() -> Predictor {
    let schema = FeatureSchema::load(&asset("columns.json")).expect("schema loads");
    let model = ModelProvider::load(&asset("model.json")).expect("model loads");
    let catalog = SpeciesCatalog::load(&asset("species.toml")).expect("catalog loads");
    Predictor::new(schema, model, catalog)
}

#[test]
fn test_sample_assets_are_consistent() {
    let predictor = sample_predictor();

    assert_eq!(predictor.model().n_features(), predictor.schema().len());
    assert!(predictor.catalog().missing(predictor.model().classes()).is_empty());
    assert!(predictor.model().supports_probability());
    assert_eq!(predictor.catalog(), &SpeciesCatalog::iris());
}

#[test]
fn test_sample_model_classifies_textbook_specimens() {
    let predictor = sample_predictor();
    let cases = [
        (["5.1", "3.5", "1.4", "0.2"], "SETOSA"),
        (["7.0", "3.2", "4.7", "1.4"], "VERSICOLOR"),
        (["6.3", "3.3", "6.0", "2.5"], "VIRGINICA"),
    ];

    for (values, expected) in cases {
        let form: Vec<(&str, &str)> = ["sepal_length", "sepal_width", "petal_length", "petal_width"]
            .into_iter()
            .zip(values)
            .collect();
        let measurements = validate(form.as_slice()).unwrap();

        let result = predictor.predict(&measurements).unwrap();
        assert_eq!(result.label, expected, "for {:?}", values);
    }
}
