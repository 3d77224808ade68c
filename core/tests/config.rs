//! Configuration defaults, validation and JSON overrides.

use shufflelab_core::{
    config::{Enumeration, Execution, ExperimentConfig, TestSelection},
    error::ShuffleError,
};
use std::path::PathBuf;

fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("shufflelab-{}-{name}.json", std::process::id()));
    std::fs::write(&path, content).expect("write temp config");
    path
}

#[test]
fn defaults_describe_the_standard_experiment() {
    let cfg = ExperimentConfig::default();
    assert_eq!(cfg.k_max, 5);
    assert_eq!(cfg.trials, 50);
    assert_eq!(cfg.tests, TestSelection::ALL);
    assert_eq!(cfg.enumeration, Enumeration::AllLengths);
    assert_eq!(cfg.execution, Execution::Parallel);
    cfg.validate().expect("defaults are valid");
}

#[test]
fn out_of_range_values_are_rejected() {
    let cases = [(0, 50), (9, 50), (5, 0), (5, 101)];
    for (k_max, trials) in cases {
        let cfg = ExperimentConfig { k_max, trials, ..ExperimentConfig::default() };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ShuffleError::OutOfRange { .. }), "k={k_max} trials={trials}: {err}");
    }
}

#[test]
fn boundary_values_are_accepted() {
    for (k_max, trials) in [(1, 1), (8, 100)] {
        let cfg = ExperimentConfig { k_max, trials, ..ExperimentConfig::default() };
        assert!(cfg.validate().is_ok());
    }
}

#[test]
fn negative_weight_is_rejected() {
    let mut cfg = ExperimentConfig::default();
    cfg.score.adjacency_weight = -0.1;
    assert!(matches!(cfg.validate(), Err(ShuffleError::InvalidWeight { .. })));
}

#[test]
fn zero_sized_drop_is_rejected() {
    let mut cfg = ExperimentConfig::default();
    cfg.models.overhand_drop.min = 0;
    assert!(matches!(cfg.validate(), Err(ShuffleError::InvalidDistribution { .. })));
}

#[test]
fn partial_json_keeps_remaining_defaults() {
    let path = write_temp(
        "partial",
        r#"{
            "k_max": 3,
            "enumeration": "fixed_length",
            "tests": { "uniformity": false },
            "score": { "adjacency_weight": 1.0 }
        }"#,
    );
    let cfg = ExperimentConfig::load(&path).expect("load");
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.k_max, 3);
    assert_eq!(cfg.trials, 50);
    assert_eq!(cfg.enumeration, Enumeration::FixedLength);
    assert_eq!(cfg.tests, TestSelection { uniformity: false, adjacency: true, mixing: true });
    assert_eq!(cfg.score.adjacency_weight, 1.0);
    assert_eq!(cfg.score.uniformity_weight, 0.25);
}

#[test]
fn invalid_files_are_reported() {
    let missing = std::env::temp_dir().join("shufflelab-does-not-exist.json");
    assert!(ExperimentConfig::load(&missing).is_err());

    let garbled = write_temp("garbled", "{ k_max: ");
    let err = ExperimentConfig::load(&garbled).unwrap_err();
    std::fs::remove_file(&garbled).ok();
    assert!(matches!(err, ShuffleError::Serialization(_)));

    let out_of_range = write_temp("range", r#"{ "trials": 500 }"#);
    let err = ExperimentConfig::load(&out_of_range).unwrap_err();
    std::fs::remove_file(&out_of_range).ok();
    assert!(matches!(err, ShuffleError::OutOfRange { field: "trials", .. }));
}

#[test]
fn config_round_trips_through_json() {
    let cfg = ExperimentConfig { k_max: 7, seed: 123, ..ExperimentConfig::default() };
    let text = serde_json::to_string(&cfg).unwrap();
    let back: ExperimentConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, cfg);
}
