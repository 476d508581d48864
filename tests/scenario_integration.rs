//! Integration tests for scenario files and tabular output
//!
//! A scenario file runs end to end: parse, simulate every scenario,
//! concatenate and write to a directory that does not exist yet.

use std::fs;

use sir_scenarios::core::config::ScenarioFile;
use sir_scenarios::data::io::{read_csv, write_csv};
use sir_scenarios::data::paths::ProjectPaths;
use sir_scenarios::epidemic::{compare_to_baseline, SimulationRecord};

const SCENARIOS: &str = r#"
[model]
population = 1000
beta = 0.3
gamma = 0.1
initial_infected = 10
horizon_days = 60
start_date = "2020-01-01"

[[scenarios]]
label = "baseline_no_intervention"

[[scenarios]]
label = "lockdown_day_15"
beta_rule = { kind = "step_change", after_day = 15, factor = 0.4 }

[[scenarios]]
label = "vaccination_day_5"
intervention = { trigger_day = 5, fraction = 0.3 }

[[scenarios]]
label = "lockdown_then_treatment"
beta_rule = { kind = "window", start_day = 10, end_day = 30, factor = 0.5 }

[scenarios.gamma_rule]
kind = "chain"
rules = [
    { kind = "step_change", after_day = 20, factor = 1.5 },
    { kind = "step_change", after_day = 40, factor = 2.0 },
]
"#;

#[test]
fn test_scenario_file_to_csv() {
    let set = ScenarioFile::from_toml_str(SCENARIOS)
        .unwrap()
        .into_scenario_set()
        .unwrap();
    let records = set.run().unwrap();
    assert_eq!(records.len(), 4 * 60);

    let dir = tempfile::tempdir().unwrap();
    let paths = ProjectPaths::new(dir.path());
    let destination = paths.processed_data_dir().join("sir_scenarios.csv");
    write_csv(&records, &destination).unwrap();
    assert!(destination.exists());

    let back: Vec<SimulationRecord> = read_csv(&destination).unwrap();
    assert_eq!(back.len(), records.len());

    let labels: Vec<&str> = back
        .chunks(60)
        .map(|chunk| chunk[0].scenario.as_str())
        .collect();
    assert_eq!(
        labels,
        [
            "baseline_no_intervention",
            "lockdown_day_15",
            "vaccination_day_5",
            "lockdown_then_treatment"
        ]
    );

    let header = fs::read_to_string(&destination).unwrap();
    assert!(header.starts_with("t_day,date,S,I,R,N,beta,gamma,scenario\n0,2020-01-01,"));
    assert_eq!(back[59].date.unwrap().to_string(), "2020-02-29");
}

#[test]
fn test_chained_gamma_schedule_in_records() {
    let set = ScenarioFile::from_toml_str(SCENARIOS)
        .unwrap()
        .into_scenario_set()
        .unwrap();
    let outputs = set.run_each().unwrap();
    let combined = &outputs[3];

    assert_eq!(combined.records[19].gamma, 0.1);
    assert!((combined.records[20].gamma - 0.15).abs() < 1e-12);
    assert!((combined.records[40].gamma - 0.3).abs() < 1e-12);
    assert_eq!(combined.records[9].beta, 0.3);
    assert_eq!(combined.records[10].beta, 0.15);
    assert_eq!(combined.records[30].beta, 0.3);
}

#[test]
fn test_interventions_reduce_final_infections_against_baseline() {
    let set = ScenarioFile::from_toml_str(SCENARIOS)
        .unwrap()
        .into_scenario_set()
        .unwrap();
    let outputs = set.run_each().unwrap();
    let baseline = &outputs[0];

    for other in &outputs[1..] {
        let deltas = compare_to_baseline(baseline, other).unwrap();
        assert_eq!(deltas.len(), 60);
        assert!(
            other.peak_infected().unwrap().1 < baseline.peak_infected().unwrap().1,
            "{} should lower the peak",
            other.scenario
        );
        assert!(deltas.iter().all(|d| d.scenario == other.scenario));
    }
}

#[test]
fn test_repeated_runs_identical() {
    let set = ScenarioFile::from_toml_str(SCENARIOS)
        .unwrap()
        .into_scenario_set()
        .unwrap();
    assert_eq!(set.run().unwrap(), set.run().unwrap());
}

#[test]
fn test_shipped_scenario_file_runs() {
    let path = ProjectPaths::from_manifest()
        .root()
        .join("scenarios")
        .join("interventions.toml");
    let file = ScenarioFile::load(&path).unwrap();
    assert!(file.output.is_some());

    let outputs = file.into_scenario_set().unwrap().run_each().unwrap();
    assert_eq!(outputs.len(), 4);
    assert!(outputs.iter().all(|o| o.days() == 160));
}
