use std::fs;
use std::path::Path;

use assert_cmd::Command;
use hurd_cli::session::SavedSession;
use predicates::prelude::*;
use tempfile::tempdir;

const CONFIG: &str = r#"
game_name: "smoke"
epidemics: 2
funded_events: 1
cities:
  - name: "Atlanta"
    disease: "blue"
  - name: "Chicago"
    disease: "blue"
  - name: "Lima"
    disease: "yellow"
  - name: "Bogota"
    disease: "yellow"
  - name: "Santiago"
    disease: "yellow"
  - name: "Cairo"
    disease: "black"
  - name: "Delhi"
    disease: "black"
  - name: "Tokyo"
    disease: "red"
players:
  - name: "ana"
    start_cards: ["Lima"]
    scientist: true
"#;

const EVENTS: &str = r#"
- city_draw: Atlanta
- funded_event
- infect: Cairo
- infect: Tokyo
- quarantine: Delhi
"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn nerd_hurd() -> Command {
    Command::cargo_bin("nerd-hurd").expect("binary built")
}

#[test]
fn report_prints_the_forecast() {
    let dir = tempdir().expect("temp dir");
    let config = write(dir.path(), "game.yaml", CONFIG);
    let events = write(dir.path(), "events.yaml", EVENTS);

    nerd_hurd()
        .arg("report")
        .arg("--config")
        .arg(&config)
        .arg("--events")
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::contains("Replayed 5 events"))
        .stdout(predicate::str::contains("Epidemic this turn"))
        .stdout(predicate::str::contains("ana (scientist)"));
}

#[test]
fn report_json_is_machine_readable() {
    let dir = tempdir().expect("temp dir");
    let config = write(dir.path(), "game.yaml", CONFIG);

    let output = nerd_hurd()
        .args(["report", "--json", "--config"])
        .arg(&config)
        .output()
        .expect("run binary");
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["game_name"], "smoke");
    assert_eq!(report["city_deck"]["total"], 10);
    assert_eq!(report["cities"].as_array().map(Vec::len), Some(8));
}

#[test]
fn validate_only_rejects_bad_configs() {
    let dir = tempdir().expect("temp dir");
    let config = write(
        dir.path(),
        "game.yaml",
        &CONFIG.replace("[\"Lima\"]", "[\"Paris\"]"),
    );

    nerd_hurd()
        .args(["report", "--validate-only", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("start_cards"));
}

#[test]
fn failing_event_names_its_position() {
    let dir = tempdir().expect("temp dir");
    let config = write(dir.path(), "game.yaml", CONFIG);
    let events = write(dir.path(), "events.yaml", "- infect: Cairo\n- infect: cairo\n");

    nerd_hurd()
        .args(["report", "--config"])
        .arg(&config)
        .arg("--events")
        .arg(&events)
        .assert()
        .failure()
        .stderr(predicate::str::contains("event #2"));
}

#[test]
fn save_then_resume_continues_the_game() {
    let dir = tempdir().expect("temp dir");
    let config = write(dir.path(), "game.yaml", CONFIG);
    let events = write(dir.path(), "events.yaml", EVENTS);
    let saved = dir.path().join("saves").join("smoke.json");

    nerd_hurd()
        .args(["report", "--config"])
        .arg(&config)
        .arg("--events")
        .arg(&events)
        .arg("--save")
        .arg(&saved)
        .assert()
        .success();
    assert!(saved.exists());

    let more = write(dir.path(), "more.yaml", "- epidemic: Bogota\n");
    let resumed = dir.path().join("resumed.json");
    nerd_hurd()
        .args(["resume", "--snapshot"])
        .arg(&saved)
        .arg("--events")
        .arg(&more)
        .arg("--save")
        .arg(&resumed)
        .assert()
        .success()
        .stdout(predicate::str::contains("1/2 epidemics drawn"));

    let session = SavedSession::load(&resumed).expect("load resumed session");
    let (_, players, game) = session.restore().expect("restore");
    assert_eq!(players.len(), 1);
    assert_eq!(game.city_deck().epidemics_drawn(), 1);
    assert_eq!(game.outbreaks(), 0);
}

#[test]
fn inconsistent_games_are_saved_before_reporting() {
    let dir = tempdir().expect("temp dir");
    let config = write(dir.path(), "game.yaml", CONFIG);
    // Five safe cards cannot all come from one five-card striation.
    let events = write(
        dir.path(),
        "events.yaml",
        "- city_draw: Atlanta\n- city_draw: Chicago\n- city_draw: Bogota\n\
         - city_draw: Santiago\n- city_draw: Cairo\n",
    );
    let saved = dir.path().join("broken.json");

    nerd_hurd()
        .args(["report", "--config"])
        .arg(&config)
        .arg("--events")
        .arg(&events)
        .arg("--save")
        .arg(&saved)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no layout of the city deck"));
    assert!(saved.exists());

    nerd_hurd()
        .args(["resume", "--snapshot"])
        .arg(&saved)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no layout of the city deck"));
}

#[test]
fn demo_walks_the_deck() {
    let dir = tempdir().expect("temp dir");
    let config = write(dir.path(), "game.yaml", CONFIG);

    nerd_hurd()
        .args(["demo", "--seed", "5", "--turns", "3", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Turn  1"))
        .stdout(predicate::str::contains("3 turns"));
}
