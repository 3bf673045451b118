use assert_cmd::Command;
use predicates::prelude::*;

fn timecard() -> Command {
    Command::cargo_bin("timecard").unwrap()
}

#[test]
fn test_help_lists_flags() {
    timecard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--commit-every"))
        .stdout(predicate::str::contains("--csv"));
}

#[test]
fn test_bounded_run_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("stats.csv");
    let config = dir.path().join("config.toml");

    timecard()
        .args(["--ticks", "3", "--interval-ms", "0", "--commit-every", "1"])
        .args(["--color", "never", "--limit", "0.001"])
        .arg("--config")
        .arg(&config)
        .arg("--csv")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("-count-"))
        .stdout(predicate::str::ends_with("\n"));

    let content = std::fs::read_to_string(&csv).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("time,delta,timeit_min,"));
}

#[test]
fn test_config_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("from-config.csv");
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            "interval_ms = 0\ncommit_every = 2\ncolor = \"never\"\ncsv = {:?}\n",
            csv.to_str().unwrap()
        ),
    )
    .unwrap();

    timecard()
        .args(["--ticks", "4"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let content = std::fs::read_to_string(&csv).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_unwritable_csv_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("missing").join("stats.csv");

    timecard()
        .args(["--ticks", "1", "--interval-ms", "0", "--color", "never"])
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("--csv")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
