//! End-to-end CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn ackpool() -> Command {
    let mut cmd = Command::cargo_bin("ackpool").expect("binary not found");
    cmd.env_remove("ACKPOOL_M").env_remove("ACKPOOL_N");
    cmd
}

#[test]
fn help_flag() {
    ackpool()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--iterations"));
}

#[test]
fn version_flag() {
    ackpool()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ackpool"));
}

#[test]
fn default_computes_f_2_2() {
    ackpool()
        .arg("-q")
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn compute_f_3_3_pooled() {
    ackpool()
        .args(["-m", "3", "-n", "3", "-q"])
        .assert()
        .success()
        .stdout("61\n");
}

#[test]
fn inputs_from_environment() {
    ackpool()
        .env("ACKPOOL_M", "1")
        .env("ACKPOOL_N", "1")
        .arg("-q")
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn all_algorithms_agree() {
    ackpool()
        .args(["-m", "3", "-n", "3", "--algo", "all", "-q"])
        .assert()
        .success()
        .stdout("61\n61\n61\n");
}

#[test]
fn details_show_starts() {
    ackpool()
        .args(["-m", "3", "-n", "3", "-d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Operations started: 2,432"))
        .stdout(predicate::str::contains("f(3, 3) = 61"));
}

#[test]
fn verbose_comparison() {
    ackpool()
        .args(["--algo", "all", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Comparison Results"))
        .stdout(predicate::str::contains("BoxedAsync"));
}

#[test]
fn sweep_parallel() {
    ackpool()
        .args(["--sweep", "--parallel", "-m", "3", "-n", "2", "--algo", "all", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("29"));
}

#[test]
fn warm_and_iterations() {
    ackpool()
        .args(["--warm", "64", "--iterations", "3", "-q"])
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn warm_reaches_comparison_workers() {
    ackpool()
        .args(["--algo", "all", "--warm", "1024", "-m", "3", "-n", "3", "-d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Operations started: 2,432"))
        .stdout(predicate::str::is_match("Operations allocated: [1-9]").unwrap().not());
}

#[test]
fn parallel_without_sweep_rejected() {
    ackpool()
        .args(["--parallel"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--parallel requires --sweep"));
}

#[test]
fn overflow_exits_generic() {
    ackpool()
        .args(["-m", "0", "-n", "18446744073709551615"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("overflows"));
}

#[test]
fn unknown_algorithm_exits_config() {
    ackpool()
        .args(["--algo", "fast"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unknown calculator"));
}

#[test]
fn deep_baseline_rejected() {
    ackpool()
        .args(["--algo", "recursive", "-m", "3", "-n", "12"])
        .assert()
        .code(4);
}

#[test]
fn zero_iterations_rejected() {
    ackpool().args(["--iterations", "0"]).assert().failure();
}

#[test]
fn json_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    ackpool()
        .args(["--sweep", "-m", "1", "-n", "1", "-q", "-o"])
        .arg(&path)
        .assert()
        .success();

    let text = std::fs::read_to_string(&path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&text).unwrap();
    let entries = report.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[3]["m"], 1);
    assert_eq!(entries[3]["n"], 1);
    assert_eq!(entries[3]["value"], 3);
    assert_eq!(entries[3]["starts"], 4);
    assert_eq!(entries[3]["algorithm"], "Pooled");
}

#[test]
fn completion_bash() {
    ackpool()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ackpool"));
}
