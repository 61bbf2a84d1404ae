use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn runs_for_a_bounded_time_and_prints_status() {
    Command::cargo_bin("funcbar").unwrap()
        .args(["--duration-ms", "300", "--interval-ms", "50", "--log", "debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"full_text\":\"funcbar 0.1.0\""))
        .stdout(predicate::str::contains("up 00:00:00"));
}
