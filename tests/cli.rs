use assert_cmd::Command;

fn oracle() -> Command {
    let mut cmd = Command::cargo_bin("fft-oracle").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn small_sweep_succeeds() {
    let assert = oracle().args(["--max-size", "64"]).assert().success();
    let out = stdout_of(&assert);
    assert_eq!(
        out,
        "tests for size 32 succeeded successfully.\n\
         tests for size 64 succeeded successfully.\n\
         all tests succeeded successfully.\n"
    );
}

#[test]
fn filters_restrict_the_sweep() {
    let assert = oracle()
        .args(["--min-size", "256", "--max-size", "256"])
        .args(["--domain", "real", "--layout", "packed"])
        .assert()
        .success();
    assert!(stdout_of(&assert).starts_with("tests for size 256 succeeded successfully."));
}

#[test]
fn invalid_size_is_fatal() {
    let assert = oracle().args(["--min-size", "48"]).assert().code(2);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("48"), "{stderr}");
    assert!(stdout_of(&assert).is_empty());
}

#[test]
fn unknown_domain_is_rejected() {
    oracle().args(["--domain", "quaternion"]).assert().failure();
}

#[test]
fn setup_failure_fails_the_run() {
    let assert = oracle()
        .args(["--min-size", "16", "--max-size", "16", "--domain", "real"])
        .assert()
        .code(1);
    let out = stdout_of(&assert);
    assert!(out.contains("real fft 16: setup failed"), "{out}");
    assert!(!out.contains("all tests succeeded"));
}

#[test]
fn failing_check_dumps_the_spectrum() {
    let assert = oracle()
        .args(["--max-size", "32", "--min-dynamic-range-db", "400"])
        .assert()
        .code(1);
    let out = stdout_of(&assert);
    assert!(out.contains("pwr[j = "), "{out}");
    assert!(out.contains("dynamic range check failed"));
    assert!(!out.contains("succeeded successfully"));
}

#[test]
fn negative_threshold_is_fatal() {
    oracle()
        .args(["--max-size", "32", "--max-magnitude-error=-1"])
        .assert()
        .code(2);
}

#[test]
fn tone_divisor_that_shifts_nyquist_phase_is_fatal() {
    for divisor in ["2", "4"] {
        let assert = oracle()
            .args(["--max-size", "64", "--tone-divisor", divisor])
            .assert()
            .code(2);
        let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
        assert!(stderr.contains("tone divisor"), "{stderr}");
    }
    oracle()
        .args(["--max-size", "64", "--tone-divisor", "8"])
        .assert()
        .success();
    oracle()
        .args(["--max-size", "64", "--tone-divisor", "2", "--domain", "complex"])
        .assert()
        .success();
}
