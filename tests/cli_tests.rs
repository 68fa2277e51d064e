//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

/// Run from an empty directory with an empty home so no stray
/// `.pccompat.*` file is picked up
fn pc_compat() -> (TempDir, Command) {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("pc-compat").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("RUST_LOG");
    (dir, cmd)
}

#[test]
fn test_check_compatible_build() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["--no-color", "check", &fixture("compatible_build.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Build is compatible"))
        .stdout(predicate::str::contains("[POWER_ESTIMATE] System: Estimated total system power: 670W. Recommended PSU: 850W+"))
        .stdout(predicate::str::contains("[VERIFY_RADIATOR_SUPPORT]"));
}

#[test]
fn test_check_incompatible_without_strict_succeeds() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["--no-color", "check", &fixture("socket_mismatch_build.yaml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Build is NOT compatible"))
        .stdout(predicate::str::contains(
            "[SOCKET_MISMATCH] CPU/Motherboard: CPU socket LGA1700 incompatible with motherboard socket AM5",
        ))
        .stdout(predicate::str::contains("[CHIPSET_WARNING]"));
}

#[test]
fn test_check_strict_exit_code() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["--no-color", "check", "--strict", &fixture("socket_mismatch_build.yaml")])
        .assert()
        .code(1);
}

#[test]
fn test_check_strict_compatible_passes() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["check", "--strict", "--no-color", &fixture("compatible_build.json")])
        .assert()
        .success();
}

#[test]
fn test_check_json() {
    let (_dir, mut cmd) = pc_compat();
    let output = cmd
        .args(["check", "--format", "json", &fixture("socket_mismatch_build.yaml")])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["compatible"], false);
    assert_eq!(report["errors"][0]["kind"], "SOCKET_MISMATCH");
    assert_eq!(report["errors"][0]["component_pair"], "CPU/Motherboard");
    assert_eq!(report["errors"][0]["severity"], "critical");
    assert_eq!(report["warnings"][0]["kind"], "CHIPSET_WARNING");
}

#[test]
fn test_check_malformed_component_exit_code() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["--no-color", "check", &fixture("malformed_build.json")])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("malformed cpu component: field `tdp` is missing"));
}

#[test]
fn test_check_unknown_part() {
    let dir = tempdir().unwrap();
    let build = dir.path().join("build.json");
    std::fs::write(&build, r#"{"cpu": "amd-ryzen-9-9999x"}"#).unwrap();

    let (_home, mut cmd) = pc_compat();
    cmd.args(["check", build.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown part: amd-ryzen-9-9999x"));
}

#[test]
fn test_check_missing_build_file() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["check", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read build"));
}

#[test]
fn test_check_config_margin() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["check", &fixture("tight_fit_build.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("GPU_TIGHT_FIT").not());

    let (_dir, mut cmd) = pc_compat();
    cmd.args([
        "--config",
        &fixture("wide_margin.yaml"),
        "check",
        &fixture("tight_fit_build.json"),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("[GPU_TIGHT_FIT] GPU/Case"));
}

#[test]
fn test_check_config_discovered_in_cwd() {
    let (dir, mut cmd) = pc_compat();
    std::fs::write(dir.path().join(".pccompat.yaml"), "engine:\n  gpu_fit_margin_mm: 60\n").unwrap();
    cmd.args(["--no-color", "check", &fixture("tight_fit_build.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("GPU_TIGHT_FIT"));
}

#[test]
fn test_check_disable_rule() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args([
        "--no-color",
        "check",
        "--strict",
        "--disable",
        "cpu-motherboard",
        &fixture("socket_mismatch_build.yaml"),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Build is compatible"));
}

#[test]
fn test_check_disable_unknown_rule() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["check", "--disable", "gpu-ram", &fixture("compatible_build.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown rule: gpu-ram"));
}

#[test]
fn test_check_custom_catalog() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args([
        "--no-color",
        "--catalog",
        &fixture("mini_catalog.json"),
        "check",
        &fixture("long_gpu_build.json"),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "[GPU_TOO_LONG] GPU/Case: GPU length 350mm exceeds case clearance 320mm",
    ));
}

#[test]
fn test_alternatives_from_catalog() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args([
        "--catalog",
        &fixture("mini_catalog.json"),
        "alternatives",
        "gpu",
        &fixture("long_gpu_build.json"),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Consider compatible gpu alternatives: short-gpu"))
    .stdout(predicate::str::contains("Short GPU"));
}

#[test]
fn test_alternatives_json() {
    let (_dir, mut cmd) = pc_compat();
    let output = cmd
        .args([
            "alternatives",
            "motherboard",
            "--format",
            "json",
            &fixture("socket_mismatch_build.yaml"),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let suggestion: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(suggestion["type"], "ALTERNATIVE_SUGGESTION");
    let candidates = suggestion["candidates"].as_array().unwrap();
    assert!(candidates.contains(&serde_json::Value::from("asus-rog-strix-z790-e")));
    assert!(!candidates.contains(&serde_json::Value::from("msi-mag-b650-tomahawk")));
}

#[test]
fn test_alternatives_ignore_unreadable_part_in_other_slot() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["alternatives", "motherboard", &fixture("lengthless_gpu_build.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Consider compatible motherboard alternatives: msi-mag-b650-tomahawk, asrock-x670e-taichi",
        ));

    let (_dir, mut cmd) = pc_compat();
    cmd.args(["check", &fixture("lengthless_gpu_build.json")])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("malformed gpu component: field `length` is missing"));
}

#[test]
fn test_alternatives_empty_slot() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["alternatives", "cooler", &fixture("socket_mismatch_build.yaml")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build has no cooler selected"));
}

#[test]
fn test_rules_lists_identifiers() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["--no-color", "rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cpu-motherboard"))
        .stdout(predicate::str::contains("storage-motherboard"))
        .stdout(predicate::str::contains("PSU_TOTAL_INSUFFICIENT"))
        .stdout(predicate::str::contains("VERIFY_RADIATOR_SUPPORT"));
}

#[test]
fn test_parts_by_kind() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["parts", "--kind", "psu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corsair-rm1000e"))
        .stdout(predicate::str::contains("seasonic-focus-650"))
        .stdout(predicate::str::contains("rtx-4090-fe").not());
}

#[test]
fn test_parts_search() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["parts", "--search", "noctua"])
        .assert()
        .success()
        .stdout(predicate::str::contains("noctua-nh-d15"))
        .stdout(predicate::str::contains("deepcool-ak400").not());
}

#[test]
fn test_parts_no_match() {
    let (_dir, mut cmd) = pc_compat();
    cmd.args(["parts", "--search", "no-such-part"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No parts found"));
}

#[test]
fn test_help() {
    let (_dir, mut cmd) = pc_compat();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PC build compatibility checker"));
}
