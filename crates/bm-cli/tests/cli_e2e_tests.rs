//! End-to-end tests for the `bm` binary
//!
//! Covers the assemble → run and assemble → disassemble pipelines, exit
//! codes on faults, and configuration through bm.toml and BM_* variables.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

/// `bm` with a clean environment rooted in `dir`
fn bm(dir: &Path) -> Command {
    let mut cmd = Command::from(assert_cmd::cargo::cargo_bin_cmd!("bm"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("NO_COLOR", "1")
        .env_remove("BM_LOG")
        .env_remove("BM_STACK_CAPACITY")
        .env_remove("BM_PROGRAM_CAPACITY")
        .env_remove("BM_EXECUTION_LIMIT");
    cmd
}

/// Write `source` and assemble it, returning the binary path
fn assemble(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let input = dir.path().join(format!("{}.basm", name));
    let output = dir.path().join(format!("{}.bm", name));
    fs::write(&input, source).unwrap();

    bm(dir.path())
        .arg("asm")
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    output
}

// ============================================================================
// bm run
// ============================================================================

#[test]
fn test_run_add_program_faults_past_end() {
    let dir = TempDir::new().unwrap();
    let program = assemble(&dir, "add", "push 12\npush 21\nplus\n");

    bm(dir.path())
        .arg("run")
        .arg(&program)
        .assert()
        .failure()
        .code(1)
        .stdout("Stack:\n  33\n")
        .stderr(predicate::str::contains("ERROR: ERR_ILLEGAL_INST_ACCESS"));
}

#[test]
fn test_run_halt_succeeds() {
    let dir = TempDir::new().unwrap();
    let program = assemble(&dir, "halt", "# comment\npush 1\nhalt\n");

    bm(dir.path())
        .arg("run")
        .arg(&program)
        .assert()
        .success()
        .stdout("Stack:\n  1\n")
        .stderr("");
}

#[test]
fn test_run_division_by_zero() {
    let dir = TempDir::new().unwrap();
    let program = assemble(&dir, "div", "push 1\npush 0\ndiv\nhalt\n");

    bm(dir.path())
        .arg("bme")
        .arg(&program)
        .assert()
        .code(1)
        .stdout("Stack:\n  1\n  0\n")
        .stderr(predicate::str::contains("ERROR: ERR_DIV_BY_ZERO"));
}

#[test]
fn test_run_with_limit() {
    let dir = TempDir::new().unwrap();
    let program = assemble(&dir, "loop", "push 1\njmp 0\n");

    bm(dir.path())
        .arg("run")
        .arg(&program)
        .arg("--limit")
        .arg("10")
        .assert()
        .success()
        .stdout("Stack:\n  1\n  1\n  1\n  1\n  1\n");
}

#[test]
fn test_run_print_debug() {
    let dir = TempDir::new().unwrap();
    let program = assemble(&dir, "print", "push 42\nprint_debug\nhalt\n");

    bm(dir.path())
        .arg("run")
        .arg(&program)
        .assert()
        .success()
        .stdout("42Stack:\n  [empty]\n");
}

#[test]
fn test_run_missing_file() {
    let dir = TempDir::new().unwrap();

    bm(dir.path())
        .arg("run")
        .arg("missing.bm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.bm"));
}

#[test]
fn test_run_misaligned_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.bm");
    fs::write(&path, [0u8; 17]).unwrap();

    bm(dir.path())
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a multiple"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_stack_capacity_from_project_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bm.toml"), "[machine]\nstack-capacity = 2\n").unwrap();
    let program = assemble(&dir, "loop", "push 1\njmp 0\n");

    bm(dir.path())
        .arg("run")
        .arg(&program)
        .assert()
        .code(1)
        .stdout("Stack:\n  1\n  1\n")
        .stderr(predicate::str::contains("ERROR: ERR_STACK_OVERFLOW"));
}

#[test]
fn test_execution_limit_from_env() {
    let dir = TempDir::new().unwrap();
    let program = assemble(&dir, "loop", "push 7\njmp 0\n");

    bm(dir.path())
        .env("BM_EXECUTION_LIMIT", "3")
        .arg("run")
        .arg(&program)
        .assert()
        .success()
        .stdout("Stack:\n  7\n  7\n");
}

#[test]
fn test_limit_flag_overrides_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bm.toml"), "[run]\nlimit = 100\n").unwrap();
    let program = assemble(&dir, "loop", "push 7\njmp 0\n");

    bm(dir.path())
        .arg("run")
        .arg(&program)
        .arg("-l")
        .arg("1")
        .assert()
        .success()
        .stdout("Stack:\n  7\n");
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bm.toml"), "[machine]\nstack-capacity = 0\n").unwrap();
    let input = dir.path().join("x.basm");
    fs::write(&input, "halt\n").unwrap();

    bm(dir.path())
        .arg("asm")
        .arg(&input)
        .arg(dir.path().join("x.bm"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than 0"));
}

// ============================================================================
// bm asm / bm disasm
// ============================================================================

#[test]
fn test_asm_unknown_instruction() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.basm");
    fs::write(&input, "push 1\nrot\n").unwrap();

    bm(dir.path())
        .arg("basm")
        .arg(&input)
        .arg(dir.path().join("bad.bm"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown instruction `rot`"));
}

#[test]
fn test_asm_program_too_large() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("big.basm");
    fs::write(&input, "nop\nnop\nnop\n").unwrap();

    bm(dir.path())
        .env("BM_PROGRAM_CAPACITY", "2")
        .arg("asm")
        .arg(&input)
        .arg(dir.path().join("big.bm"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("program too large"));
}

#[test]
fn test_disasm_round_trip() {
    let dir = TempDir::new().unwrap();
    let source = "push 0\npush 1\nplus\ndup 0\npush 5\neq\njmp_if 8\njmp 1\nhalt\n";
    let program = assemble(&dir, "count", &format!("# counter\n{}", source));

    let output = bm(dir.path())
        .arg("debasm")
        .arg(&program)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(output).unwrap(), source);
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();
    let program = assemble(&dir, "halt", "halt\n");

    bm(dir.path())
        .arg("-v")
        .arg("run")
        .arg(&program)
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG: loaded 1 instructions"));
}

// ============================================================================
// bm completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();

    bm(dir.path())
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("bm"));
}
