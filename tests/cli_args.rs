//! Integration tests for CLI argument handling
//!
//! Runs the binary for the paths that never open the terminal UI: help,
//! argument errors, missing configuration and the one-shot modes.

use std::path::Path;
use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_hospdash"))
        .args(args)
        .output()
        .expect("Failed to execute hospdash")
}

/// Runs the CLI with a scrubbed environment from `dir`
fn run_cli_isolated(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_hospdash"))
        .args(args)
        .env_clear()
        .envs(envs.iter().copied())
        .current_dir(dir)
        .output()
        .expect("Failed to execute hospdash")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("hospdash"), "Help should mention hospdash");
    assert!(stdout.contains("--section"), "Help should mention --section flag");
    assert!(stdout.contains("--summary"));
    assert!(stdout.contains("--check"));
}

#[test]
fn test_invalid_section_prints_error_and_exits() {
    let output = run_cli(&["--section", "cafeteria"]);
    assert!(!output.status.success(), "Expected invalid section to fail");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid section"),
        "Should print error message about invalid section: {}",
        stderr
    );
}

#[test]
fn test_summary_and_check_conflict() {
    let output = run_cli(&["--summary", "--check"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used together"), "stderr: {}", stderr);
}

#[test]
fn test_missing_configuration_names_variables() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join("empty.env");
    std::fs::write(&env_file, "").unwrap();

    let output = run_cli_isolated(
        dir.path(),
        &["--summary", "--env-file", env_file.to_str().unwrap()],
        &[],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ORDS_BASE_URL"), "stderr: {}", stderr);
    assert!(stderr.contains("ORDS_PASSWORD"), "stderr: {}", stderr);
}

#[test]
fn test_missing_env_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli_isolated(dir.path(), &["--check", "--env-file", "nope.env"], &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.env"), "stderr: {}", stderr);
}

#[test]
fn test_check_reports_unreachable_api() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    std::fs::write(
        &env_file,
        "ORDS_BASE_URL=http://127.0.0.1:1/ords/api\nORDS_USERNAME=user\nORDS_PASSWORD=pass\n",
    )
    .unwrap();

    let output = run_cli_isolated(
        dir.path(),
        &["--check", "--env-file", env_file.to_str().unwrap()],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("FAILED"), "stdout: {}", stdout);
    assert!(stdout.contains("127.0.0.1:1"));
}

#[test]
fn test_summary_with_unreachable_api_prints_banner() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli_isolated(
        dir.path(),
        &["--summary", "--log-level", "error"],
        &[
            ("ORDS_BASE_URL", "http://127.0.0.1:1/ords/api"),
            ("ORDS_USERNAME", "user"),
            ("ORDS_PASSWORD", "pass"),
        ],
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Data could not be loaded from the API"),
        "stdout: {}",
        stdout
    );
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use hospdash::cli::{parse_section_arg, Cli, RunMode, StartupConfig};
    use hospdash::section::Section;

    #[test]
    fn test_cli_no_args_opens_overview() {
        let cli = Cli::parse_from(["hospdash"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.mode, RunMode::Dashboard);
        assert_eq!(config.initial_section, Section::Overview);
    }

    #[test]
    fn test_cli_section_flag_with_stay() {
        let cli = Cli::parse_from(["hospdash", "--section", "stay"]);
        assert_eq!(cli.section.as_deref(), Some("stay"));
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.initial_section, Section::Stay);
    }

    #[test]
    fn test_parse_section_arg_sex() {
        assert_eq!(parse_section_arg("sex").unwrap(), Section::Sex);
        assert_eq!(parse_section_arg("DIAGNOSES").unwrap(), Section::Diagnoses);
    }

    #[test]
    fn test_parse_section_arg_invalid_returns_error() {
        assert!(parse_section_arg("invalid").is_err());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["hospdash", "--plan"]).is_err());
    }
}
