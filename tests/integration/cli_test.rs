use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn admob_stats(args: &[&str], home: &Path) -> Output {
    admob_stats_with_env(args, home, &[])
}

fn admob_stats_with_env(args: &[&str], home: &Path, vars: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_admob-stats"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env(
            "ADMOB_STATS_STORAGE__ENTRIES_PATH",
            home.join("entries.toml"),
        )
        .env_remove("RUST_LOG")
        .env_remove("ADMOB_STATS_LOG_LEVEL")
        .envs(vars.iter().copied())
        .current_dir(home)
        .output()
        .expect("Failed to execute admob-stats")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod version_command_tests {
    use super::*;

    #[test]
    fn test_version_basic() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(&["version"], home.path());

        assert!(output.status.success());
        assert!(stdout(&output).contains("admob-stats 0.1.0"));
    }

    #[test]
    fn test_version_detailed() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(&["version", "--detailed"], home.path());
        let out = stdout(&output);

        assert!(output.status.success());
        assert!(out.contains("Version"));
        assert!(out.contains("Apache-2.0"));
        assert!(out.contains("this_month"));
    }
}

mod help_tests {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(&["--help"], home.path());
        let out = stdout(&output);

        assert!(output.status.success());
        for command in ["setup", "entries", "stats", "sensors", "run", "version"] {
            assert!(out.contains(command), "help should mention '{}'", command);
        }
    }

    #[test]
    fn test_unknown_command_fails() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(&["frobnicate"], home.path());
        assert!(!output.status.success());
    }

    #[test]
    fn test_invalid_period_rejected() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(&["stats", "--period", "last_week"], home.path());

        assert!(!output.status.success());
        assert!(stderr(&output).contains("last_week"));
    }
}

mod entries_command_tests {
    use super::*;

    #[test]
    fn test_list_without_entries() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(&["entries", "list"], home.path());

        assert!(output.status.success());
        assert!(stdout(&output).contains("No entries configured"));
    }

    #[test]
    fn test_rust_log_filters_accepted() {
        for filter in ["off", "warn,hyper", "admob_stats_core=trace"] {
            let home = TempDir::new().unwrap();
            let output =
                admob_stats_with_env(&["entries", "list"], home.path(), &[("RUST_LOG", filter)]);

            assert!(
                output.status.success(),
                "RUST_LOG={} should not block startup: {}",
                filter,
                stderr(&output)
            );
        }
    }

    #[test]
    fn test_list_json_empty() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(&["entries", "list", "--format", "json"], home.path());

        assert!(output.status.success());
        let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
        assert_eq!(parsed, serde_json::json!([]));
    }

    #[test]
    fn test_show_unknown_entry() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(&["entries", "show", "missing"], home.path());

        assert!(!output.status.success());
        assert!(stderr(&output).contains("E7001"));
    }

    #[test]
    fn test_stats_without_entries() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(&["stats"], home.path());

        assert!(!output.status.success());
        assert!(stderr(&output).contains("admob-stats setup"));
    }
}

mod setup_command_tests {
    use super::*;

    #[test]
    fn test_setup_missing_fields() {
        let home = TempDir::new().unwrap();
        let output = admob_stats(
            &["setup", "--client-id", "id", "--publisher-id", "pub-1"],
            home.path(),
        );

        assert!(!output.status.success());
        let out = stdout(&output);
        assert!(out.contains("client_secret"));
        assert!(out.contains("This field is required"));
        assert!(!home.path().join("entries.toml").exists());
    }
}
