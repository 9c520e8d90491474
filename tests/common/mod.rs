//! Common test utilities for pingln-infra CLI tests.
//!
//! Provides `Project` - an isolated temp directory with a config file, plus
//! helpers to run the CLI binary with the synthesis env vars populated.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Minimal config: no custom domains, so only the registry and compute
/// stacks are composed.
pub const MINIMAL_CONFIG: &str = r#"
account = "692859939927"
region = "ap-southeast-2"
"#;

/// Full config: app and site domain sets, transactional email, and SMS.
pub const FULL_CONFIG: &str = r#"
account = "692859939927"
region = "ap-southeast-2"

[domains]
zone_id = "Z0123456789ABC"
zone_name = "pingln.com"
app = ["app.pingln.com"]
site = ["pingln.com", "www.pingln.com"]

[email]
sending_domain = "pingln.com"

[messaging]
sms = true
"#;

/// Env vars the compute stack bakes into its container definition
pub fn synth_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("SECRET_KEY_BASE", "test-secret-key-base"),
        ("SLACK_CLIENT_ID", "test-slack-id"),
        ("SLACK_CLIENT_SECRET", "test-slack-secret"),
        ("DISCORD_PUBLIC_KEY", "test-discord-key"),
        ("SMTP_USERNAME", "test-smtp-user"),
        ("SMTP_PASSWORD", "test-smtp-pass"),
    ]
}

/// Result of running a pingln-infra CLI command
#[derive(Debug)]
pub struct CliResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated project directory holding a `pingln.toml`
pub struct Project {
    root: TempDir,
}

impl Project {
    pub fn with_config(config: &str) -> Self {
        let root = TempDir::new().expect("create temp project");
        fs::write(root.path().join("pingln.toml"), config).expect("write pingln.toml");
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn out_dir(&self) -> PathBuf {
        self.root.path().join("out")
    }

    /// Overwrite the project config (to exercise diff against a changed
    /// composition)
    pub fn rewrite_config(&self, config: &str) {
        fs::write(self.root.path().join("pingln.toml"), config).expect("rewrite pingln.toml");
    }

    /// Run the CLI from the project root with the synthesis env populated
    pub fn run(&self, args: &[&str]) -> CliResult {
        self.run_with_env(args, &synth_env())
    }

    /// Run the CLI with explicit env vars only
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> CliResult {
        let bin = env!("CARGO_BIN_EXE_pingln-infra");
        let mut command = Command::new(bin);
        command.current_dir(self.root.path()).args(args);
        for name in [
            "SECRET_KEY_BASE",
            "SLACK_CLIENT_ID",
            "SLACK_CLIENT_SECRET",
            "DISCORD_PUBLIC_KEY",
            "SMTP_USERNAME",
            "SMTP_PASSWORD",
        ] {
            command.env_remove(name);
        }
        for (name, value) in env_vars {
            command.env(name, value);
        }
        let output = command.output().expect("run pingln-infra");
        CliResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
