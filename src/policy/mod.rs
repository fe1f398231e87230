//! Compiled, immutable policy tables.
//!
//! A [`Policy`] is built once at startup from [`Config`] and never mutated
//! afterwards. Regex compilation failures are configuration errors surfaced
//! as [`PolicyError`] before any command is evaluated — a malformed pattern
//! can never become a per-command runtime failure.

mod classify;

use std::fmt;
use std::time::Duration;

use regex::Regex;

use crate::config::Config;

/// The four policy tables from configuration, with patterns compiled.
#[derive(Debug)]
pub struct Policy {
    /// Exact/prefix allow-list entries.
    allow_prefixes: Vec<String>,
    /// Anchored safe-file-read patterns.
    safe_read: Vec<Regex>,
    /// Dangerous-operation patterns (matched anywhere in the command).
    dangerous: Vec<Regex>,
    /// Read-only command names for chain analysis, pre-split into words.
    chain_read_only: Vec<Vec<String>>,
    /// Finds `/home/...` path spans for the project-home guard.
    home_spans: Regex,
    /// Expanded project home; the only directory under /home a command
    /// may reference.
    project_home: String,
    /// Wall-clock ceiling for an approved command.
    timeout: Duration,
}

/// A policy table entry failed to compile. Fatal at startup.
#[derive(Debug)]
pub struct PolicyError {
    pub table: &'static str,
    pub pattern: String,
    pub source: regex::Error,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid pattern {:?} in [{}] policy table: {}",
            self.pattern, self.table, self.source
        )
    }
}

impl std::error::Error for PolicyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

fn compile_table(table: &'static str, patterns: &[String]) -> Result<Vec<Regex>, PolicyError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| PolicyError {
                table,
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

impl Policy {
    /// Compile the policy tables from configuration.
    pub fn from_config(config: &Config) -> Result<Self, PolicyError> {
        let safe_read = compile_table("safe_read", &config.safe_read.patterns)?;
        let dangerous = compile_table("dangerous", &config.dangerous.patterns)?;

        let chain_read_only = config
            .chain
            .read_only
            .iter()
            .map(|entry| entry.split_whitespace().map(str::to_string).collect())
            .collect();

        // Pattern is a fixed part of the home guard, not user-supplied.
        let home_spans =
            Regex::new(r"/home(/[A-Za-z0-9_.@\-]+)*").expect("home span pattern must compile");

        let project_home = shellexpand::tilde(&config.settings.project_home).into_owned();

        Ok(Self {
            allow_prefixes: config.allowlist.prefixes.clone(),
            safe_read,
            dangerous,
            chain_read_only,
            home_spans,
            project_home,
            timeout: Duration::from_secs(config.settings.timeout_secs),
        })
    }

    /// The configured execution timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
