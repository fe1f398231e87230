//! shellgate: a command authorization and execution gate for LLM tool loops.
//!
//! A candidate shell command proposed by a model is evaluated against four
//! policy tables (allow-list prefixes, safe file read patterns, dangerous
//! operation patterns, read-only chain commands) and either executed under
//! a hard timeout or refused with a structured, machine-readable record.
//!
//! # Architecture
//!
//! - **[`config`]** — policy tables: embedded defaults + user overlay merge.
//! - **[`policy`]** — compiled, immutable [`Policy`] and the classifiers.
//! - **[`parse`]** — pipe/chain detection and naive segment splitting.
//! - **[`gate`]** — the decision engine and the [`AllowedCommand`] token.
//! - **[`exec`]** — timeout-bounded `sh -c` execution.
//! - **[`record`]** — the JSON record shapes returned to the caller.
//! - **[`logging`]** — stderr logging and the decision audit trail in
//!   `~/.local/share/shellgate/decisions.log`.
//!
//! The safety contract lives in the types: [`Executor::run`] takes an
//! [`AllowedCommand`], and the only way to obtain one is
//! [`Verdict::into_allowed`] on an allowed verdict.

/// Policy table types, loading, and overlay merge logic.
pub mod config;
/// Subprocess execution with a wall-clock ceiling.
pub mod exec;
/// Decision engine and verdict types.
pub mod gate;
/// Stderr logging and file-based decision logging.
pub mod logging;
/// Chain/pipe token detection and splitting.
pub mod parse;
/// Compiled policy tables and classifiers.
pub mod policy;
/// Output record shapes.
pub mod record;

pub use exec::{ExecOutcome, ExecutionResult, Executor};
pub use gate::{AllowedCommand, Gate, Verdict, Violation};
pub use policy::{Policy, PolicyError};
pub use record::ToolRecord;

/// Evaluate a command against the embedded default policy tables.
///
/// This is the main entry point for tests and simple usage. For CLI usage
/// with a user overlay, build the [`Gate`] from [`config::Config::load`].
pub fn decide(command: &str) -> Verdict {
    let policy = Policy::from_config(&config::Config::default_config())
        .expect("embedded default policy must compile");
    Gate::new(policy).decide(command)
}
