//! Output records returned to the tool-calling loop.
//!
//! One JSON object per candidate command, in one of four shapes:
//!
//! - executed: `{command, output, error_output, success, return_code}`
//! - blocked: `{error: "SECURITY_BLOCK", blocked: true, security_violation,
//!   command, reason, hint}`
//! - timed out: `{error: "Command timed out (60s limit)"}`
//! - spawn/wait failure: `{error: "Execution failed: <message>"}`
//!
//! Refusals and execution failures are both data, never errors raised at
//! the caller, so one bad tool call cannot crash the loop around it.

use serde::Serialize;

use crate::exec::{ExecOutcome, ExecutionResult};
use crate::gate::Block;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ToolRecord {
    Executed(ExecutionResult),
    Blocked {
        error: &'static str,
        blocked: bool,
        security_violation: &'static str,
        command: String,
        reason: String,
        hint: String,
    },
    Error {
        error: String,
    },
}

impl ToolRecord {
    pub fn blocked(block: Block) -> Self {
        ToolRecord::Blocked {
            error: "SECURITY_BLOCK",
            blocked: true,
            security_violation: block.violation.as_str(),
            command: block.command,
            reason: block.reason,
            hint: block.hint,
        }
    }

    pub fn from_outcome(outcome: ExecOutcome) -> Self {
        match outcome {
            ExecOutcome::Completed(result) => ToolRecord::Executed(result),
            ExecOutcome::TimedOut { limit } => ToolRecord::Error {
                error: format!("Command timed out ({}s limit)", limit.as_secs()),
            },
            ExecOutcome::Failed { message } => ToolRecord::Error {
                error: format!("Execution failed: {message}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Violation;
    use std::time::Duration;

    #[test]
    fn executed_record_shape() {
        let record = ToolRecord::Executed(ExecutionResult {
            command: "git status".into(),
            output: "clean\n".into(),
            error_output: String::new(),
            success: true,
            return_code: 0,
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["command"], "git status");
        assert_eq!(json["success"], true);
        assert_eq!(json["return_code"], 0);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn blocked_record_shape() {
        let record = ToolRecord::blocked(Block {
            command: "rm -rf /".into(),
            violation: Violation::DestructiveOperation,
            reason: "contains a destructive operation".into(),
            hint: "see the policy tables".into(),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["error"], "SECURITY_BLOCK");
        assert_eq!(json["blocked"], true);
        assert_eq!(json["security_violation"], "DESTRUCTIVE_OPERATION");
        assert_eq!(json["command"], "rm -rf /");
        assert!(json["reason"].is_string());
        assert!(json["hint"].is_string());
    }

    #[test]
    fn timeout_record_message() {
        let record = ToolRecord::from_outcome(ExecOutcome::TimedOut {
            limit: Duration::from_secs(60),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["error"], "Command timed out (60s limit)");
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[test]
    fn failure_record_message() {
        let record = ToolRecord::from_outcome(ExecOutcome::Failed {
            message: "spawn failed: no such file".into(),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["error"], "Execution failed: spawn failed: no such file");
    }
}
