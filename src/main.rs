//! shellgate: command authorization and execution gate.
//!
//! Reads a JSON request from stdin, writes exactly one JSON record to
//! stdout. Diagnostics go to stderr so stdout stays machine-readable.
//!
//! Request:  `{"command": "<candidate shell command>"}`
//! Response: an executed, blocked, timed-out, or execution-failure record
//! (see the `record` module).
//!
//! Flags:
//!   --decide    evaluate only, never execute; prints the verdict record
//!   --verbose   debug logging on stderr

use std::io::Read;
use std::process::ExitCode;

use serde::Deserialize;

use shellgate::config::Config;
use shellgate::gate::Gate;
use shellgate::record::ToolRecord;
use shellgate::{Executor, Policy, Verdict};

#[derive(Deserialize)]
struct GateRequest {
    command: String,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let decide_only = args.iter().any(|a| a == "--decide");
    shellgate::logging::init(verbose);

    let config = Config::load();
    let policy = match Policy::from_config(&config) {
        Ok(policy) => policy,
        Err(e) => {
            // Configuration errors are fatal at startup, never per-command.
            eprintln!("shellgate: {e}");
            return ExitCode::FAILURE;
        }
    };
    let timeout = policy.timeout();
    let gate = Gate::new(policy);

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("shellgate: failed to read stdin: {e}");
        return ExitCode::FAILURE;
    }
    let request: GateRequest = match serde_json::from_str(&input) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("shellgate: invalid request: {e}");
            return ExitCode::FAILURE;
        }
    };

    let record = if decide_only {
        match gate.decide(&request.command) {
            Verdict::Allowed { command, .. } => {
                println!("{}", serde_json::json!({ "allowed": true, "command": command }));
                return ExitCode::SUCCESS;
            }
            Verdict::Blocked(block) => ToolRecord::blocked(block),
        }
    } else {
        gate.run(&Executor::new(timeout), &request.command)
    };

    match serde_json::to_string(&record) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("shellgate: failed to serialize record: {e}");
            ExitCode::FAILURE
        }
    }
}
