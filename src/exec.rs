//! Timeout-bounded shell execution of approved commands.
//!
//! The executor enforces nothing except the wall-clock ceiling; every
//! safety property was already settled by the time an [`AllowedCommand`]
//! exists. Stdout and stderr are drained on dedicated threads so a chatty
//! subprocess cannot deadlock against a full pipe buffer while the calling
//! thread polls for exit.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::gate::AllowedCommand;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured output of a subprocess that ran to completion.
#[derive(Debug, Serialize)]
pub struct ExecutionResult {
    pub command: String,
    pub output: String,
    pub error_output: String,
    pub success: bool,
    pub return_code: i32,
}

/// What happened when an approved command was run.
#[derive(Debug)]
pub enum ExecOutcome {
    Completed(ExecutionResult),
    /// The deadline passed; the subprocess was killed.
    TimedOut { limit: Duration },
    /// The subprocess could not be spawned or waited on.
    Failed { message: String },
}

/// Runs approved commands under `sh -c` with a hard wall-clock ceiling.
pub struct Executor {
    timeout: Duration,
}

impl Executor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run an approved command in the current working directory.
    ///
    /// Blocks the calling thread for at most the configured timeout plus
    /// one poll interval. All failure modes come back as [`ExecOutcome`]
    /// variants; this function does not return `Err` or panic.
    pub fn run(&self, command: &AllowedCommand) -> ExecOutcome {
        let mut child = match Command::new("sh")
            .arg("-c")
            .arg(command.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return ExecOutcome::Failed {
                    message: format!("spawn failed: {e}"),
                };
            }
        };

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let output = stdout.join().unwrap_or_default();
                    let error_output = stderr.join().unwrap_or_default();
                    return ExecOutcome::Completed(ExecutionResult {
                        command: command.as_str().to_string(),
                        output,
                        error_output,
                        success: status.success(),
                        return_code: status.code().unwrap_or(-1),
                    });
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        // The readers stay detached: a grandchild of the
                        // shell may hold the pipe open past the kill, and
                        // no output is reported for a timed-out command.
                        drop(stdout);
                        drop(stderr);
                        return ExecOutcome::TimedOut { limit: self.timeout };
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    drop(stdout);
                    drop(stderr);
                    return ExecOutcome::Failed {
                        message: format!("wait failed: {e}"),
                    };
                }
            }
        }
    }
}

/// Drain a pipe to a lossily-decoded string on its own thread.
fn drain<R: Read + Send + 'static>(stream: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}
