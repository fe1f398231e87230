use std::io::Write;

use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use crate::gate::Verdict;

/// Initialize stderr logging. Stdout stays reserved for the output record.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// Append a verdict record to ~/.local/share/shellgate/decisions.log.
/// Best-effort: failures are silently ignored (the audit trail must never
/// block the gate).
pub fn log_verdict(command: &str, verdict: &Verdict) {
    let Some(home) = std::env::var_os("HOME") else {
        return;
    };
    let log_dir = std::path::Path::new(&home).join(".local/share/shellgate");
    let _ = std::fs::create_dir_all(&log_dir);

    let log_path = log_dir.join("decisions.log");
    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    else {
        return;
    };

    // Compact single-line reason for the log (replace newlines with "; ")
    let reason_oneline = verdict.reason().replace('\n', "; ");
    let cmd_truncated: String = command.chars().take(200).collect();
    let violation = verdict
        .violation()
        .map(|v| v.as_str())
        .unwrap_or("-");
    let ts = timestamp_now();

    let _ = writeln!(
        file,
        "{ts}\t{label}\t{violation}\t{cmd}\t{reason}",
        label = verdict.label(),
        cmd = cmd_truncated,
        reason = reason_oneline,
    );
}

/// Simple UTC timestamp without external deps.
fn timestamp_now() -> String {
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();
    let rem = secs % 86400;
    let h = rem / 3600;
    let m = (rem % 3600) / 60;
    let s = rem % 60;
    let (year, month, day) = epoch_days_to_date(secs / 86400);
    format!("{year:04}-{month:02}-{day:02}T{h:02}:{m:02}:{s:02}Z")
}

/// Convert days since Unix epoch to (year, month, day).
fn epoch_days_to_date(days: u64) -> (u64, u64, u64) {
    // Civil calendar from days algorithm (Howard Hinnant)
    let z = days + 719468;
    let era = z / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}
