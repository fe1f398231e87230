//! Chain and pipe detection.
//!
//! Splitting is deliberately textual: `|`, `&&` and `;` are treated as
//! separators wherever they appear, with no quote or subshell awareness.
//! A separator inside a quoted string therefore splits too, which can
//! only make the verdict stricter, never looser. Commands that need
//! quoted separators belong on the allow-list instead.

/// True iff the command contains a pipe or chain separator.
///
/// A single `&` (background execution) is not a chain; `||` counts
/// because each `|` does.
pub fn has_chain_tokens(command: &str) -> bool {
    command.contains('|') || command.contains(';') || command.contains("&&")
}

/// Split a compound command into its segments.
///
/// Segments are trimmed and empty ones dropped, so `a || b` yields
/// `["a", "b"]` and a trailing `;` yields no phantom segment.
pub fn split_segments(command: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let bytes = command.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'|' | b';' => {
                segments.push(&command[start..i]);
                i += 1;
                start = i;
            }
            b'&' if bytes.get(i + 1) == Some(&b'&') => {
                segments.push(&command[start..i]);
                i += 2;
                start = i;
            }
            _ => i += 1,
        }
    }
    segments.push(&command[start..]);
    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
