//! Classifiers: pure predicates over a command string and the policy tables.

use super::Policy;

impl Policy {
    /// True iff the trimmed command starts with an allow-list entry,
    /// ending at a token boundary.
    ///
    /// Case-sensitive, no wildcards. The matched prefix must be the whole
    /// command or be followed by whitespace, so `git diff HEAD~1` matches
    /// the `git diff` entry but `git difftool ...` does not. A hit here is
    /// trusted unconditionally, so entries must stay specific (see the
    /// default table comments).
    pub fn is_whitelisted(&self, command: &str) -> bool {
        let cmd = command.trim();
        self.allow_prefixes.iter().any(|prefix| {
            cmd.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        })
    }

    /// True iff the trimmed command matches a safe-file-read pattern.
    pub fn is_safe_file_read(&self, command: &str) -> bool {
        let cmd = command.trim();
        self.safe_read.iter().any(|re| re.is_match(cmd))
    }

    /// Return the first dangerous pattern (or offending /home span) found
    /// anywhere in the command, or `None` if the command is clean.
    ///
    /// `/home` paths are vetted separately because the path exception
    /// cannot be expressed without lookaround: any span that is not the
    /// project home itself or a path below it is flagged.
    pub fn dangerous_match(&self, command: &str) -> Option<String> {
        for re in &self.dangerous {
            if re.is_match(command) {
                return Some(re.as_str().to_string());
            }
        }
        for span in self.home_spans.find_iter(command) {
            if !self.home_span_allowed(span.as_str()) {
                return Some(span.as_str().to_string());
            }
        }
        None
    }

    fn home_span_allowed(&self, span: &str) -> bool {
        if self.project_home.is_empty() {
            return false;
        }
        match span.strip_prefix(self.project_home.as_str()) {
            // Exactly the project home, or a path below it.
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// True iff the segment's leading tokens name a read-only command.
    ///
    /// Tokenized via shlex so quoted arguments do not confuse the prefix
    /// comparison; multi-word entries like `git log` must match the first
    /// tokens in order. Unparseable segments (unbalanced quotes) are not
    /// read-only.
    pub fn segment_is_read_only(&self, segment: &str) -> bool {
        let Some(tokens) = shlex::split(segment.trim()) else {
            return false;
        };
        if tokens.is_empty() {
            return false;
        }
        self.chain_read_only.iter().any(|entry| {
            tokens.len() >= entry.len() && entry.iter().zip(&tokens).all(|(e, t)| e == t)
        })
    }
}
