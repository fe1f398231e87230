/// Reason code carried by a blocked verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    DestructiveOperation,
    NotWhitelisted,
}

impl Violation {
    /// Machine-readable tag for the output record.
    pub fn as_str(self) -> &'static str {
        match self {
            Violation::DestructiveOperation => "DESTRUCTIVE_OPERATION",
            Violation::NotWhitelisted => "NOT_WHITELISTED",
        }
    }
}

/// A refusal: why the command was blocked and what to try instead.
#[derive(Debug, Clone)]
pub struct Block {
    pub command: String,
    pub violation: Violation,
    pub reason: String,
    pub hint: String,
}

/// Outcome of policy evaluation for one candidate command.
#[derive(Debug, Clone)]
pub enum Verdict {
    Allowed { command: String, reason: String },
    Blocked(Block),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed { .. })
    }

    pub fn command(&self) -> &str {
        match self {
            Verdict::Allowed { command, .. } => command,
            Verdict::Blocked(block) => &block.command,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Verdict::Allowed { reason, .. } => reason,
            Verdict::Blocked(block) => &block.reason,
        }
    }

    pub fn violation(&self) -> Option<Violation> {
        match self {
            Verdict::Allowed { .. } => None,
            Verdict::Blocked(block) => Some(block.violation),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Allowed { .. } => "ALLOW",
            Verdict::Blocked(..) => "BLOCK",
        }
    }

    /// Convert an allowed verdict into an execution token.
    ///
    /// This is the only constructor for [`AllowedCommand`], so a command
    /// can reach the executor only by first passing policy evaluation.
    pub fn into_allowed(self) -> Result<AllowedCommand, Block> {
        match self {
            Verdict::Allowed { command, .. } => Ok(AllowedCommand { command }),
            Verdict::Blocked(block) => Err(block),
        }
    }
}

/// Proof that a command passed policy evaluation.
///
/// The field is private and the type has no public constructor;
/// [`Executor::run`](crate::exec::Executor::run) accepts nothing else.
#[derive(Debug)]
pub struct AllowedCommand {
    command: String,
}

impl AllowedCommand {
    pub fn as_str(&self) -> &str {
        &self.command
    }
}
