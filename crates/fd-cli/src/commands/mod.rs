pub mod play;
pub mod verify;

use std::fmt;

use fd_round::RoundError;

/// Why a command failed. Decides the exit status.
#[derive(Debug)]
pub enum Failure {
    /// The invocation was wrong; usage help follows the message.
    Usage(String),
    /// A commitment or transcript did not check out.
    Violation(String),
    /// Anything else.
    Other(String),
}

impl Failure {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Violation(_) => 3,
            Self::Other(_) => 1,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage(msg) | Self::Other(msg) => f.write_str(msg),
            Self::Violation(msg) => write!(f, "fairness check failed: {msg}"),
        }
    }
}

impl From<RoundError> for Failure {
    fn from(e: RoundError) -> Self {
        if e.is_violation() {
            Self::Violation(e.to_string())
        } else {
            Self::Other(e.to_string())
        }
    }
}
