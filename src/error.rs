use thiserror::Error;

/// Errors surfaced by the fallible edges of the crate (config, replay, I/O).
/// The controller itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transcript error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("games per coin must be at least 1")]
    NoRounds,

    #[error("measuring cap must be at least 1 tick")]
    NoMeasuringCap,

    #[error("delay range {min}..{max} is empty")]
    EmptyDelayRange { min: u32, max: u32 },

    #[error("tick period must be at least 1 ms")]
    ZeroTickPeriod,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: expected display {expected:?}, got {actual:?}")]
    DisplayMismatch {
        line: usize,
        expected: String,
        actual: String,
    },

    #[error("line {line}: expected state {expected}, got {actual}")]
    StateMismatch {
        line: usize,
        expected: String,
        actual: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
