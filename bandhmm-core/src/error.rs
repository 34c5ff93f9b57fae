use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HmmError {
    #[error("truth length {truth_len} must exceed band size {band_size}")]
    TruthTooShort { truth_len: usize, band_size: usize },

    #[error(
        "truth length {truth_len} does not fit target length {target_len} at band size {band_size} (expected {expected})"
    )]
    LengthMismatch {
        truth_len: usize,
        target_len: usize,
        band_size: usize,
        expected: usize,
    },

    #[error("quality length {qualities} does not match target length {target_len}")]
    QualityLengthMismatch { qualities: usize, target_len: usize },

    #[error("gap schedule covers {positions} positions but truth has {truth_len}")]
    GapScheduleTooShort { positions: usize, truth_len: usize },

    #[error("invalid penalty parameters: {msg}")]
    InvalidPenalty { msg: String },

    #[error("no terminal score below the overflow sentinel")]
    ScoreOverflow,

    #[error("traceback left the label table at step {step}, lane {lane}")]
    TracebackOutOfRange { step: isize, lane: isize },
}

pub type HmmResult<T> = Result<T, HmmError>;
