//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from decoding a binary warp file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A required marker token was not found often enough.
    #[error("marker {marker:?} found {found} time(s), expected at least {expected}")]
    MissingMarker {
        marker: &'static str,
        found: usize,
        expected: usize,
    },

    /// Fewer warp points than needed to extrapolate a tempo.
    #[error("found {found} warp point(s), at least 2 are required")]
    TooFewWarpPoints { found: usize },

    /// A fixed-width field would read past the end of the buffer.
    #[error("field of {width} byte(s) at offset {offset} exceeds buffer of {len} byte(s)")]
    OutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },
}

/// A time map violates one of its invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A coordinate is negative (or not a number).
    #[error("time map entry {index} has a negative coordinate")]
    NegativeCoordinate { index: usize },

    /// Entry `index + 1` decreases on at least one axis relative to entry `index`.
    #[error("time map is not monotonic between entries {index} and {}", index + 1)]
    NonMonotonic { index: usize },

    /// Fewer than two entries.
    #[error("time map has {len} entr(ies), at least 2 are required")]
    TooShort { len: usize },

    /// The last source frame does not match the length of the audio.
    #[error("time map ends at source frame {found}, audio has {expected} frames")]
    BoundaryMismatch { expected: i64, found: i64 },
}

/// Failures of the external stretch tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The executable could not be found.
    #[error("failed to execute {program:?}, please verify that rubberband-cli is installed")]
    NotFound { program: String },

    /// The process could not be started for another reason.
    #[error("failed to start {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("{program:?} exited with {}: {stderr}", status.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    Failed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    /// The output audio does not have the input's channel layout.
    #[error("tool produced {found} channel(s), expected {expected}")]
    ChannelMismatch { expected: u16, found: u16 },
}

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unrecognised warp file.
    #[error("warp file format error: {0}")]
    Format(#[from] FormatError),

    /// Time map invariant violated.
    #[error("invalid time map: {0}")]
    Validation(#[from] ValidationError),

    /// External tool missing or failing.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Input that would require dividing by zero or produce non-finite values.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A caller-supplied parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A time map text file could not be parsed.
    #[error("time map file line {line}: {reason}")]
    InvalidTimeMapFile { line: usize, reason: String },

    /// File system error on a known path.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// WAV encode/decode error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Broad classes of failure, each with a different remedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Fix the input data.
    BadInput,
    /// Install or configure the external tool.
    Environment,
    /// Inspect the external tool's output.
    ToolFailure,
    /// File system or codec trouble.
    Io,
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Format(_)
            | Error::Validation(_)
            | Error::DegenerateInput(_)
            | Error::InvalidParameter(_)
            | Error::InvalidTimeMapFile { .. } => ErrorCategory::BadInput,
            Error::Tool(ToolError::NotFound { .. }) | Error::Tool(ToolError::Spawn { .. }) => {
                ErrorCategory::Environment
            }
            Error::Tool(_) => ErrorCategory::ToolFailure,
            Error::Io { .. } | Error::Wav(_) => ErrorCategory::Io,
        }
    }
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
