use crate::types::Rank;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, FwError>;

#[derive(Debug, thiserror::Error)]
pub enum FwError {
    #[error("input file {path} does not exist")]
    InputNotFound { path: PathBuf },

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("matrix dimension {dimension} is not evenly divisible by {workers} workers")]
    IndivisibleDimension { dimension: usize, workers: usize },

    #[error("matrix is empty")]
    EmptyMatrix,

    #[error("matrix dimension {dimension} exceeds the supported maximum {max}")]
    DimensionTooLarge { dimension: usize, max: usize },

    #[error("matrix is not square: row {row} has {actual} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("protocol version mismatch: local={local}, remote={remote}")]
    ProtocolMismatch { local: u16, remote: u16 },

    #[error("message decode failed: {0}")]
    DecodeFailed(String),

    #[error("message encode failed: {0}")]
    EncodeFailed(String),

    #[error("expected {expected} message, got {actual}")]
    UnexpectedMessage {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("pivot row for iteration {actual} arrived while iteration {expected} was open")]
    PivotOutOfOrder { expected: usize, actual: usize },

    #[error("row has {actual} cells, expected {expected}")]
    RowLengthMismatch { expected: usize, actual: usize },

    #[error("block from worker {rank} has {actual} rows, expected {expected}")]
    BlockSizeMismatch {
        rank: Rank,
        expected: usize,
        actual: usize,
    },

    #[error("block from worker {rank} starts at row {actual}, expected row {expected}")]
    BlockOffsetMismatch {
        rank: Rank,
        expected: usize,
        actual: usize,
    },

    #[error("row block starting at {first_row} does not continue the matrix at row {expected_row}")]
    BlockTiling { first_row: usize, expected_row: usize },

    #[error("cluster formation timed out: {joined}/{expected} workers joined")]
    ClusterFormationTimeout { joined: usize, expected: usize },

    #[error("{operation} failed at worker {rank}: {reason}")]
    ChannelFailed {
        operation: &'static str,
        rank: Rank,
        reason: String,
    },

    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("run aborted")]
    Aborted,
}

impl FwError {
    /// Create a `Transport` error with just a message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a `Transport` error with a message and a source error.
    pub fn transport_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True for errors raised while validating input, before any worker
    /// has been contacted.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FwError::InputNotFound { .. }
                | FwError::NoWorkers
                | FwError::IndivisibleDimension { .. }
                | FwError::EmptyMatrix
                | FwError::DimensionTooLarge { .. }
                | FwError::NotSquare { .. }
                | FwError::Parse { .. }
        )
    }
}
