use crate::error::{FwError, Result};
use crate::matrix::RowBlock;
use crate::types::{Rank, Row};

/// Messages exchanged between the coordinator and a worker.
///
/// Every worker channel carries, in order: `Partition`, `Block` (coordinator
/// to worker), then `n` pivot exchanges, then `Block` (worker to
/// coordinator). `Hello` only appears on TCP connections, before anything
/// else.
#[derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize, Debug, Clone, PartialEq)]
pub enum FwMessage {
    /// Initial handshake from a TCP worker to the seed.
    Hello { protocol_version: u16 },

    /// Partition id assigned to the receiving worker.
    Partition { id: Rank },

    /// Pivot row for one iteration.
    Pivot { iteration: u64, row: Row },

    /// A worker's row block: initial contents on the way out, relaxed
    /// contents on the way back.
    Block { first_row: u64, rows: Vec<Row> },
}

impl FwMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            FwMessage::Hello { .. } => "Hello",
            FwMessage::Partition { .. } => "Partition",
            FwMessage::Pivot { .. } => "Pivot",
            FwMessage::Block { .. } => "Block",
        }
    }

    pub fn pivot(iteration: usize, row: Row) -> Self {
        FwMessage::Pivot {
            iteration: iteration as u64,
            row,
        }
    }

    pub fn block(block: RowBlock) -> Self {
        FwMessage::Block {
            first_row: block.first_row as u64,
            rows: block.rows,
        }
    }

    pub fn into_hello(self) -> Result<u16> {
        match self {
            FwMessage::Hello { protocol_version } => Ok(protocol_version),
            other => Err(FwError::UnexpectedMessage {
                expected: "Hello",
                actual: other.kind(),
            }),
        }
    }

    pub fn into_partition(self) -> Result<Rank> {
        match self {
            FwMessage::Partition { id } => Ok(id),
            other => Err(FwError::UnexpectedMessage {
                expected: "Partition",
                actual: other.kind(),
            }),
        }
    }

    /// Unwrap a pivot row, checking it belongs to `expected_iteration`.
    pub fn into_pivot(self, expected_iteration: usize) -> Result<Row> {
        match self {
            FwMessage::Pivot { iteration, row } => {
                if iteration != expected_iteration as u64 {
                    return Err(FwError::PivotOutOfOrder {
                        expected: expected_iteration,
                        actual: iteration as usize,
                    });
                }
                Ok(row)
            }
            other => Err(FwError::UnexpectedMessage {
                expected: "Pivot",
                actual: other.kind(),
            }),
        }
    }

    pub fn into_block(self) -> Result<RowBlock> {
        match self {
            FwMessage::Block { first_row, rows } => Ok(RowBlock {
                first_row: first_row as usize,
                rows,
            }),
            other => Err(FwError::UnexpectedMessage {
                expected: "Block",
                actual: other.kind(),
            }),
        }
    }
}
