//! Square distance matrices, their row-block partition, and the text format.
//!
//! The text format is whitespace-separated integers, one row per line, with
//! `-1` for "no edge". Blank lines are skipped.

use crate::error::{FwError, Result};
use crate::types::{MAX_DIMENSION, MAX_EDGE_WEIGHT, Row, Weight};
use std::fmt::Write as _;
use std::path::Path;

/// Square n×n matrix of weights, stored row-major as one `Row` per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Row>,
}

impl Matrix {
    /// Build a matrix, checking that it is square, non-empty, and within
    /// `MAX_DIMENSION`.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(FwError::EmptyMatrix);
        }
        if n >= MAX_DIMENSION {
            return Err(FwError::DimensionTooLarge {
                dimension: n,
                max: MAX_DIMENSION - 1,
            });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(FwError::NotSquare {
                row,
                expected: n,
                actual: r.len(),
            });
        }
        Ok(Self { rows })
    }

    /// Dimension `n`.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn get(&self, i: usize, j: usize) -> Weight {
        self.rows[i][j]
    }

    /// Split into `parts` contiguous blocks of `n / parts` rows, in index order.
    ///
    /// Fails before anything is sent when `parts` is zero or does not divide `n`.
    pub fn partition(self, parts: usize) -> Result<Vec<RowBlock>> {
        let n = self.size();
        let block_rows = block_rows(n, parts)?;
        let mut blocks = Vec::with_capacity(parts);
        let mut rows = self.rows.into_iter();
        for id in 0..parts {
            let chunk: Vec<Row> = rows.by_ref().take(block_rows).collect();
            blocks.push(RowBlock {
                first_row: id * block_rows,
                rows: chunk,
            });
        }
        Ok(blocks)
    }

    /// Concatenate blocks back into a matrix.
    ///
    /// Blocks may arrive in any order; they must tile `[0, n)` exactly.
    pub fn assemble(mut blocks: Vec<RowBlock>) -> Result<Self> {
        blocks.sort_by_key(|b| b.first_row);
        let mut rows = Vec::with_capacity(blocks.iter().map(|b| b.rows.len()).sum());
        for block in blocks {
            if block.first_row != rows.len() {
                return Err(FwError::BlockTiling {
                    first_row: block.first_row,
                    expected_row: rows.len(),
                });
            }
            rows.extend(block.rows);
        }
        Self::from_rows(rows)
    }

    /// Parse the text format.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|token| parse_weight(token, idx + 1))
                .collect::<Result<Row>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// Render the text format, `-1` for unreachable cells.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{cell}");
            }
            out.push('\n');
        }
        out
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(FwError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }
}

/// Rows per block for an `n`-row matrix split across `parts` workers.
pub fn block_rows(n: usize, parts: usize) -> Result<usize> {
    if parts == 0 {
        return Err(FwError::NoWorkers);
    }
    if n % parts != 0 {
        return Err(FwError::IndivisibleDimension {
            dimension: n,
            workers: parts,
        });
    }
    Ok(n / parts)
}

fn parse_weight(token: &str, line: usize) -> Result<Weight> {
    let value: i64 = token.parse().map_err(|e| FwError::Parse {
        line,
        reason: format!("invalid weight {token:?}: {e}"),
    })?;
    match value {
        -1 => Ok(Weight::Unreachable),
        v if v < 0 => Err(FwError::Parse {
            line,
            reason: format!("negative weight {v} (only -1 is allowed, meaning no edge)"),
        }),
        v if v as u64 > MAX_EDGE_WEIGHT => Err(FwError::Parse {
            line,
            reason: format!("weight {v} exceeds maximum {MAX_EDGE_WEIGHT}"),
        }),
        v => Ok(Weight::Finite(v as u64)),
    }
}

/// Contiguous rows `[first_row, first_row + rows.len())` owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBlock {
    pub first_row: usize,
    pub rows: Vec<Row>,
}

impl RowBlock {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row width, i.e. the matrix dimension `n`.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Whether global row `k` belongs to this block.
    pub fn owns(&self, k: usize) -> bool {
        k >= self.first_row && k < self.first_row + self.rows.len()
    }

    /// Local copy of global row `k`, if owned.
    pub fn row(&self, k: usize) -> Option<&Row> {
        if self.owns(k) {
            self.rows.get(k - self.first_row)
        } else {
            None
        }
    }
}
