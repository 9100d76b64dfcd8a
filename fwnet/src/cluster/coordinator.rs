use crate::cluster::helpers::RelayContext;
use crate::config::FwConfig;
use crate::error::{FwError, Result};
use crate::matrix::{Matrix, RowBlock, block_rows};
use crate::protocol::FwMessage;
use crate::transport::Channel;
use crate::types::{Rank, Row};
use std::time::Instant;
use tokio::sync::watch;

/// Drives a distributed Floyd-Warshall run over one channel per worker.
///
/// The coordinator partitions the matrix, hands every worker its block,
/// relays each iteration's pivot row from its owner to every other worker,
/// and finally gathers the relaxed blocks. It never touches cell values.
///
/// Channel `i` is worker `i`'s channel; worker `i` owns rows
/// `[i * c, (i + 1) * c)` where `c = n / workers`.
pub struct Coordinator<C: Channel> {
    channels: Vec<C>,
    ctx: RelayContext,
    barrier: PivotBarrier,
}

impl<C: Channel> Coordinator<C> {
    pub fn new(channels: Vec<C>, config: &FwConfig) -> Self {
        Self {
            channels,
            ctx: RelayContext::new(config.channel_timeout),
            barrier: PivotBarrier::default(),
        }
    }

    /// Abort the run when `abort` flips to `true`.
    ///
    /// Every pending channel operation then fails with [`FwError::Aborted`]
    /// and no matrix is produced.
    pub fn with_abort(mut self, abort: watch::Receiver<bool>) -> Self {
        self.ctx = self.ctx.with_abort(abort);
        self
    }

    pub fn workers(&self) -> usize {
        self.channels.len()
    }

    /// Run the whole protocol and return the shortest-path matrix.
    ///
    /// The matrix is partitioned before any message is sent, so a worker
    /// count that does not divide `n` fails without contacting anyone.
    pub async fn run(&mut self, matrix: Matrix) -> Result<Matrix> {
        let n = matrix.size();
        let workers = self.workers();
        let blocks = matrix.partition(workers)?;
        tracing::info!(n, workers, "coordinator: starting run");

        self.distribute(blocks).await?;

        let started = Instant::now();
        self.run_iterations(n).await?;
        tracing::info!(
            n,
            workers,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "coordinator: all pivots relayed"
        );

        self.gather(n).await
    }

    /// Send each worker its partition id and its block, in index order.
    pub async fn distribute(&mut self, blocks: Vec<RowBlock>) -> Result<()> {
        if blocks.len() != self.channels.len() {
            return Err(FwError::IndivisibleDimension {
                dimension: blocks.iter().map(RowBlock::len).sum(),
                workers: self.channels.len(),
            });
        }
        for (rank, (channel, block)) in self.channels.iter().zip(blocks).enumerate() {
            let rank = rank as Rank;
            tracing::debug!(rank, first_row = block.first_row, rows = block.len(), "distribute");
            self.ctx
                .send(channel, rank, FwMessage::Partition { id: rank }, "distribute")
                .await?;
            self.ctx
                .send(channel, rank, FwMessage::block(block), "distribute")
                .await?;
        }
        self.barrier = PivotBarrier::default();
        Ok(())
    }

    /// Relay pivot rows `0..n` in strictly increasing order.
    pub async fn run_iterations(&mut self, n: usize) -> Result<()> {
        let c = block_rows(n, self.workers())?;
        for k in 0..n {
            self.relay_pivot(k, c).await?;
        }
        Ok(())
    }

    /// One barrier step: receive pivot `k` from its owner, then send a copy
    /// to every other worker in ascending index order.
    ///
    /// Returns only once every peer has accepted the row, so the receive for
    /// `k + 1` cannot start before the fan-out for `k` is complete.
    async fn relay_pivot(&mut self, k: usize, c: usize) -> Result<()> {
        self.barrier.open(k)?;

        let owner = k / c;
        let owner_rank = owner as Rank;
        let row: Row = self
            .ctx
            .recv(&self.channels[owner], owner_rank, "pivot relay")
            .await?
            .into_pivot(k)?;

        for (peer, channel) in self.channels.iter().enumerate() {
            if peer == owner {
                continue;
            }
            self.ctx
                .send(channel, peer as Rank, FwMessage::pivot(k, row.clone()), "pivot relay")
                .await?;
        }

        tracing::debug!(iteration = k, owner, "pivot relayed");
        self.barrier.close(k);
        Ok(())
    }

    /// Collect every worker's final block and reassemble the matrix.
    pub async fn gather(&mut self, n: usize) -> Result<Matrix> {
        let c = block_rows(n, self.workers())?;
        let mut blocks = Vec::with_capacity(self.channels.len());
        for (rank, channel) in self.channels.iter().enumerate() {
            let rank = rank as Rank;
            let block = self.ctx.recv(channel, rank, "gather").await?.into_block()?;
            let expected_first = rank as usize * c;
            if block.len() != c {
                return Err(FwError::BlockSizeMismatch {
                    rank,
                    expected: c,
                    actual: block.len(),
                });
            }
            if block.first_row != expected_first {
                return Err(FwError::BlockOffsetMismatch {
                    rank,
                    expected: expected_first,
                    actual: block.first_row,
                });
            }
            if let Some(bad) = block.rows.iter().find(|r| r.len() != n) {
                return Err(FwError::RowLengthMismatch {
                    expected: n,
                    actual: bad.len(),
                });
            }
            blocks.push(block);
        }
        Matrix::assemble(blocks)
    }
}

/// Iteration counter enforcing that pivot `k + 1` is only opened after
/// pivot `k` has been fanned out to every worker.
#[derive(Debug, Default)]
struct PivotBarrier {
    next: usize,
    open: Option<usize>,
}

impl PivotBarrier {
    fn open(&mut self, k: usize) -> Result<()> {
        if let Some(open) = self.open {
            return Err(FwError::PivotOutOfOrder {
                expected: open,
                actual: k,
            });
        }
        if k != self.next {
            return Err(FwError::PivotOutOfOrder {
                expected: self.next,
                actual: k,
            });
        }
        self.open = Some(k);
        Ok(())
    }

    fn close(&mut self, k: usize) {
        debug_assert_eq!(self.open, Some(k));
        self.open = None;
        self.next = k + 1;
    }
}
