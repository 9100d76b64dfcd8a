use crate::cluster::helpers::RelayContext;
use crate::config::FwConfig;
use crate::error::{FwError, Result};
use crate::matrix::RowBlock;
use crate::protocol::FwMessage;
use crate::relax::relax_rows;
use crate::transport::Channel;
use crate::types::{Rank, Row};
use std::ops::Range;

/// Rank reported in errors raised before a partition id has arrived.
const UNASSIGNED: Rank = Rank::MAX;

/// One row-block owner for the lifetime of a run.
pub struct Worker<C: Channel> {
    id: Rank,
    block: RowBlock,
    channel: C,
    ctx: RelayContext,
}

impl<C: Channel> Worker<C> {
    /// Wait for the coordinator's partition id and row block.
    ///
    /// The first receive waits up to `formation_timeout`, since the
    /// coordinator may still be admitting other workers.
    pub async fn join(channel: C, config: &FwConfig) -> Result<Self> {
        let ctx = RelayContext::new(config.channel_timeout);
        let id = ctx
            .recv_within(&channel, UNASSIGNED, "join", config.formation_timeout)
            .await?
            .into_partition()?;
        let block = ctx.recv(&channel, id, "join").await?.into_block()?;

        let c = block.len();
        let n = block.width();
        if c == 0 || n % c != 0 {
            return Err(FwError::BlockSizeMismatch {
                rank: id,
                expected: if c == 0 { 1 } else { c },
                actual: c,
            });
        }
        if block.first_row != id as usize * c {
            return Err(FwError::BlockOffsetMismatch {
                rank: id,
                expected: id as usize * c,
                actual: block.first_row,
            });
        }
        if let Some(bad) = block.rows.iter().find(|r| r.len() != n) {
            return Err(FwError::RowLengthMismatch {
                expected: n,
                actual: bad.len(),
            });
        }

        tracing::debug!(rank = id, rows = c, n, "worker: joined");
        Ok(Self {
            id,
            block,
            channel,
            ctx,
        })
    }

    pub fn id(&self) -> Rank {
        self.id
    }

    pub fn block(&self) -> &RowBlock {
        &self.block
    }

    /// Run all `n` iterations, then hand the relaxed block back.
    ///
    /// Returns the global rows this worker owned.
    pub async fn run(mut self) -> Result<Range<usize>> {
        let n = self.block.width();
        for k in 0..n {
            let pivot = self.pivot_for(k).await?;
            relax_rows(&mut self.block.rows, k, &pivot);
        }

        tracing::debug!(rank = self.id, "worker: sending final block");
        let owned = self.block.first_row..self.block.first_row + self.block.len();
        self.ctx
            .send(&self.channel, self.id, FwMessage::block(self.block), "gather")
            .await?;
        Ok(owned)
    }

    /// Contribute pivot `k` if this worker owns it, otherwise receive it.
    async fn pivot_for(&self, k: usize) -> Result<Row> {
        if let Some(row) = self.block.row(k) {
            let row = row.clone();
            self.ctx
                .send(&self.channel, self.id, FwMessage::pivot(k, row.clone()), "pivot contribute")
                .await?;
            return Ok(row);
        }

        let row = self
            .ctx
            .recv(&self.channel, self.id, "pivot receive")
            .await?
            .into_pivot(k)?;
        if row.len() != self.block.width() {
            return Err(FwError::RowLengthMismatch {
                expected: self.block.width(),
                actual: row.len(),
            });
        }
        Ok(row)
    }
}

/// Join the run on `channel` and execute it to completion.
pub async fn run_worker<C: Channel>(channel: C, config: &FwConfig) -> Result<Range<usize>> {
    Worker::join(channel, config).await?.run().await
}
