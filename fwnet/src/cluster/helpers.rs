use crate::error::{FwError, Result};
use crate::protocol::FwMessage;
use crate::transport::Channel;
use crate::types::Rank;
use std::time::Duration;
use tokio::sync::watch;

/// Timeout and abort signal applied to every channel operation of a run.
#[derive(Debug, Clone)]
pub(crate) struct RelayContext {
    pub timeout: Duration,
    pub abort: Option<watch::Receiver<bool>>,
}

impl RelayContext {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            abort: None,
        }
    }

    pub fn with_abort(mut self, abort: watch::Receiver<bool>) -> Self {
        self.abort = Some(abort);
        self
    }

    /// Send to worker `rank`, wrapping failures as `ChannelFailed`.
    pub async fn send(
        &self,
        channel: &dyn Channel,
        rank: Rank,
        msg: FwMessage,
        operation: &'static str,
    ) -> Result<()> {
        self.guard(rank, operation, self.timeout, channel.send(msg))
            .await
    }

    /// Receive from worker `rank`, wrapping failures as `ChannelFailed`.
    pub async fn recv(
        &self,
        channel: &dyn Channel,
        rank: Rank,
        operation: &'static str,
    ) -> Result<FwMessage> {
        self.recv_within(channel, rank, operation, self.timeout)
            .await
    }

    pub async fn recv_within(
        &self,
        channel: &dyn Channel,
        rank: Rank,
        operation: &'static str,
        timeout: Duration,
    ) -> Result<FwMessage> {
        self.guard(rank, operation, timeout, channel.recv()).await
    }

    async fn guard<T>(
        &self,
        rank: Rank,
        operation: &'static str,
        timeout: Duration,
        op: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::select! {
            biased;
            _ = wait_for_abort(self.abort.clone()) => Err(FwError::Aborted),
            res = tokio::time::timeout(timeout, op) => match res {
                Ok(Ok(v)) => Ok(v),
                Ok(Err(e)) => Err(FwError::ChannelFailed {
                    operation,
                    rank,
                    reason: e.to_string(),
                }),
                Err(_) => Err(FwError::ChannelFailed {
                    operation,
                    rank,
                    reason: format!("timed out after {}ms", timeout.as_millis()),
                }),
            },
        }
    }
}

/// Resolves once the abort flag is set. Never resolves without a signal, or
/// after the signalling side is dropped without aborting.
async fn wait_for_abort(abort: Option<watch::Receiver<bool>>) {
    let Some(mut rx) = abort else {
        return std::future::pending().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}
