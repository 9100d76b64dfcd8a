use crate::error::{FwError, Result};
use crate::protocol::FwMessage;
use crate::transport::{Channel, TcpChannel};
use crate::types::PROTOCOL_VERSION;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Listening side of a networked run.
///
/// Workers connect, announce themselves with `Hello`, and are numbered in
/// the order they were accepted. The resulting channels feed a
/// [`Coordinator`](crate::cluster::Coordinator) directly.
pub struct SeedNode {
    listener: TcpListener,
    expected_workers: usize,
    formation_timeout: Duration,
}

impl SeedNode {
    /// Bind the seed to `addr` and wait for `expected_workers` workers.
    pub async fn bind(addr: SocketAddr, expected_workers: usize) -> Result<Self> {
        if expected_workers == 0 {
            return Err(FwError::NoWorkers);
        }
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| FwError::transport_with_source(format!("bind {addr}"), e))?;
        Ok(Self {
            listener,
            expected_workers,
            formation_timeout: Duration::from_secs(60),
        })
    }

    pub fn with_formation_timeout(mut self, timeout: Duration) -> Self {
        self.formation_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| FwError::transport_with_source("listener local_addr", e))
    }

    /// Accept workers until all expected ones have joined.
    ///
    /// Channel `i` of the result belongs to the `i`-th accepted worker. The
    /// whole formation, including each worker's `Hello`, shares one deadline.
    pub async fn form_cluster(&self) -> Result<Vec<TcpChannel>> {
        let deadline = tokio::time::Instant::now() + self.formation_timeout;
        let mut channels = Vec::with_capacity(self.expected_workers);

        while channels.len() < self.expected_workers {
            let joined = channels.len();
            let timed_out = || FwError::ClusterFormationTimeout {
                joined,
                expected: self.expected_workers,
            };

            let (stream, addr) = tokio::select! {
                res = self.listener.accept() => res
                    .map_err(|e| FwError::transport_with_source("accept worker", e))?,
                _ = tokio::time::sleep_until(deadline) => return Err(timed_out()),
            };

            let channel = TcpChannel::from_stream(stream)?;
            let hello = tokio::time::timeout_at(deadline, channel.recv())
                .await
                .map_err(|_| timed_out())??;
            let version = hello.into_hello()?;
            if version != PROTOCOL_VERSION {
                return Err(FwError::ProtocolMismatch {
                    local: PROTOCOL_VERSION,
                    remote: version,
                });
            }

            channels.push(channel);
            tracing::info!(
                rank = joined,
                %addr,
                "worker joined: {}/{}",
                joined + 1,
                self.expected_workers
            );
        }
        Ok(channels)
    }
}

/// Connect to a seed and announce this worker.
///
/// The returned channel is ready for [`run_worker`](crate::cluster::run_worker).
pub async fn join_seed(addr: SocketAddr) -> Result<TcpChannel> {
    let channel = TcpChannel::connect(addr).await?;
    channel
        .send(FwMessage::Hello {
            protocol_version: PROTOCOL_VERSION,
        })
        .await?;
    tracing::debug!(seed = %addr, "hello sent");
    Ok(channel)
}
