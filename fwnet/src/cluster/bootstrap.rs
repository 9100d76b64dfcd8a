use crate::cluster::coordinator::Coordinator;
use crate::cluster::seed::{SeedNode, join_seed};
use crate::cluster::worker::run_worker;
use crate::config::FwConfig;
use crate::error::{FwError, Result};
use crate::matrix::{Matrix, block_rows};
use crate::transport::{LocalChannel, local_pair};
use std::net::SocketAddr;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Solve `matrix` with `workers` in-process workers, each on its own tokio task.
///
/// Channels are bounded with `config.channel_capacity` slots.
pub async fn run_local(matrix: Matrix, workers: usize, config: &FwConfig) -> Result<Matrix> {
    run_local_inner(matrix, workers, config, None).await
}

/// Like [`run_local`], but the run is abandoned as soon as `abort` is set.
pub async fn run_local_with_abort(
    matrix: Matrix,
    workers: usize,
    config: &FwConfig,
    abort: watch::Receiver<bool>,
) -> Result<Matrix> {
    run_local_inner(matrix, workers, config, Some(abort)).await
}

async fn run_local_inner(
    matrix: Matrix,
    workers: usize,
    config: &FwConfig,
    abort: Option<watch::Receiver<bool>>,
) -> Result<Matrix> {
    // Reject bad partitions before any task exists.
    block_rows(matrix.size(), workers)?;

    let mut coordinator_ends: Vec<LocalChannel> = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let (coord_end, worker_end) = local_pair(config.channel_capacity);
        coordinator_ends.push(coord_end);
        let worker_config = config.clone();
        handles.push(tokio::spawn(async move {
            run_worker(worker_end, &worker_config).await.map(drop)
        }));
    }

    let mut coordinator = Coordinator::new(coordinator_ends, config);
    if let Some(abort) = abort {
        coordinator = coordinator.with_abort(abort);
    }
    finish(coordinator.run(matrix).await, handles).await
}

/// Solve `matrix` over loopback TCP: a seed on an ephemeral port plus
/// `workers` tasks that dial it.
pub async fn run_tcp_local(matrix: Matrix, workers: usize, config: &FwConfig) -> Result<Matrix> {
    block_rows(matrix.size(), workers)?;

    let any: SocketAddr = "127.0.0.1:0".parse().expect("hardcoded socket addr");
    let seed = SeedNode::bind(any, workers)
        .await?
        .with_formation_timeout(config.formation_timeout);
    let seed_addr = seed.local_addr()?;

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers {
        let worker_config = config.clone();
        handles.push(tokio::spawn(async move {
            let channel = join_seed(seed_addr).await?;
            run_worker(channel, &worker_config).await.map(drop)
        }));
    }

    let channels = match seed.form_cluster().await {
        Ok(channels) => channels,
        Err(e) => return finish(Err(e), handles).await,
    };
    let mut coordinator = Coordinator::new(channels, config);
    finish(coordinator.run(matrix).await, handles).await
}

/// Reconcile the coordinator's outcome with its worker tasks.
///
/// On failure the workers are cancelled and the coordinator's error wins.
/// On success every worker must also have finished cleanly.
async fn finish(outcome: Result<Matrix>, handles: Vec<JoinHandle<Result<()>>>) -> Result<Matrix> {
    let matrix = match outcome {
        Ok(matrix) => matrix,
        Err(e) => {
            tracing::error!(error = %e, "run failed, cancelling workers");
            for h in &handles {
                h.abort();
            }
            return Err(e);
        }
    };
    for (rank, h) in handles.into_iter().enumerate() {
        h.await.map_err(|e| {
            FwError::transport_with_source(format!("worker {rank} task panicked"), e)
        })??;
    }
    Ok(matrix)
}
