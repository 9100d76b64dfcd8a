use clap::{Args, Parser, Subcommand};
use fwnet::{
    Coordinator, FwConfig, FwError, Matrix, RunConfig, SeedNode, floyd_warshall, join_seed,
    run_local_with_abort, run_worker,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::info;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,

    /// Per send/recv timeout in seconds (overrides FWNET_CHANNEL_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Args)]
struct JobArgs {
    /// Adjacency matrix: one row per line, `-1` for no edge
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the shortest-path matrix
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve with in-process workers
    Run {
        #[command(flatten)]
        job: JobArgs,

        /// Number of workers; must divide the matrix dimension
        #[arg(short, long, default_value_t = 1)]
        workers: usize,
    },
    /// Solve with worker processes that connect over TCP
    Coordinator {
        #[command(flatten)]
        job: JobArgs,

        #[arg(short, long)]
        workers: usize,

        /// Address to accept workers on
        #[arg(short, long, default_value = "127.0.0.1:7700")]
        listen: SocketAddr,
    },
    /// Join a coordinator and own one row block
    Worker {
        #[arg(short, long)]
        connect: SocketAddr,
    },
    /// Solve on a single thread
    Sequential {
        #[command(flatten)]
        job: JobArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let mut config = FwConfig::from_env();
    if let Some(secs) = cli.timeout_secs {
        config = config.with_channel_timeout(Duration::from_secs(secs));
    }

    match cli.command {
        Commands::Run { job, workers } => {
            let (input, run) = load(job, workers)?;
            let started = Instant::now();

            let result =
                run_local_with_abort(input, run.workers, &config, abort_on_ctrl_c()).await?;
            finish(&result, &run.output, started)?;
        }
        Commands::Coordinator {
            job,
            workers,
            listen,
        } => {
            let (input, run) = load(job, workers)?;
            // Partition before admitting anyone.
            fwnet::matrix::block_rows(input.size(), workers)?;

            let seed = SeedNode::bind(listen, workers)
                .await?
                .with_formation_timeout(config.formation_timeout);
            info!(addr = %seed.local_addr()?, workers, "waiting for workers");
            let mut abort = abort_on_ctrl_c();
            let channels = tokio::select! {
                res = seed.form_cluster() => res?,
                Ok(_) = abort.wait_for(|aborted| *aborted) => return Err(FwError::Aborted.into()),
            };

            let started = Instant::now();
            let result = Coordinator::new(channels, &config)
                .with_abort(abort)
                .run(input)
                .await?;
            finish(&result, &run.output, started)?;
        }
        Commands::Worker { connect } => {
            let channel = join_seed(connect).await?;
            let owned = run_worker(channel, &config).await?;
            info!(first_row = owned.start, rows = owned.len(), "worker finished");
        }
        Commands::Sequential { job } => {
            let (input, run) = load(job, 1)?;
            let started = Instant::now();
            let result = floyd_warshall(&input);
            finish(&result, &run.output, started)?;
        }
    }

    Ok(())
}

/// Flips to `true` on the first Ctrl-C.
fn abort_on_ctrl_c() -> watch::Receiver<bool> {
    let (abort_tx, abort_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, aborting run");
            let _ = abort_tx.send(true);
        }
    });
    abort_rx
}

fn load(job: JobArgs, workers: usize) -> fwnet::Result<(Matrix, RunConfig)> {
    let run = RunConfig {
        input: job.input,
        output: job.output,
        workers,
    };
    run.validate()?;
    let matrix = Matrix::load(&run.input)?;
    info!(n = matrix.size(), workers, input = %run.input.display(), "matrix loaded");
    Ok((matrix, run))
}

fn finish(result: &Matrix, output: &std::path::Path, started: Instant) -> fwnet::Result<()> {
    result.save(output)?;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        output = %output.display(),
        "done"
    );
    Ok(())
}
