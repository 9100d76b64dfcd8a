pub mod cluster;
pub mod config;
pub mod error;
pub mod matrix;
pub mod protocol;
pub mod relax;
pub mod sequential;
pub mod transport;
pub mod types;

pub use cluster::{
    Coordinator, SeedNode, Worker, join_seed, run_local, run_local_with_abort, run_tcp_local,
    run_worker,
};
pub use config::{FwConfig, RunConfig};
pub use error::{FwError, Result};
pub use matrix::{Matrix, RowBlock};
pub use protocol::FwMessage;
pub use relax::min_weight;
pub use sequential::floyd_warshall;
pub use transport::{Channel, LocalChannel, TcpChannel, local_pair};
pub use types::{Rank, Weight};
