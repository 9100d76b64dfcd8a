mod bootstrap;
mod coordinator;
pub(crate) mod helpers;
mod seed;
mod worker;

pub use bootstrap::{run_local, run_local_with_abort, run_tcp_local};
pub use coordinator::Coordinator;
pub use seed::{SeedNode, join_seed};
pub use worker::{Worker, run_worker};
