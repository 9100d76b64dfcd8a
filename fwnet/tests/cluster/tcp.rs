use fwnet::{
    Coordinator, FwError, SeedNode, floyd_warshall, join_seed, run_tcp_local, run_worker,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::watch;

use super::helpers::{fast_config, matrix, random_graph};

#[tokio::test]
async fn test_loopback_run_matches_sequential() {
    let graph = random_graph(8, 0.3, 11);
    let got = run_tcp_local(graph.clone(), 4, &fast_config())
        .await
        .unwrap();
    assert_eq!(got, floyd_warshall(&graph));
}

#[tokio::test]
async fn test_seed_and_workers_wired_by_hand() {
    let config = fast_config();
    let any: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let seed = SeedNode::bind(any, 3).await.unwrap();
    let addr = seed.local_addr().unwrap();

    let mut workers = Vec::new();
    for _ in 0..3 {
        let config = config.clone();
        workers.push(tokio::spawn(async move {
            let channel = join_seed(addr).await?;
            run_worker(channel, &config).await
        }));
    }

    let channels = seed.form_cluster().await.unwrap();
    let input = matrix("0 3 -1\n-1 0 1\n2 -1 0");
    let mut coordinator = Coordinator::new(channels, &config);
    let got = coordinator.run(input).await.unwrap();
    assert_eq!(got, matrix("0 3 4\n3 0 1\n2 5 0"));

    // Every worker reports the rows it owned.
    let mut owned = Vec::new();
    for w in workers {
        owned.push(w.await.unwrap().unwrap());
    }
    owned.sort_by_key(|r| r.start);
    assert_eq!(owned, vec![0..1, 1..2, 2..3]);
}

#[tokio::test]
async fn test_abort_stops_networked_coordinator() {
    let config = fast_config();
    let any: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let seed = SeedNode::bind(any, 1).await.unwrap();
    let addr = seed.local_addr().unwrap();

    // The worker joins but never takes part in the run.
    let idle = tokio::spawn(async move { join_seed(addr).await });
    let channels = seed.form_cluster().await.unwrap();
    let _idle = idle.await.unwrap().unwrap();

    let (abort_tx, abort_rx) = watch::channel(false);
    let mut coordinator = Coordinator::new(channels, &config).with_abort(abort_rx);
    let run = tokio::spawn(async move { coordinator.run(matrix("0 1\n1 0")).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    abort_tx.send(true).unwrap();

    assert!(matches!(run.await.unwrap(), Err(FwError::Aborted)));
}
