use fwnet::{Matrix, Weight, floyd_warshall, run_local};

use super::helpers::{divisors, fast_config, random_graph, relax_until_stable};

#[test]
fn test_sequential_agrees_with_edge_relaxation() {
    for seed in 0..8 {
        let graph = random_graph(9, 0.25, seed);
        assert_eq!(
            floyd_warshall(&graph),
            relax_until_stable(&graph),
            "seed {seed}"
        );
    }
}

#[tokio::test]
async fn test_distributed_agrees_with_sequential() {
    for (n, seed) in [(6, 1), (8, 2), (12, 3), (16, 4)] {
        let graph = random_graph(n, 0.3, seed);
        let expected = floyd_warshall(&graph);
        for p in divisors(n) {
            let got = run_local(graph.clone(), p, &fast_config()).await.unwrap();
            assert_eq!(got, expected, "n = {n}, workers = {p}, seed = {seed}");
        }
    }
}

#[tokio::test]
async fn test_sparse_and_dense_graphs() {
    for density in [0.0, 0.05, 1.0] {
        let graph = random_graph(10, density, 42);
        let expected = relax_until_stable(&graph);
        let got = run_local(graph, 5, &fast_config()).await.unwrap();
        assert_eq!(got, expected, "density {density}");
    }
}

#[tokio::test]
async fn test_deeper_channels_do_not_change_result() {
    let graph = random_graph(12, 0.2, 7);
    let mut config = fast_config();
    config.channel_capacity = 16;
    let got = run_local(graph.clone(), 4, &config).await.unwrap();
    assert_eq!(got, floyd_warshall(&graph));
}

#[tokio::test]
async fn test_huge_weights_from_rows_do_not_wrap() {
    // Chain 0 -> 1 -> 2 -> 3, each edge just over half of u64::MAX.
    let half = Weight::Finite(u64::MAX / 2 + 1);
    let rows = (0..4)
        .map(|i| {
            (0..4)
                .map(|j| match j {
                    _ if j == i => Weight::Finite(0),
                    _ if j == i + 1 => half,
                    _ => Weight::Unreachable,
                })
                .collect()
        })
        .collect();
    let graph = Matrix::from_rows(rows).unwrap();

    let got = run_local(graph.clone(), 2, &fast_config()).await.unwrap();
    assert_eq!(got, floyd_warshall(&graph));
    assert_eq!(got.get(0, 1), half);
    assert_eq!(got.get(0, 2), Weight::Finite(u64::MAX));
    assert_eq!(got.get(0, 3), Weight::Finite(u64::MAX));
    assert_eq!(got.get(3, 0), Weight::Unreachable);
}
