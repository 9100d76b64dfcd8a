use fwnet::{FwConfig, Matrix, Weight};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Short timeouts so a hung run fails the test instead of stalling it.
pub fn fast_config() -> FwConfig {
    FwConfig::default()
        .with_channel_timeout(Duration::from_secs(5))
        .with_formation_timeout(Duration::from_secs(5))
}

pub fn matrix(text: &str) -> Matrix {
    Matrix::parse(text).unwrap()
}

/// Random directed graph with zero diagonal. Roughly `density` of the
/// off-diagonal cells carry an edge with weight in `1..=100`.
pub fn random_graph(n: usize, density: f64, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        Weight::Finite(0)
                    } else if rng.random_bool(density) {
                        Weight::Finite(rng.random_range(1..=100))
                    } else {
                        Weight::Unreachable
                    }
                })
                .collect()
        })
        .collect();
    Matrix::from_rows(rows).unwrap()
}

/// Shortest paths by repeated edge relaxation, independent of the
/// Floyd-Warshall loop order.
pub fn relax_until_stable(graph: &Matrix) -> Matrix {
    let n = graph.size();
    let mut dist: Vec<Vec<Weight>> = graph.rows().to_vec();
    loop {
        let mut changed = false;
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let candidate = match (dist[i][k], graph.get(k, j)) {
                        (Weight::Finite(a), Weight::Finite(b)) => Weight::Finite(a + b),
                        _ => Weight::Unreachable,
                    };
                    let better = match (candidate, dist[i][j]) {
                        (Weight::Finite(c), Weight::Finite(d)) => c < d,
                        (Weight::Finite(_), Weight::Unreachable) => true,
                        _ => false,
                    };
                    if better {
                        dist[i][j] = candidate;
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            return Matrix::from_rows(dist).unwrap();
        }
    }
}

/// Worker counts that evenly split `n`.
pub fn divisors(n: usize) -> Vec<usize> {
    (1..=n).filter(|p| n % p == 0).collect()
}
