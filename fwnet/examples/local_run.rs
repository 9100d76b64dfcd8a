//! All-pairs shortest paths on a small ring, solved by four in-process
//! workers and checked against the single-threaded solver.
//!
//! ```bash
//! cargo run --example local_run
//! ```

use fwnet::{FwConfig, Matrix, floyd_warshall, run_local};

#[tokio::main]
async fn main() -> fwnet::Result<()> {
    // Directed ring 0 -> 1 -> ... -> 7 -> 0 with one shortcut 0 -> 4.
    let n = 8;
    let text: String = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| match (i, j) {
                    _ if i == j => "0".to_string(),
                    _ if j == (i + 1) % n => (i + 1).to_string(),
                    (0, 4) => "3".to_string(),
                    _ => "-1".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");
    let graph = Matrix::parse(&text)?;

    let distributed = run_local(graph.clone(), 4, &FwConfig::default()).await?;
    assert_eq!(distributed, floyd_warshall(&graph));

    print!("{}", distributed.to_text());
    Ok(())
}
