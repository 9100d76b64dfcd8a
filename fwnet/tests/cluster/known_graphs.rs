use fwnet::{FwError, Matrix, Weight, run_local};

use super::helpers::{fast_config, matrix};

#[tokio::test]
async fn test_three_node_single_worker() {
    let input = matrix("0 3 -1\n-1 0 1\n2 -1 0");
    let got = run_local(input, 1, &fast_config()).await.unwrap();
    assert_eq!(got, matrix("0 3 4\n3 0 1\n2 5 0"));
    assert_eq!(got.to_text(), "0 3 4\n3 0 1\n2 5 0\n");
}

#[tokio::test]
async fn test_output_independent_of_worker_count() {
    let input = matrix(
        "0 5 -1 10\n\
         -1 0 3 -1\n\
         -1 -1 0 1\n\
         -1 -1 -1 0",
    );
    let mut texts = Vec::new();
    for p in [1, 2, 4] {
        let got = run_local(input.clone(), p, &fast_config()).await.unwrap();
        texts.push(got.to_text());
    }
    assert_eq!(texts[0], "0 5 8 9\n-1 0 3 4\n-1 -1 0 1\n-1 -1 -1 0\n");
    assert_eq!(texts[0], texts[1]);
    assert_eq!(texts[0], texts[2]);
}

#[tokio::test]
async fn test_isolated_node_stays_unreachable() {
    // Node 2 has no edges in or out.
    let input = matrix(
        "0 1 -1 -1\n\
         1 0 -1 4\n\
         -1 -1 0 -1\n\
         7 -1 -1 0",
    );
    let got = run_local(input, 2, &fast_config()).await.unwrap();
    for other in [0, 1, 3] {
        assert_eq!(got.get(2, other), Weight::Unreachable);
        assert_eq!(got.get(other, 2), Weight::Unreachable);
    }
    assert_eq!(got.get(2, 2), Weight::Finite(0));
    assert_eq!(got.get(3, 1), Weight::Finite(8));
}

#[tokio::test]
async fn test_second_pass_is_a_fixed_point() {
    let input = matrix("0 2 -1 -1\n-1 0 2 -1\n-1 -1 0 2\n2 -1 -1 0");
    let once = run_local(input, 2, &fast_config()).await.unwrap();
    let twice = run_local(once.clone(), 4, &fast_config()).await.unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.get(0, 3), Weight::Finite(6));
}

#[tokio::test]
async fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("graph.txt");
    let output_path = dir.path().join("paths.txt");
    std::fs::write(&input_path, "0 3 -1\n-1 0 1\n2 -1 0\n").unwrap();

    let input = Matrix::load(&input_path).unwrap();
    run_local(input, 3, &fast_config())
        .await
        .unwrap()
        .save(&output_path)
        .unwrap();

    let written = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(written, "0 3 4\n3 0 1\n2 5 0\n");
}

#[tokio::test]
async fn test_indivisible_dimension() {
    let err = run_local(matrix("0 1 1\n1 0 1\n1 1 0"), 2, &fast_config())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FwError::IndivisibleDimension {
            dimension: 3,
            workers: 2
        }
    ));
    assert!(err.is_configuration());
}

#[tokio::test]
async fn test_zero_workers() {
    let err = run_local(matrix("0"), 0, &fast_config())
        .await
        .unwrap_err();
    assert!(matches!(err, FwError::NoWorkers));
}
