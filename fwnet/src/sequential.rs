use crate::matrix::Matrix;
use crate::relax::relax_rows;

/// Single-process Floyd-Warshall over the whole matrix.
///
/// Same recurrence and relaxation primitive as the distributed workers, so
/// the two agree cell for cell.
pub fn floyd_warshall(matrix: &Matrix) -> Matrix {
    let mut result = matrix.clone();
    let n = result.size();
    for k in 0..n {
        let pivot = result.rows()[k].clone();
        relax_rows(result.rows_mut(), k, &pivot);
    }
    result
}
