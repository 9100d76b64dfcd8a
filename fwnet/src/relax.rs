//! Min-plus relaxation shared by the worker sweep and the sequential baseline.

use crate::types::{Row, Weight};

/// `min(a, b + c)` where `Unreachable` is +infinity.
///
/// Two unreachable values are never summed: if either `b` or `c` is
/// unreachable the path through the pivot does not exist and `a` is kept.
/// The sum saturates at `u64::MAX`, so cells built outside the parser
/// (above `MAX_EDGE_WEIGHT`) can never wrap into a shorter path.
#[inline]
pub fn min_weight(a: Weight, b: Weight, c: Weight) -> Weight {
    match (a, b, c) {
        (Weight::Finite(direct), Weight::Finite(head), Weight::Finite(tail)) => {
            Weight::Finite(direct.min(head.saturating_add(tail)))
        }
        (Weight::Finite(_), _, _) => a,
        (Weight::Unreachable, Weight::Finite(head), Weight::Finite(tail)) => {
            Weight::Finite(head.saturating_add(tail))
        }
        (Weight::Unreachable, _, _) => Weight::Unreachable,
    }
}

/// Relax one row against pivot row `k`.
///
/// `row[k]` is read once before the sweep; the sweep itself overwrites
/// column `k` along with every other column.
#[inline]
pub fn relax_row(row: &mut [Weight], k: usize, pivot: &[Weight]) {
    debug_assert_eq!(row.len(), pivot.len());
    let via_pivot = row[k];
    for (cell, &pivot_cell) in row.iter_mut().zip(pivot) {
        *cell = min_weight(*cell, via_pivot, pivot_cell);
    }
}

/// Relax every row of a block against pivot row `k`.
pub fn relax_rows(rows: &mut [Row], k: usize, pivot: &[Weight]) {
    for row in rows.iter_mut() {
        relax_row(row, k, pivot);
    }
}
