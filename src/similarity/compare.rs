use std::cmp::Ordering;

use num::Float;

use crate::vectorizer::matrix::SparseRow;

/// Σ(a_i * b_i) over the shared columns of two rows
#[inline]
pub fn dot<N>(a: SparseRow<'_, N>, b: SparseRow<'_, N>) -> f64
where
    N: Float + Into<f64>,
{
    let mut a_it = a.iter();
    let mut b_it = b.iter();
    let mut a_next = a_it.next();
    let mut b_next = b_it.next();
    let mut dot = 0_f64;
    while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
        match ia.cmp(&ib) {
            Ordering::Equal => {
                dot += va * vb;
                a_next = a_it.next();
                b_next = b_it.next();
            }
            Ordering::Less => a_next = a_it.next(),
            Ordering::Greater => b_next = b_it.next(),
        }
    }
    dot
}

/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
///
/// 0 when either row has no weight.
pub fn cosine_similarity<N>(a: SparseRow<'_, N>, b: SparseRow<'_, N>) -> f64
where
    N: Float + Into<f64>,
{
    let (norm_a, norm_b) = (a.norm(), b.norm());
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::matrix::SparseMatrix;

    #[test]
    fn dot_merges_shared_columns() {
        let m = SparseMatrix::<f64>::from_rows(
            vec![vec![(0, 1.0), (2, 2.0), (5, 1.0)], vec![(1, 4.0), (2, 3.0), (5, 2.0)]],
            6,
        );
        assert_eq!(dot(m.row(0), m.row(1)), 8.0);
        assert_eq!(dot(m.row(1), m.row(0)), 8.0);
    }

    #[test]
    fn cosine_handles_zero_rows() {
        let m = SparseMatrix::<f32>::from_rows(vec![vec![(0, 3.0), (1, 4.0)], vec![], vec![(0, 6.0), (1, 8.0)]], 2);
        assert_eq!(cosine_similarity(m.row(0), m.row(1)), 0.0);
        assert!((cosine_similarity(m.row(0), m.row(2)) - 1.0).abs() < 1e-9);
    }
}
