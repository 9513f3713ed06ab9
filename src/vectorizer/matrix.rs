use std::ops::Range;

use num::Float;
use serde::{Deserialize, Serialize};

/// Document-term matrix in compressed sparse row form.
///
/// Row `i` is the weight vector of document `i`. Column indices inside a row
/// are strictly ascending and only non-zero weights are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseMatrix<N = f32> {
    n_cols: usize,
    /// row `i` occupies `indptr[i]..indptr[i + 1]`
    indptr: Vec<usize>,
    indices: Vec<u32>,
    values: Vec<N>,
}

/// Borrowed view of one matrix row
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a, N> {
    pub indices: &'a [u32],
    pub values: &'a [N],
}

impl<'a, N> SparseRow<'a, N>
where
    N: Float + Into<f64>,
{
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// (column, weight) pairs in ascending column order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + 'a {
        let (indices, values) = (self.indices, self.values);
        indices
            .iter()
            .zip(values.iter())
            .map(|(&col, &val)| (col as usize, val.into()))
    }

    pub fn norm(&self) -> f64 {
        self.values
            .iter()
            .map(|&v| {
                let v: f64 = v.into();
                v * v
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl<N> SparseMatrix<N>
where
    N: Float + Into<f64>,
{
    /// Build from per-row (column, weight) lists sorted by column.
    /// Zero weights are dropped.
    pub fn from_rows(rows: Vec<Vec<(u32, N)>>, n_cols: usize) -> Self {
        let nnz = rows.iter().map(|r| r.len()).sum();
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        indptr.push(0);
        for row in rows {
            debug_assert!(row.windows(2).all(|w| w[0].0 < w[1].0), "row columns must ascend");
            for (col, val) in row {
                debug_assert!((col as usize) < n_cols, "column {col} out of range");
                if val != N::zero() {
                    indices.push(col);
                    values.push(val);
                }
            }
            indptr.push(indices.len());
        }
        Self { n_cols, indptr, indices, values }
    }

    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn row(&self, i: usize) -> SparseRow<'_, N> {
        debug_assert!(i < self.n_rows(), "row {i} out of range");
        let range: Range<usize> = self.indptr[i]..self.indptr[i + 1];
        SparseRow {
            indices: &self.indices[range.clone()],
            values: &self.values[range],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = SparseRow<'_, N>> {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    /// Column-major copy: for every column the rows holding a non-zero weight, ascending.
    pub fn column_index(&self) -> ColumnIndex {
        let mut counts = vec![0usize; self.n_cols + 1];
        for &col in &self.indices {
            counts[col as usize + 1] += 1;
        }
        for c in 0..self.n_cols {
            counts[c + 1] += counts[c];
        }
        let colptr = counts.clone();
        let mut next = counts;
        let mut rows = vec![0u32; self.nnz()];
        let mut weights = vec![0f64; self.nnz()];
        // rows are visited in ascending order, so each column's postings come out sorted
        for i in 0..self.n_rows() {
            for (col, val) in self.row(i).iter() {
                let pos = next[col];
                rows[pos] = i as u32;
                weights[pos] = val;
                next[col] += 1;
            }
        }
        ColumnIndex { colptr, rows, weights }
    }
}

impl<N> Default for SparseMatrix<N> {
    fn default() -> Self {
        Self {
            n_cols: 0,
            indptr: vec![0],
            indices: Vec::new(),
            values: Vec::new(),
        }
    }
}

/// Posting lists of a `SparseMatrix`, weights widened to `f64`
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    colptr: Vec<usize>,
    rows: Vec<u32>,
    weights: Vec<f64>,
}

impl ColumnIndex {
    /// (row, weight) postings of one column, rows ascending
    #[inline]
    pub fn column(&self, col: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.colptr[col]..self.colptr[col + 1];
        self.rows[range.clone()]
            .iter()
            .zip(&self.weights[range])
            .map(|(&row, &w)| (row as usize, w))
    }

    pub fn n_cols(&self) -> usize {
        self.colptr.len() - 1
    }
}
