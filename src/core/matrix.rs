// Core Layer: row-major list-of-lists sparse matrix
//
// The matrix is an array of sparse rows, each a sorted sequence of
// (column, value) pairs. Row access is cheap and borrowed; column access
// materializes. `nvals` is kept as a cached count; bulk row mutation goes
// through `set_row`/`merge_row` (or `recompute_nvals` after direct row
// edits inside kernels) so the cache stays truthful.

use crate::core::binary_op::Accumulate;
use crate::core::error::{GraphBlasError, Result};
use crate::core::vector::SparseVector;
use crate::types::{IndexType, ScalarType};

#[derive(Debug, Clone, PartialEq)]
pub struct LilMatrix<T: ScalarType> {
    nrows: IndexType,
    ncols: IndexType,
    rows: Vec<Vec<(IndexType, T)>>,
    nvals: usize,
}

impl<T: ScalarType> LilMatrix<T> {
    /// Create an empty nrows x ncols matrix.
    pub fn new(nrows: IndexType, ncols: IndexType) -> Self {
        LilMatrix {
            nrows,
            ncols,
            rows: vec![Vec::new(); nrows],
            nvals: 0,
        }
    }

    /// Materialize from a dense row-major source, omitting entries equal to
    /// `sentinel`. Rows must all have the same length.
    pub fn from_dense(dense: &[Vec<T>], sentinel: T) -> Result<Self> {
        let nrows = dense.len();
        let ncols = dense.first().map_or(0, |r| r.len());
        let mut m = LilMatrix::new(nrows, ncols);
        for (i, dense_row) in dense.iter().enumerate() {
            if dense_row.len() != ncols {
                return Err(GraphBlasError::DimensionMismatch(format!(
                    "from_dense: row {} has {} columns, expected {}",
                    i,
                    dense_row.len(),
                    ncols
                )));
            }
            let row: Vec<(IndexType, T)> = dense_row
                .iter()
                .enumerate()
                .filter(|(_, v)| **v != sentinel)
                .map(|(j, v)| (j, *v))
                .collect();
            m.set_row(i, row);
        }
        Ok(m)
    }

    pub fn nrows(&self) -> IndexType {
        self.nrows
    }

    pub fn ncols(&self) -> IndexType {
        self.ncols
    }

    /// Number of stored entries across all rows.
    pub fn nvals(&self) -> usize {
        self.nvals
    }

    /// Borrow row `i` as sorted (column, value) entries.
    ///
    /// Panics when `i >= nrows`; element-level access goes through the
    /// checked `extract_element`.
    pub fn row(&self, i: IndexType) -> &[(IndexType, T)] {
        &self.rows[i]
    }

    /// Replace row `i` wholesale. Callers guarantee strictly increasing
    /// in-bounds column indices.
    pub fn set_row(&mut self, i: IndexType, row: Vec<(IndexType, T)>) {
        debug_assert!(row.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(row.last().map_or(true, |e| e.0 < self.ncols));
        self.nvals -= self.rows[i].len();
        self.nvals += row.len();
        self.rows[i] = row;
    }

    /// Sorted merge of `incoming` into row `i`: columns present on both
    /// sides combine via `accum`, one-sided columns are kept unchanged.
    pub fn merge_row<A>(&mut self, i: IndexType, incoming: Vec<(IndexType, T)>, accum: &A)
    where
        A: Accumulate<T>,
    {
        debug_assert!(incoming.windows(2).all(|w| w[0].0 < w[1].0));
        let existing = std::mem::take(&mut self.rows[i]);
        self.nvals -= existing.len();

        let mut merged = Vec::with_capacity(existing.len() + incoming.len());
        let mut ex = existing.into_iter().peekable();
        let mut inc = incoming.into_iter().peekable();
        loop {
            match (ex.peek(), inc.peek()) {
                (Some(&(je, _)), Some(&(ji, _))) => {
                    if je < ji {
                        merged.push(ex.next().unwrap());
                    } else if ji < je {
                        merged.push(inc.next().unwrap());
                    } else {
                        let (j, ve) = ex.next().unwrap();
                        let (_, vi) = inc.next().unwrap();
                        merged.push((j, accum.apply(ve, vi)));
                    }
                }
                (Some(_), None) => merged.push(ex.next().unwrap()),
                (None, Some(_)) => merged.push(inc.next().unwrap()),
                (None, None) => break,
            }
        }
        self.nvals += merged.len();
        self.rows[i] = merged;
    }

    /// Materialize column `j` as a sparse vector over the row index.
    pub fn col(&self, j: IndexType) -> SparseVector<T> {
        let mut column = SparseVector::new(self.nrows);
        let mut contents = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            if let Ok(pos) = row.binary_search_by_key(&j, |e| e.0) {
                contents.push((i, row[pos].1));
            }
        }
        column.replace_contents(contents);
        column
    }

    /// Whether a value is stored at (i, j).
    pub fn has_element(&self, i: IndexType, j: IndexType) -> bool {
        i < self.nrows
            && self.rows[i].binary_search_by_key(&j, |e| e.0).is_ok()
    }

    /// Read the value stored at (i, j).
    pub fn extract_element(&self, i: IndexType, j: IndexType) -> Result<T> {
        self.check_bounds(i, j)?;
        match self.rows[i].binary_search_by_key(&j, |e| e.0) {
            Ok(pos) => Ok(self.rows[i][pos].1),
            Err(_) => Err(GraphBlasError::NoValue),
        }
    }

    /// Store `value` at (i, j), replacing any existing entry.
    pub fn set_element(&mut self, i: IndexType, j: IndexType, value: T) -> Result<()> {
        self.check_bounds(i, j)?;
        match self.rows[i].binary_search_by_key(&j, |e| e.0) {
            Ok(pos) => self.rows[i][pos].1 = value,
            Err(pos) => {
                self.rows[i].insert(pos, (j, value));
                self.nvals += 1;
            }
        }
        Ok(())
    }

    /// Drop the entry at (i, j) if one is stored.
    pub fn remove_element(&mut self, i: IndexType, j: IndexType) -> Result<()> {
        self.check_bounds(i, j)?;
        if let Ok(pos) = self.rows[i].binary_search_by_key(&j, |e| e.0) {
            self.rows[i].remove(pos);
            self.nvals -= 1;
        }
        Ok(())
    }

    /// Remove all stored entries; dimensions are unchanged.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
        self.nvals = 0;
    }

    /// Materialize to dense, filling missing positions with `fill`.
    pub fn to_dense(&self, fill: T) -> Vec<Vec<T>> {
        let mut dense = vec![vec![fill; self.ncols]; self.nrows];
        for (i, row) in self.rows.iter().enumerate() {
            for &(j, v) in row {
                dense[i][j] = v;
            }
        }
        dense
    }

    fn check_bounds(&self, i: IndexType, j: IndexType) -> Result<()> {
        if i >= self.nrows {
            return Err(GraphBlasError::IndexOutOfBounds {
                index: i,
                bound: self.nrows,
            });
        }
        if j >= self.ncols {
            return Err(GraphBlasError::IndexOutOfBounds {
                index: j,
                bound: self.ncols,
            });
        }
        Ok(())
    }

    /// Direct row access for kernels that scatter into an intermediate.
    /// The caller runs `recompute_nvals` once it is done editing.
    pub(crate) fn row_mut(&mut self, i: IndexType) -> &mut Vec<(IndexType, T)> {
        &mut self.rows[i]
    }

    /// Append an entry to row `i`; the column must exceed the row's current
    /// last column, so appends in column order keep rows sorted.
    pub(crate) fn append_to_row(&mut self, i: IndexType, j: IndexType, value: T) {
        debug_assert!(self.rows[i].last().map_or(true, |e| e.0 < j));
        self.rows[i].push((j, value));
        self.nvals += 1;
    }

    /// Recount stored entries after direct row edits.
    pub(crate) fn recompute_nvals(&mut self) {
        self.nvals = self.rows.iter().map(Vec::len).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binary_op::Plus;

    fn sample() -> LilMatrix<i32> {
        LilMatrix::from_dense(
            &[vec![1, 0, 2], vec![0, 0, 0], vec![3, 4, 0]],
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_from_dense_counts_and_structure() {
        let m = sample();
        assert_eq!((m.nrows(), m.ncols()), (3, 3));
        assert_eq!(m.nvals(), 4);
        assert_eq!(m.row(0), &[(0, 1), (2, 2)]);
        assert!(m.row(1).is_empty());
    }

    #[test]
    fn test_from_dense_rejects_ragged_input() {
        let result = LilMatrix::from_dense(&[vec![1, 2], vec![3]], 0);
        assert!(matches!(
            result,
            Err(GraphBlasError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_col_materializes_over_row_index() {
        let m = sample();
        let c0 = m.col(0);
        assert_eq!(c0.size(), 3);
        assert_eq!(c0.contents(), &[(0, 1), (2, 3)]);
        assert_eq!(m.col(1).contents(), &[(2, 4)]);
    }

    #[test]
    fn test_set_row_updates_nvals() {
        let mut m = sample();
        m.set_row(0, vec![(1, 9)]);
        assert_eq!(m.nvals(), 3);
        m.set_row(1, vec![(0, 5), (2, 6)]);
        assert_eq!(m.nvals(), 5);
    }

    #[test]
    fn test_merge_row_combines_collisions() {
        let mut m = sample();
        // row 0 is [(0,1), (2,2)]; merge [(0,10), (1,20)]
        m.merge_row(0, vec![(0, 10), (1, 20)], &Plus::new());
        assert_eq!(m.row(0), &[(0, 11), (1, 20), (2, 2)]);
        assert_eq!(m.nvals(), 5);
    }

    #[test]
    fn test_element_access() {
        let mut m = sample();
        assert_eq!(m.extract_element(2, 1).unwrap(), 4);
        assert_eq!(m.extract_element(1, 1), Err(GraphBlasError::NoValue));
        assert!(matches!(
            m.extract_element(5, 0),
            Err(GraphBlasError::IndexOutOfBounds { .. })
        ));

        m.set_element(1, 1, 7).unwrap();
        assert_eq!(m.nvals(), 5);
        m.remove_element(1, 1).unwrap();
        assert_eq!(m.nvals(), 4);
    }

    #[test]
    fn test_dense_round_trip() {
        let dense = vec![vec![1, 0, 2], vec![0, 0, 0], vec![3, 4, 0]];
        let m = LilMatrix::from_dense(&dense, 0).unwrap();
        assert_eq!(m.to_dense(0), dense);
    }

    #[test]
    fn test_stored_zero_is_not_missing() {
        let mut m = sample();
        m.set_element(0, 1, 0).unwrap();
        assert!(m.has_element(0, 1));
        assert_eq!(m.extract_element(0, 1).unwrap(), 0);
    }

    #[test]
    fn test_clear() {
        let mut m = sample();
        m.clear();
        assert_eq!(m.nvals(), 0);
        assert_eq!((m.nrows(), m.ncols()), (3, 3));
    }
}
