// Operation kernels: extract
//
// Index projection: the output position k holds the input value at
// indices[k]. Duplicate indices are permitted; out-of-range indices fail
// before the output is touched.

use crate::core::binary_op::Accumulate;
use crate::core::error::{GraphBlasError, Result};
use crate::core::matrix::LilMatrix;
use crate::core::vector::SparseVector;
use crate::core::views::{MatrixMask, MatrixOperand, VectorMask};
use crate::ops::helpers::{
    ewise_or_opt_accum, ewise_or_opt_accum_matrix, write_with_opt_mask_matrix,
    write_with_opt_mask_vector,
};
use crate::types::{IndexType, OutputControl, ScalarType};

/// w<mask> = accum(w, u[indices])
pub fn extract_vector<T, K, A>(
    w: &mut SparseVector<T>,
    mask: &K,
    accum: &A,
    u: &SparseVector<T>,
    indices: &[IndexType],
    outp: OutputControl,
) -> Result<()>
where
    T: ScalarType,
    K: VectorMask,
    A: Accumulate<T>,
{
    if w.size() != indices.len() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "extract: output size {}, index list length {}",
            w.size(),
            indices.len()
        )));
    }
    if let Some(size) = mask.mask_size() {
        if size != w.size() {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "extract: mask size {}, output size {}",
                size,
                w.size()
            )));
        }
    }
    for &ix in indices {
        if ix >= u.size() {
            return Err(GraphBlasError::IndexOutOfBounds {
                index: ix,
                bound: u.size(),
            });
        }
    }

    let mut t: Vec<(IndexType, T)> = Vec::new();
    for (k, &ix) in indices.iter().enumerate() {
        if let Ok(v) = u.extract_element(ix) {
            t.push((k, v));
        }
    }

    let mut z = Vec::new();
    ewise_or_opt_accum(&mut z, w.contents(), &t, accum);
    write_with_opt_mask_vector(w, z, mask, outp);
    Ok(())
}

/// C<mask> = accum(C, A[row_indices, col_indices])
pub fn extract_matrix<T, K, A, AM>(
    c: &mut LilMatrix<T>,
    mask: &K,
    accum: &A,
    a: AM,
    row_indices: &[IndexType],
    col_indices: &[IndexType],
    outp: OutputControl,
) -> Result<()>
where
    T: ScalarType,
    K: MatrixMask,
    A: Accumulate<T>,
    AM: MatrixOperand<T>,
{
    if c.nrows() != row_indices.len() || c.ncols() != col_indices.len() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "extract: output is {}x{}, index lists are {}x{}",
            c.nrows(),
            c.ncols(),
            row_indices.len(),
            col_indices.len()
        )));
    }
    if let Some((mr, mc)) = mask.mask_dims() {
        if (mr, mc) != (c.nrows(), c.ncols()) {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "extract: mask is {}x{}, output is {}x{}",
                mr,
                mc,
                c.nrows(),
                c.ncols()
            )));
        }
    }
    for &r in row_indices {
        if r >= a.nrows() {
            return Err(GraphBlasError::IndexOutOfBounds {
                index: r,
                bound: a.nrows(),
            });
        }
    }
    for &j in col_indices {
        if j >= a.ncols() {
            return Err(GraphBlasError::IndexOutOfBounds {
                index: j,
                bound: a.ncols(),
            });
        }
    }

    let base = a.base();
    let lookup = |r: IndexType, j: IndexType| -> Option<T> {
        let (bi, bj) = if a.transposed() { (j, r) } else { (r, j) };
        base.row(bi)
            .binary_search_by_key(&bj, |e| e.0)
            .ok()
            .map(|pos| base.row(bi)[pos].1)
    };

    let mut t = LilMatrix::new(c.nrows(), c.ncols());
    for (i, &r) in row_indices.iter().enumerate() {
        let mut t_row = Vec::new();
        for (k, &j) in col_indices.iter().enumerate() {
            if let Some(v) = lookup(r, j) {
                t_row.push((k, v));
            }
        }
        t.set_row(i, t_row);
    }

    let mut z = LilMatrix::new(c.nrows(), c.ncols());
    ewise_or_opt_accum_matrix(&mut z, c, &t, accum);
    write_with_opt_mask_matrix(c, z, mask, outp);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NoAccumulate, NoMask};

    #[test]
    fn test_extract_vector_projects_and_permutes() {
        let u = SparseVector::from_dense(&[10, 0, 30, 40], 0);
        let mut w = SparseVector::new(3);
        extract_vector(
            &mut w,
            &NoMask,
            &NoAccumulate,
            &u,
            &[3, 1, 0],
            OutputControl::Replace,
        )
        .unwrap();
        // position 1 projects the missing u[1]
        assert_eq!(w.contents(), &[(0, 40), (2, 10)]);
    }

    #[test]
    fn test_extract_vector_duplicate_indices() {
        let u = SparseVector::from_dense(&[10, 0, 30], 0);
        let mut w = SparseVector::new(2);
        extract_vector(
            &mut w,
            &NoMask,
            &NoAccumulate,
            &u,
            &[2, 2],
            OutputControl::Replace,
        )
        .unwrap();
        assert_eq!(w.to_dense(0), vec![30, 30]);
    }

    #[test]
    fn test_extract_vector_out_of_bounds_is_no_write() {
        let u = SparseVector::from_dense(&[10, 20], 0);
        let mut w = SparseVector::from_dense(&[1, 1], 0);
        let result = extract_vector(
            &mut w,
            &NoMask,
            &NoAccumulate,
            &u,
            &[0, 5],
            OutputControl::Replace,
        );
        assert!(matches!(
            result,
            Err(GraphBlasError::IndexOutOfBounds { index: 5, .. })
        ));
        assert_eq!(w.to_dense(0), vec![1, 1]);
    }

    #[test]
    fn test_extract_matrix_submatrix() {
        let a = LilMatrix::from_dense(
            &[vec![1, 2, 0], vec![0, 5, 6], vec![7, 0, 9]],
            0,
        )
        .unwrap();
        let mut c = LilMatrix::new(2, 2);
        extract_matrix(
            &mut c,
            &NoMask,
            &NoAccumulate,
            &a,
            &[2, 0],
            &[0, 2],
            OutputControl::Replace,
        )
        .unwrap();
        assert_eq!(c.to_dense(0), vec![vec![7, 9], vec![1, 0]]);
    }
}
