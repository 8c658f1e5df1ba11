// Operation kernels: row-level helpers
//
// Every helper consumes and produces sorted (index, value) sequences.
// Sortedness is a precondition and a postcondition throughout; no helper
// reorders or deduplicates beyond what its contract states.

use crate::core::binary_op::{Accumulate, BinaryOp};
use crate::core::matrix::LilMatrix;
use crate::core::semiring::Semiring;
use crate::core::vector::SparseVector;
use crate::core::views::{MatrixMask, VectorMask};
use crate::types::{IndexType, OutputControl, ScalarType};

/// Structural membership in a sorted mask row.
pub(crate) fn mask_contains<M: ScalarType>(mask_row: &[(IndexType, M)], j: IndexType) -> bool {
    mask_row.binary_search_by_key(&j, |e| e.0).is_ok()
}

/// Whether position `j` may be written under (mask row, complement flag).
pub(crate) fn mask_allows<M: ScalarType>(
    mask_row: &[(IndexType, M)],
    complement: bool,
    j: IndexType,
) -> bool {
    mask_contains(mask_row, j) != complement
}

/// Sorted intersection: emit op(a, b) at positions present in both inputs.
pub(crate) fn ewise_and<U, V, W, Op>(
    out: &mut Vec<(IndexType, W)>,
    a: &[(IndexType, U)],
    b: &[(IndexType, V)],
    op: &Op,
) where
    U: ScalarType,
    V: ScalarType,
    Op: BinaryOp<U, V, Output = W>,
{
    out.clear();
    let mut ai = a.iter().peekable();
    let mut bi = b.iter().peekable();
    while let (Some(&&(ja, va)), Some(&&(jb, vb))) = (ai.peek(), bi.peek()) {
        if ja < jb {
            ai.next();
        } else if jb < ja {
            bi.next();
        } else {
            out.push((ja, op.apply(va, vb)));
            ai.next();
            bi.next();
        }
    }
}

/// Sorted union: op(a, b) where both sides are present, one-sided values
/// carried through unchanged (no promotion through the operator).
pub(crate) fn ewise_or<T, Op>(
    out: &mut Vec<(IndexType, T)>,
    a: &[(IndexType, T)],
    b: &[(IndexType, T)],
    op: &Op,
) where
    T: ScalarType,
    Op: BinaryOp<T, T, Output = T>,
{
    out.clear();
    let mut ai = a.iter().peekable();
    let mut bi = b.iter().peekable();
    loop {
        match (ai.peek(), bi.peek()) {
            (Some(&&(ja, va)), Some(&&(jb, vb))) => {
                if ja < jb {
                    out.push((ja, va));
                    ai.next();
                } else if jb < ja {
                    out.push((jb, vb));
                    bi.next();
                } else {
                    out.push((ja, op.apply(va, vb)));
                    ai.next();
                    bi.next();
                }
            }
            (Some(&&e), None) => {
                out.push(e);
                ai.next();
            }
            (None, Some(&&e)) => {
                out.push(e);
                bi.next();
            }
            (None, None) => break,
        }
    }
}

/// Accumulate phase for one row: out := t when the accumulator is inactive,
/// otherwise out := ewise_or(c, t, accum).
pub(crate) fn ewise_or_opt_accum<T, A>(
    out: &mut Vec<(IndexType, T)>,
    c: &[(IndexType, T)],
    t: &[(IndexType, T)],
    accum: &A,
) where
    T: ScalarType,
    A: Accumulate<T>,
{
    if !accum.active() {
        out.clear();
        out.extend_from_slice(t);
        return;
    }
    out.clear();
    let mut ci = c.iter().peekable();
    let mut ti = t.iter().peekable();
    loop {
        match (ci.peek(), ti.peek()) {
            (Some(&&(jc, vc)), Some(&&(jt, vt))) => {
                if jc < jt {
                    out.push((jc, vc));
                    ci.next();
                } else if jt < jc {
                    out.push((jt, vt));
                    ti.next();
                } else {
                    out.push((jc, accum.apply(vc, vt)));
                    ci.next();
                    ti.next();
                }
            }
            (Some(&&e), None) => {
                out.push(e);
                ci.next();
            }
            (None, Some(&&e)) => {
                out.push(e);
                ti.next();
            }
            (None, None) => break,
        }
    }
}

/// Accumulate phase over whole matrices, row by row.
pub(crate) fn ewise_or_opt_accum_matrix<T, A>(
    z: &mut LilMatrix<T>,
    c: &LilMatrix<T>,
    t: &LilMatrix<T>,
    accum: &A,
) where
    T: ScalarType,
    A: Accumulate<T>,
{
    for i in 0..z.nrows() {
        let mut z_row = Vec::new();
        ewise_or_opt_accum(&mut z_row, c.row(i), t.row(i), accum);
        z.set_row(i, z_row);
    }
}

/// Scalar accumulate: existing (+accum) fold, or the fold alone.
pub(crate) fn opt_accum_scalar<T, A>(current: T, t: T, accum: &A) -> T
where
    T: ScalarType,
    A: Accumulate<T>,
{
    if accum.active() {
        accum.apply(current, t)
    } else {
        t
    }
}

/// Semiring inner product over the structural intersection. None iff the
/// intersection is empty.
pub(crate) fn dot<D1, D2, S>(
    a: &[(IndexType, D1)],
    b: &[(IndexType, D2)],
    semiring: &S,
) -> Option<S::Output>
where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
{
    let mut result: Option<S::Output> = None;
    let mut ai = a.iter().peekable();
    let mut bi = b.iter().peekable();
    while let (Some(&&(ja, va)), Some(&&(jb, vb))) = (ai.peek(), bi.peek()) {
        if ja < jb {
            ai.next();
        } else if jb < ja {
            bi.next();
        } else {
            let product = semiring.multiply(va, vb);
            result = Some(match result {
                None => product,
                Some(acc) => semiring.add(acc, product),
            });
            ai.next();
            bi.next();
        }
    }
    result
}

/// Scatter-add: row[j] (+add)= multiply(scalar, b[j]) for each stored b[j].
pub(crate) fn axpy<D1, D2, S>(
    row: &mut Vec<(IndexType, S::Output)>,
    semiring: &S,
    scalar: D1,
    b_row: &[(IndexType, D2)],
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
{
    if b_row.is_empty() {
        return;
    }
    let existing = std::mem::take(row);
    row.reserve(existing.len() + b_row.len());
    let mut ex = existing.into_iter().peekable();
    let mut bi = b_row.iter().peekable();
    loop {
        match (ex.peek(), bi.peek()) {
            (Some(&(je, _)), Some(&&(jb, vb))) => {
                if je < jb {
                    row.push(ex.next().unwrap());
                } else if jb < je {
                    row.push((jb, semiring.multiply(scalar, vb)));
                    bi.next();
                } else {
                    let (j, ve) = ex.next().unwrap();
                    bi.next();
                    row.push((j, semiring.add(ve, semiring.multiply(scalar, vb))));
                }
            }
            (Some(_), None) => {
                row.push(ex.next().unwrap());
            }
            (None, Some(&&(jb, vb))) => {
                row.push((jb, semiring.multiply(scalar, vb)));
                bi.next();
            }
            (None, None) => break,
        }
    }
}

/// Scatter-add with the scalar as the right multiplicand:
/// row[i] (+add)= multiply(a[i], scalar). Used when walking the transposed
/// left operand of a matrix-vector product.
pub(crate) fn axpy_right<D1, D2, S>(
    row: &mut Vec<(IndexType, S::Output)>,
    semiring: &S,
    a_row: &[(IndexType, D1)],
    scalar: D2,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
{
    if a_row.is_empty() {
        return;
    }
    let existing = std::mem::take(row);
    row.reserve(existing.len() + a_row.len());
    let mut ex = existing.into_iter().peekable();
    let mut ai = a_row.iter().peekable();
    loop {
        match (ex.peek(), ai.peek()) {
            (Some(&(je, _)), Some(&&(ja, va))) => {
                if je < ja {
                    row.push(ex.next().unwrap());
                } else if ja < je {
                    row.push((ja, semiring.multiply(va, scalar)));
                    ai.next();
                } else {
                    let (j, ve) = ex.next().unwrap();
                    ai.next();
                    row.push((j, semiring.add(ve, semiring.multiply(va, scalar))));
                }
            }
            (Some(_), None) => {
                row.push(ex.next().unwrap());
            }
            (None, Some(&&(ja, va))) => {
                row.push((ja, semiring.multiply(va, scalar)));
                ai.next();
            }
            (None, None) => break,
        }
    }
}

/// As `axpy`, restricted to positions the (mask row, complement) pair
/// allows.
pub(crate) fn masked_axpy<M, D1, D2, S>(
    row: &mut Vec<(IndexType, S::Output)>,
    mask_row: &[(IndexType, M)],
    complement: bool,
    semiring: &S,
    scalar: D1,
    b_row: &[(IndexType, D2)],
) where
    M: ScalarType,
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
{
    if b_row.is_empty() {
        return;
    }
    let existing = std::mem::take(row);
    row.reserve(existing.len() + b_row.len());
    let mut ex = existing.into_iter().peekable();
    let mut bi = b_row.iter().peekable();
    loop {
        match (ex.peek(), bi.peek()) {
            (Some(&(je, _)), Some(&&(jb, vb))) => {
                if je < jb {
                    row.push(ex.next().unwrap());
                } else if jb < je {
                    if mask_allows(mask_row, complement, jb) {
                        row.push((jb, semiring.multiply(scalar, vb)));
                    }
                    bi.next();
                } else {
                    let (j, ve) = ex.next().unwrap();
                    bi.next();
                    row.push((j, semiring.add(ve, semiring.multiply(scalar, vb))));
                }
            }
            (Some(_), None) => {
                row.push(ex.next().unwrap());
            }
            (None, Some(&&(jb, vb))) => {
                if mask_allows(mask_row, complement, jb) {
                    row.push((jb, semiring.multiply(scalar, vb)));
                }
                bi.next();
            }
            (None, None) => break,
        }
    }
}

/// Fold a sorted row with a binary operation. None iff the row is empty.
pub(crate) fn reduction<T, Op>(row: &[(IndexType, T)], op: &Op) -> Option<T>
where
    T: ScalarType,
    Op: BinaryOp<T, T, Output = T>,
{
    let mut it = row.iter();
    let &(_, first) = it.next()?;
    Some(it.fold(first, |acc, &(_, v)| op.apply(acc, v)))
}

/// Merge semantics for the write phase: take z where the mask is "in", c
/// elsewhere. The replace path passes an empty c.
pub(crate) fn masked_merge<M, T>(
    out: &mut Vec<(IndexType, T)>,
    mask_row: &[(IndexType, M)],
    complement: bool,
    c_row: &[(IndexType, T)],
    z_row: &[(IndexType, T)],
) where
    M: ScalarType,
    T: ScalarType,
{
    out.clear();
    let mut ci = c_row.iter().peekable();
    let mut zi = z_row.iter().peekable();
    loop {
        let j = match (ci.peek(), zi.peek()) {
            (Some(&&(jc, _)), Some(&&(jz, _))) => jc.min(jz),
            (Some(&&(jc, _)), None) => jc,
            (None, Some(&&(jz, _))) => jz,
            (None, None) => break,
        };
        let c_here = ci.peek().map_or(false, |&&(jc, _)| jc == j);
        let z_here = zi.peek().map_or(false, |&&(jz, _)| jz == j);
        if mask_allows(mask_row, complement, j) {
            if z_here {
                out.push(**zi.peek().unwrap());
            }
        } else if c_here {
            out.push(**ci.peek().unwrap());
        }
        if c_here {
            ci.next();
        }
        if z_here {
            zi.next();
        }
    }
}

/// Accumulate restricted to mask-in positions: out := ewise_or(c, t, accum)
/// at positions the (mask row, complement) pair allows, nothing elsewhere.
pub(crate) fn masked_accum<M, T, A>(
    out: &mut Vec<(IndexType, T)>,
    mask_row: &[(IndexType, M)],
    complement: bool,
    accum: &A,
    c_row: &[(IndexType, T)],
    t_row: &[(IndexType, T)],
) where
    M: ScalarType,
    T: ScalarType,
    A: Accumulate<T>,
{
    out.clear();
    let mut ci = c_row.iter().peekable();
    let mut ti = t_row.iter().peekable();
    loop {
        let j = match (ci.peek(), ti.peek()) {
            (Some(&&(jc, _)), Some(&&(jt, _))) => jc.min(jt),
            (Some(&&(jc, _)), None) => jc,
            (None, Some(&&(jt, _))) => jt,
            (None, None) => break,
        };
        let c_here = ci.peek().map_or(false, |&&(jc, _)| jc == j);
        let t_here = ti.peek().map_or(false, |&&(jt, _)| jt == j);
        if mask_allows(mask_row, complement, j) {
            let value = match (c_here, t_here) {
                (true, true) => {
                    accum.apply(ci.peek().unwrap().1, ti.peek().unwrap().1)
                }
                (true, false) => ci.peek().unwrap().1,
                (false, true) => ti.peek().unwrap().1,
                (false, false) => unreachable!(),
            };
            out.push((j, value));
        }
        if c_here {
            ci.next();
        }
        if t_here {
            ti.next();
        }
    }
}

/// Write phase for vectors: apply mask and output control to z, then
/// install the result in w.
pub(crate) fn write_with_opt_mask_vector<T, K>(
    w: &mut SparseVector<T>,
    z: Vec<(IndexType, T)>,
    mask: &K,
    outp: OutputControl,
) where
    T: ScalarType,
    K: VectorMask,
{
    if mask.is_all() {
        w.replace_contents(z);
        return;
    }
    let mut merged = Vec::new();
    match outp {
        OutputControl::Replace => masked_merge(
            &mut merged,
            mask.mask_contents(),
            mask.complemented(),
            &[],
            &z,
        ),
        OutputControl::Merge => masked_merge(
            &mut merged,
            mask.mask_contents(),
            mask.complemented(),
            w.contents(),
            &z,
        ),
    }
    w.replace_contents(merged);
}

/// Write phase for matrices, row by row.
pub(crate) fn write_with_opt_mask_matrix<T, K>(
    c: &mut LilMatrix<T>,
    z: LilMatrix<T>,
    mask: &K,
    outp: OutputControl,
) where
    T: ScalarType,
    K: MatrixMask,
{
    if mask.is_all() {
        *c = z;
        return;
    }
    for i in 0..c.nrows() {
        let mut merged = Vec::new();
        match outp {
            OutputControl::Replace => masked_merge(
                &mut merged,
                mask.mask_row(i),
                mask.complemented(),
                &[],
                z.row(i),
            ),
            OutputControl::Merge => masked_merge(
                &mut merged,
                mask.mask_row(i),
                mask.complemented(),
                c.row(i),
                z.row(i),
            ),
        }
        c.set_row(i, merged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binary_op::{Plus, Times};
    use crate::core::semiring::ArithmeticSemiring;
    use crate::types::NoAccumulate;

    #[test]
    fn test_ewise_and_intersects() {
        let a = [(0, 2), (2, 3), (5, 4)];
        let b = [(2, 10), (3, 20), (5, 30)];
        let mut out = Vec::new();
        ewise_and(&mut out, &a, &b, &Times::new());
        assert_eq!(out, vec![(2, 30), (5, 120)]);
    }

    #[test]
    fn test_ewise_or_carries_one_sided_values() {
        let a = [(0, 2), (2, 3)];
        let b = [(2, 10), (4, 20)];
        let mut out = Vec::new();
        ewise_or(&mut out, &a, &b, &Plus::new());
        assert_eq!(out, vec![(0, 2), (2, 13), (4, 20)]);
    }

    #[test]
    fn test_opt_accum_without_accumulator_is_t() {
        let c = [(0, 1), (1, 1)];
        let t = [(1, 5)];
        let mut out = Vec::new();
        ewise_or_opt_accum(&mut out, &c, &t, &NoAccumulate);
        assert_eq!(out, vec![(1, 5)]);
    }

    #[test]
    fn test_opt_accum_with_plus() {
        let c = [(0, 1), (1, 1)];
        let t = [(1, 5), (2, 7)];
        let mut out = Vec::new();
        ewise_or_opt_accum(&mut out, &c, &t, &Plus::new());
        assert_eq!(out, vec![(0, 1), (1, 6), (2, 7)]);
    }

    #[test]
    fn test_dot_empty_intersection() {
        let a = [(0, 1.0), (2, 2.0)];
        let b = [(1, 3.0), (3, 4.0)];
        assert_eq!(dot(&a, &b, &ArithmeticSemiring::new()), None);
    }

    #[test]
    fn test_dot_inner_product() {
        let a = [(0, 1.0), (2, 2.0), (3, 5.0)];
        let b = [(0, 3.0), (3, 4.0)];
        assert_eq!(dot(&a, &b, &ArithmeticSemiring::new()), Some(23.0));
    }

    #[test]
    fn test_axpy_scatters_and_combines() {
        let sr = ArithmeticSemiring::new();
        let mut row = vec![(1, 10), (4, 40)];
        axpy(&mut row, &sr, 2, &[(1, 3), (2, 5)]);
        assert_eq!(row, vec![(1, 16), (2, 10), (4, 40)]);
    }

    #[test]
    fn test_axpy_right_flips_multiplicands() {
        // multiply is not commutative under Second-like semirings; here the
        // scalar lands on the right of a subtraction-flavored closure check
        let sr = ArithmeticSemiring::new();
        let mut row = Vec::new();
        axpy_right(&mut row, &sr, &[(0, 3), (2, 5)], 2);
        assert_eq!(row, vec![(0, 6), (2, 10)]);
    }

    #[test]
    fn test_masked_axpy_skips_excluded_positions() {
        let sr = ArithmeticSemiring::new();
        let mask = [(1, true)];
        let mut row = Vec::new();
        masked_axpy(&mut row, &mask, false, &sr, 2, &[(1, 3), (2, 5)]);
        assert_eq!(row, vec![(1, 6)]);

        let mut row = Vec::new();
        masked_axpy(&mut row, &mask, true, &sr, 2, &[(1, 3), (2, 5)]);
        assert_eq!(row, vec![(2, 10)]);
    }

    #[test]
    fn test_reduction() {
        assert_eq!(reduction::<i32, _>(&[], &Plus::new()), None);
        assert_eq!(reduction(&[(3, 7)], &Plus::new()), Some(7));
        assert_eq!(reduction(&[(0, 1), (5, 2), (9, 4)], &Plus::new()), Some(7));
    }

    #[test]
    fn test_masked_merge_plain() {
        let mask = [(0, 1u8), (2, 1u8)];
        let c = [(0, 10), (1, 11), (2, 12)];
        let z = [(0, 100), (2, 102)];
        let mut out = Vec::new();
        masked_merge(&mut out, &mask, false, &c, &z);
        // in-mask positions take z, out-of-mask keep c
        assert_eq!(out, vec![(0, 100), (1, 11), (2, 102)]);
    }

    #[test]
    fn test_masked_merge_in_mask_missing_z_clears() {
        let mask = [(0, 1u8), (1, 1u8)];
        let c = [(0, 10), (1, 11)];
        let z = [(0, 100)];
        let mut out = Vec::new();
        masked_merge(&mut out, &mask, false, &c, &z);
        assert_eq!(out, vec![(0, 100)]);
    }

    #[test]
    fn test_masked_merge_complemented() {
        let mask = [(0, 1u8)];
        let c = [(0, 10), (1, 11)];
        let z = [(1, 101), (2, 102)];
        let mut out = Vec::new();
        masked_merge(&mut out, &mask, true, &c, &z);
        assert_eq!(out, vec![(0, 10), (1, 101), (2, 102)]);
    }

    #[test]
    fn test_masked_accum_restricts_to_mask() {
        let mask = [(1, true), (2, true)];
        let c = [(0, 1), (1, 2)];
        let t = [(1, 10), (2, 20)];
        let mut out = Vec::new();
        masked_accum(&mut out, &mask, false, &Plus::new(), &c, &t);
        assert_eq!(out, vec![(1, 12), (2, 20)]);
    }
}
