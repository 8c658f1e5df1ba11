// Core Layer: operand views and mask protocols
//
// Views are lightweight non-owning wrappers created per call site; their
// lifetime is bounded by the referenced container. Kernels detect them by
// capability: `MatrixOperand` carries the transpose flag, and the mask
// protocols expose stored structure plus a complement flag.
//
// Masks are structural: a position is "in" iff the underlying container has
// a stored entry there (plain) or no stored entry there (complemented).
// Stored zeros count as present.

use crate::core::matrix::LilMatrix;
use crate::core::vector::SparseVector;
use crate::types::{IndexType, NoMask, ScalarType};

//----------------------------------------------------------------------------
// Transpose view

/// Non-owning transposed view of a matrix: logical dimensions swapped,
/// logical row i is column i of the base.
#[derive(Debug, Clone, Copy)]
pub struct TransposeView<'a, T: ScalarType> {
    base: &'a LilMatrix<T>,
}

/// Create a transposed view of `m`.
pub fn transpose<T: ScalarType>(m: &LilMatrix<T>) -> TransposeView<'_, T> {
    TransposeView { base: m }
}

impl<'a, T: ScalarType> TransposeView<'a, T> {
    pub fn nrows(&self) -> IndexType {
        self.base.ncols()
    }

    pub fn ncols(&self) -> IndexType {
        self.base.nrows()
    }

    /// Logical row i, materialized from column i of the base.
    pub fn row(&self, i: IndexType) -> SparseVector<T> {
        self.base.col(i)
    }
}

//----------------------------------------------------------------------------
// Operand protocol

/// A matrix argument to a kernel: either a plain matrix or a transposed
/// view of one. Kernels dispatch on `transposed` and walk the base.
pub trait MatrixOperand<T: ScalarType>: Copy {
    /// Logical row count.
    fn nrows(&self) -> IndexType;

    /// Logical column count.
    fn ncols(&self) -> IndexType;

    fn transposed(&self) -> bool;

    fn base(&self) -> &LilMatrix<T>;
}

impl<'a, T: ScalarType> MatrixOperand<T> for &'a LilMatrix<T> {
    fn nrows(&self) -> IndexType {
        LilMatrix::nrows(self)
    }

    fn ncols(&self) -> IndexType {
        LilMatrix::ncols(self)
    }

    fn transposed(&self) -> bool {
        false
    }

    fn base(&self) -> &LilMatrix<T> {
        self
    }
}

impl<'a, T: ScalarType> MatrixOperand<T> for TransposeView<'a, T> {
    fn nrows(&self) -> IndexType {
        TransposeView::nrows(self)
    }

    fn ncols(&self) -> IndexType {
        TransposeView::ncols(self)
    }

    fn transposed(&self) -> bool {
        true
    }

    fn base(&self) -> &LilMatrix<T> {
        self.base
    }
}

//----------------------------------------------------------------------------
// Mask protocols

/// Vector-shaped mask argument.
pub trait VectorMask {
    type Scalar: ScalarType;

    /// Declared size, or None when any output shape is acceptable.
    fn mask_size(&self) -> Option<IndexType>;

    /// Stored entries of the underlying vector.
    fn mask_contents(&self) -> &[(IndexType, Self::Scalar)];

    /// Stored-entry count of the underlying vector.
    fn mask_nvals(&self) -> usize;

    /// Whether presence is inverted.
    fn complemented(&self) -> bool {
        false
    }

    /// True only for the no-mask sentinel: every position selected.
    fn is_all(&self) -> bool {
        false
    }
}

/// Matrix-shaped mask argument.
pub trait MatrixMask {
    type Scalar: ScalarType;

    fn mask_dims(&self) -> Option<(IndexType, IndexType)>;

    /// Stored entries of row i of the underlying matrix.
    fn mask_row(&self, i: IndexType) -> &[(IndexType, Self::Scalar)];

    fn mask_nvals(&self) -> usize;

    fn complemented(&self) -> bool {
        false
    }

    fn is_all(&self) -> bool {
        false
    }
}

impl VectorMask for NoMask {
    type Scalar = bool;

    fn mask_size(&self) -> Option<IndexType> {
        None
    }

    fn mask_contents(&self) -> &[(IndexType, bool)] {
        &[]
    }

    fn mask_nvals(&self) -> usize {
        0
    }

    fn is_all(&self) -> bool {
        true
    }
}

impl MatrixMask for NoMask {
    type Scalar = bool;

    fn mask_dims(&self) -> Option<(IndexType, IndexType)> {
        None
    }

    fn mask_row(&self, _i: IndexType) -> &[(IndexType, bool)] {
        &[]
    }

    fn mask_nvals(&self) -> usize {
        0
    }

    fn is_all(&self) -> bool {
        true
    }
}

impl<T: ScalarType> VectorMask for SparseVector<T> {
    type Scalar = T;

    fn mask_size(&self) -> Option<IndexType> {
        Some(self.size())
    }

    fn mask_contents(&self) -> &[(IndexType, T)] {
        self.contents()
    }

    fn mask_nvals(&self) -> usize {
        self.nvals()
    }
}

impl<T: ScalarType> MatrixMask for LilMatrix<T> {
    type Scalar = T;

    fn mask_dims(&self) -> Option<(IndexType, IndexType)> {
        Some((self.nrows(), self.ncols()))
    }

    fn mask_row(&self, i: IndexType) -> &[(IndexType, T)] {
        self.row(i)
    }

    fn mask_nvals(&self) -> usize {
        self.nvals()
    }
}

// Forwarding impls so references to masks are masks themselves.

impl<'m, M: VectorMask + ?Sized> VectorMask for &'m M {
    type Scalar = M::Scalar;

    fn mask_size(&self) -> Option<IndexType> {
        M::mask_size(self)
    }

    fn mask_contents(&self) -> &[(IndexType, M::Scalar)] {
        M::mask_contents(self)
    }

    fn mask_nvals(&self) -> usize {
        M::mask_nvals(self)
    }

    fn complemented(&self) -> bool {
        M::complemented(self)
    }

    fn is_all(&self) -> bool {
        M::is_all(self)
    }
}

impl<'m, M: MatrixMask + ?Sized> MatrixMask for &'m M {
    type Scalar = M::Scalar;

    fn mask_dims(&self) -> Option<(IndexType, IndexType)> {
        M::mask_dims(self)
    }

    fn mask_row(&self, i: IndexType) -> &[(IndexType, M::Scalar)] {
        M::mask_row(self, i)
    }

    fn mask_nvals(&self) -> usize {
        M::mask_nvals(self)
    }

    fn complemented(&self) -> bool {
        M::complemented(self)
    }

    fn is_all(&self) -> bool {
        M::is_all(self)
    }
}

//----------------------------------------------------------------------------
// Structural complement views

/// Structural complement of a matrix mask.
#[derive(Debug, Clone, Copy)]
pub struct MatrixComplementView<'a, T: ScalarType> {
    base: &'a LilMatrix<T>,
}

/// Structural complement of a vector mask.
#[derive(Debug, Clone, Copy)]
pub struct VectorComplementView<'a, T: ScalarType> {
    base: &'a SparseVector<T>,
}

impl<'a, T: ScalarType> MatrixMask for MatrixComplementView<'a, T> {
    type Scalar = T;

    fn mask_dims(&self) -> Option<(IndexType, IndexType)> {
        Some((self.base.nrows(), self.base.ncols()))
    }

    fn mask_row(&self, i: IndexType) -> &[(IndexType, T)] {
        self.base.row(i)
    }

    fn mask_nvals(&self) -> usize {
        self.base.nvals()
    }

    fn complemented(&self) -> bool {
        true
    }
}

impl<'a, T: ScalarType> VectorMask for VectorComplementView<'a, T> {
    type Scalar = T;

    fn mask_size(&self) -> Option<IndexType> {
        Some(self.base.size())
    }

    fn mask_contents(&self) -> &[(IndexType, T)] {
        self.base.contents()
    }

    fn mask_nvals(&self) -> usize {
        self.base.nvals()
    }

    fn complemented(&self) -> bool {
        true
    }
}

/// Structural complement constructor; complementing a complement view hands
/// back the underlying container.
pub fn complement<C: Complementable>(x: C) -> C::View {
    x.complement_view()
}

pub trait Complementable {
    type View;

    fn complement_view(self) -> Self::View;
}

impl<'a, T: ScalarType> Complementable for &'a LilMatrix<T> {
    type View = MatrixComplementView<'a, T>;

    fn complement_view(self) -> Self::View {
        MatrixComplementView { base: self }
    }
}

impl<'a, T: ScalarType> Complementable for &'a SparseVector<T> {
    type View = VectorComplementView<'a, T>;

    fn complement_view(self) -> Self::View {
        VectorComplementView { base: self }
    }
}

impl<'a, T: ScalarType> Complementable for MatrixComplementView<'a, T> {
    type View = &'a LilMatrix<T>;

    fn complement_view(self) -> Self::View {
        self.base
    }
}

impl<'a, T: ScalarType> Complementable for VectorComplementView<'a, T> {
    type View = &'a SparseVector<T>;

    fn complement_view(self) -> Self::View {
        self.base
    }
}
