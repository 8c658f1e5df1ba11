// LilBlas: sequential GraphBLAS-model engine over list-of-lists storage
//
// Graph algorithms are expressed as masked, accumulated matrix/vector
// operations over user-chosen semirings. Every kernel follows the same
// three-phase pipeline:
//
// 1. compute T  - the pure algebraic result, ignoring mask and prior output
// 2. accumulate Z = C (+accum) T, or Z = T when no accumulator is given
// 3. write W    - merge Z into the output under the mask and output control
//
// Architecture:
// - types: index/scalar primitives, output control, NoMask/NoAccumulate
// - core:  sparse containers, algebra objects, operand views, errors
// - ops:   the operation kernels sharing the pipeline above
// - algorithms: compositions of the primitives (maximal independent set)

pub mod algorithms;
pub mod core;
pub mod ops;
pub mod types;

// Re-export commonly used items for convenience
pub use crate::core::binary_op::{
    Accumulate, BinaryFunction, BinaryOp, First, GreaterThan, LogicalAnd, LogicalOr, Max, Min,
    Minus, Plus, Second, Times,
};
pub use crate::core::error::{GraphBlasError, Result};
pub use crate::core::matrix::LilMatrix;
pub use crate::core::monoid::{
    LogicalAndMonoid, LogicalOrMonoid, MaxMonoid, MinMonoid, Monoid, PlusMonoid, TimesMonoid,
};
pub use crate::core::semiring::{
    ArithmeticSemiring, LogicalSemiring, MaxSecondSemiring, MaxTimesSemiring, MinPlusSemiring,
    Semiring,
};
pub use crate::core::unary_op::{
    AdditiveInverse, Identity, MultiplicativeInverse, UnaryFunction, UnaryOp,
};
pub use crate::core::vector::SparseVector;
pub use crate::core::views::{
    complement, transpose, MatrixComplementView, MatrixMask, MatrixOperand, TransposeView,
    VectorComplementView, VectorMask,
};
pub use crate::ops::apply::{apply_matrix, apply_vector};
pub use crate::ops::assign::{assign_matrix, assign_vector};
pub use crate::ops::ewise::{
    ewise_add_matrix, ewise_add_vector, ewise_mult_matrix, ewise_mult_vector,
};
pub use crate::ops::extract::{extract_matrix, extract_vector};
pub use crate::ops::matmul::{mxm, mxv, vxm};
pub use crate::ops::reduce::{
    reduce_matrix_to_scalar, reduce_matrix_to_vector, reduce_vector_to_scalar,
};
pub use crate::ops::transpose::transpose_matrix;
pub use crate::types::{IndexType, NoAccumulate, NoMask, OutputControl, ScalarType};
