// Type System: scalar domains and operation modifiers
//
// The engine is generic over its scalar domains; the trait below is the only
// bound containers and kernels place on stored values. The two sentinel
// types make "no mask" and "no accumulator" statically distinguishable, so
// monomorphization removes the unused pipeline phases.

/// Index type shared by dimensions and positions.
pub type IndexType = usize;

/// Scalar domains storable in sparse containers.
///
/// Blanket-implemented; user-defined value types qualify automatically.
pub trait ScalarType: Copy + PartialEq + std::fmt::Debug + 'static {}

impl<T: Copy + PartialEq + std::fmt::Debug + 'static> ScalarType for T {}

/// What happens at output positions the mask excludes from the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputControl {
    /// Excluded positions keep their prior value.
    #[default]
    Merge,
    /// Excluded positions become missing.
    Replace,
}

/// Mask sentinel: every output position is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoMask;

/// Accumulator sentinel: the write phase receives T directly instead of
/// C (+accum) T.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoAccumulate;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_control_default_is_merge() {
        assert_eq!(OutputControl::default(), OutputControl::Merge);
    }
}
