/// What the dispatcher does with skinning types it has no blender for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnsupportedSkinningPolicy {
    /// Leave the positions untouched without notice.
    Ignore,
    /// Leave the positions untouched and log a warning.
    #[default]
    Warn,
    /// Fail with [`DeformError::UnsupportedSkinningType`](crate::DeformError::UnsupportedSkinningType).
    Error,
}

#[derive(Debug, Clone)]
pub struct DeformOptions {
    pub unsupported_skinning: UnsupportedSkinningPolicy,
    /// Determinant magnitude, relative to the product of the column lengths,
    /// at or below which a matrix counts as non-invertible.
    pub degenerate_epsilon: f64,
    /// Split a mesh into control point ranges of this size, blended in
    /// parallel. Only honored with the `parallel` feature.
    pub parallel_chunk_size: Option<usize>,
}

impl Default for DeformOptions {
    fn default() -> Self {
        Self {
            unsupported_skinning: UnsupportedSkinningPolicy::default(),
            degenerate_epsilon: 1e-12,
            parallel_chunk_size: None,
        }
    }
}
