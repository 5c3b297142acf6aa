use std::fmt;

use super::MAX_VERTICES;

/// Failure to build a stroke mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TessellateError {
    /// The stroke needs more vertices than 16-bit indices can address.
    IndexOverflow {
        /// Number of segments in the input.
        segments: usize,
    },
}

impl TessellateError {
    /// Vertices the rejected input would have produced.
    pub fn required_vertices(&self) -> usize {
        match self {
            TessellateError::IndexOverflow { segments } => segments.saturating_mul(4),
        }
    }
}

impl fmt::Display for TessellateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TessellateError::IndexOverflow { segments } => write!(
                f,
                "stroke of {segments} segments needs {} vertices, limit is {MAX_VERTICES}",
                self.required_vertices()
            ),
        }
    }
}

impl std::error::Error for TessellateError {}
