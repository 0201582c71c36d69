/// Errors from mesh generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("{what} must be at least 2, got {got}")]
    TooFewSubdivisions { what: &'static str, got: u32 },
    #[error("{what} of {count} does not fit a 32-bit index buffer")]
    TooManyVertices { what: &'static str, count: u64 },
}

/// Reject counts that would divide by zero in the angle step.
pub(crate) fn require_subdivisions(what: &'static str, got: u32) -> Result<(), MeshError> {
    if got < 2 {
        return Err(MeshError::TooFewSubdivisions { what, got });
    }
    Ok(())
}

/// Vertex and index counts must be addressable with `u32` indices.
pub(crate) fn require_u32(what: &'static str, count: u64) -> Result<usize, MeshError> {
    if count > u32::MAX as u64 {
        return Err(MeshError::TooManyVertices { what, count });
    }
    Ok(count as usize)
}
