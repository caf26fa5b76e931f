use std::fmt;

/// Failure modes of pixel-to-world unprojection.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CameraError {
    /// The window has a zero-area viewport; the NDC divide is undefined.
    EmptyViewport,
    /// `projection * view` is not invertible.
    Singular,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::EmptyViewport => write!(f, "cannot unproject through a zero-area viewport"),
            CameraError::Singular => write!(f, "projection * view matrix is singular"),
        }
    }
}

impl std::error::Error for CameraError {}
