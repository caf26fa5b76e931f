use std::fmt;

/// Failure modes of interactive frame mutation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameError {
    /// A resize drag anchored exactly on the frame's origin corner; the
    /// scale factor would divide by zero.
    DegenerateAnchor,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::DegenerateAnchor => {
                write!(f, "resize anchor coincides with the frame's origin corner")
            }
        }
    }
}

impl std::error::Error for FrameError {}
