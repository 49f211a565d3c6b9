use std::fmt;

/// A generation attempt ran out of room.
///
/// These are not programming errors: the layout simply left too little
/// walkable space for what had to be placed. The canvas that produced one
/// should be thrown away; a caller may retry with another seed or other
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// There is no walkable point to put something on.
    NoOpenSpace { purpose: &'static str },
    /// More distinct points were requested than there are candidates.
    SampleTooLarge { wanted: usize, available: usize },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOpenSpace { purpose } => write!(f, "can't place {purpose} with no open spaces"),
            Self::SampleTooLarge { wanted, available } => {
                write!(f, "sample of {wanted} exceeds the {available} available points")
            }
        }
    }
}

impl std::error::Error for GenError {}
