//! Scene graph error types

use crate::ObjectKey;
use std::fmt;

/// Error type for scene graph operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// The object was destroyed or is waiting to be torn down
    Destroyed(ObjectKey),
    /// An object cannot become its own child
    SelfAttach(ObjectKey),
    /// The new parent is a descendant of the child
    Cycle { parent: ObjectKey, child: ObjectKey },
    /// The object is not a child of the given parent
    NotAChild { parent: ObjectKey, child: ObjectKey },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Destroyed(key) => write!(f, "Object {:?} is destroyed", key),
            SceneError::SelfAttach(key) => write!(f, "Object {:?} cannot be attached to itself", key),
            SceneError::Cycle { parent, child } => {
                write!(f, "Attaching {:?} under {:?} would create a cycle", child, parent)
            }
            SceneError::NotAChild { parent, child } => {
                write!(f, "Object {:?} is not a child of {:?}", child, parent)
            }
        }
    }
}

impl std::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn key(n: u64) -> ObjectKey {
        KeyData::from_ffi(n).into()
    }

    #[test]
    fn test_display_messages() {
        let err = SceneError::Destroyed(key(1));
        assert!(err.to_string().contains("destroyed"));

        let err = SceneError::Cycle { parent: key(1), child: key(2) };
        assert!(err.to_string().contains("cycle"));

        let err = SceneError::NotAChild { parent: key(1), child: key(2) };
        assert!(err.to_string().contains("not a child"));
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(SceneError::SelfAttach(key(3)));
        assert!(err.to_string().contains("itself"));
    }
}
