/// Errors reported by tree operations. Variants carrying a value hand ownership
/// back to the caller, since the tree never took it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TreeError<T> {
    /// An item comparing equal is already stored.
    #[error("an equal item is already stored in the tree")]
    Duplicate(T),
    /// The allocator could not provide memory for a new node.
    #[error("failed to allocate a tree node")]
    AllocFailed(T),
    /// No stored item compares equal to the one requested.
    #[error("item not found in the tree")]
    NotFound,
    /// The visitor asked to stop before the traversal finished.
    #[error("traversal stopped by the visitor")]
    Stopped,
}

impl<T> TreeError<T> {
    /// Recovers the rejected item, if this error carries one.
    pub fn into_inner(self) -> Option<T> {
        match self {
            Self::Duplicate(v) | Self::AllocFailed(v) => Some(v),
            Self::NotFound | Self::Stopped => None
        }
    }
}

impl<T> PartialEq for TreeError<T>
where T: PartialEq
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Duplicate(a), Self::Duplicate(b)) => a == b,
            (Self::AllocFailed(a), Self::AllocFailed(b)) => a == b,
            (Self::NotFound, Self::NotFound) => true,
            (Self::Stopped, Self::Stopped) => true,
            _ => false
        }
    }
}
