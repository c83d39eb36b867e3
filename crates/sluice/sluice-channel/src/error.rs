/// Failure of an operation on a [`View`](crate::View).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The view is not attached to a live queue: it was never connected, or
    /// the producer owning its queue has been dropped.
    #[error("attempting to use a dangling broadcast view")]
    Dangling,
}
