use sluice_channel::ViewError;

/// Failure of a [`Component::tick`](crate::Component::tick).
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A view the component reads from is not attached to a live queue.
    #[error(transparent)]
    View(#[from] ViewError),

    /// A member of a circuit failed; `index` is its insertion position.
    #[error("component #{index} ({name}) failed to tick")]
    Member {
        index: usize,
        name: &'static str,
        #[source]
        source: Box<TickError>,
    },
}

impl TickError {
    /// The innermost error, skipping circuit nesting.
    pub fn root(&self) -> &TickError {
        match self {
            TickError::Member { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the failure comes from a dangling view somewhere down the chain.
    pub fn is_dangling(&self) -> bool {
        matches!(self.root(), TickError::View(ViewError::Dangling))
    }
}
