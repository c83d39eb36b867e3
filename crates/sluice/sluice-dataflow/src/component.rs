use crate::error::TickError;

/// A schedulable unit of work.
///
/// `tick` performs one non-blocking round: it may look at inputs, run user
/// logic and push outputs, but never waits for data.
pub trait Component: Send + 'static {
    fn tick(&mut self) -> Result<(), TickError>;
}
