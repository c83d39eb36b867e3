mod broadcast;
mod error;
mod slots;

pub use broadcast::{BroadcastQueue, View};
pub use error::ViewError;
