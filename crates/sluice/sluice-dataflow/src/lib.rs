//! Components wired into a graph and driven by non-blocking ticks.
//!
//! A component is one of three kinds, picked by the facets it carries:
//!
//! | kind | consumer facet | producer facet | tick |
//! |---|---|---|---|
//! | [`Source`] | - | yes | always runs the behavior, routes the result |
//! | [`Sink`] | yes | - | runs the behavior once all inputs are ready |
//! | [`Transform`] | yes | yes | pull, run, route |
//!
//! Facets come in three shapes: a single channel ([`Input`] / [`Output`]), a
//! fixed positional list ([`Inputs`] / [`Outputs`]) and a dynamically sized
//! homogeneous bus ([`InputBus`] / [`OutputBus`]). Data moves between
//! components through [`BroadcastQueue`]s owned by the producing facet and
//! [`View`]s held by the consuming one.
//!
//! A [`Circuit`] owns an ordered set of components and is a component itself.

mod adaptor;
mod behavior;
mod circuit;
mod component;
mod consumer;
mod emit;
mod error;
mod producer;

pub use adaptor::{Sink, Source, Transform};
pub use behavior::Behavior;
pub use circuit::{Circuit, ComponentId};
pub use component::Component;
pub use consumer::{Consumer, Input, InputBus, Inputs, PipeList};
pub use emit::Emit;
pub use error::TickError;
pub use producer::{Output, OutputBus, Outputs, Producer, QueueAt, QueueList, Route};

pub use sluice_channel::{BroadcastQueue, View, ViewError};
