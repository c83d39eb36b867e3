//! Ordered, owning collection of components.

use crate::adaptor::{Sink, Source, Transform};
use crate::behavior::Behavior;
use crate::component::Component;
use crate::consumer::Consumer;
use crate::error::TickError;
use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Object-safe view of a member, with enough type information to hand a
/// typed reference back out.
trait Member: Send {
    fn tick_member(&mut self) -> Result<(), TickError>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn name(&self) -> &'static str;
}

impl<C: Component> Member for C {
    #[inline]
    fn tick_member(&mut self) -> Result<(), TickError> {
        self.tick()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn name(&self) -> &'static str {
        type_name::<C>()
    }
}

/// Typed handle to a component owned by a [`Circuit`].
///
/// Stays valid for the lifetime of the circuit that issued it.
pub struct ComponentId<C> {
    index: usize,
    _marker: PhantomData<fn() -> C>,
}

impl<C> ComponentId<C> {
    /// Insertion position of the component.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<C> Clone for ComponentId<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ComponentId<C> {}

impl<C> fmt::Debug for ComponentId<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentId").field(&self.index).finish()
    }
}

/// An ordered set of components, ticked in insertion order.
///
/// A circuit is a [`Component`] itself, so circuits nest. Members live as long
/// as the circuit does.
#[derive(Default)]
pub struct Circuit {
    components: Vec<Box<dyn Member>>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `component` and returns it for wiring.
    pub fn add<C: Component>(&mut self, component: C) -> &mut C {
        let id = self.insert(component);
        match self.components[id.index].as_any_mut().downcast_mut::<C>() {
            Some(component) => component,
            None => unreachable!("member {} was inserted as {}", id.index, type_name::<C>()),
        }
    }

    /// Takes ownership of `component` and returns a handle for later wiring.
    ///
    /// Use this when a component has to be connected to something added after
    /// it, e.g. to close a feedback loop.
    pub fn insert<C: Component>(&mut self, component: C) -> ComponentId<C> {
        let index = self.components.len();
        self.components.push(Box::new(component));
        debug!(index, component = type_name::<C>(), "component added to circuit");

        ComponentId {
            index,
            _marker: PhantomData,
        }
    }

    /// The component behind `id`.
    ///
    /// Returns `None` if `id` does not name a `C` in this circuit.
    pub fn get_mut<C: Component>(&mut self, id: ComponentId<C>) -> Option<&mut C> {
        self.components
            .get_mut(id.index)?
            .as_any_mut()
            .downcast_mut::<C>()
    }

    /// Adds a [`Source`] with producer facet `O`.
    pub fn source<O, F>(&mut self, behavior: F) -> &mut Source<O, F>
    where
        O: Default,
        F: Behavior<()>,
        Source<O, F>: Component,
    {
        self.add(Source::new(behavior))
    }

    /// Adds a [`Sink`] with consumer facet `I`.
    pub fn sink<I, F>(&mut self, behavior: F) -> &mut Sink<I, F>
    where
        I: Consumer,
        F: Behavior<I::Args>,
        Sink<I, F>: Component,
    {
        self.add(Sink::new(behavior))
    }

    /// Adds a [`Transform`] with consumer facet `I` and producer facet `O`.
    pub fn transform<I, O, F>(&mut self, behavior: F) -> &mut Transform<I, O, F>
    where
        I: Consumer,
        O: Default,
        F: Behavior<I::Args>,
        Transform<I, O, F>: Component,
    {
        self.add(Transform::new(behavior))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Ticks every member once, in insertion order, on the calling thread.
    ///
    /// Stops at the first member that fails; the members after it do not run
    /// this round.
    pub fn tick(&mut self) -> Result<(), TickError> {
        for (index, component) in self.components.iter_mut().enumerate() {
            component
                .tick_member()
                .map_err(|source| TickError::Member {
                    index,
                    name: component.name(),
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }
}

impl Component for Circuit {
    fn tick(&mut self) -> Result<(), TickError> {
        Circuit::tick(self)
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.components.iter().map(|component| component.name()))
            .finish()
    }
}
