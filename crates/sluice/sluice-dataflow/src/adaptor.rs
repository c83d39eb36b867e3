//! Adaptors turning a plain behavior into a [`Component`].
//!
//! There is one adaptor per facet combination. A component with neither facet
//! has no adaptor and therefore cannot be built.

use crate::behavior::Behavior;
use crate::component::Component;
use crate::consumer::Consumer;
use crate::error::TickError;
use crate::producer::Producer;

/// Producer-only component: runs its behavior on every tick.
pub struct Source<O, F> {
    producer: O,
    behavior: F,
}

/// Consumer-only component: runs its behavior for effect once inputs are ready.
pub struct Sink<I, F> {
    consumer: I,
    behavior: F,
}

/// Consumer and producer: pulls inputs, runs the behavior, routes the result.
pub struct Transform<I, O, F> {
    consumer: I,
    producer: O,
    behavior: F,
}

impl<O, F> Source<O, F>
where
    O: Default,
    F: Behavior<()>,
{
    pub fn new(behavior: F) -> Self {
        Self {
            producer: O::default(),
            behavior,
        }
    }
}

impl<O, F> Source<O, F> {
    /// The output facet, for taking views.
    pub fn producer(&mut self) -> &mut O {
        &mut self.producer
    }
}

impl<O, F> Component for Source<O, F>
where
    O: Producer<F::Output> + Send + 'static,
    F: Behavior<()> + Send + 'static,
{
    fn tick(&mut self) -> Result<(), TickError> {
        let output = self.behavior.call(());
        self.producer.push_output(output);
        Ok(())
    }
}

impl<I, F> Sink<I, F>
where
    I: Consumer,
    F: Behavior<I::Args>,
{
    pub fn new(behavior: F) -> Self {
        Self {
            consumer: I::default(),
            behavior,
        }
    }
}

impl<I, F> Sink<I, F> {
    /// The input facet, for connecting pipes.
    pub fn consumer(&mut self) -> &mut I {
        &mut self.consumer
    }
}

impl<I, F> Component for Sink<I, F>
where
    I: Consumer + Send + 'static,
    F: Behavior<I::Args> + Send + 'static,
{
    fn tick(&mut self) -> Result<(), TickError> {
        if let Some(args) = self.consumer.pull_input()? {
            self.behavior.call(args);
        }
        Ok(())
    }
}

impl<I, O, F> Transform<I, O, F>
where
    I: Consumer,
    O: Default,
    F: Behavior<I::Args>,
{
    pub fn new(behavior: F) -> Self {
        Self {
            consumer: I::default(),
            producer: O::default(),
            behavior,
        }
    }
}

impl<I, O, F> Transform<I, O, F> {
    pub fn consumer(&mut self) -> &mut I {
        &mut self.consumer
    }

    pub fn producer(&mut self) -> &mut O {
        &mut self.producer
    }
}

impl<I, O, F> Component for Transform<I, O, F>
where
    I: Consumer + Send + 'static,
    O: Producer<F::Output> + Send + 'static,
    F: Behavior<I::Args> + Send + 'static,
{
    fn tick(&mut self) -> Result<(), TickError> {
        if let Some(args) = self.consumer.pull_input()? {
            let output = self.behavior.call(args);
            self.producer.push_output(output);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::Input;
    use crate::producer::Output;
    use sluice_channel::BroadcastQueue;

    #[test]
    fn source_runs_every_tick() {
        let mut counter = 0u32;
        let mut source = Source::<Output<u32>, _>::new(move || {
            counter += 1;
            counter
        });
        let mut pipe = source.producer().output_pipe();

        source.tick().unwrap();
        source.tick().unwrap();
        assert_eq!(pipe.pop(), Ok(1));
        assert_eq!(pipe.pop(), Ok(2));
    }

    #[test]
    fn transform_skips_ticks_without_input() {
        let upstream = BroadcastQueue::new();
        let mut double = Transform::<Input<i32>, Output<i32>, _>::new(|x: i32| x * 2);
        double.consumer().set_input_pipe(upstream.view());
        let mut pipe = double.producer().output_pipe();

        double.tick().unwrap();
        assert_eq!(pipe.size(), Ok(0));

        upstream.push(21);
        double.tick().unwrap();
        assert_eq!(pipe.pop(), Ok(42));
    }

    #[test]
    fn unconnected_sink_fails_to_tick() {
        let mut sink = Sink::<Input<i32>, _>::new(|_: i32| {});
        let err = sink.tick().unwrap_err();
        assert!(err.is_dangling());
    }
}
