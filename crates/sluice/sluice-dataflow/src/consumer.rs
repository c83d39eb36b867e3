//! Consumer facets: the inputs of a component.
//!
//! Pulling is always non-blocking. A facet either hands back a complete set of
//! arguments for the behavior or nothing, in which case the component sits the
//! tick out.

use sluice_channel::{View, ViewError};

/// A component's input side.
pub trait Consumer: Default {
    /// Argument tuple handed to the behavior, see [`Behavior`](crate::Behavior).
    type Args;

    /// Attempts to gather one round of inputs without waiting.
    fn pull_input(&mut self) -> Result<Option<Self::Args>, ViewError>;
}

/// A single input pipe.
///
/// Unconnected until [`set_input_pipe`](Self::set_input_pipe) is called;
/// pulling from an unconnected input fails with [`ViewError::Dangling`].
#[derive(Debug)]
pub struct Input<T> {
    pipe: View<T>,
}

impl<T> Input<T> {
    /// Connects the input to another component's output.
    pub fn set_input_pipe(&mut self, pipe: View<T>) {
        self.pipe = pipe;
    }

    pub fn pipe(&self) -> &View<T> {
        &self.pipe
    }
}

impl<T> Default for Input<T> {
    fn default() -> Self {
        Self {
            pipe: View::default(),
        }
    }
}

impl<T: Clone> Consumer for Input<T> {
    type Args = (T,);

    fn pull_input(&mut self) -> Result<Option<(T,)>, ViewError> {
        Ok(self.pipe.try_pop()?.map(|value| (value,)))
    }
}

/// Type-level description of a fixed, heterogeneous input list.
///
/// Implemented for tuples of 2 to 6 element types.
pub trait PipeList {
    /// One view per position.
    type Views: Default;
    /// One value per position.
    type Values;

    fn all_ready(views: &Self::Views) -> Result<bool, ViewError>;

    fn pop_all(views: &mut Self::Views) -> Result<Self::Values, ViewError>;
}

/// A fixed list of input pipes, e.g. `Inputs<(i32, f32)>`.
///
/// Fires only when every pipe holds at least one element; all of them are
/// then popped together. Readiness is checked pipe by pipe, each under its own
/// queue lock. Since nobody else pops from these views, a pipe seen ready stays
/// ready until it is popped here.
pub struct Inputs<L: PipeList> {
    pipes: L::Views,
}

impl<L: PipeList> Inputs<L> {
    /// Connects every position at once.
    pub fn set_input_pipes(&mut self, pipes: L::Views) {
        self.pipes = pipes;
    }
}

impl<L: PipeList> Default for Inputs<L> {
    fn default() -> Self {
        Self {
            pipes: L::Views::default(),
        }
    }
}

impl<L: PipeList> Consumer for Inputs<L> {
    type Args = L::Values;

    fn pull_input(&mut self) -> Result<Option<L::Values>, ViewError> {
        if !L::all_ready(&self.pipes)? {
            return Ok(None);
        }
        L::pop_all(&mut self.pipes).map(Some)
    }
}

macro_rules! pipe_list {
    ($($T:ident => $idx:tt),+) => {
        impl<$($T: Clone),+> PipeList for ($($T,)+) {
            type Views = ($(View<$T>,)+);
            type Values = ($($T,)+);

            fn all_ready(views: &Self::Views) -> Result<bool, ViewError> {
                // Every size is queried so an unconnected pipe is always reported.
                let sizes = [$(views.$idx.size()?),+];
                Ok(sizes.iter().all(|&n| n > 0))
            }

            fn pop_all(views: &mut Self::Views) -> Result<Self::Values, ViewError> {
                Ok(($(views.$idx.pop()?,)+))
            }
        }
    };
}

pipe_list!(A => 0, B => 1);
pipe_list!(A => 0, B => 1, C => 2);
pipe_list!(A => 0, B => 1, C => 2, D => 3);
pipe_list!(A => 0, B => 1, C => 2, D => 3, E => 4);
pipe_list!(A => 0, B => 1, C => 2, D => 3, E => 4, G => 5);

/// A dynamically sized bus of same-typed input pipes.
///
/// Values already popped in an incomplete round are carried over, so a pipe
/// that was ready early is not consumed twice while the others catch up. The
/// round completes once every pipe has contributed; the behavior then gets
/// one value per pipe, in the order the pipes were added.
///
/// A bus with no pipes completes every round with an empty list.
#[derive(Debug)]
pub struct InputBus<T> {
    pipes: Vec<View<T>>,
    pending: Vec<Option<T>>,
}

impl<T> InputBus<T> {
    /// Adds another component's output to the bus.
    pub fn add_input_pipe(&mut self, pipe: View<T>) {
        self.pipes.push(pipe);
        self.pending.push(None);
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }
}

impl<T> Default for InputBus<T> {
    fn default() -> Self {
        Self {
            pipes: Vec::new(),
            pending: Vec::new(),
        }
    }
}

impl<T: Clone> Consumer for InputBus<T> {
    type Args = (Vec<T>,);

    fn pull_input(&mut self) -> Result<Option<(Vec<T>,)>, ViewError> {
        let mut complete = true;
        for (pipe, slot) in self.pipes.iter_mut().zip(self.pending.iter_mut()) {
            if slot.is_none() {
                *slot = pipe.try_pop()?;
            }
            complete &= slot.is_some();
        }

        if !complete {
            return Ok(None);
        }
        let values: Option<Vec<T>> = self.pending.iter_mut().map(Option::take).collect();
        Ok(values.map(|values| (values,)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_channel::BroadcastQueue;

    #[test]
    fn unconnected_input_is_dangling() {
        let mut input = Input::<i32>::default();
        assert_eq!(input.pull_input(), Err(ViewError::Dangling));
    }

    #[test]
    fn single_input_pulls_in_order() {
        let queue = BroadcastQueue::new();
        let mut input = Input::default();
        input.set_input_pipe(queue.view());

        assert_eq!(input.pull_input(), Ok(None));
        queue.push(1);
        queue.push(2);
        assert_eq!(input.pull_input(), Ok(Some((1,))));
        assert_eq!(input.pull_input(), Ok(Some((2,))));
        assert_eq!(input.pull_input(), Ok(None));
    }

    #[test]
    fn input_list_waits_for_every_position() {
        let left = BroadcastQueue::new();
        let right = BroadcastQueue::new();
        let mut inputs = Inputs::<(i32, String)>::default();
        inputs.set_input_pipes((left.view(), right.view()));

        right.push("r".to_string());
        assert_eq!(inputs.pull_input(), Ok(None));

        left.push(7);
        assert_eq!(inputs.pull_input(), Ok(Some((7, "r".to_string()))));
        assert_eq!(inputs.pull_input(), Ok(None));
    }

    #[test]
    fn input_list_reports_a_dangling_position() {
        let left = BroadcastQueue::<i32>::new();
        let mut inputs = Inputs::<(i32, i32)>::default();
        inputs.set_input_pipes((left.view(), View::default()));

        assert_eq!(inputs.pull_input(), Err(ViewError::Dangling));
    }

    #[test]
    fn bus_carries_partial_rounds_over() {
        let a = BroadcastQueue::new();
        let b = BroadcastQueue::new();
        let mut bus = InputBus::default();
        bus.add_input_pipe(a.view());
        bus.add_input_pipe(b.view());

        a.push(1);
        a.push(2);
        assert_eq!(bus.pull_input(), Ok(None));

        // `a` contributed `1` already; its `2` belongs to the next round.
        b.push(10);
        assert_eq!(bus.pull_input(), Ok(Some((vec![1, 10],))));
        assert_eq!(bus.pull_input(), Ok(None));

        b.push(20);
        assert_eq!(bus.pull_input(), Ok(Some((vec![2, 20],))));
    }

    #[test]
    fn empty_bus_completes_with_no_values() {
        let mut bus = InputBus::<u8>::default();
        assert!(bus.is_empty());
        assert_eq!(bus.pull_input(), Ok(Some((vec![],))));
    }
}
