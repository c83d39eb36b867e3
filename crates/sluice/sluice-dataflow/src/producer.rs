//! Producer facets: the outputs of a component.
//!
//! Each facet is the sole owner of its [`BroadcastQueue`]s. Anyone can ask for
//! a fresh [`View`] of an output; once the facet (and with it the component)
//! is dropped those views become dangling.

use crate::emit::Emit;
use sluice_channel::{BroadcastQueue, View};
use tracing::trace;

/// A component's output side, accepting a behavior result of type `R`.
pub trait Producer<R> {
    fn push_output(&mut self, output: R);
}

/// A single output pipe.
#[derive(Debug)]
pub struct Output<T> {
    queue: BroadcastQueue<T>,
}

impl<T> Output<T> {
    /// A new view of this output, seeing only what is pushed from now on.
    pub fn output_pipe(&self) -> View<T> {
        self.queue.view()
    }
}

impl<T> Default for Output<T> {
    fn default() -> Self {
        Self {
            queue: BroadcastQueue::new(),
        }
    }
}

impl<T, R: Emit<T>> Producer<R> for Output<T> {
    fn push_output(&mut self, output: R) {
        if let Some(value) = output.into_emission() {
            self.queue.push(value);
        }
    }
}

/// Type-level description of a fixed, heterogeneous output list.
///
/// Implemented for tuples of 2 to 6 element types.
pub trait QueueList {
    /// One queue per position.
    type Queues: Default;
    /// One view per position.
    type Views;

    fn views(queues: &Self::Queues) -> Self::Views;
}

/// Positional routing of a behavior result into a [`QueueList`].
///
/// Each position of `R` independently applies the [`Emit`] rule.
pub trait Route<R>: QueueList {
    fn route(queues: &Self::Queues, output: R);
}

/// Compile-time indexed access to one position of a [`QueueList`].
pub trait QueueAt<const I: usize>: QueueList {
    type Item;

    fn queue_at(queues: &Self::Queues) -> &BroadcastQueue<Self::Item>;
}

/// A fixed list of output pipes, e.g. `Outputs<(i32, f32)>`.
///
/// The behavior returns a tuple; element `i` goes to pipe `i`.
pub struct Outputs<L: QueueList> {
    queues: L::Queues,
}

impl<L: QueueList> Outputs<L> {
    /// A new view of output `I`.
    pub fn output_pipe<const I: usize>(&self) -> View<<L as QueueAt<I>>::Item>
    where
        L: QueueAt<I>,
    {
        L::queue_at(&self.queues).view()
    }

    /// A new view of every output, as a tuple.
    pub fn output_pipes(&self) -> L::Views {
        L::views(&self.queues)
    }
}

impl<L: QueueList> Default for Outputs<L> {
    fn default() -> Self {
        Self {
            queues: L::Queues::default(),
        }
    }
}

impl<L: Route<R>, R> Producer<R> for Outputs<L> {
    fn push_output(&mut self, output: R) {
        L::route(&self.queues, output);
    }
}

macro_rules! queue_list {
    (@at $all:tt $($Sel:ident => $idx:tt),+) => {
        $( queue_list!(@one $all $Sel $idx); )+
    };
    (@one [$($T:ident),+] $Sel:ident $idx:tt) => {
        impl<$($T),+> QueueAt<$idx> for ($($T,)+) {
            type Item = $Sel;

            fn queue_at(queues: &Self::Queues) -> &BroadcastQueue<$Sel> {
                &queues.$idx
            }
        }
    };
    ($($T:ident / $R:ident => $idx:tt),+) => {
        impl<$($T),+> QueueList for ($($T,)+) {
            type Queues = ($(BroadcastQueue<$T>,)+);
            type Views = ($(View<$T>,)+);

            fn views(queues: &Self::Queues) -> Self::Views {
                ($(queues.$idx.view(),)+)
            }
        }

        impl<$($T,)+ $($R: Emit<$T>),+> Route<($($R,)+)> for ($($T,)+) {
            fn route(queues: &Self::Queues, output: ($($R,)+)) {
                $(
                    if let Some(value) = output.$idx.into_emission() {
                        queues.$idx.push(value);
                    }
                )+
            }
        }

        queue_list!(@at [$($T),+] $($T => $idx),+);
    };
}

queue_list!(A / RA => 0, B / RB => 1);
queue_list!(A / RA => 0, B / RB => 1, C / RC => 2);
queue_list!(A / RA => 0, B / RB => 1, C / RC => 2, D / RD => 3);
queue_list!(A / RA => 0, B / RB => 1, C / RC => 2, D / RD => 3, E / RE => 4);
queue_list!(A / RA => 0, B / RB => 1, C / RC => 2, D / RD => 3, E / RE => 4, G / RG => 5);

/// A dynamically sized bus of same-typed output pipes.
///
/// Pipes are created on demand: asking for pipe `i` grows the bus to `i + 1`
/// pipes, so a view can be taken before anything was produced. The behavior
/// returns a `Vec`; element `i` goes to pipe `i`. Pipes past the end of the
/// returned list receive nothing this round.
#[derive(Debug)]
pub struct OutputBus<T> {
    queues: Vec<BroadcastQueue<T>>,
}

impl<T> OutputBus<T> {
    /// A new view of pipe `index`, creating the pipe if needed.
    pub fn output_pipe(&mut self, index: usize) -> View<T> {
        if self.queues.len() <= index {
            self.queues.resize_with(index + 1, BroadcastQueue::new);
        }
        self.queues[index].view()
    }

    /// Number of pipes created so far.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

impl<T> Default for OutputBus<T> {
    fn default() -> Self {
        Self { queues: Vec::new() }
    }
}

impl<T, R: Emit<T>> Producer<Vec<R>> for OutputBus<T> {
    fn push_output(&mut self, outputs: Vec<R>) {
        // Positions without a pipe have no reader that could ever observe them.
        let unrouted = outputs.len().saturating_sub(self.queues.len());
        if unrouted > 0 {
            trace!(unrouted, "output bus values without a pipe discarded");
        }

        for (queue, output) in self.queues.iter().zip(outputs) {
            if let Some(value) = output.into_emission() {
                queue.push(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_output_suppresses_absent_results() {
        let mut output = Output::<i32>::default();
        let mut pipe = output.output_pipe();

        output.push_output(None::<i32>);
        assert_eq!(pipe.size(), Ok(0));

        output.push_output(Some(3i32));
        output.push_output(4i32);
        assert_eq!(pipe.snapshot(), Ok(vec![3, 4]));
        assert_eq!(pipe.pop(), Ok(3));
    }

    #[test]
    fn output_list_routes_positionally() {
        let mut outputs = Outputs::<(i32, &'static str)>::default();
        let mut first = outputs.output_pipe::<0>();
        let mut second = outputs.output_pipe::<1>();

        outputs.push_output((1i32, "one"));
        assert_eq!(first.pop(), Ok(1));
        assert_eq!(second.pop(), Ok("one"));
    }

    #[test]
    fn output_pipes_returns_one_view_per_position() {
        let mut outputs = Outputs::<(u8, u16, u32)>::default();
        let (mut a, b, mut c) = outputs.output_pipes();

        outputs.push_output((1u8, None::<u16>, 3u32));
        assert_eq!(a.pop(), Ok(1));
        assert_eq!(b.size(), Ok(0));
        assert_eq!(c.pop(), Ok(3));
    }

    #[test]
    fn bus_grows_on_demand() {
        let mut bus = OutputBus::<i32>::default();
        assert!(bus.is_empty());

        let mut third = bus.output_pipe(2);
        assert_eq!(bus.len(), 3);

        bus.push_output(vec![1i32, 2, 3, 4]);
        assert_eq!(third.pop(), Ok(3));
    }

    #[test]
    fn short_bus_result_leaves_trailing_pipes_empty() {
        let mut bus = OutputBus::<i32>::default();
        let mut first = bus.output_pipe(0);
        let second = bus.output_pipe(1);

        bus.push_output(vec![Some(1i32)]);
        assert_eq!(first.pop(), Ok(1));
        assert_eq!(second.size(), Ok(0));
    }
}
