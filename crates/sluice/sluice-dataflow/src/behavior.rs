/// User logic plugged into a component.
///
/// `Args` is always a tuple: `()` for sources, `(T,)` for a single input,
/// `(A, B, ..)` for a fixed input list (the behavior takes one parameter per
/// position) and `(Vec<T>,)` for an input bus. Implemented for every `FnMut`
/// closure with a matching parameter list.
///
/// Closure parameters must be annotated (`|x: i32| ..`): the expected argument
/// types are selected through this trait, not through an `Fn` bound.
pub trait Behavior<Args> {
    type Output;

    fn call(&mut self, args: Args) -> Self::Output;
}

macro_rules! impl_behavior {
    ($($A:ident),*) => {
        impl<F, R, $($A),*> Behavior<($($A,)*)> for F
        where
            F: FnMut($($A),*) -> R,
        {
            type Output = R;

            #[inline]
            #[allow(non_snake_case)]
            fn call(&mut self, ($($A,)*): ($($A,)*)) -> R {
                (*self)($($A),*)
            }
        }
    };
}

impl_behavior!();
impl_behavior!(A);
impl_behavior!(A, B);
impl_behavior!(A, B, C);
impl_behavior!(A, B, C, D);
impl_behavior!(A, B, C, D, E);
impl_behavior!(A, B, C, D, E, G);
