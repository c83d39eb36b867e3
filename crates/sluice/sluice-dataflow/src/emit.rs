/// A behavior's result for one output position.
///
/// Returning `T` always pushes. Returning `Option<T>` pushes only on `Some`;
/// `None` means "produced nothing this round" and leaves the pipe untouched.
///
/// An output whose element type is itself `Option<U>` receives `Option<U>`
/// values through the first impl, so a `None` returned there is delivered as
/// a real element.
pub trait Emit<T> {
    fn into_emission(self) -> Option<T>;
}

impl<T> Emit<T> for T {
    #[inline]
    fn into_emission(self) -> Option<T> {
        Some(self)
    }
}

impl<T> Emit<T> for Option<T> {
    #[inline]
    fn into_emission(self) -> Option<T> {
        self
    }
}
