//! Module define the ordering capability injected into [RbTree].
//!
//! [RbTree]: crate::RbTree

use std::cmp::{Ord, Ordering};

/// Three-way comparison over values of type `T`.
///
/// Implementations must be a strict total order and must not change
/// behaviour for the lifetime of the tree they are injected into.
/// Closures of the form `Fn(&T, &T) -> Ordering` implement this trait.
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Natural ordering of `T`, as defined by its [Ord] implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<T> Compare<T> for Natural
where
    T: Ord + ?Sized,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T, F> Compare<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
