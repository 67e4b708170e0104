use std::cmp::Ordering;

/// Three-way comparison used to order the values of a [`RedBlackTree`].
///
/// Implementations must describe a strict total order. An inconsistent
/// comparison doesn't cause a panic, but the resulting shape of the tree and
/// the results of lookups are unspecified.
///
/// [`RedBlackTree`]: crate::RedBlackTree
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders values by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
