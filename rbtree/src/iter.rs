use core::fmt;
use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use crate::compare::{Compare, Natural};
use crate::node::NodeId;
use crate::tree::RedBlackTree;

/// In-order iterator over the values of a [`RedBlackTree`].
pub struct Iter<'a, T, C = Natural> {
    tree: &'a RedBlackTree<T, C>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<T, C> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        self.remaining -= 1;
        self.front = self.tree.nodes.successor(node);
        Some(self.tree.nodes.value(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, C> DoubleEndedIterator for Iter<'_, T, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        self.remaining -= 1;
        self.back = self.tree.nodes.predecessor(node);
        Some(self.tree.nodes.value(node))
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> {}

impl<T, C> FusedIterator for Iter<'_, T, C> {}

/// Iterator over the values of a [`RedBlackTree`] inside a range, in order.
pub struct Range<'a, T, C, R> {
    tree: &'a RedBlackTree<T, C>,
    next: Option<NodeId>,
    bounds: R,
}

impl<'a, T, C, R> Iterator for Range<'a, T, C, R>
where
    C: Compare<T>,
    R: RangeBounds<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        let value = self.tree.nodes.value(node);
        let below_end = match self.bounds.end_bound() {
            Bound::Included(end) => self.tree.cmp.compare(value, end) != Ordering::Greater,
            Bound::Excluded(end) => self.tree.cmp.compare(value, end) == Ordering::Less,
            Bound::Unbounded => true,
        };
        if !below_end {
            self.next = None;
            return None;
        }

        self.next = self.tree.nodes.successor(node);
        Some(value)
    }
}

impl<T, C, R> FusedIterator for Range<'_, T, C, R>
where
    C: Compare<T>,
    R: RangeBounds<T>,
{
}

impl<T, C> RedBlackTree<T, C> {
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            tree: self,
            front: self.min().map(|n| n.id()),
            back: self.max().map(|n| n.id()),
            remaining: self.len(),
        }
    }
}

impl<T, C: Compare<T>> RedBlackTree<T, C> {
    /// Iterates over the values inside `bounds` in order.
    ///
    /// Walks from the first value inside the range using successors, so the
    /// cost is `O(log n + k)` for `k` returned values.
    pub fn range<R>(&self, bounds: R) -> Range<'_, T, C, R>
    where
        R: RangeBounds<T>,
    {
        let next = match bounds.start_bound() {
            Bound::Included(start) => self.bound_raw(start, |ord| ord != Ordering::Less),
            Bound::Excluded(start) => self.bound_raw(start, |ord| ord == Ordering::Greater),
            Bound::Unbounded => self.min().map(|n| n.id()),
        };
        Range {
            tree: self,
            next,
            bounds,
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RedBlackTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
