//! Total order over keys.
//!
//! The tree only ever asks "is `a` strictly less than `b`". Equality and
//! greater-than are derived from that single question.

use std::cmp::Ordering;

/// Strict-less-than capability used to order keys in [crate::RbTree].
///
/// Implementations must be a consistent total order: irreflexive and
/// transitive, with incomparable keys treated as equal.
pub trait Comparator<K: ?Sized> {
    /// Return whether `a` is strictly less than `b`.
    fn less(&self, a: &K, b: &K) -> bool;

    /// Order `a` against `b`, derived from [Comparator::less].
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Natural ordering for keys implementing [Ord]. Default comparator
/// for [crate::RbTree].
#[derive(Clone, Copy, Debug, Default)]
pub struct Natural;

impl<K> Comparator<K> for Natural
where
    K: Ord + ?Sized,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

impl<K, F> Comparator<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}

#[cfg(test)]
#[path = "order_test.rs"]
mod order_test;
