//! The common operator surface.
//!
//! Every adapter implements [`Sequence`]: a way to produce a begin and an end
//! position. Everything else (counting, folding, indexed access, the chaining
//! constructors) is provided on top of those two methods.

use std::borrow::Borrow;
use std::hash::Hash;

use lazyq_core::{DynPosition, Error, Position, QueryConfig, Result, SharedCursor};
use lazyq_heap::{natural_less, NaturalOrder};

use crate::concat::Concat;
use crate::distinct::Distinct;
use crate::eager;
use crate::filter::{Filter, FilterMap};
use crate::group::Group;
use crate::identity::{Boxed, Id};
use crate::insert::{Append, Prepend};
use crate::join::HashJoin;
use crate::map::Map;
use crate::metrics;
use crate::remove::RemoveFirst;
use crate::reverse::Reverse;
use crate::sort::OrderBy;
use crate::zip::Zip;

/// Element type yielded by a sequence's positions.
pub type ItemOf<S> = <<S as Sequence>::Pos as Position>::Item;

/// A run of elements delimited by a begin and an (exclusive) end position.
///
/// Invariants:
/// - Adapters never mutate their predecessor; chaining consumes the adapter
///   and wraps it.
/// - `begin` can reach `end` in finitely many `advance` calls.
/// - `begin`/`end` may fail: adapters that normalize their begin position
///   (filter, distinct, join) evaluate predecessor elements to find it.
pub trait Sequence: Sized {
    type Pos: Position;

    /// Human-readable adapter name (stable).
    fn name(&self) -> &'static str;

    fn begin(&self) -> Result<Self::Pos>;

    fn end(&self) -> Result<Self::Pos>;

    /// Std iterator over the elements. Each step yields `Result<Item>`; after
    /// the first error the iterator is exhausted.
    fn iter(&self) -> Iter<Self::Pos> {
        Iter::new(self.begin().and_then(|b| Ok((b, self.end()?))))
    }

    /// Number of elements. O(1) when the positions know their distance,
    /// otherwise a full forward pass.
    fn count(&self) -> Result<usize> {
        let (mut cur, end) = (self.begin()?, self.end()?);
        if let Some(n) = cur.distance_to(&end) {
            return Ok(n);
        }
        let mut n = 0;
        while cur != end {
            cur.advance()?;
            n += 1;
        }
        Ok(n)
    }

    fn contains<Q>(&self, value: &Q) -> Result<bool>
    where
        Q: PartialEq + ?Sized,
        ItemOf<Self>: Borrow<Q>,
    {
        self.any(|item| <ItemOf<Self> as Borrow<Q>>::borrow(item) == value)
    }

    fn for_each<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(ItemOf<Self>),
    {
        for item in self.iter() {
            visit(item?);
        }
        Ok(())
    }

    /// Strict left fold.
    fn aggregate<A, F>(&self, seed: A, mut step: F) -> Result<A>
    where
        F: FnMut(A, ItemOf<Self>) -> A,
    {
        let mut acc = seed;
        for item in self.iter() {
            acc = step(acc, item?);
        }
        Ok(acc)
    }

    /// Element `index` steps after begin.
    fn at(&self, index: usize) -> Result<ItemOf<Self>> {
        let (mut cur, end) = (self.begin()?, self.end()?);
        if let Some(len) = cur.distance_to(&end) {
            if index >= len {
                return Err(Error::IndexOutOfRange { index, len });
            }
            cur.advance_by(index)?;
            return cur.get();
        }
        for seen in 0..index {
            if cur == end {
                return Err(Error::IndexOutOfRange { index, len: seen });
            }
            cur.advance()?;
        }
        if cur == end {
            return Err(Error::IndexOutOfRange { index, len: index });
        }
        cur.get()
    }

    /// Like [`Sequence::at`], but `index >= count` yields `default`.
    fn at_or_default(&self, index: usize, default: ItemOf<Self>) -> Result<ItemOf<Self>> {
        match self.at(index) {
            Err(Error::IndexOutOfRange { .. }) => Ok(default),
            other => other,
        }
    }

    fn first(&self) -> Result<ItemOf<Self>> {
        let (begin, end) = (self.begin()?, self.end()?);
        if begin == end {
            return Err(Error::empty("first"));
        }
        begin.get()
    }

    fn first_or_default(&self, default: ItemOf<Self>) -> Result<ItemOf<Self>> {
        match self.first() {
            Err(Error::EmptyCollection { .. }) => Ok(default),
            other => other,
        }
    }

    /// Last element: one step back from end when the positions can retreat,
    /// otherwise a full forward pass.
    fn last(&self) -> Result<ItemOf<Self>> {
        let (begin, end) = (self.begin()?, self.end()?);
        if begin == end {
            return Err(Error::empty("last"));
        }
        let mut back = end.clone();
        match back.retreat() {
            Ok(()) => return back.get(),
            Err(Error::Unsupported { .. }) => {}
            Err(e) => return Err(e),
        }
        let mut cur = begin;
        loop {
            let here = cur.clone();
            cur.advance()?;
            if cur == end {
                return here.get();
            }
        }
    }

    fn last_or_default(&self, default: ItemOf<Self>) -> Result<ItemOf<Self>> {
        match self.last() {
            Err(Error::EmptyCollection { .. }) => Ok(default),
            other => other,
        }
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.begin()? == self.end()?)
    }

    fn all<F>(&self, mut pred: F) -> Result<bool>
    where
        F: FnMut(&ItemOf<Self>) -> bool,
    {
        for item in self.iter() {
            if !pred(&item?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn any<F>(&self, mut pred: F) -> Result<bool>
    where
        F: FnMut(&ItemOf<Self>) -> bool,
    {
        for item in self.iter() {
            if pred(&item?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Bulk copy into any collection buildable from the elements.
    fn to_container<C>(&self) -> Result<C>
    where
        C: FromIterator<ItemOf<Self>>,
    {
        self.iter().collect()
    }

    fn to_vec(&self) -> Result<Vec<ItemOf<Self>>> {
        self.to_container()
    }

    /// Erase the position type so differently-built chains share one type.
    fn boxed<'a>(self) -> Result<Boxed<'a, ItemOf<Self>>>
    where
        Self::Pos: 'a,
    {
        let (begin, end) = DynPosition::pair(self.begin()?, self.end()?);
        Ok(Id::from_positions(begin, end))
    }

    // ---- stateless adapters ----

    fn filter<F>(self, pred: F) -> Filter<Self, F>
    where
        F: Fn(&ItemOf<Self>) -> bool,
    {
        Filter::new(self, pred)
    }

    /// Project every element to an `Option` and keep the `Some`s.
    fn filter_map<U, F>(self, f: F) -> FilterMap<Self, F>
    where
        F: Fn(ItemOf<Self>) -> Option<U>,
        U: Clone,
    {
        FilterMap::new(self, f)
    }

    #[doc(alias = "select")]
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(ItemOf<Self>) -> U,
    {
        Map::new(self, f)
    }

    fn concat<S2>(self, other: S2) -> Concat<Self, S2>
    where
        S2: Sequence,
        S2::Pos: Position<Item = ItemOf<Self>>,
    {
        Concat::new(self, other)
    }

    fn append(self, value: ItemOf<Self>) -> Append<Self>
    where
        ItemOf<Self>: Clone,
    {
        Append::new(self, value)
    }

    fn prepend(self, value: ItemOf<Self>) -> Prepend<Self>
    where
        ItemOf<Self>: Clone,
    {
        Prepend::new(self, value)
    }

    fn reverse(self) -> Reverse<Self> {
        Reverse::new(self)
    }

    /// Drop the first element equal to `value`; later equal elements stay.
    fn remove_first(self, value: ItemOf<Self>) -> RemoveFirst<Self>
    where
        ItemOf<Self>: PartialEq,
    {
        RemoveFirst::new(self, value)
    }

    /// Drop every element that occurs in `other`. `other` is read once, now.
    fn remove_all<S2>(self, other: S2) -> Result<Filter<Self, impl Fn(&ItemOf<Self>) -> bool>>
    where
        S2: Sequence,
        S2::Pos: Position<Item = ItemOf<Self>>,
        ItemOf<Self>: PartialEq,
    {
        let excluded = other.to_vec()?;
        metrics::split("remove_all", excluded.len());
        Ok(self.filter(move |item| !excluded.contains(item)))
    }

    // ---- stateful adapters ----

    fn distinct(self) -> Distinct<Self>
    where
        ItemOf<Self>: Ord + Clone,
    {
        Distinct::new(self)
    }

    /// Elements of `self` then `other`, each equality class once.
    fn set_union<S2>(self, other: S2) -> Distinct<Concat<Self, S2>>
    where
        S2: Sequence,
        S2::Pos: Position<Item = ItemOf<Self>>,
        ItemOf<Self>: Ord + Clone,
    {
        self.concat(other).distinct()
    }

    /// Stable sort by the elements' own `<`.
    fn order_by(self) -> OrderBy<Self, NaturalOrder<ItemOf<Self>>>
    where
        ItemOf<Self>: PartialOrd + Clone,
    {
        self.order_by_with(natural_less as NaturalOrder<ItemOf<Self>>)
    }

    /// Stable sort by a strict-weak-order "less than".
    fn order_by_with<C>(self, less: C) -> OrderBy<Self, C>
    where
        C: Fn(&ItemOf<Self>, &ItemOf<Self>) -> bool,
        ItemOf<Self>: Clone,
    {
        OrderBy::with_config(self, less, QueryConfig::current())
    }

    /// One output per distinct key, in first-seen key order: `acc` applied to
    /// the key's bucket.
    fn group<K, Out, KF, AF>(self, key: KF, acc: AF) -> Group<Self, KF, AF, Out>
    where
        KF: Fn(&ItemOf<Self>) -> K,
        AF: Fn(&[ItemOf<Self>]) -> Out,
        K: Hash + Eq,
        Out: Clone,
    {
        Group::with_config(self, key, acc, QueryConfig::current())
    }

    /// Equality inner join against `right`, indexed by `key_right`.
    fn join<S2, K, Out, KL, KR, CF>(
        self,
        right: S2,
        key_left: KL,
        key_right: KR,
        combine: CF,
    ) -> HashJoin<Self, S2, K, KL, KR, CF>
    where
        S2: Sequence,
        ItemOf<S2>: Clone,
        KL: Fn(&ItemOf<Self>) -> K,
        KR: Fn(&ItemOf<S2>) -> K,
        K: Hash + Eq,
        CF: Fn(ItemOf<Self>, ItemOf<S2>) -> Out,
    {
        HashJoin::with_config(
            self,
            right,
            key_left,
            key_right,
            combine,
            QueryConfig::current(),
        )
    }

    /// Lock-step pairs; as long as the shorter input.
    #[allow(clippy::type_complexity)]
    fn zip<S2>(
        self,
        other: S2,
    ) -> Zip<Self, S2, fn(ItemOf<Self>, ItemOf<S2>) -> (ItemOf<Self>, ItemOf<S2>)>
    where
        S2: Sequence,
    {
        let pair: fn(ItemOf<Self>, ItemOf<S2>) -> (ItemOf<Self>, ItemOf<S2>) = |a, b| (a, b);
        Zip::new(self, other, pair)
    }

    fn zip_with<S2, Out, F>(self, other: S2, combine: F) -> Zip<Self, S2, F>
    where
        S2: Sequence,
        F: Fn(ItemOf<Self>, ItemOf<S2>) -> Out,
    {
        Zip::new(self, other, combine)
    }

    // ---- eager adapters: evaluated at the call site ----

    /// The first `n` elements (all of them if there are fewer).
    fn take(self, n: usize) -> Result<Id<Self::Pos>> {
        eager::take(&self, n)
    }

    /// Everything after the first `n` elements (nothing if there are fewer).
    fn skip(self, n: usize) -> Result<Id<Self::Pos>> {
        eager::skip(&self, n)
    }

    fn take_while<F>(self, pred: F) -> Result<Id<Self::Pos>>
    where
        F: FnMut(&ItemOf<Self>) -> bool,
    {
        eager::take_while(&self, pred)
    }

    fn skip_while<F>(self, pred: F) -> Result<Id<Self::Pos>>
    where
        F: FnMut(&ItemOf<Self>) -> bool,
    {
        eager::skip_while(&self, pred)
    }

    /// Concatenate the inner sequences into fresh storage.
    fn flatten(self) -> Result<Id<SharedCursor<<ItemOf<Self> as IntoIterator>::Item>>>
    where
        ItemOf<Self>: IntoIterator,
        <ItemOf<Self> as IntoIterator>::Item: Clone,
    {
        eager::flatten(&self)
    }

    /// `map(f)` then `flatten()`.
    fn select_many<U, F>(self, f: F) -> Result<Id<SharedCursor<U::Item>>>
    where
        F: Fn(ItemOf<Self>) -> U,
        U: IntoIterator,
        U::Item: Clone,
    {
        self.map(f).flatten()
    }
}

/// Iterator adapter returned by [`Sequence::iter`].
pub struct Iter<P> {
    state: IterState<P>,
}

enum IterState<P> {
    Walking { cur: P, end: P },
    Failed(Error),
    Done,
}

impl<P> Iter<P> {
    fn new(bounds: Result<(P, P)>) -> Self {
        let state = match bounds {
            Ok((cur, end)) => IterState::Walking { cur, end },
            Err(e) => IterState::Failed(e),
        };
        Self { state }
    }
}

impl<P: Position> Iterator for Iter<P> {
    type Item = Result<P::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, IterState::Done) {
            IterState::Done => None,
            IterState::Failed(e) => Some(Err(e)),
            IterState::Walking { mut cur, end } => {
                if cur == end {
                    return None;
                }
                let item = match cur.get() {
                    Ok(item) => item,
                    Err(e) => return Some(Err(e)),
                };
                self.state = match cur.advance() {
                    Ok(()) => IterState::Walking { cur, end },
                    Err(e) => IterState::Failed(e),
                };
                Some(Ok(item))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::from;

    #[test]
    fn surface_over_a_slice() {
        let data = vec![3, 1, 4, 1, 5];
        let seq = from(&data);
        assert_eq!(seq.count().unwrap(), 5);
        assert!(seq.contains(&4).unwrap());
        assert!(!seq.contains(&9).unwrap());
        assert_eq!(seq.aggregate(0, |acc, x| acc + x).unwrap(), 14);
        assert_eq!(*seq.at(2).unwrap(), 4);
        assert_eq!(*seq.first().unwrap(), 3);
        assert_eq!(*seq.last().unwrap(), 5);
        assert!(seq.all(|x| **x > 0).unwrap());
        assert!(seq.any(|x| **x == 5).unwrap());
        assert!(!seq.is_empty().unwrap());
    }

    #[test]
    fn at_reports_the_walked_length() {
        let data = vec![1, 2, 3];
        assert_eq!(
            from(&data).at(3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        let odd = from(&data).filter(|x| **x % 2 == 1);
        assert_eq!(odd.at(5), Err(Error::IndexOutOfRange { index: 5, len: 2 }));
    }

    #[test]
    fn at_or_default_uses_a_strict_bound() {
        let data = vec![10, 20];
        let seq = from(&data).map(|x| *x);
        assert_eq!(seq.at_or_default(1, -1).unwrap(), 20);
        assert_eq!(seq.at_or_default(2, -1).unwrap(), -1);
    }

    #[test]
    fn empty_sequences_fail_first_and_last() {
        let data: Vec<i32> = Vec::new();
        let seq = from(&data);
        assert_eq!(seq.first(), Err(Error::empty("first")));
        assert_eq!(seq.last(), Err(Error::empty("last")));
        assert_eq!(*seq.first_or_default(&7).unwrap(), 7);
        assert_eq!(*seq.last_or_default(&8).unwrap(), 8);
        assert!(seq.is_empty().unwrap());
    }

    #[test]
    fn last_falls_back_to_a_forward_pass() {
        let data = vec![1, 2, 3, 4];
        let mapped = from(&data).map(|x| x * 10);
        assert_eq!(mapped.last().unwrap(), 40);
    }

    #[test]
    fn to_container_collects_any_shape() {
        use std::collections::BTreeSet;
        let data = vec![2, 1, 2, 3];
        let set: BTreeSet<i32> = from(&data).map(|x| *x).to_container().unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn for_each_visits_in_order() {
        let data = vec!["a", "b", "c"];
        let mut out = String::new();
        from(&data).for_each(|s| out.push_str(s)).unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn remove_all_snapshots_the_other_sequence() {
        let data = vec![1, 2, 3, 4, 2, 5];
        let drop = vec![2, 5];
        let kept = from(&data).remove_all(from(&drop)).unwrap();
        assert_eq!(kept.to_vec().unwrap(), vec![&1, &3, &4]);
    }
}
