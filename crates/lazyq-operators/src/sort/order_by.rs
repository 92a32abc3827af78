//! Order-by: lazy stable sort over a persistent pairing heap.
//!
//! On first use a position scans its predecessor once, inserting every element
//! into a heap; dereference reads the heap minimum and advance swaps in the
//! heap returned by `delete_min`. Heaps are persistent, so copying a position
//! is O(1) and advancing a copy never moves the original.
//!
//! Forward-only.

use std::rc::Rc;

use once_cell::unsync::OnceCell;

use lazyq_core::{Error, Position, QueryConfig, Result};
use lazyq_heap::PairingHeap;

use crate::metrics;
use crate::traits::{ItemOf, Sequence};

pub struct OrderBy<S: Sequence, C> {
    inner: S,
    less: Rc<C>,
    /// Heap built at construction under `Materialization::AtConstruction`.
    prebuilt: Option<Result<PairingHeap<ItemOf<S>, C>>>,
}

impl<S, C> OrderBy<S, C>
where
    S: Sequence,
    ItemOf<S>: Clone,
    C: Fn(&ItemOf<S>, &ItemOf<S>) -> bool,
{
    pub fn new(inner: S, less: C) -> Self {
        Self::with_config(inner, less, &QueryConfig::default())
    }

    pub fn with_config(inner: S, less: C, config: &QueryConfig) -> Self {
        let less = Rc::new(less);
        let prebuilt = config.is_eager().then(|| {
            let (begin, end) = (inner.begin()?, inner.end()?);
            build_heap(&begin, &end, &less)
        });
        Self {
            inner,
            less,
            prebuilt,
        }
    }
}

fn build_heap<P, C>(begin: &P, end: &P, less: &Rc<C>) -> Result<PairingHeap<P::Item, C>>
where
    P: Position,
    P::Item: Clone,
    C: Fn(&P::Item, &P::Item) -> bool,
{
    let mut heap = PairingHeap::with_shared_comparator(Rc::clone(less));
    let mut cur = begin.clone();
    while cur != *end {
        heap = heap.insert(cur.get()?);
        cur.advance()?;
    }
    metrics::materialized("order_by", heap.len(), heap.len());
    Ok(heap)
}

pub struct OrderByPos<P: Position, C> {
    /// Predecessor range, scanned when `heap` is first needed.
    source: Rc<(P, P)>,
    less: Rc<C>,
    heap: OnceCell<PairingHeap<P::Item, C>>,
}

impl<P, C> OrderByPos<P, C>
where
    P: Position,
    P::Item: Clone,
    C: Fn(&P::Item, &P::Item) -> bool,
{
    fn heap(&self) -> Result<&PairingHeap<P::Item, C>> {
        self.heap
            .get_or_try_init(|| build_heap(&self.source.0, &self.source.1, &self.less))
    }

    /// Elements left to yield.
    pub fn remaining(&self) -> Result<usize> {
        Ok(self.heap()?.len())
    }
}

impl<P: Position, C> Clone for OrderByPos<P, C> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            less: Rc::clone(&self.less),
            heap: self.heap.clone(),
        }
    }
}

/// Positions of one sort are equal when they have the same number of
/// elements left. A position whose scan fails equals nothing.
impl<P, C> PartialEq for OrderByPos<P, C>
where
    P: Position,
    P::Item: Clone,
    C: Fn(&P::Item, &P::Item) -> bool,
{
    fn eq(&self, other: &Self) -> bool {
        matches!((self.remaining(), other.remaining()), (Ok(a), Ok(b)) if a == b)
    }
}

impl<P, C> Position for OrderByPos<P, C>
where
    P: Position,
    P::Item: Clone,
    C: Fn(&P::Item, &P::Item) -> bool,
{
    type Item = P::Item;

    fn name(&self) -> &'static str {
        "order_by"
    }

    fn get(&self) -> Result<P::Item> {
        match self.heap()?.find_min() {
            Ok(min) => Ok(min.clone()),
            Err(Error::EmptyCollection { .. }) => Err(Error::exhausted("get")),
            Err(e) => Err(e),
        }
    }

    fn advance(&mut self) -> Result<()> {
        let heap = self.heap()?;
        if heap.is_empty() {
            return Err(Error::exhausted("advance"));
        }
        let rest = heap.delete_min()?;
        self.heap = OnceCell::from(rest);
        Ok(())
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        let (here, there) = (self.remaining().ok()?, other.remaining().ok()?);
        here.checked_sub(there)
    }
}

impl<S, C> Sequence for OrderBy<S, C>
where
    S: Sequence,
    ItemOf<S>: Clone,
    C: Fn(&ItemOf<S>, &ItemOf<S>) -> bool,
{
    type Pos = OrderByPos<S::Pos, C>;

    fn name(&self) -> &'static str {
        "order_by"
    }

    fn begin(&self) -> Result<Self::Pos> {
        let heap = match &self.prebuilt {
            Some(Ok(heap)) => OnceCell::from(heap.clone()),
            Some(Err(e)) => return Err(e.clone()),
            None => OnceCell::new(),
        };
        Ok(OrderByPos {
            source: Rc::new((self.inner.begin()?, self.inner.end()?)),
            less: Rc::clone(&self.less),
            heap,
        })
    }

    /// The end position is born exhausted: an empty heap over an empty range.
    fn end(&self) -> Result<Self::Pos> {
        let end = self.inner.end()?;
        Ok(OrderByPos {
            source: Rc::new((end.clone(), end)),
            less: Rc::clone(&self.less),
            heap: OnceCell::from(PairingHeap::with_shared_comparator(Rc::clone(&self.less))),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::identity::from;
    use lazyq_core::Materialization;

    #[test]
    fn sorts_with_the_natural_order() {
        let data = vec![5, 3, 8, 1, 9, 2];
        let sorted = from(&data).order_by();
        assert_eq!(sorted.to_vec().unwrap(), vec![&1, &2, &3, &5, &8, &9]);
        assert_eq!(sorted.count().unwrap(), 6);
        assert_eq!(*sorted.first().unwrap(), 1);
    }

    #[test]
    fn equal_keys_keep_their_input_order() {
        let people = vec![("ann", 30), ("bob", 25), ("cat", 30), ("dan", 25)];
        let by_age = from(&people).order_by_with(|a, b| a.1 < b.1);
        let names: Vec<&str> = by_age.to_vec().unwrap().iter().map(|p| p.0).collect();
        assert_eq!(names, vec!["bob", "dan", "ann", "cat"]);
    }

    #[test]
    fn custom_comparator_reverses_the_order() {
        let data = vec![1, 3, 2];
        let desc = from(&data).order_by_with(|a, b| a > b);
        assert_eq!(desc.to_vec().unwrap(), vec![&3, &2, &1]);
    }

    #[test]
    fn nothing_runs_until_first_use() {
        let data = vec![3, 1, 2];
        let calls = Cell::new(0);
        let seq = from(&data)
            .map(|x| {
                calls.set(calls.get() + 1);
                *x
            })
            .order_by();
        let pos = seq.begin().unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(pos.get().unwrap(), 1);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn eager_config_scans_at_construction() {
        let data = vec![3, 1, 2];
        let calls = Cell::new(0);
        let config = QueryConfig::default().with_materialization(Materialization::AtConstruction);
        let seq = OrderBy::with_config(
            from(&data).map(|x| {
                calls.set(calls.get() + 1);
                *x
            }),
            |a: &i32, b: &i32| a < b,
            &config,
        );
        assert_eq!(calls.get(), 3);
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn copies_are_independent() {
        let data = vec![4, 2, 6];
        let seq = from(&data).order_by();
        let mut a = seq.begin().unwrap();
        let b = a.clone();
        a.advance().unwrap();
        assert_eq!(*a.get().unwrap(), 4);
        assert_eq!(*b.get().unwrap(), 2);
        assert_eq!(b.remaining().unwrap(), 3);
    }

    #[test]
    fn order_by_is_forward_only_and_bounded() {
        let data = vec![1];
        let seq = from(&data).order_by();
        let mut end = seq.end().unwrap();
        assert_eq!(end.get(), Err(Error::exhausted("get")));
        assert_eq!(end.advance(), Err(Error::exhausted("advance")));
        assert_eq!(end.retreat(), Err(Error::unsupported("retreat", "order_by")));
        assert!(from(&Vec::<i32>::new()).order_by().is_empty().unwrap());
    }
}
