//! Group: one output per distinct key, in first-seen key order.
//!
//! On first use a position scans its predecessor once, bucketing elements by
//! key (a bucket's slot is fixed when its key is first seen), then applies the
//! accumulator to every bucket. Every position cut from one `Group` shares a
//! single lazily built table, so the callables run once per adapter.
//!
//! Group positions index into that table, so they are bidirectional and random
//! access whatever the predecessor supports.

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use lazyq_core::{Error, Position, QueryConfig, Result};

use crate::metrics;
use crate::traits::{ItemOf, Sequence};

pub struct Group<S, KF, AF, Out> {
    inner: S,
    key: Rc<KF>,
    acc: Rc<AF>,
    capacity: Option<usize>,
    table: Rc<OnceCell<Rc<Vec<Out>>>>,
    failed: Option<Error>,
}

impl<S, K, KF, AF, Out> Group<S, KF, AF, Out>
where
    S: Sequence,
    KF: Fn(&ItemOf<S>) -> K,
    AF: Fn(&[ItemOf<S>]) -> Out,
    K: Hash + Eq,
{
    pub fn new(inner: S, key: KF, acc: AF) -> Self {
        Self::with_config(inner, key, acc, &QueryConfig::default())
    }

    pub fn with_config(inner: S, key: KF, acc: AF, config: &QueryConfig) -> Self {
        let mut group = Self {
            inner,
            key: Rc::new(key),
            acc: Rc::new(acc),
            capacity: config.index_capacity_hint,
            table: Rc::new(OnceCell::new()),
            failed: None,
        };
        if config.is_eager() {
            match group.source().and_then(|src| src.table()) {
                Ok(table) => {
                    let _ = group.table.set(table);
                }
                Err(e) => group.failed = Some(e),
            }
        }
        group
    }

    fn source(&self) -> Result<Rc<Source<S::Pos, KF, AF>>> {
        Ok(Rc::new(Source {
            begin: self.inner.begin()?,
            end: self.inner.end()?,
            key: Rc::clone(&self.key),
            acc: Rc::clone(&self.acc),
            capacity: self.capacity,
        }))
    }
}

/// What a position needs to build the table on its own.
struct Source<P, KF, AF> {
    begin: P,
    end: P,
    key: Rc<KF>,
    acc: Rc<AF>,
    capacity: Option<usize>,
}

impl<P, K, KF, AF, Out> Source<P, KF, AF>
where
    P: Position,
    KF: Fn(&P::Item) -> K,
    AF: Fn(&[P::Item]) -> Out,
    K: Hash + Eq,
{
    fn table(&self) -> Result<Rc<Vec<Out>>> {
        let mut slots: HashMap<K, usize> = HashMap::with_capacity(self.capacity.unwrap_or(0));
        let mut buckets: Vec<Vec<P::Item>> = Vec::new();
        let mut cur = self.begin.clone();
        let mut inputs = 0;
        while cur != self.end {
            let item = cur.get()?;
            let slot = *slots.entry((self.key)(&item)).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[slot].push(item);
            cur.advance()?;
            inputs += 1;
        }
        let table: Vec<Out> = buckets.iter().map(|b| (self.acc)(b.as_slice())).collect();
        metrics::materialized("group", inputs, table.len());
        Ok(Rc::new(table))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    At(usize),
    /// One past the last group; resolved against the table length on demand.
    End,
}

pub struct GroupPos<P, KF, AF, Out> {
    source: Rc<Source<P, KF, AF>>,
    table: Rc<OnceCell<Rc<Vec<Out>>>>,
    slot: Slot,
}

impl<P, K, KF, AF, Out> GroupPos<P, KF, AF, Out>
where
    P: Position,
    KF: Fn(&P::Item) -> K,
    AF: Fn(&[P::Item]) -> Out,
    K: Hash + Eq,
{
    fn table(&self) -> Result<&Rc<Vec<Out>>> {
        self.table.get_or_try_init(|| self.source.table())
    }

    fn index(&self) -> Result<usize> {
        match self.slot {
            Slot::At(i) => Ok(i),
            Slot::End => Ok(self.table()?.len()),
        }
    }

    fn is_at(&self, i: usize) -> bool {
        matches!(self.table(), Ok(t) if t.len() == i)
    }
}

impl<P, KF, AF, Out> Clone for GroupPos<P, KF, AF, Out> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            table: Rc::clone(&self.table),
            slot: self.slot,
        }
    }
}

impl<P, K, KF, AF, Out> PartialEq for GroupPos<P, KF, AF, Out>
where
    P: Position,
    KF: Fn(&P::Item) -> K,
    AF: Fn(&[P::Item]) -> Out,
    K: Hash + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self.slot, other.slot) {
            (Slot::At(a), Slot::At(b)) => a == b,
            (Slot::End, Slot::End) => true,
            (Slot::At(i), Slot::End) => self.is_at(i),
            (Slot::End, Slot::At(i)) => other.is_at(i),
        }
    }
}

impl<P, K, KF, AF, Out> Position for GroupPos<P, KF, AF, Out>
where
    P: Position,
    KF: Fn(&P::Item) -> K,
    AF: Fn(&[P::Item]) -> Out,
    K: Hash + Eq,
    Out: Clone,
{
    type Item = Out;

    fn name(&self) -> &'static str {
        "group"
    }

    fn get(&self) -> Result<Out> {
        let Slot::At(i) = self.slot else {
            return Err(Error::exhausted("get"));
        };
        self.table()?
            .get(i)
            .cloned()
            .ok_or_else(|| Error::exhausted("get"))
    }

    fn advance(&mut self) -> Result<()> {
        self.advance_by(1)
    }

    fn retreat(&mut self) -> Result<()> {
        match self.index()? {
            0 => Err(Error::exhausted("retreat")),
            i => {
                self.slot = Slot::At(i - 1);
                Ok(())
            }
        }
    }

    fn advance_by(&mut self, n: usize) -> Result<()> {
        let len = self.table()?.len();
        match self.index()?.checked_add(n) {
            Some(next) if next <= len => {
                self.slot = Slot::At(next);
                Ok(())
            }
            _ => Err(Error::exhausted("advance")),
        }
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        let (here, there) = (self.index().ok()?, other.index().ok()?);
        there.checked_sub(here)
    }
}

impl<S, K, KF, AF, Out> Sequence for Group<S, KF, AF, Out>
where
    S: Sequence,
    KF: Fn(&ItemOf<S>) -> K,
    AF: Fn(&[ItemOf<S>]) -> Out,
    K: Hash + Eq,
    Out: Clone,
{
    type Pos = GroupPos<S::Pos, KF, AF, Out>;

    fn name(&self) -> &'static str {
        "group"
    }

    fn begin(&self) -> Result<Self::Pos> {
        self.position(Slot::At(0))
    }

    fn end(&self) -> Result<Self::Pos> {
        self.position(Slot::End)
    }
}

impl<S, K, KF, AF, Out> Group<S, KF, AF, Out>
where
    S: Sequence,
    KF: Fn(&ItemOf<S>) -> K,
    AF: Fn(&[ItemOf<S>]) -> Out,
    K: Hash + Eq,
{
    fn position(&self, slot: Slot) -> Result<GroupPos<S::Pos, KF, AF, Out>> {
        if let Some(e) = &self.failed {
            return Err(e.clone());
        }
        Ok(GroupPos {
            source: self.source()?,
            table: Rc::clone(&self.table),
            slot,
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
    fn one_output_per_key_in_first_seen_order() {
        let words = vec!["apple", "bob", "avocado", "cat", "banana", "cherry"];
        let counts = from(&words).group(
            |w| w.chars().next(),
            |bucket| (bucket[0].chars().next(), bucket.len()),
        );
        assert_eq!(
            counts.to_vec().unwrap(),
            vec![(Some('a'), 2), (Some('b'), 2), (Some('c'), 2)]
        );
        assert_eq!(counts.count().unwrap(), 3);
    }

    #[test]
    fn buckets_keep_input_order() {
        let data = vec![(1, 'a'), (2, 'b'), (1, 'c'), (3, 'd'), (2, 'e')];
        let grouped = from(&data).group(
            |p| p.0,
            |bucket| bucket.iter().map(|p| p.1).collect::<String>(),
        );
        assert_eq!(grouped.to_vec().unwrap(), vec!["ac", "be", "d"]);
    }

    #[test]
    fn group_positions_are_bidirectional() {
        let data = vec![1, 2, 3, 4, 5, 6];
        let grouped = from(&data).group(|x| **x % 3, |b| b.iter().copied().sum::<i32>());
        assert_eq!(grouped.last().unwrap(), 9);
        assert_eq!(grouped.at(1).unwrap(), 7);
        let rev = grouped.reverse();
        assert_eq!(rev.to_vec().unwrap(), vec![9, 7, 5]);
    }

    #[test]
    fn end_compares_without_building_its_own_table() {
        let data = vec![1, 1, 2];
        let calls = Cell::new(0);
        let grouped = from(&data).group(
            |x| {
                calls.set(calls.get() + 1);
                **x
            },
            |b| b.len(),
        );
        let (mut cur, end) = (grouped.begin().unwrap(), grouped.end().unwrap());
        assert_eq!(calls.get(), 0);
        let mut sizes = Vec::new();
        while cur != end {
            sizes.push(cur.get().unwrap());
            cur.advance().unwrap();
        }
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn positions_of_one_group_share_the_table() {
        let data = vec![1, 2, 3, 4];
        let calls = Cell::new(0);
        let grouped = from(&data).group(
            |x| {
                calls.set(calls.get() + 1);
                **x % 2
            },
            |b| b.len(),
        );
        assert_eq!(grouped.last().unwrap(), 2);
        assert_eq!(calls.get(), 4);
        assert_eq!(grouped.at(1).unwrap(), 2);
        assert_eq!(grouped.reverse().to_vec().unwrap(), vec![2, 2]);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn empty_input_has_no_groups() {
        let data: Vec<i32> = Vec::new();
        let grouped = from(&data).group(|x| **x, |b| b.len());
        assert!(grouped.is_empty().unwrap());
        assert_eq!(grouped.first(), Err(Error::empty("first")));
    }

    #[test]
    fn stepping_outside_the_table_fails() {
        let data = vec![1];
        let grouped = from(&data).group(|x| **x, |b| b.len());
        let mut end = grouped.end().unwrap();
        assert_eq!(end.advance(), Err(Error::exhausted("advance")));
        let mut begin = grouped.begin().unwrap();
        assert_eq!(begin.retreat(), Err(Error::exhausted("retreat")));
        assert_eq!(end.get(), Err(Error::exhausted("get")));
    }

    #[test]
    fn eager_config_builds_once() {
        let data = vec![1, 2, 1];
        let calls = Cell::new(0);
        let config = QueryConfig::default()
            .with_materialization(Materialization::AtConstruction);
        let grouped = Group::with_config(
            from(&data),
            |x: &&i32| {
                calls.set(calls.get() + 1);
                **x
            },
            |b: &[&i32]| b.len(),
            &config,
        );
        assert_eq!(calls.get(), 3);
        assert_eq!(grouped.to_vec().unwrap(), vec![2, 1]);
        assert_eq!(grouped.count().unwrap(), 2);
        assert_eq!(calls.get(), 3);
    }
}
