//! Hash join (equality inner join).
//!
//! The right sequence is scanned once into a key -> bucket index, buckets in
//! right-side order. Traversal walks the left sequence; a left element yields
//! one output per element of its key's bucket and left elements without a
//! bucket yield nothing.
//!
//! A position is (left cursor, slot in the current bucket). It is kept on a
//! left element that has matches, or on the left end with slot 0, so equality
//! compares the pair directly. Retreat needs a bidirectional left sequence.
//!
//! Every position cut from one `HashJoin` shares the same lazily built index.

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use lazyq_core::{Error, Position, QueryConfig, Result};

use crate::metrics;
use crate::traits::{ItemOf, Sequence};

type Index<K, R> = HashMap<K, Vec<R>>;

pub struct HashJoin<S: Sequence, S2: Sequence, K, KL, KR, CF> {
    left: S,
    right: S2,
    key_left: Rc<KL>,
    key_right: Rc<KR>,
    combine: Rc<CF>,
    capacity: Option<usize>,
    index: Rc<OnceCell<Rc<Index<K, ItemOf<S2>>>>>,
    failed: Option<Error>,
}

impl<S, S2, K, KL, KR, CF> HashJoin<S, S2, K, KL, KR, CF>
where
    S: Sequence,
    S2: Sequence,
    KR: Fn(&ItemOf<S2>) -> K,
    K: Hash + Eq,
{
    pub fn new(left: S, right: S2, key_left: KL, key_right: KR, combine: CF) -> Self {
        Self::with_config(
            left,
            right,
            key_left,
            key_right,
            combine,
            &QueryConfig::default(),
        )
    }

    pub fn with_config(
        left: S,
        right: S2,
        key_left: KL,
        key_right: KR,
        combine: CF,
        config: &QueryConfig,
    ) -> Self {
        let mut join = Self {
            left,
            right,
            key_left: Rc::new(key_left),
            key_right: Rc::new(key_right),
            combine: Rc::new(combine),
            capacity: config.index_capacity_hint,
            index: Rc::new(OnceCell::new()),
            failed: None,
        };
        if config.is_eager() {
            match join.shared().and_then(|shared| shared.index()) {
                Ok(index) => {
                    let _ = join.index.set(index);
                }
                Err(e) => join.failed = Some(e),
            }
        }
        join
    }

    fn shared(&self) -> Result<Rc<Shared<S::Pos, S2::Pos, KL, KR, CF>>> {
        Ok(Rc::new(Shared {
            left_end: self.left.end()?,
            right_begin: self.right.begin()?,
            right_end: self.right.end()?,
            key_left: Rc::clone(&self.key_left),
            key_right: Rc::clone(&self.key_right),
            combine: Rc::clone(&self.combine),
            capacity: self.capacity,
        }))
    }
}

/// Everything positions of one join share, including what they need to build
/// the index themselves.
struct Shared<PL, PR, KL, KR, CF> {
    left_end: PL,
    right_begin: PR,
    right_end: PR,
    key_left: Rc<KL>,
    key_right: Rc<KR>,
    combine: Rc<CF>,
    capacity: Option<usize>,
}

impl<PL, PR, K, KL, KR, CF> Shared<PL, PR, KL, KR, CF>
where
    PR: Position,
    KR: Fn(&PR::Item) -> K,
    K: Hash + Eq,
{
    fn index(&self) -> Result<Rc<Index<K, PR::Item>>> {
        let mut index: Index<K, PR::Item> = HashMap::with_capacity(self.capacity.unwrap_or(0));
        let mut cur = self.right_begin.clone();
        let mut rows = 0;
        while cur != self.right_end {
            let item = cur.get()?;
            index.entry((self.key_right)(&item)).or_default().push(item);
            cur.advance()?;
            rows += 1;
        }
        metrics::materialized("join", rows, index.len());
        Ok(Rc::new(index))
    }
}

pub struct JoinPos<PL, PR: Position, K, KL, KR, CF> {
    left: PL,
    slot: usize,
    shared: Rc<Shared<PL, PR, KL, KR, CF>>,
    index: Rc<OnceCell<Rc<Index<K, PR::Item>>>>,
}

impl<PL, PR, K, KL, KR, CF, Out> JoinPos<PL, PR, K, KL, KR, CF>
where
    PL: Position,
    PR: Position,
    PR::Item: Clone,
    KL: Fn(&PL::Item) -> K,
    KR: Fn(&PR::Item) -> K,
    K: Hash + Eq,
    CF: Fn(PL::Item, PR::Item) -> Out,
{
    fn index(&self) -> Result<&Rc<Index<K, PR::Item>>> {
        self.index.get_or_try_init(|| self.shared.index())
    }

    /// Number of right elements matching a left element.
    fn matches(&self, left: &PL) -> Result<usize> {
        let key = (self.shared.key_left)(&left.get()?);
        Ok(self.index()?.get(&key).map_or(0, Vec::len))
    }

    fn at_end(&self) -> bool {
        self.left == self.shared.left_end
    }

    /// Move the left cursor forward to the first element with matches.
    fn seek(&mut self) -> Result<()> {
        self.slot = 0;
        while !self.at_end() {
            if self.matches(&self.left)? > 0 {
                break;
            }
            self.left.advance()?;
        }
        Ok(())
    }
}

impl<PL: Clone, PR: Position, K, KL, KR, CF> Clone for JoinPos<PL, PR, K, KL, KR, CF> {
    fn clone(&self) -> Self {
        Self {
            left: self.left.clone(),
            slot: self.slot,
            shared: Rc::clone(&self.shared),
            index: Rc::clone(&self.index),
        }
    }
}

impl<PL: PartialEq, PR: Position, K, KL, KR, CF> PartialEq for JoinPos<PL, PR, K, KL, KR, CF> {
    fn eq(&self, other: &Self) -> bool {
        self.slot == other.slot && self.left == other.left
    }
}

impl<PL, PR, K, KL, KR, CF, Out> Position for JoinPos<PL, PR, K, KL, KR, CF>
where
    PL: Position,
    PR: Position,
    PR::Item: Clone,
    KL: Fn(&PL::Item) -> K,
    KR: Fn(&PR::Item) -> K,
    K: Hash + Eq,
    CF: Fn(PL::Item, PR::Item) -> Out,
{
    type Item = Out;

    fn name(&self) -> &'static str {
        "join"
    }

    fn get(&self) -> Result<Out> {
        if self.at_end() {
            return Err(Error::exhausted("get"));
        }
        let left = self.left.get()?;
        let right = self
            .index()?
            .get(&(self.shared.key_left)(&left))
            .and_then(|bucket| bucket.get(self.slot))
            .cloned()
            .ok_or_else(|| Error::Invariant("join position off its bucket".into()))?;
        Ok((self.shared.combine)(left, right))
    }

    fn advance(&mut self) -> Result<()> {
        if self.at_end() {
            return Err(Error::exhausted("advance"));
        }
        if self.slot + 1 < self.matches(&self.left)? {
            self.slot += 1;
            return Ok(());
        }
        self.left.advance()?;
        self.seek()
    }

    /// Back within the bucket, then back through the left sequence to the
    /// last match of the previous matching left element.
    fn retreat(&mut self) -> Result<()> {
        if self.slot > 0 {
            self.slot -= 1;
            return Ok(());
        }
        let mut left = self.left.clone();
        loop {
            left.retreat()?;
            let n = self.matches(&left)?;
            if n > 0 {
                self.left = left;
                self.slot = n - 1;
                return Ok(());
            }
        }
    }
}

impl<S, S2, K, KL, KR, CF, Out> Sequence for HashJoin<S, S2, K, KL, KR, CF>
where
    S: Sequence,
    S2: Sequence,
    ItemOf<S2>: Clone,
    KL: Fn(&ItemOf<S>) -> K,
    KR: Fn(&ItemOf<S2>) -> K,
    K: Hash + Eq,
    CF: Fn(ItemOf<S>, ItemOf<S2>) -> Out,
{
    type Pos = JoinPos<S::Pos, S2::Pos, K, KL, KR, CF>;

    fn name(&self) -> &'static str {
        "join"
    }

    fn begin(&self) -> Result<Self::Pos> {
        let mut pos = self.position(self.left.begin()?)?;
        pos.seek()?;
        Ok(pos)
    }

    fn end(&self) -> Result<Self::Pos> {
        self.position(self.left.end()?)
    }
}

impl<S, S2, K, KL, KR, CF> HashJoin<S, S2, K, KL, KR, CF>
where
    S: Sequence,
    S2: Sequence,
    KR: Fn(&ItemOf<S2>) -> K,
    K: Hash + Eq,
{
    fn position(&self, left: S::Pos) -> Result<JoinPos<S::Pos, S2::Pos, K, KL, KR, CF>> {
        if let Some(e) = &self.failed {
            return Err(e.clone());
        }
        Ok(JoinPos {
            left,
            slot: 0,
            shared: self.shared()?,
            index: Rc::clone(&self.index),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::identity::from;
    use lazyq_core::Materialization;

    fn people() -> Vec<(u32, &'static str)> {
        vec![(1, "ann"), (2, "bob"), (3, "cat"), (4, "dan")]
    }

    fn orders() -> Vec<(u32, &'static str)> {
        vec![(2, "pen"), (1, "ink"), (2, "pad"), (9, "cup"), (1, "nib")]
    }

    #[test]
    fn inner_join_in_left_order_with_bucket_order() {
        let (p, o) = (people(), orders());
        let joined = from(&p).join(from(&o), |l| l.0, |r| r.0, |l, r| (l.1, r.1));
        assert_eq!(
            joined.to_vec().unwrap(),
            vec![("ann", "ink"), ("ann", "nib"), ("bob", "pen"), ("bob", "pad")]
        );
        assert_eq!(joined.count().unwrap(), 4);
    }

    #[test]
    fn unmatched_left_elements_contribute_nothing() {
        let p = people();
        let none: Vec<(u32, &str)> = vec![(7, "x")];
        let joined = from(&p).join(from(&none), |l| l.0, |r| r.0, |l, r| (l.1, r.1));
        assert!(joined.is_empty().unwrap());
        assert_eq!(joined.first(), Err(Error::empty("first")));
    }

    #[test]
    fn retreat_walks_buckets_backwards() {
        let (p, o) = (people(), orders());
        let joined = from(&p).join(from(&o), |l| l.0, |r| r.0, |l, r| (l.1, r.1));
        assert_eq!(joined.last().unwrap(), ("bob", "pad"));
        let back = joined.reverse().to_vec().unwrap();
        assert_eq!(
            back,
            vec![("bob", "pad"), ("bob", "pen"), ("ann", "nib"), ("ann", "ink")]
        );
    }

    #[test]
    fn retreat_before_the_first_match_fails() {
        let (p, o) = (people(), orders());
        let joined = from(&p).join(from(&o), |l| l.0, |r| r.0, |l, r| (l.1, r.1));
        let mut begin = joined.begin().unwrap();
        assert_eq!(begin.retreat(), Err(Error::exhausted("retreat")));
    }

    #[test]
    fn right_side_is_indexed_on_first_use() {
        let (p, o) = (people(), orders());
        let calls = Cell::new(0);
        let joined = from(&p).join(
            from(&o),
            |l| l.0,
            |r| {
                calls.set(calls.get() + 1);
                r.0
            },
            |l, _| l.1,
        );
        assert_eq!(calls.get(), 0);
        let end = joined.end().unwrap();
        assert_eq!(calls.get(), 0);
        let mut cur = joined.begin().unwrap();
        assert_eq!(calls.get(), 5);
        let mut n = 0;
        while cur != end {
            cur.advance().unwrap();
            n += 1;
        }
        assert_eq!(n, 4);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn reversed_join_indexes_the_right_side_once() {
        let (p, o) = (people(), orders());
        let calls = Cell::new(0);
        let joined = from(&p).join(
            from(&o),
            |l| l.0,
            |r| {
                calls.set(calls.get() + 1);
                r.0
            },
            |l, r| (l.1, r.1),
        );
        assert_eq!(joined.count().unwrap(), 4);
        assert_eq!(calls.get(), 5);
        assert_eq!(joined.last().unwrap(), ("bob", "pad"));
        assert_eq!(joined.reverse().to_vec().unwrap().len(), 4);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn eager_config_indexes_at_construction() {
        let (p, o) = (people(), orders());
        let calls = Cell::new(0);
        let config =
            QueryConfig::default().with_materialization(Materialization::AtConstruction);
        let joined = HashJoin::with_config(
            from(&p),
            from(&o),
            |l: &&(u32, &str)| l.0,
            |r: &&(u32, &str)| {
                calls.set(calls.get() + 1);
                r.0
            },
            |l: &(u32, &str), r: &(u32, &str)| format!("{}:{}", l.1, r.1),
            &config,
        );
        assert_eq!(calls.get(), 5);
        assert_eq!(joined.count().unwrap(), 4);
        assert_eq!(joined.first().unwrap(), "ann:ink");
        assert_eq!(calls.get(), 5);
    }
}
