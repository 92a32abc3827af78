//! Distinct: first occurrence of each element, in first-seen order.
//!
//! Each position carries the ordered set of elements it has already yielded.
//! The set is shared between copies and cloned on the first insert after a
//! copy, so copies advance independently. Forward-only.

use std::collections::BTreeSet;
use std::rc::Rc;

use lazyq_core::{Position, Result};

use crate::traits::{ItemOf, Sequence};

pub struct Distinct<S> {
    inner: S,
}

impl<S> Distinct<S>
where
    S: Sequence,
    ItemOf<S>: Ord + Clone,
{
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

pub struct DistinctPos<P: Position> {
    cur: P,
    end: Rc<P>,
    seen: Rc<BTreeSet<P::Item>>,
}

impl<P> DistinctPos<P>
where
    P: Position,
    P::Item: Ord + Clone,
{
    /// Skip elements already yielded, then record the one under the cursor.
    fn settle(&mut self) -> Result<()> {
        while self.cur != *self.end {
            let item = self.cur.get()?;
            if !self.seen.contains(&item) {
                Rc::make_mut(&mut self.seen).insert(item);
                break;
            }
            self.cur.advance()?;
        }
        Ok(())
    }
}

impl<P: Position> Clone for DistinctPos<P> {
    fn clone(&self) -> Self {
        Self {
            cur: self.cur.clone(),
            end: Rc::clone(&self.end),
            seen: Rc::clone(&self.seen),
        }
    }
}

impl<P: Position> PartialEq for DistinctPos<P> {
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur
    }
}

impl<P> Position for DistinctPos<P>
where
    P: Position,
    P::Item: Ord + Clone,
{
    type Item = P::Item;

    fn name(&self) -> &'static str {
        "distinct"
    }

    fn get(&self) -> Result<P::Item> {
        self.cur.get()
    }

    fn advance(&mut self) -> Result<()> {
        self.cur.advance()?;
        self.settle()
    }
}

impl<S> Sequence for Distinct<S>
where
    S: Sequence,
    ItemOf<S>: Ord + Clone,
{
    type Pos = DistinctPos<S::Pos>;

    fn name(&self) -> &'static str {
        "distinct"
    }

    fn begin(&self) -> Result<Self::Pos> {
        let mut pos = DistinctPos {
            cur: self.inner.begin()?,
            end: Rc::new(self.inner.end()?),
            seen: Rc::new(BTreeSet::new()),
        };
        pos.settle()?;
        Ok(pos)
    }

    fn end(&self) -> Result<Self::Pos> {
        let end = Rc::new(self.inner.end()?);
        Ok(DistinctPos {
            cur: (*end).clone(),
            end,
            seen: Rc::new(BTreeSet::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::identity::from;
    use crate::traits::Sequence;
    use lazyq_core::{Error, Position};

    #[test]
    fn first_seen_order_without_repeats() {
        let data = vec![3, 1, 3, 2, 1, 3];
        let seq = from(&data).distinct();
        assert_eq!(seq.to_vec().unwrap(), vec![&3, &1, &2]);
        assert_eq!(seq.count().unwrap(), 3);
    }

    #[test]
    fn a_repeat_of_the_first_element_is_dropped() {
        let data = vec![5, 5, 5];
        assert_eq!(from(&data).distinct().to_vec().unwrap(), vec![&5]);
    }

    #[test]
    fn distinct_is_idempotent() {
        let data = vec![1, 2, 1, 4, 2, 4, 9];
        let once = from(&data).distinct().to_vec().unwrap();
        let twice = from(&data).distinct().distinct().to_vec().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn copies_advance_independently() {
        let data = vec![1, 2, 1, 3];
        let seq = from(&data).distinct();
        let mut a = seq.begin().unwrap();
        let mut b = a.clone();
        a.advance().unwrap();
        a.advance().unwrap();
        assert_eq!(*a.get().unwrap(), 3);
        b.advance().unwrap();
        assert_eq!(*b.get().unwrap(), 2);
        b.advance().unwrap();
        assert!(a == b);
    }

    #[test]
    fn set_union_keeps_left_then_new_right() {
        let a = vec![1, 2, 2];
        let b = vec![2, 3, 1, 4];
        let u = from(&a).set_union(from(&b));
        assert_eq!(u.to_vec().unwrap(), vec![&1, &2, &3, &4]);
    }

    #[test]
    fn distinct_is_forward_only() {
        let data = vec![1];
        let mut end = from(&data).distinct().end().unwrap();
        assert_eq!(end.retreat(), Err(Error::unsupported("retreat", "distinct")));
    }
}
