//! Filter and filter-map: forward-only adapters that skip predecessor
//! positions.
//!
//! Positions are kept normalized: a filter position is either the
//! predecessor's end or sits on an element that passes. That makes position
//! equality plain predecessor equality.

use std::rc::Rc;

use lazyq_core::{Error, Position, Result};

use crate::traits::{ItemOf, Sequence};

pub struct Filter<S, F> {
    inner: S,
    pred: Rc<F>,
}

impl<S, F> Filter<S, F>
where
    S: Sequence,
    F: Fn(&ItemOf<S>) -> bool,
{
    pub fn new(inner: S, pred: F) -> Self {
        Self {
            inner,
            pred: Rc::new(pred),
        }
    }
}

pub struct FilterPos<P, F> {
    cur: P,
    end: Rc<P>,
    pred: Rc<F>,
}

impl<P, F> FilterPos<P, F>
where
    P: Position,
    F: Fn(&P::Item) -> bool,
{
    /// Move forward until an element passes or `end` is reached.
    fn settle(&mut self) -> Result<()> {
        while self.cur != *self.end {
            if (self.pred)(&self.cur.get()?) {
                break;
            }
            self.cur.advance()?;
        }
        Ok(())
    }
}

impl<P: Clone, F> Clone for FilterPos<P, F> {
    fn clone(&self) -> Self {
        Self {
            cur: self.cur.clone(),
            end: Rc::clone(&self.end),
            pred: Rc::clone(&self.pred),
        }
    }
}

impl<P: PartialEq, F> PartialEq for FilterPos<P, F> {
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur
    }
}

impl<P, F> Position for FilterPos<P, F>
where
    P: Position,
    F: Fn(&P::Item) -> bool,
{
    type Item = P::Item;

    fn name(&self) -> &'static str {
        "filter"
    }

    fn get(&self) -> Result<P::Item> {
        self.cur.get()
    }

    fn advance(&mut self) -> Result<()> {
        self.cur.advance()?;
        self.settle()
    }
}

impl<S, F> Sequence for Filter<S, F>
where
    S: Sequence,
    F: Fn(&ItemOf<S>) -> bool,
{
    type Pos = FilterPos<S::Pos, F>;

    fn name(&self) -> &'static str {
        "filter"
    }

    fn begin(&self) -> Result<Self::Pos> {
        let mut pos = FilterPos {
            cur: self.inner.begin()?,
            end: Rc::new(self.inner.end()?),
            pred: Rc::clone(&self.pred),
        };
        pos.settle()?;
        Ok(pos)
    }

    fn end(&self) -> Result<Self::Pos> {
        let end = Rc::new(self.inner.end()?);
        Ok(FilterPos {
            cur: (*end).clone(),
            end,
            pred: Rc::clone(&self.pred),
        })
    }
}

/// Keeps the `Some` projections of the predecessor's elements.
pub struct FilterMap<S, F> {
    inner: S,
    f: Rc<F>,
}

impl<S, U, F> FilterMap<S, F>
where
    S: Sequence,
    F: Fn(ItemOf<S>) -> Option<U>,
{
    pub fn new(inner: S, f: F) -> Self {
        Self {
            inner,
            f: Rc::new(f),
        }
    }
}

/// Holds the projection of the element it sits on, so `f` runs once per
/// predecessor element.
pub struct FilterMapPos<P, U, F> {
    cur: P,
    end: Rc<P>,
    current: Option<U>,
    f: Rc<F>,
}

impl<P, U, F> FilterMapPos<P, U, F>
where
    P: Position,
    F: Fn(P::Item) -> Option<U>,
{
    fn settle(&mut self) -> Result<()> {
        self.current = None;
        while self.cur != *self.end {
            if let Some(u) = (self.f)(self.cur.get()?) {
                self.current = Some(u);
                break;
            }
            self.cur.advance()?;
        }
        Ok(())
    }
}

impl<P: Clone, U: Clone, F> Clone for FilterMapPos<P, U, F> {
    fn clone(&self) -> Self {
        Self {
            cur: self.cur.clone(),
            end: Rc::clone(&self.end),
            current: self.current.clone(),
            f: Rc::clone(&self.f),
        }
    }
}

impl<P: PartialEq, U, F> PartialEq for FilterMapPos<P, U, F> {
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur
    }
}

impl<P, U, F> Position for FilterMapPos<P, U, F>
where
    P: Position,
    U: Clone,
    F: Fn(P::Item) -> Option<U>,
{
    type Item = U;

    fn name(&self) -> &'static str {
        "filter_map"
    }

    fn get(&self) -> Result<U> {
        self.current.clone().ok_or_else(|| Error::exhausted("get"))
    }

    fn advance(&mut self) -> Result<()> {
        self.cur.advance()?;
        self.settle()
    }
}

impl<S, U, F> Sequence for FilterMap<S, F>
where
    S: Sequence,
    U: Clone,
    F: Fn(ItemOf<S>) -> Option<U>,
{
    type Pos = FilterMapPos<S::Pos, U, F>;

    fn name(&self) -> &'static str {
        "filter_map"
    }

    fn begin(&self) -> Result<Self::Pos> {
        let mut pos = FilterMapPos {
            cur: self.inner.begin()?,
            end: Rc::new(self.inner.end()?),
            current: None,
            f: Rc::clone(&self.f),
        };
        pos.settle()?;
        Ok(pos)
    }

    fn end(&self) -> Result<Self::Pos> {
        let end = Rc::new(self.inner.end()?);
        Ok(FilterMapPos {
            cur: (*end).clone(),
            end,
            current: None,
            f: Rc::clone(&self.f),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::identity::from;
    use crate::traits::Sequence;
    use lazyq_core::{Error, Position};

    #[test]
    fn keeps_only_passing_elements() {
        let data: Vec<i32> = (0..=12).collect();
        let evens = from(&data).filter(|x| **x % 2 == 0);
        assert_eq!(evens.to_vec().unwrap(), vec![&0, &2, &4, &6, &8, &10, &12]);
        assert_eq!(evens.count().unwrap(), 7);
        let odds = from(&data).filter(|x| **x % 2 == 1);
        assert_eq!(odds.count().unwrap(), 6);
        let none = from(&data).filter(|_| false);
        assert_eq!(none.count().unwrap(), 0);
        assert!(none.is_empty().unwrap());
    }

    #[test]
    fn begin_skips_leading_rejects() {
        let data = vec![1, 3, 5, 6, 7];
        let seq = from(&data).filter(|x| **x % 2 == 0);
        assert_eq!(*seq.first().unwrap(), 6);
        assert_eq!(*seq.last().unwrap(), 6);
    }

    #[test]
    fn filter_is_forward_only() {
        let data = vec![1, 2];
        let mut end = from(&data).filter(|_| true).end().unwrap();
        assert_eq!(end.retreat(), Err(Error::unsupported("retreat", "filter")));
    }

    #[test]
    fn filter_map_projects_and_drops() {
        let words = vec!["1", "x", "22", "", "333"];
        let nums = from(&words).filter_map(|s| s.parse::<u32>().ok());
        assert_eq!(nums.to_vec().unwrap(), vec![1, 22, 333]);
        assert_eq!(nums.count().unwrap(), 3);
    }

    #[test]
    fn filters_compose() {
        let data: Vec<i32> = (1..=30).collect();
        let seq = from(&data)
            .filter(|x| **x % 2 == 0)
            .filter(|x| **x % 3 == 0);
        assert_eq!(seq.to_vec().unwrap(), vec![&6, &12, &18, &24, &30]);
    }
}
