//! Map (a.k.a. select): applies a projection on dereference.
//!
//! The projection synthesizes a new value each time, so map positions are
//! read-only and forward-only; the element count is the predecessor's.

use std::rc::Rc;

use lazyq_core::{Position, Result};

use crate::traits::{ItemOf, Sequence};

pub struct Map<S, F> {
    inner: S,
    f: Rc<F>,
}

impl<S, U, F> Map<S, F>
where
    S: Sequence,
    F: Fn(ItemOf<S>) -> U,
{
    pub fn new(inner: S, f: F) -> Self {
        Self {
            inner,
            f: Rc::new(f),
        }
    }
}

pub struct MapPos<P, F> {
    cur: P,
    f: Rc<F>,
}

impl<P: Clone, F> Clone for MapPos<P, F> {
    fn clone(&self) -> Self {
        Self {
            cur: self.cur.clone(),
            f: Rc::clone(&self.f),
        }
    }
}

impl<P: PartialEq, F> PartialEq for MapPos<P, F> {
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur
    }
}

impl<P, U, F> Position for MapPos<P, F>
where
    P: Position,
    F: Fn(P::Item) -> U,
{
    type Item = U;

    fn name(&self) -> &'static str {
        "map"
    }

    fn get(&self) -> Result<U> {
        self.cur.get().map(|item| (self.f)(item))
    }

    fn advance(&mut self) -> Result<()> {
        self.cur.advance()
    }

    fn advance_by(&mut self, n: usize) -> Result<()> {
        self.cur.advance_by(n)
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        self.cur.distance_to(&other.cur)
    }
}

impl<S, U, F> Sequence for Map<S, F>
where
    S: Sequence,
    F: Fn(ItemOf<S>) -> U,
{
    type Pos = MapPos<S::Pos, F>;

    fn name(&self) -> &'static str {
        "map"
    }

    fn begin(&self) -> Result<Self::Pos> {
        Ok(MapPos {
            cur: self.inner.begin()?,
            f: Rc::clone(&self.f),
        })
    }

    fn end(&self) -> Result<Self::Pos> {
        Ok(MapPos {
            cur: self.inner.end()?,
            f: Rc::clone(&self.f),
        })
    }
}
