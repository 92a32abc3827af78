//! Append / prepend: one synthetic element at either end.
//!
//! Both positions pair the predecessor cursor with a flag telling whether the
//! cursor is on the synthetic slot; equality compares both.

use std::rc::Rc;

use lazyq_core::{Error, Position, Result};

use crate::traits::{ItemOf, Sequence};

pub struct Append<S: Sequence> {
    inner: S,
    value: Rc<ItemOf<S>>,
}

impl<S: Sequence> Append<S>
where
    ItemOf<S>: Clone,
{
    pub fn new(inner: S, value: ItemOf<S>) -> Self {
        Self {
            inner,
            value: Rc::new(value),
        }
    }
}

/// At the predecessor's end, `past == false` is the appended slot and
/// `past == true` is the real end.
pub struct AppendPos<P: Position> {
    cur: P,
    inner_end: Rc<P>,
    value: Rc<P::Item>,
    past: bool,
}

impl<P: Position> Clone for AppendPos<P> {
    fn clone(&self) -> Self {
        Self {
            cur: self.cur.clone(),
            inner_end: Rc::clone(&self.inner_end),
            value: Rc::clone(&self.value),
            past: self.past,
        }
    }
}

impl<P: Position> PartialEq for AppendPos<P> {
    fn eq(&self, other: &Self) -> bool {
        self.past == other.past && self.cur == other.cur
    }
}

impl<P> Position for AppendPos<P>
where
    P: Position,
    P::Item: Clone,
{
    type Item = P::Item;

    fn name(&self) -> &'static str {
        "append"
    }

    fn get(&self) -> Result<P::Item> {
        if self.cur != *self.inner_end {
            return self.cur.get();
        }
        if self.past {
            return Err(Error::exhausted("get"));
        }
        Ok((*self.value).clone())
    }

    fn advance(&mut self) -> Result<()> {
        if self.cur != *self.inner_end {
            return self.cur.advance();
        }
        if self.past {
            return Err(Error::exhausted("advance"));
        }
        self.past = true;
        Ok(())
    }

    fn retreat(&mut self) -> Result<()> {
        if self.past {
            self.past = false;
            return Ok(());
        }
        self.cur.retreat()
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        let inner = self.cur.distance_to(&other.cur)?;
        (inner + usize::from(other.past)).checked_sub(usize::from(self.past))
    }
}

impl<S> Sequence for Append<S>
where
    S: Sequence,
    ItemOf<S>: Clone,
{
    type Pos = AppendPos<S::Pos>;

    fn name(&self) -> &'static str {
        "append"
    }

    fn begin(&self) -> Result<Self::Pos> {
        Ok(AppendPos {
            cur: self.inner.begin()?,
            inner_end: Rc::new(self.inner.end()?),
            value: Rc::clone(&self.value),
            past: false,
        })
    }

    fn end(&self) -> Result<Self::Pos> {
        let inner_end = Rc::new(self.inner.end()?);
        Ok(AppendPos {
            cur: (*inner_end).clone(),
            inner_end,
            value: Rc::clone(&self.value),
            past: true,
        })
    }
}

pub struct Prepend<S: Sequence> {
    inner: S,
    value: Rc<ItemOf<S>>,
}

impl<S: Sequence> Prepend<S>
where
    ItemOf<S>: Clone,
{
    pub fn new(inner: S, value: ItemOf<S>) -> Self {
        Self {
            inner,
            value: Rc::new(value),
        }
    }
}

/// `before == true` is the prepended slot, which sits ahead of the
/// predecessor's begin.
pub struct PrependPos<P: Position> {
    cur: P,
    inner_begin: Rc<P>,
    value: Rc<P::Item>,
    before: bool,
}

impl<P: Position> Clone for PrependPos<P> {
    fn clone(&self) -> Self {
        Self {
            cur: self.cur.clone(),
            inner_begin: Rc::clone(&self.inner_begin),
            value: Rc::clone(&self.value),
            before: self.before,
        }
    }
}

impl<P: Position> PartialEq for PrependPos<P> {
    fn eq(&self, other: &Self) -> bool {
        self.before == other.before && self.cur == other.cur
    }
}

impl<P> Position for PrependPos<P>
where
    P: Position,
    P::Item: Clone,
{
    type Item = P::Item;

    fn name(&self) -> &'static str {
        "prepend"
    }

    fn get(&self) -> Result<P::Item> {
        if self.before {
            return Ok((*self.value).clone());
        }
        self.cur.get()
    }

    fn advance(&mut self) -> Result<()> {
        if self.before {
            self.before = false;
            return Ok(());
        }
        self.cur.advance()
    }

    fn retreat(&mut self) -> Result<()> {
        if self.before {
            return Err(Error::exhausted("retreat"));
        }
        if self.cur == *self.inner_begin {
            self.before = true;
            return Ok(());
        }
        self.cur.retreat()
    }

    fn advance_by(&mut self, n: usize) -> Result<()> {
        if n > 0 && self.before {
            let mut cur = self.cur.clone();
            cur.advance_by(n - 1)?;
            self.cur = cur;
            self.before = false;
            return Ok(());
        }
        self.cur.advance_by(n)
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        let inner = self.cur.distance_to(&other.cur)?;
        (inner + usize::from(self.before)).checked_sub(usize::from(other.before))
    }
}

impl<S> Sequence for Prepend<S>
where
    S: Sequence,
    ItemOf<S>: Clone,
{
    type Pos = PrependPos<S::Pos>;

    fn name(&self) -> &'static str {
        "prepend"
    }

    fn begin(&self) -> Result<Self::Pos> {
        let inner_begin = Rc::new(self.inner.begin()?);
        Ok(PrependPos {
            cur: (*inner_begin).clone(),
            inner_begin,
            value: Rc::clone(&self.value),
            before: true,
        })
    }

    fn end(&self) -> Result<Self::Pos> {
        Ok(PrependPos {
            cur: self.inner.end()?,
            inner_begin: Rc::new(self.inner.begin()?),
            value: Rc::clone(&self.value),
            before: false,
        })
    }
}
