//! Reverse: swaps begin and end and inverts advance/retreat.
//!
//! A reverse position wraps the predecessor position one past the element it
//! designates, so the reversed end is the predecessor's begin. Requires a
//! predecessor that can retreat; otherwise dereferencing fails with
//! `Unsupported`.

use lazyq_core::{Position, Result};

use crate::traits::Sequence;

pub struct Reverse<S> {
    inner: S,
}

impl<S: Sequence> Reverse<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReversePos<P> {
    base: P,
}

impl<P: Position> Position for ReversePos<P> {
    type Item = P::Item;

    fn name(&self) -> &'static str {
        "reverse"
    }

    fn get(&self) -> Result<P::Item> {
        let mut at = self.base.clone();
        at.retreat()?;
        at.get()
    }

    fn advance(&mut self) -> Result<()> {
        self.base.retreat()
    }

    fn retreat(&mut self) -> Result<()> {
        self.base.advance()
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        other.base.distance_to(&self.base)
    }
}

impl<S: Sequence> Sequence for Reverse<S> {
    type Pos = ReversePos<S::Pos>;

    fn name(&self) -> &'static str {
        "reverse"
    }

    fn begin(&self) -> Result<Self::Pos> {
        Ok(ReversePos {
            base: self.inner.end()?,
        })
    }

    fn end(&self) -> Result<Self::Pos> {
        Ok(ReversePos {
            base: self.inner.begin()?,
        })
    }
}
