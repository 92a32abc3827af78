//! Concatenation of two sequences with the same element type.

use std::rc::Rc;

use lazyq_core::{Error, Position, Result};

use crate::traits::{ItemOf, Sequence};

pub struct Concat<A, B> {
    first: A,
    second: B,
}

impl<A, B> Concat<A, B>
where
    A: Sequence,
    B: Sequence,
    B::Pos: Position<Item = ItemOf<A>>,
{
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

/// Bounds of both halves, shared by every position of one concat.
struct Seam<PA, PB> {
    first_begin: PA,
    first_end: PA,
    second_begin: PB,
}

enum Side<PA, PB> {
    First(PA),
    Second(PB),
}

/// A position in either half.
///
/// Never `First(end of first half)`: that spot is spelled
/// `Second(begin of second half)`, so equal locations compare equal.
pub struct ConcatPos<PA, PB> {
    side: Side<PA, PB>,
    seam: Rc<Seam<PA, PB>>,
}

impl<PA, PB> ConcatPos<PA, PB>
where
    PA: Position,
    PB: Position<Item = PA::Item>,
{
    fn at(side: Side<PA, PB>, seam: Rc<Seam<PA, PB>>) -> Self {
        let side = match side {
            Side::First(p) if p == seam.first_end => Side::Second(seam.second_begin.clone()),
            other => other,
        };
        Self { side, seam }
    }
}

impl<PA: Clone, PB: Clone> Clone for ConcatPos<PA, PB> {
    fn clone(&self) -> Self {
        let side = match &self.side {
            Side::First(p) => Side::First(p.clone()),
            Side::Second(p) => Side::Second(p.clone()),
        };
        Self {
            side,
            seam: Rc::clone(&self.seam),
        }
    }
}

impl<PA: PartialEq, PB: PartialEq> PartialEq for ConcatPos<PA, PB> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.side, &other.side) {
            (Side::First(a), Side::First(b)) => a == b,
            (Side::Second(a), Side::Second(b)) => a == b,
            _ => false,
        }
    }
}

impl<PA, PB> Position for ConcatPos<PA, PB>
where
    PA: Position,
    PB: Position<Item = PA::Item>,
{
    type Item = PA::Item;

    fn name(&self) -> &'static str {
        "concat"
    }

    fn get(&self) -> Result<PA::Item> {
        match &self.side {
            Side::First(p) => p.get(),
            Side::Second(p) => p.get(),
        }
    }

    fn advance(&mut self) -> Result<()> {
        match &mut self.side {
            Side::First(p) => {
                p.advance()?;
                if *p == self.seam.first_end {
                    self.side = Side::Second(self.seam.second_begin.clone());
                }
                Ok(())
            }
            Side::Second(p) => p.advance(),
        }
    }

    fn retreat(&mut self) -> Result<()> {
        match &mut self.side {
            Side::First(p) => p.retreat(),
            Side::Second(p) if *p != self.seam.second_begin => p.retreat(),
            Side::Second(_) => {
                if self.seam.first_begin == self.seam.first_end {
                    return Err(Error::exhausted("retreat"));
                }
                let mut last = self.seam.first_end.clone();
                last.retreat()?;
                self.side = Side::First(last);
                Ok(())
            }
        }
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        match (&self.side, &other.side) {
            (Side::First(a), Side::First(b)) => a.distance_to(b),
            (Side::Second(a), Side::Second(b)) => a.distance_to(b),
            (Side::First(a), Side::Second(b)) => {
                let rest = a.distance_to(&self.seam.first_end)?;
                let into = self.seam.second_begin.distance_to(b)?;
                rest.checked_add(into)
            }
            (Side::Second(_), Side::First(_)) => None,
        }
    }
}

impl<A, B> Sequence for Concat<A, B>
where
    A: Sequence,
    B: Sequence,
    B::Pos: Position<Item = ItemOf<A>>,
{
    type Pos = ConcatPos<A::Pos, B::Pos>;

    fn name(&self) -> &'static str {
        "concat"
    }

    fn begin(&self) -> Result<Self::Pos> {
        let seam = self.seam()?;
        let start = Side::First(seam.first_begin.clone());
        Ok(ConcatPos::at(start, seam))
    }

    fn end(&self) -> Result<Self::Pos> {
        let seam = self.seam()?;
        Ok(ConcatPos {
            side: Side::Second(self.second.end()?),
            seam,
        })
    }
}

impl<A, B> Concat<A, B>
where
    A: Sequence,
    B: Sequence,
{
    fn seam(&self) -> Result<Rc<Seam<A::Pos, B::Pos>>> {
        Ok(Rc::new(Seam {
            first_begin: self.first.begin()?,
            first_end: self.first.end()?,
            second_begin: self.second.begin()?,
        }))
    }
}
