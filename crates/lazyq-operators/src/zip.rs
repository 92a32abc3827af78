//! Zip: lock-step traversal of two sequences through a combiner.
//!
//! The result is as long as the shorter input. Positions where either side has
//! reached its end are all equal (they are all the zip's end). Forward-only.

use std::rc::Rc;

use lazyq_core::{Error, Position, Result};

use crate::traits::{ItemOf, Sequence};

pub struct Zip<A, B, F> {
    a: A,
    b: B,
    combine: Rc<F>,
}

impl<A, B, Out, F> Zip<A, B, F>
where
    A: Sequence,
    B: Sequence,
    F: Fn(ItemOf<A>, ItemOf<B>) -> Out,
{
    pub fn new(a: A, b: B, combine: F) -> Self {
        Self {
            a,
            b,
            combine: Rc::new(combine),
        }
    }
}

pub struct ZipPos<PA, PB, F> {
    a: PA,
    b: PB,
    ends: Rc<(PA, PB)>,
    combine: Rc<F>,
}

impl<PA: PartialEq, PB: PartialEq, F> ZipPos<PA, PB, F> {
    fn exhausted(&self) -> bool {
        self.a == self.ends.0 || self.b == self.ends.1
    }
}

impl<PA: Clone, PB: Clone, F> Clone for ZipPos<PA, PB, F> {
    fn clone(&self) -> Self {
        Self {
            a: self.a.clone(),
            b: self.b.clone(),
            ends: Rc::clone(&self.ends),
            combine: Rc::clone(&self.combine),
        }
    }
}

impl<PA: PartialEq, PB: PartialEq, F> PartialEq for ZipPos<PA, PB, F> {
    fn eq(&self, other: &Self) -> bool {
        match (self.exhausted(), other.exhausted()) {
            (true, true) => true,
            (false, false) => self.a == other.a && self.b == other.b,
            _ => false,
        }
    }
}

impl<PA, PB, Out, F> Position for ZipPos<PA, PB, F>
where
    PA: Position,
    PB: Position,
    F: Fn(PA::Item, PB::Item) -> Out,
{
    type Item = Out;

    fn name(&self) -> &'static str {
        "zip"
    }

    fn get(&self) -> Result<Out> {
        if self.exhausted() {
            return Err(Error::exhausted("get"));
        }
        Ok((self.combine)(self.a.get()?, self.b.get()?))
    }

    fn advance(&mut self) -> Result<()> {
        if self.exhausted() {
            return Err(Error::exhausted("advance"));
        }
        self.a.advance()?;
        self.b.advance()
    }
}

impl<A, B, Out, F> Sequence for Zip<A, B, F>
where
    A: Sequence,
    B: Sequence,
    F: Fn(ItemOf<A>, ItemOf<B>) -> Out,
{
    type Pos = ZipPos<A::Pos, B::Pos, F>;

    fn name(&self) -> &'static str {
        "zip"
    }

    fn begin(&self) -> Result<Self::Pos> {
        Ok(ZipPos {
            a: self.a.begin()?,
            b: self.b.begin()?,
            ends: Rc::new((self.a.end()?, self.b.end()?)),
            combine: Rc::clone(&self.combine),
        })
    }

    fn end(&self) -> Result<Self::Pos> {
        let ends = Rc::new((self.a.end()?, self.b.end()?));
        Ok(ZipPos {
            a: ends.0.clone(),
            b: ends.1.clone(),
            ends,
            combine: Rc::clone(&self.combine),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::identity::from;
    use crate::traits::Sequence;

    #[test]
    fn pairs_up_to_the_shorter_length() {
        let nums = vec![1, 2, 3, 4];
        let names = vec!["one", "two", "three"];
        let zipped = from(&nums).zip(from(&names));
        assert_eq!(zipped.count().unwrap(), 3);
        assert_eq!(
            zipped.to_vec().unwrap(),
            vec![(&1, &"one"), (&2, &"two"), (&3, &"three")]
        );
    }

    #[test]
    fn zip_with_combines() {
        let a = vec![1, 2, 3];
        let b = vec![10, 20, 30, 40];
        let sums = from(&a).zip_with(from(&b), |x, y| x + y);
        assert_eq!(sums.to_vec().unwrap(), vec![11, 22, 33]);
    }

    #[test]
    fn an_empty_side_yields_nothing() {
        let a: Vec<i32> = Vec::new();
        let b = vec![1];
        assert!(from(&a).zip(from(&b)).is_empty().unwrap());
        assert!(from(&b).zip(from(&a)).is_empty().unwrap());
    }

    #[test]
    fn zips_different_adapters() {
        let a = vec![5, 1, 4];
        let b = vec![1, 2, 3, 4, 5, 6];
        let pairs = from(&a)
            .order_by()
            .zip_with(from(&b).filter(|x| **x % 2 == 0), |x, y| x * y);
        assert_eq!(pairs.to_vec().unwrap(), vec![2, 16, 30]);
    }
}
