//! The identity adapter: a sequence that is exactly a position pair.
//!
//! Entry point for every chain (`from`) and the result type of the eager
//! adapters, which hand back a sub-range of their input.

use lazyq_core::{Bounded, DynPosition, Position, Result};

use crate::traits::Sequence;

/// A `(begin, end)` position pair.
#[derive(Debug, Clone)]
pub struct Id<P> {
    begin: P,
    end: P,
}

/// Sequence whose position type has been erased.
pub type Boxed<'a, T> = Id<DynPosition<'a, T>>;

impl<P: Position> Id<P> {
    pub fn from_positions(begin: P, end: P) -> Self {
        Self { begin, end }
    }
}

/// Wrap any backing collaborator.
pub fn from<C: Bounded>(collection: C) -> Id<C::Pos> {
    let (begin, end) = collection.bounds();
    Id::from_positions(begin, end)
}

/// Wrap an explicit position pair.
pub fn from_positions<P: Position>(begin: P, end: P) -> Id<P> {
    Id::from_positions(begin, end)
}

impl<P: Position> Sequence for Id<P> {
    type Pos = P;

    fn name(&self) -> &'static str {
        "id"
    }

    fn begin(&self) -> Result<P> {
        Ok(self.begin.clone())
    }

    fn end(&self) -> Result<P> {
        Ok(self.end.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazyq_core::{ExactCursor, SliceCursor};
    use std::collections::{HashMap, VecDeque};

    #[test]
    fn wraps_standard_collections() {
        let v = vec![1, 2, 3];
        assert_eq!(from(&v).count().unwrap(), 3);

        let arr = [4, 5];
        assert_eq!(from(&arr).to_vec().unwrap(), vec![&4, &5]);

        let dq: VecDeque<char> = "xyz".chars().collect();
        assert_eq!(from(&dq).last().unwrap(), &'z');

        let map: HashMap<&str, i32> = [("k", 1)].into_iter().collect();
        assert_eq!(from(&map).first().unwrap(), (&"k", &1));
    }

    #[test]
    fn explicit_positions_delimit_a_subrange() {
        let v = vec![1, 2, 3, 4];
        let seq = from_positions(SliceCursor::new(&v, 1), SliceCursor::new(&v, 3));
        assert_eq!(seq.to_vec().unwrap(), vec![&2, &3]);
    }

    #[test]
    fn iterator_positions_work_forward() {
        let (b, e) = ExactCursor::bounds(1..5);
        assert_eq!(from_positions(b, e).aggregate(0, |a, x| a + x).unwrap(), 10);
    }

    #[test]
    fn boxed_chains_share_one_type() {
        let v = vec![1, 2, 3, 4, 5, 6];
        let chains: Vec<Boxed<'_, i32>> = vec![
            from(&v).map(|x| *x).boxed().unwrap(),
            from(&v).filter(|x| **x > 3).map(|x| x * 2).boxed().unwrap(),
            from(&v).reverse().map(|x| -x).boxed().unwrap(),
        ];
        let out: Vec<Vec<i32>> = chains.iter().map(|c| c.to_vec().unwrap()).collect();
        assert_eq!(out[0], vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(out[1], vec![8, 10, 12]);
        assert_eq!(out[2], vec![-6, -5, -4, -3, -2, -1]);
        assert_eq!(chains[1].count().unwrap(), 3);
    }
}
