//! The position capability set and the cursors that bring collections into it.
//!
//! A position is a copyable cursor into a sequence. Every adapter in lazyq is
//! written against [`Position`] alone: dereference (`get`), `advance`, optional
//! `retreat`, optional random-access offsets, and equality.
//!
//! Positions never own the backing collection. Mutating a collection while a
//! position into it is alive is prevented by the borrow checker for the
//! borrowed cursors here; for anything else it is the caller's contract.

use std::collections::{
    btree_map, btree_set, hash_map, hash_set, linked_list, vec_deque, BTreeMap, BTreeSet,
    HashMap, HashSet, LinkedList, VecDeque,
};
use std::rc::Rc;

use crate::error::{Error, Result};

/// Cursor into a sequence.
///
/// Invariants:
/// - `get` and `advance` on a position equal to its sequence's end fail with
///   [`Error::Exhausted`].
/// - Cloning yields an independent cursor: advancing the copy never moves the
///   original.
pub trait Position: Clone + PartialEq {
    type Item;

    /// Human-readable position kind (stable), used in error reports.
    fn name(&self) -> &'static str;

    /// Dereference. Items are returned by value; borrowed cursors yield references.
    fn get(&self) -> Result<Self::Item>;

    fn advance(&mut self) -> Result<()>;

    /// Step backwards. Forward-only positions keep this default.
    fn retreat(&mut self) -> Result<()> {
        Err(Error::unsupported("retreat", self.name()))
    }

    /// Advance `n` steps. Random-access cursors override this with O(1) jumps.
    fn advance_by(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.advance()?;
        }
        Ok(())
    }

    /// Number of forward steps from `self` to `other`, when it can be computed
    /// without walking. `None` means "walk to find out".
    fn distance_to(&self, _other: &Self) -> Option<usize> {
        None
    }
}

/// Bidirectional, random-access cursor over a borrowed slice.
#[derive(Debug)]
pub struct SliceCursor<'a, T> {
    data: &'a [T],
    index: usize,
}

impl<'a, T> SliceCursor<'a, T> {
    pub fn new(data: &'a [T], index: usize) -> Self {
        Self { data, index }
    }

    pub fn begin(data: &'a [T]) -> Self {
        Self::new(data, 0)
    }

    pub fn end(data: &'a [T]) -> Self {
        Self::new(data, data.len())
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for SliceCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SliceCursor<'_, T> {}

impl<T> PartialEq for SliceCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data) && self.index == other.index
    }
}

impl<'a, T> Position for SliceCursor<'a, T> {
    type Item = &'a T;

    fn name(&self) -> &'static str {
        "slice"
    }

    fn get(&self) -> Result<&'a T> {
        self.data
            .get(self.index)
            .ok_or_else(|| Error::exhausted("get"))
    }

    fn advance(&mut self) -> Result<()> {
        if self.index >= self.data.len() {
            return Err(Error::exhausted("advance"));
        }
        self.index += 1;
        Ok(())
    }

    fn retreat(&mut self) -> Result<()> {
        if self.index == 0 {
            return Err(Error::exhausted("retreat"));
        }
        self.index -= 1;
        Ok(())
    }

    fn advance_by(&mut self, n: usize) -> Result<()> {
        match self.index.checked_add(n) {
            Some(next) if next <= self.data.len() => {
                self.index = next;
                Ok(())
            }
            _ => Err(Error::exhausted("advance_by")),
        }
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        if !std::ptr::eq(self.data, other.data) {
            return None;
        }
        other.index.checked_sub(self.index)
    }
}

/// Random-access cursor over storage the cursor itself keeps alive.
///
/// Eager adapters (e.g. `flatten`) produce fresh storage and hand out these.
#[derive(Debug)]
pub struct SharedCursor<T> {
    data: Rc<[T]>,
    index: usize,
}

impl<T> SharedCursor<T> {
    pub fn begin(data: Rc<[T]>) -> Self {
        Self { data, index: 0 }
    }

    pub fn end(data: Rc<[T]>) -> Self {
        let index = data.len();
        Self { data, index }
    }
}

impl<T> Clone for SharedCursor<T> {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
            index: self.index,
        }
    }
}

impl<T> PartialEq for SharedCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data) && self.index == other.index
    }
}

impl<T: Clone> Position for SharedCursor<T> {
    type Item = T;

    fn name(&self) -> &'static str {
        "shared"
    }

    fn get(&self) -> Result<T> {
        self.data
            .get(self.index)
            .cloned()
            .ok_or_else(|| Error::exhausted("get"))
    }

    fn advance(&mut self) -> Result<()> {
        if self.index >= self.data.len() {
            return Err(Error::exhausted("advance"));
        }
        self.index += 1;
        Ok(())
    }

    fn retreat(&mut self) -> Result<()> {
        if self.index == 0 {
            return Err(Error::exhausted("retreat"));
        }
        self.index -= 1;
        Ok(())
    }

    fn advance_by(&mut self, n: usize) -> Result<()> {
        match self.index.checked_add(n) {
            Some(next) if next <= self.data.len() => {
                self.index = next;
                Ok(())
            }
            _ => Err(Error::exhausted("advance_by")),
        }
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        if !Rc::ptr_eq(&self.data, &other.data) {
            return None;
        }
        other.index.checked_sub(self.index)
    }
}

/// Forward-only cursor over any cloneable exact-size iterator.
///
/// Two cursors are equal when they have the same number of elements left, so
/// only compare cursors that were cut from the same iterator.
#[derive(Debug, Clone)]
pub struct ExactCursor<I> {
    iter: I,
    remaining: usize,
}

impl<I: ExactSizeIterator + Clone> ExactCursor<I> {
    pub fn begin(iter: I) -> Self {
        let remaining = iter.len();
        Self { iter, remaining }
    }

    pub fn end(iter: I) -> Self {
        Self { iter, remaining: 0 }
    }

    /// `(begin, end)` for `iter`.
    pub fn bounds(iter: I) -> (Self, Self) {
        (Self::begin(iter.clone()), Self::end(iter))
    }
}

impl<I> PartialEq for ExactCursor<I> {
    fn eq(&self, other: &Self) -> bool {
        self.remaining == other.remaining
    }
}

impl<I: ExactSizeIterator + Clone> Position for ExactCursor<I> {
    type Item = I::Item;

    fn name(&self) -> &'static str {
        "iter"
    }

    fn get(&self) -> Result<I::Item> {
        if self.remaining == 0 {
            return Err(Error::exhausted("get"));
        }
        self.iter
            .clone()
            .next()
            .ok_or_else(|| Error::Invariant("iterator shorter than its reported length".into()))
    }

    fn advance(&mut self) -> Result<()> {
        if self.remaining == 0 {
            return Err(Error::exhausted("advance"));
        }
        self.iter.next();
        self.remaining -= 1;
        Ok(())
    }

    fn advance_by(&mut self, n: usize) -> Result<()> {
        if n == 0 {
            return Ok(());
        }
        if n > self.remaining {
            return Err(Error::exhausted("advance_by"));
        }
        self.iter.nth(n - 1);
        self.remaining -= n;
        Ok(())
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        self.remaining.checked_sub(other.remaining)
    }
}

/// Backing-collaborator contract: anything that can hand out a begin and an
/// end position of the same type.
///
/// Collections that cannot satisfy [`Position`] simply have no impl, so a bad
/// collaborator is rejected at compile time rather than at run time.
pub trait Bounded {
    type Pos: Position;

    fn bounds(self) -> (Self::Pos, Self::Pos);
}

impl<'a, T> Bounded for &'a [T] {
    type Pos = SliceCursor<'a, T>;

    fn bounds(self) -> (Self::Pos, Self::Pos) {
        (SliceCursor::begin(self), SliceCursor::end(self))
    }
}

impl<'a, T, const N: usize> Bounded for &'a [T; N] {
    type Pos = SliceCursor<'a, T>;

    fn bounds(self) -> (Self::Pos, Self::Pos) {
        self.as_slice().bounds()
    }
}

impl<'a, T> Bounded for &'a Vec<T> {
    type Pos = SliceCursor<'a, T>;

    fn bounds(self) -> (Self::Pos, Self::Pos) {
        self.as_slice().bounds()
    }
}

impl<T: Clone> Bounded for Rc<[T]> {
    type Pos = SharedCursor<T>;

    fn bounds(self) -> (Self::Pos, Self::Pos) {
        (SharedCursor::begin(Rc::clone(&self)), SharedCursor::end(self))
    }
}

macro_rules! bounded_by_iter {
    ($($coll:ident < $($g:ident),+ > => $iter:ty;)+) => {
        $(
            impl<'a, $($g),+> Bounded for &'a $coll<$($g),+> {
                type Pos = ExactCursor<$iter>;

                fn bounds(self) -> (Self::Pos, Self::Pos) {
                    ExactCursor::bounds(self.iter())
                }
            }
        )+
    };
}

bounded_by_iter! {
    VecDeque<T> => vec_deque::Iter<'a, T>;
    LinkedList<T> => linked_list::Iter<'a, T>;
    BTreeSet<T> => btree_set::Iter<'a, T>;
    BTreeMap<K, V> => btree_map::Iter<'a, K, V>;
    HashSet<T> => hash_set::Iter<'a, T>;
    HashMap<K, V> => hash_map::Iter<'a, K, V>;
}
