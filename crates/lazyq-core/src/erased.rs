//! Type-erased positions.
//!
//! [`DynPosition`] hides the concrete cursor type behind a boxed capability
//! interface so that differently-built adapter chains over the same item type
//! can be stored and passed around as one type.
//!
//! Equality cannot downcast (that would need `'static` cursors), so every
//! erased cursor remembers the begin position of its sequence and an anchor:
//! how many steps it sits from begin, or from end. Same-anchor positions
//! compare their step counts; mixed anchors are reconciled through the
//! sequence length, found once (walking from begin if need be) and shared by
//! every position cut from the same pair.

use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::error::{Error, Result};
use crate::position::Position;

trait ErasedCursor<'a, T> {
    fn name(&self) -> &'static str;
    fn get(&self) -> Result<T>;
    fn advance(&mut self) -> Result<()>;
    fn retreat(&mut self) -> Result<()>;
    /// Steps from the sequence's begin to the current position.
    fn offset(&self) -> Result<usize>;
    fn clone_box(&self) -> Box<dyn ErasedCursor<'a, T> + 'a>;
}

struct Anchored<P> {
    origin: P,
    current: P,
}

impl<'a, P> ErasedCursor<'a, P::Item> for Anchored<P>
where
    P: Position + 'a,
{
    fn name(&self) -> &'static str {
        self.current.name()
    }

    fn get(&self) -> Result<P::Item> {
        self.current.get()
    }

    fn advance(&mut self) -> Result<()> {
        self.current.advance()
    }

    fn retreat(&mut self) -> Result<()> {
        self.current.retreat()
    }

    fn offset(&self) -> Result<usize> {
        if let Some(d) = self.origin.distance_to(&self.current) {
            return Ok(d);
        }
        let mut walker = self.origin.clone();
        let mut steps = 0;
        while walker != self.current {
            walker.advance()?;
            steps += 1;
        }
        Ok(steps)
    }

    fn clone_box(&self) -> Box<dyn ErasedCursor<'a, P::Item> + 'a> {
        Box::new(Anchored {
            origin: self.origin.clone(),
            current: self.current.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    FromBegin(usize),
    FromEnd(usize),
}

/// Boxed position with the concrete cursor type erased.
pub struct DynPosition<'a, T> {
    cursor: Box<dyn ErasedCursor<'a, T> + 'a>,
    anchor: Anchor,
    len: Rc<OnceCell<usize>>,
}

impl<'a, T> DynPosition<'a, T> {
    /// Erase a `(begin, end)` pair of one sequence.
    pub fn pair<P>(begin: P, end: P) -> (Self, Self)
    where
        P: Position<Item = T> + 'a,
    {
        let len = Rc::new(OnceCell::new());
        let first = DynPosition {
            cursor: Box::new(Anchored {
                origin: begin.clone(),
                current: begin.clone(),
            }),
            anchor: Anchor::FromBegin(0),
            len: Rc::clone(&len),
        };
        let last = DynPosition {
            cursor: Box::new(Anchored {
                origin: begin,
                current: end,
            }),
            anchor: Anchor::FromEnd(0),
            len,
        };
        (first, last)
    }

    /// Steps from the sequence's begin to this position.
    pub fn offset(&self) -> Result<usize> {
        match self.anchor {
            Anchor::FromBegin(n) => Ok(n),
            Anchor::FromEnd(n) => {
                let len = self.len.get_or_try_init(|| self.cursor.offset().map(|o| o + n))?;
                len.checked_sub(n)
                    .ok_or_else(|| Error::Invariant("erased position before begin".into()))
            }
        }
    }
}

impl<T> Clone for DynPosition<'_, T> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone_box(),
            anchor: self.anchor,
            len: Rc::clone(&self.len),
        }
    }
}

impl<T> PartialEq for DynPosition<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.anchor, other.anchor) {
            (Anchor::FromBegin(a), Anchor::FromBegin(b)) => a == b,
            (Anchor::FromEnd(a), Anchor::FromEnd(b)) => a == b,
            _ => matches!((self.offset(), other.offset()), (Ok(a), Ok(b)) if a == b),
        }
    }
}

impl<T> std::fmt::Debug for DynPosition<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynPosition")
            .field("kind", &self.cursor.name())
            .field("anchor", &self.anchor)
            .finish()
    }
}

impl<T> Position for DynPosition<'_, T> {
    type Item = T;

    fn name(&self) -> &'static str {
        self.cursor.name()
    }

    fn get(&self) -> Result<T> {
        self.cursor.get()
    }

    fn advance(&mut self) -> Result<()> {
        self.cursor.advance()?;
        self.anchor = match self.anchor {
            Anchor::FromBegin(n) => Anchor::FromBegin(n + 1),
            Anchor::FromEnd(n) => Anchor::FromEnd(n.saturating_sub(1)),
        };
        Ok(())
    }

    fn retreat(&mut self) -> Result<()> {
        self.cursor.retreat()?;
        self.anchor = match self.anchor {
            Anchor::FromBegin(n) => Anchor::FromBegin(n.saturating_sub(1)),
            Anchor::FromEnd(n) => Anchor::FromEnd(n + 1),
        };
        Ok(())
    }

    fn distance_to(&self, other: &Self) -> Option<usize> {
        match (self.anchor, other.anchor) {
            (Anchor::FromBegin(a), Anchor::FromBegin(b)) => b.checked_sub(a),
            (Anchor::FromEnd(a), Anchor::FromEnd(b)) => a.checked_sub(b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Bounded, ExactCursor};
    use std::collections::BTreeSet;

    #[test]
    fn begin_walks_to_end() {
        let data = vec![1, 2, 3];
        let (b, e) = (&data).bounds();
        let (mut cur, end) = DynPosition::pair(b, e);
        let mut out = Vec::new();
        while cur != end {
            out.push(*cur.get().unwrap());
            cur.advance().unwrap();
        }
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn mixed_anchors_compare_by_offset() {
        let data = vec!['a', 'b', 'c', 'd'];
        let (b, e) = (&data).bounds();
        let (mut from_begin, mut from_end) = DynPosition::pair(b, e);
        from_begin.advance().unwrap();
        from_end.retreat().unwrap();
        from_end.retreat().unwrap();
        from_end.retreat().unwrap();
        assert!(from_begin == from_end);
        assert_eq!(*from_end.get().unwrap(), 'b');
        from_end.advance().unwrap();
        assert!(from_begin != from_end);
    }

    #[test]
    fn forward_only_cursors_reconcile_by_walking() {
        let set: BTreeSet<u8> = (0..5).collect();
        let (b, e) = ExactCursor::bounds(set.iter());
        let (mut cur, end) = DynPosition::pair(b, e);
        assert!(matches!(
            end.clone().retreat(),
            Err(crate::Error::Unsupported { .. })
        ));
        for _ in 0..5 {
            cur.advance().unwrap();
        }
        assert_eq!(end.offset().unwrap(), 5);
        assert!(cur == end);
    }
}
