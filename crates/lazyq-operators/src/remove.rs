//! Remove-first: elides the first element equal to a given value.
//!
//! Only the first occurrence in forward order is dropped; later equal elements
//! are kept. Forward-only.

use std::rc::Rc;

use lazyq_core::{Position, Result};

use crate::traits::{ItemOf, Sequence};

pub struct RemoveFirst<S: Sequence> {
    inner: S,
    target: Rc<ItemOf<S>>,
}

impl<S: Sequence> RemoveFirst<S>
where
    ItemOf<S>: PartialEq,
{
    pub fn new(inner: S, target: ItemOf<S>) -> Self {
        Self {
            inner,
            target: Rc::new(target),
        }
    }
}

pub struct RemoveFirstPos<P: Position> {
    cur: P,
    end: Rc<P>,
    target: Rc<P::Item>,
    removed: bool,
}

impl<P> RemoveFirstPos<P>
where
    P: Position,
    P::Item: PartialEq,
{
    /// Step over the target if it is under the cursor and still present.
    fn settle(&mut self) -> Result<()> {
        if !self.removed && self.cur != *self.end && self.cur.get()? == *self.target {
            self.removed = true;
            self.cur.advance()?;
        }
        Ok(())
    }
}

impl<P: Position> Clone for RemoveFirstPos<P> {
    fn clone(&self) -> Self {
        Self {
            cur: self.cur.clone(),
            end: Rc::clone(&self.end),
            target: Rc::clone(&self.target),
            removed: self.removed,
        }
    }
}

impl<P: Position> PartialEq for RemoveFirstPos<P> {
    fn eq(&self, other: &Self) -> bool {
        self.cur == other.cur
    }
}

impl<P> Position for RemoveFirstPos<P>
where
    P: Position,
    P::Item: PartialEq,
{
    type Item = P::Item;

    fn name(&self) -> &'static str {
        "remove_first"
    }

    fn get(&self) -> Result<P::Item> {
        self.cur.get()
    }

    fn advance(&mut self) -> Result<()> {
        self.cur.advance()?;
        self.settle()
    }
}

impl<S> Sequence for RemoveFirst<S>
where
    S: Sequence,
    ItemOf<S>: PartialEq,
{
    type Pos = RemoveFirstPos<S::Pos>;

    fn name(&self) -> &'static str {
        "remove_first"
    }

    fn begin(&self) -> Result<Self::Pos> {
        let mut pos = RemoveFirstPos {
            cur: self.inner.begin()?,
            end: Rc::new(self.inner.end()?),
            target: Rc::clone(&self.target),
            removed: false,
        };
        pos.settle()?;
        Ok(pos)
    }

    fn end(&self) -> Result<Self::Pos> {
        let end = Rc::new(self.inner.end()?);
        Ok(RemoveFirstPos {
            cur: (*end).clone(),
            end,
            target: Rc::clone(&self.target),
            removed: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::identity::from;
    use crate::traits::Sequence;

    #[test]
    fn drops_only_the_first_match() {
        let data = vec![1, 2, 3, 2, 1];
        let seq = from(&data).remove_first(&2);
        assert_eq!(seq.to_vec().unwrap(), vec![&1, &3, &2, &1]);
        assert_eq!(seq.count().unwrap(), 4);
    }

    #[test]
    fn removing_the_head_moves_begin() {
        let data = vec![4, 4, 5];
        let seq = from(&data).remove_first(&4);
        assert_eq!(*seq.first().unwrap(), 4);
        assert_eq!(seq.to_vec().unwrap(), vec![&4, &5]);
    }

    #[test]
    fn absent_values_change_nothing() {
        let data = vec![1, 2];
        let seq = from(&data).remove_first(&9);
        assert_eq!(seq.to_vec().unwrap(), vec![&1, &2]);
    }

    #[test]
    fn a_lone_match_leaves_an_empty_sequence() {
        let data = vec!["x"];
        let seq = from(&data).map(|s| s.to_string()).remove_first("x".to_string());
        assert!(seq.is_empty().unwrap());
    }
}
