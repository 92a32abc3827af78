//! Persistent cons list used for pairing-heap child lists.

use std::rc::Rc;

struct Cons<T> {
    value: T,
    next: Option<Rc<Cons<T>>>,
}

/// Immutable singly-linked list with O(1) `push_front` and shared tails.
pub(crate) struct ConsList<T> {
    head: Option<Rc<Cons<T>>>,
}

impl<T> ConsList<T> {
    pub(crate) const fn new() -> Self {
        Self { head: None }
    }

    /// New list with `value` in front; `self` is untouched and shared.
    pub(crate) fn push_front(&self, value: T) -> Self {
        Self {
            head: Some(Rc::new(Cons {
                value,
                next: self.head.clone(),
            })),
        }
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Move out every value whose cell is owned by this list alone, stopping
    /// at the first cell that is shared with another version.
    pub(crate) fn drain_unique(&mut self, out: &mut Vec<T>) {
        let mut next = self.head.take();
        while let Some(cell) = next {
            match Rc::try_unwrap(cell) {
                Ok(Cons { value, next: rest }) => {
                    out.push(value);
                    next = rest;
                }
                Err(_) => break,
            }
        }
    }
}

impl<T> Clone for ConsList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<T> Default for ConsList<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Iterative drop: long lists must not recurse once per cell.
impl<T> Drop for ConsList<T> {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(cell) = next {
            match Rc::try_unwrap(cell) {
                Ok(mut cons) => next = cons.next.take(),
                Err(_) => break,
            }
        }
    }
}

pub(crate) struct Iter<'a, T> {
    next: Option<&'a Cons<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let cell = self.next?;
        self.next = cell.next.as_deref();
        Some(&cell.value)
    }
}
