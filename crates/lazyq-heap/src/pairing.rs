//! Persistent pairing heap with leftmost-minimum ordering.
//!
//! A non-empty heap is a root element plus an ordered list of child heaps.
//! Invariants:
//! - Each heap covers a contiguous run of the insertion order, and its
//!   children appear in that order (left to right).
//! - The root is the minimum of its heap and, among equal elements, the one
//!   inserted first.
//!
//! `merge(a, b)` assumes everything in `a` was inserted before everything in
//! `b`. The not-greater root wins (ties go to `a`); the loser is attached on
//! the side it came from, so child order keeps matching insertion order. That
//! makes `delete_min` order-preserving and the resulting sort stable.
//!
//! Child lists are split into a front list (leftmost first) and a back list
//! (rightmost first) so that attaching on either side is O(1) without copying.

use std::fmt;
use std::rc::Rc;

use lazyq_core::error::{Error, Result};

use crate::list::ConsList;

/// Comparator type used when the element's own `<` is the order.
pub type NaturalOrder<T> = fn(&T, &T) -> bool;

/// Strict less-than under `PartialOrd`.
pub fn natural_less<T: PartialOrd>(a: &T, b: &T) -> bool {
    a < b
}

struct Node<T> {
    elem: T,
    /// Leftmost children, leftmost first.
    front: ConsList<Rc<Node<T>>>,
    /// Rightmost children, rightmost first.
    back: ConsList<Rc<Node<T>>>,
    len: usize,
}

impl<T> Node<T> {
    fn leaf(elem: T) -> Self {
        Self {
            elem,
            front: ConsList::new(),
            back: ConsList::new(),
            len: 1,
        }
    }

    /// Children in left-to-right order.
    fn children(&self) -> Vec<Rc<Node<T>>> {
        let mut kids: Vec<Rc<Node<T>>> = self.front.iter().cloned().collect();
        let start = kids.len();
        kids.extend(self.back.iter().cloned());
        kids[start..].reverse();
        kids
    }
}

// A heap built from descending input is a chain as deep as the input, so
// tear nodes down with an explicit stack instead of recursive drops.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.front.drain_unique(&mut pending);
        self.back.drain_unique(&mut pending);
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(child) {
                node.front.drain_unique(&mut pending);
                node.back.drain_unique(&mut pending);
            }
        }
    }
}

/// Immutable pairing heap. Every operation returns a new heap.
///
/// `C` is a strict-weak-order "less than" comparator.
pub struct PairingHeap<T, C = NaturalOrder<T>> {
    root: Option<Rc<Node<T>>>,
    cmp: Rc<C>,
}

impl<T: PartialOrd> PairingHeap<T, NaturalOrder<T>> {
    /// Empty heap ordered by `T`'s own `<`.
    pub fn new() -> Self {
        Self::with_comparator(natural_less::<T>)
    }
}

impl<T: PartialOrd> Default for PairingHeap<T, NaturalOrder<T>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> PairingHeap<T, C>
where
    C: Fn(&T, &T) -> bool,
{
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_shared_comparator(Rc::new(cmp))
    }

    pub fn with_shared_comparator(cmp: Rc<C>) -> Self {
        Self { root: None, cmp }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.len)
    }

    /// The leftmost minimum.
    pub fn find_min(&self) -> Result<&T> {
        self.root
            .as_ref()
            .map(|n| &n.elem)
            .ok_or_else(|| Error::empty("find_min"))
    }

    fn from_node(&self, root: Option<Rc<Node<T>>>) -> Self {
        Self {
            root,
            cmp: Rc::clone(&self.cmp),
        }
    }
}

impl<T, C> PairingHeap<T, C>
where
    T: Clone,
    C: Fn(&T, &T) -> bool,
{
    /// Merge `self` with `later`, every element of which counts as inserted
    /// after every element of `self`. O(1).
    pub fn merge(&self, later: &Self) -> Self {
        match (&self.root, &later.root) {
            (None, _) => later.clone(),
            (_, None) => self.clone(),
            (Some(a), Some(b)) => self.from_node(Some(Rc::new(self.link(a, b)))),
        }
    }

    fn link(&self, a: &Rc<Node<T>>, b: &Rc<Node<T>>) -> Node<T> {
        let len = a.len + b.len;
        if (self.cmp)(&b.elem, &a.elem) {
            // `a` precedes every element of `b`: it becomes b's leftmost child.
            Node {
                elem: b.elem.clone(),
                front: b.front.push_front(Rc::clone(a)),
                back: b.back.clone(),
                len,
            }
        } else {
            // Ties keep the earlier root; `b` becomes a's rightmost child.
            Node {
                elem: a.elem.clone(),
                front: a.front.clone(),
                back: a.back.push_front(Rc::clone(b)),
                len,
            }
        }
    }

    /// Insert `value` as the most recently inserted element. O(1).
    pub fn insert(&self, value: T) -> Self {
        let single = self.from_node(Some(Rc::new(Node::leaf(value))));
        self.merge(&single)
    }

    /// Heap without its root. Amortized O(log n).
    pub fn delete_min(&self) -> Result<Self> {
        let root = self.root.as_ref().ok_or_else(|| Error::empty("delete_min"))?;
        Ok(self.merge_pairs(root.children()))
    }

    /// Two-pass pairing: merge neighbours (0,1), (2,3), ... then fold the
    /// pairs left to right, the unpaired tail child last.
    fn merge_pairs(&self, children: Vec<Rc<Node<T>>>) -> Self {
        let mut heaps = children.into_iter().map(|n| self.from_node(Some(n)));
        let mut pairs = Vec::new();
        while let Some(first) = heaps.next() {
            match heaps.next() {
                Some(second) => pairs.push(first.merge(&second)),
                None => pairs.push(first),
            }
        }
        pairs
            .into_iter()
            .fold(self.from_node(None), |acc, h| acc.merge(&h))
    }

    /// Drain into a sorted vector (the heap itself is unchanged).
    pub fn to_sorted_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        let mut cur = self.clone();
        while let Some(root) = cur.root.clone() {
            out.push(root.elem.clone());
            cur = cur.merge_pairs(root.children());
        }
        out
    }
}

impl<T, C> Clone for PairingHeap<T, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            cmp: Rc::clone(&self.cmp),
        }
    }
}

impl<T, C> fmt::Debug for PairingHeap<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingHeap")
            .field("len", &self.root.as_ref().map_or(0, |n| n.len))
            .field("min", &self.root.as_ref().map(|n| &n.elem))
            .finish()
    }
}
