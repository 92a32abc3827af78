//! Eager adapters: walk the predecessor at the call site and hand back an
//! identity sequence over the resulting sub-range (or, for `flatten`, over
//! fresh storage).
//!
//! The bound is fixed by the data as it is at the call, not at iteration.

use std::rc::Rc;

use lazyq_core::{Position, Result, SharedCursor};

use crate::identity::Id;
use crate::metrics;
use crate::traits::{ItemOf, Sequence};

/// Advance `cur` by up to `n` steps, stopping at `end`. Returns steps taken.
fn advance_clamped<P: Position>(cur: &mut P, end: &P, n: usize) -> Result<usize> {
    if let Some(len) = cur.distance_to(end) {
        let steps = n.min(len);
        cur.advance_by(steps)?;
        return Ok(steps);
    }
    let mut steps = 0;
    while steps < n && cur != end {
        cur.advance()?;
        steps += 1;
    }
    Ok(steps)
}

/// Advance `cur` while `pred` holds, stopping at `end`. Returns steps taken.
fn advance_while<P, F>(cur: &mut P, end: &P, mut pred: F) -> Result<usize>
where
    P: Position,
    F: FnMut(&P::Item) -> bool,
{
    let mut steps = 0;
    while cur != end && pred(&cur.get()?) {
        cur.advance()?;
        steps += 1;
    }
    Ok(steps)
}

pub(crate) fn take<S: Sequence>(seq: &S, n: usize) -> Result<Id<S::Pos>> {
    let (begin, end) = (seq.begin()?, seq.end()?);
    let mut split = begin.clone();
    let walked = advance_clamped(&mut split, &end, n)?;
    metrics::split("take", walked);
    Ok(Id::from_positions(begin, split))
}

pub(crate) fn skip<S: Sequence>(seq: &S, n: usize) -> Result<Id<S::Pos>> {
    let (mut split, end) = (seq.begin()?, seq.end()?);
    let walked = advance_clamped(&mut split, &end, n)?;
    metrics::split("skip", walked);
    Ok(Id::from_positions(split, end))
}

pub(crate) fn take_while<S, F>(seq: &S, pred: F) -> Result<Id<S::Pos>>
where
    S: Sequence,
    F: FnMut(&ItemOf<S>) -> bool,
{
    let (begin, end) = (seq.begin()?, seq.end()?);
    let mut split = begin.clone();
    let walked = advance_while(&mut split, &end, pred)?;
    metrics::split("take_while", walked);
    Ok(Id::from_positions(begin, split))
}

pub(crate) fn skip_while<S, F>(seq: &S, pred: F) -> Result<Id<S::Pos>>
where
    S: Sequence,
    F: FnMut(&ItemOf<S>) -> bool,
{
    let (mut split, end) = (seq.begin()?, seq.end()?);
    let walked = advance_while(&mut split, &end, pred)?;
    metrics::split("skip_while", walked);
    Ok(Id::from_positions(split, end))
}

/// Every inner sequence in full, in order. Inner lengths may differ; empty
/// inner sequences contribute nothing.
pub(crate) fn flatten<S>(seq: &S) -> Result<Id<SharedCursor<<ItemOf<S> as IntoIterator>::Item>>>
where
    S: Sequence,
    ItemOf<S>: IntoIterator,
    <ItemOf<S> as IntoIterator>::Item: Clone,
{
    let mut flat = Vec::new();
    let mut inner = 0;
    for item in seq.iter() {
        flat.extend(item?);
        inner += 1;
    }
    metrics::split("flatten", inner);
    let data: Rc<[_]> = flat.into();
    Ok(Id::from_positions(
        SharedCursor::begin(Rc::clone(&data)),
        SharedCursor::end(data),
    ))
}
