//! 結果行への射影

use mimizuku_core::{Binding, Triple};
use std::iter::FusedIterator;
use std::vec;

/// Variables receiving the subject, predicate and object of each triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSlots {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl OutputSlots {
    pub fn new<S, P, O>(subject: S, predicate: P, object: O) -> Self
    where
        S: Into<String>,
        P: Into<String>,
        O: Into<String>,
    {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// One-pass sequence of result rows, one per projected triple
///
/// Rows are built on demand: the caller binding extended with the three slots.
#[derive(Debug)]
pub struct ResultRows {
    triples: vec::IntoIter<Triple>,
    slots: OutputSlots,
    parent: Binding,
}

impl Iterator for ResultRows {
    type Item = Binding;

    fn next(&mut self) -> Option<Binding> {
        let triple = self.triples.next()?;
        Some(
            self.parent
                .clone()
                .with(self.slots.subject.clone(), triple.subject)
                .with(self.slots.predicate.clone(), triple.predicate)
                .with(self.slots.object.clone(), triple.object),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.triples.size_hint()
    }
}

impl ExactSizeIterator for ResultRows {}

impl FusedIterator for ResultRows {}

/// Bind each triple to `slots` on top of `parent`
pub fn project(triples: Vec<Triple>, slots: OutputSlots, parent: Binding) -> ResultRows {
    ResultRows {
        triples: triples.into_iter(),
        slots,
        parent,
    }
}
