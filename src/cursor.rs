use std::vec::IntoIter;

use crate::error::{KeepsetError, Result};

/// A forward-only view over a snapshot of records.
///
/// The cursor owns its snapshot, so it stays valid whatever happens to the
/// set it was taken from. It cannot be rewound; take a new one to re-scan.
#[derive(Debug)]
pub struct Cursor<R> {
    current: Option<R>,
    ahead: IntoIter<R>,
}

impl<R> Cursor<R> {
    pub fn new(rows: Vec<R>) -> Self {
        let mut ahead = rows.into_iter();
        Self {
            current: ahead.next(),
            ahead,
        }
    }
    pub fn has_more(&self) -> bool {
        self.current.is_some()
    }
    pub fn current(&self) -> Result<&R> {
        self.current.as_ref().ok_or(KeepsetError::CursorExhausted)
    }
    /// Moves to the next record. Advancing an exhausted cursor is an error.
    pub fn advance(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Err(KeepsetError::CursorExhausted);
        }
        self.current = self.ahead.next();
        Ok(())
    }
    /// Records left, counting the current one.
    pub fn remaining(&self) -> usize {
        usize::from(self.current.is_some()) + self.ahead.len()
    }
}

impl<R> From<Vec<R>> for Cursor<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::new(rows)
    }
}

impl<R> Iterator for Cursor<R> {
    type Item = R;
    fn next(&mut self) -> Option<R> {
        let item = self.current.take();
        if item.is_some() {
            self.current = self.ahead.next();
        }
        item
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<R> ExactSizeIterator for Cursor<R> {}
