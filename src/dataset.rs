use tracing::{debug, trace, warn};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::expression::{Action, Predicate};
use crate::schema::{Schema, Table};

// ------------- RecordSet -------------
/// An ordered collection of records of one type.
///
/// The set owns its records. Insertion appends, after running the schema's
/// constraints and then its triggers on the incoming record; nothing is
/// ever removed. Records can only be changed in place through
/// [`RecordSet::update`] and [`RecordSet::update_where`].
pub struct RecordSet<R: Table> {
    schema: Schema<R>,
    rows: Vec<R>,
}

impl<R: Table> RecordSet<R> {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(),
            rows: Vec::new(),
        }
    }
    pub fn schema(&self) -> &Schema<R> {
        &self.schema
    }
    pub fn insert(&mut self, record: R) -> Result<()> {
        let mut record = record;
        for constraint in self.schema.constraints() {
            if let Err(e) = constraint.enforce(&mut record, &self.rows) {
                warn!(table = R::NAME, field = constraint.field(), error = %e, "insert rejected");
                return Err(e);
            }
        }
        for (position, trigger) in self.schema.triggers().iter().enumerate() {
            if trigger.fire(&mut record, &self.rows) {
                trace!(table = R::NAME, trigger = position, "trigger fired");
            }
        }
        self.rows.push(record);
        debug!(table = R::NAME, rows = self.rows.len(), "record inserted");
        Ok(())
    }
    /// Copies of the records the predicate holds for, in storage order.
    pub fn filter(&self, predicate: &Predicate<R>) -> Vec<R> {
        let results: Vec<R> = self
            .rows
            .iter()
            .filter(|row| predicate.evaluate(row, &self.rows))
            .cloned()
            .collect();
        debug!(table = R::NAME, scanned = self.rows.len(), matched = results.len(), "filter complete");
        results
    }
    /// Applies the action in place to every record the predicate holds for.
    /// Returns the number of records changed.
    pub fn update_where(&mut self, predicate: &Predicate<R>, action: &Action<R>) -> usize {
        let mut updated = 0;
        for position in 0..self.rows.len() {
            if !predicate.evaluate(&self.rows[position], &self.rows) {
                continue;
            }
            // the action may read the rest of the set (e.g. max) while it
            // writes this row, so it works on a copy that is put back
            let mut row = self.rows[position].clone();
            action.apply(&mut row, &self.rows);
            self.rows[position] = row;
            updated += 1;
        }
        debug!(table = R::NAME, updated, "update complete");
        updated
    }
    /// Applies the action in place to every record.
    pub fn update(&mut self, action: &Action<R>) -> usize {
        self.update_where(&Predicate::Always, action)
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn exists(&self, record: &R) -> bool {
        exists(&self.rows, record)
    }
    pub fn all(&self) -> &[R] {
        &self.rows
    }
    /// A cursor over a snapshot of every record.
    pub fn cursor(&self) -> Cursor<R> {
        Cursor::new(self.rows.clone())
    }
}

/// True when some row equals `record` in every field.
pub fn exists<R: PartialEq>(rows: &[R], record: &R) -> bool {
    rows.iter().any(|row| row == record)
}

impl<R: Table> Default for RecordSet<R> {
    fn default() -> Self {
        Self::new()
    }
}
