use crate::expression::{Action, Predicate};

/// A condition and the action it sets off, attached to a record type and
/// checked for every record as it is inserted.
pub struct Trigger<R> {
    condition: Predicate<R>,
    action: Action<R>,
}

impl<R: 'static> Trigger<R> {
    pub fn new(condition: Predicate<R>, action: Action<R>) -> Self {
        Self { condition, action }
    }
    /// Applies the action to `record` when the condition holds for it.
    /// Returns whether the trigger fired.
    pub fn fire(&self, record: &mut R, rows: &[R]) -> bool {
        if self.condition.evaluate(record, rows) {
            self.action.apply(record, rows);
            true
        } else {
            false
        }
    }
}
