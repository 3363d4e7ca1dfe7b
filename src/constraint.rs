use tracing::trace;

use crate::dataset::exists;
use crate::datatype::DataType;
use crate::error::{KeepsetError, Result};
use crate::field::Column;
use crate::schema::Table;

#[derive(Clone)]
enum Rule<T> {
    /// Rewrites the value from its current value and the size of the set.
    Derive(fn(&T, usize) -> T),
    /// No stored record may equal the inserted one in every field.
    Unique,
    /// No stored record may hold the same value in this field.
    UniqueValue,
    /// Runs every member in order, whatever their outcomes.
    Any(Vec<Constraint<T>>),
}

/// A named rule bound to a field at definition time and evaluated
/// afresh for every record inserted into a set.
#[derive(Clone)]
pub struct Constraint<T> {
    name: &'static str,
    rule: Rule<T>,
}

impl<T: DataType> Constraint<T> {
    pub fn derive(name: &'static str, derivation: fn(&T, usize) -> T) -> Self {
        Self {
            name,
            rule: Rule::Derive(derivation),
        }
    }
    pub fn unique() -> Self {
        Self {
            name: "unique",
            rule: Rule::Unique,
        }
    }
    pub fn unique_value() -> Self {
        Self {
            name: "unique_value",
            rule: Rule::UniqueValue,
        }
    }
    pub fn or(self, other: Constraint<T>) -> Self {
        match self.rule {
            Rule::Any(mut members) => {
                members.push(other);
                Self {
                    name: self.name,
                    rule: Rule::Any(members),
                }
            }
            rule => Self {
                name: "any",
                rule: Rule::Any(vec![Self { name: self.name, rule }, other]),
            },
        }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    /// Number of member rules; one unless composed with [`Constraint::or`].
    pub fn len(&self) -> usize {
        match &self.rule {
            Rule::Any(members) => members.iter().map(Constraint::len).sum(),
            _ => 1,
        }
    }
    pub fn enforce<R: Table>(&self, column: &Column<R, T>, record: &mut R, rows: &[R]) -> Result<()> {
        trace!(table = R::NAME, field = column.name(), constraint = self.name, "enforcing");
        match &self.rule {
            Rule::Derive(derivation) => {
                let derived = derivation(column.get(record), rows.len());
                column.set(record, derived);
                Ok(())
            }
            Rule::Unique => {
                if exists(rows, &*record) {
                    return Err(violation::<R>(column.name()));
                }
                Ok(())
            }
            Rule::UniqueValue => {
                let value = column.get(record);
                if rows.iter().any(|row| column.get(row) == value) {
                    return Err(violation::<R>(column.name()));
                }
                Ok(())
            }
            Rule::Any(members) => {
                let mut outcome = Ok(());
                for member in members {
                    let result = member.enforce(column, record, rows);
                    if outcome.is_ok() {
                        outcome = result;
                    }
                }
                outcome
            }
        }
    }
}

impl Constraint<i64> {
    /// Overwrites the field with the size of the set plus one.
    pub fn auto_increment() -> Self {
        Self::derive("auto_increment", |_, size| size as i64 + 1)
    }
}

impl Constraint<String> {
    pub fn uppercase() -> Self {
        Self::derive("uppercase", |value, _| value.to_uppercase())
    }
    pub fn lowercase() -> Self {
        Self::derive("lowercase", |value, _| value.to_lowercase())
    }
}

fn violation<R: Table>(field: &str) -> KeepsetError {
    KeepsetError::UniqueConstraintViolation {
        table: R::NAME.to_string(),
        field: field.to_string(),
    }
}

// ------------- Enforcement -------------
/// A constraint attached to one field of a record type, with the
/// field's value type erased so a schema can hold all of them in order.
pub trait Enforce<R> {
    fn field(&self) -> &'static str;
    fn constraint(&self) -> &'static str;
    fn enforce(&self, record: &mut R, rows: &[R]) -> Result<()>;
}

pub(crate) struct Attached<R, T> {
    column: Column<R, T>,
    constraint: Constraint<T>,
}
impl<R, T> Attached<R, T> {
    pub(crate) fn new(column: Column<R, T>, constraint: Constraint<T>) -> Self {
        Self { column, constraint }
    }
}
impl<R: Table, T: DataType> Enforce<R> for Attached<R, T> {
    fn field(&self) -> &'static str {
        self.column.name()
    }
    fn constraint(&self) -> &'static str {
        self.constraint.name()
    }
    fn enforce(&self, record: &mut R, rows: &[R]) -> Result<()> {
        self.constraint.enforce(&self.column, record, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column;
    use crate::field::Field;
    use crate::schema::Definition;

    #[derive(Clone, PartialEq, Debug)]
    struct Tag {
        id: Field<i64>,
        label: Field<String>,
    }
    impl Table for Tag {
        const NAME: &'static str = "tag";
        fn define(definition: &mut Definition<Self>) {
            definition.field(column!(Tag::id));
            definition.field(column!(Tag::label));
        }
    }
    fn tag(id: i64, label: &str) -> Tag {
        Tag {
            id: Field::new("id", id),
            label: Field::new("label", label),
        }
    }
    fn id() -> Column<Tag, i64> {
        column!(Tag::id)
    }
    fn label() -> Column<Tag, String> {
        column!(Tag::label)
    }

    #[test]
    fn auto_increment_ignores_current_value() {
        let rows = vec![tag(1, "a"), tag(2, "b")];
        let mut record = tag(99, "c");
        Constraint::auto_increment().enforce(&id(), &mut record, &rows).unwrap();
        assert_eq!(record.id, 3);
    }

    #[test]
    fn unique_compares_whole_records() {
        let rows = vec![tag(1, "a")];
        let err = Constraint::unique().enforce(&label(), &mut tag(1, "a"), &rows);
        assert_eq!(
            err,
            Err(KeepsetError::UniqueConstraintViolation {
                table: "tag".into(),
                field: "label".into()
            })
        );
        assert!(Constraint::unique().enforce(&label(), &mut tag(2, "a"), &rows).is_ok());
    }

    #[test]
    fn unique_value_compares_one_field() {
        let rows = vec![tag(1, "a")];
        assert!(Constraint::unique_value().enforce(&label(), &mut tag(2, "a"), &rows).is_err());
        assert!(Constraint::unique_value().enforce(&label(), &mut tag(1, "b"), &rows).is_ok());
    }

    #[test]
    fn or_runs_every_member() {
        let rows = vec![tag(1, "HELLO")];
        let composed = Constraint::unique_value().or(Constraint::uppercase());
        assert_eq!(composed.len(), 2);
        let mut record = tag(2, "hello");
        // the uppercase derivation still runs after the check passed
        assert!(composed.enforce(&label(), &mut record, &rows).is_ok());
        assert_eq!(record.label, "HELLO");

        let composed = Constraint::uppercase().or(Constraint::unique_value()).or(Constraint::lowercase());
        assert_eq!(composed.len(), 3);
        let mut record = tag(2, "hello");
        assert!(composed.enforce(&label(), &mut record, &rows).is_err());
        // the failing member does not stop the ones after it
        assert_eq!(record.label, "hello");
    }
}
