// used to print out readable forms of a field
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::datatype::DataType;
use crate::expression::{Action, AnyOperand, Operand};
use crate::error::{KeepsetError, Result};

// ------------- Field -------------
/// A named, typed slot inside a record.
#[derive(Clone)]
pub struct Field<T> {
    name: &'static str,
    value: T,
}

impl<T: DataType> Field<T> {
    pub fn new(name: &'static str, value: impl Into<T>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
    // The name is only exposed through a getter, so assignment
    // can never rename the field.
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn value(&self) -> &T {
        &self.value
    }
    pub fn set(&mut self, value: impl Into<T>) {
        self.value = value.into();
    }
    pub fn data_type(&self) -> &'static str {
        T::DATA_TYPE
    }
}
// two fields are equal when their values are
impl<T: DataType> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
impl<T: DataType> PartialEq<T> for Field<T> {
    fn eq(&self, other: &T) -> bool {
        &self.value == other
    }
}
impl PartialEq<&str> for Field<String> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}
impl<T: DataType> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
impl<T: DataType> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {:?}", self.name, self.value)
    }
}

// ------------- Column -------------
/// Typed accessor for one field of a record type, usable on any instance.
///
/// A column never holds a record. It carries a pair of accessor functions
/// that project a record onto its field, which is what lets expressions
/// be built once and evaluated against every record in a set.
pub struct Column<R, T> {
    name: &'static str,
    get: fn(&R) -> &Field<T>,
    get_mut: fn(&mut R) -> &mut Field<T>,
}

impl<R, T: DataType> Column<R, T> {
    pub const fn new(
        name: &'static str,
        get: fn(&R) -> &Field<T>,
        get_mut: fn(&mut R) -> &mut Field<T>,
    ) -> Self {
        Self { name, get, get_mut }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn data_type(&self) -> &'static str {
        T::DATA_TYPE
    }
    pub fn field<'r>(&self, record: &'r R) -> &'r Field<T> {
        (self.get)(record)
    }
    pub fn field_mut<'r>(&self, record: &'r mut R) -> &'r mut Field<T> {
        (self.get_mut)(record)
    }
    pub fn get<'r>(&self, record: &'r R) -> &'r T {
        self.field(record).value()
    }
    pub fn set(&self, record: &mut R, value: T) {
        self.field_mut(record).set(value);
    }
}
impl<R, T> Clone for Column<R, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<R, T> Copy for Column<R, T> {}
impl<R, T: DataType> fmt::Debug for Column<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::<{}>", self.name, T::DATA_TYPE)
    }
}

/// Builds a [`Column`] for a field of a record struct.
///
/// ```
/// use keepset::column;
/// use keepset::field::{Column, Field};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Person { id: Field<i64> }
///
/// let id: Column<Person, i64> = column!(Person::id);
/// let mut p = Person { id: Field::new("id", 7) };
/// id.set(&mut p, 8);
/// assert_eq!(*id.get(&p), 8);
/// ```
#[macro_export]
macro_rules! column {
    ($table:ident :: $field:ident) => {
        $crate::field::Column::new(
            stringify!($field),
            |record: &$table| &record.$field,
            |record: &mut $table| &mut record.$field,
        )
    };
}

// ------------- AnyColumn -------------
/// A column with its value type turned into a tag, so that schemas can
/// hold columns of different types in declaration order.
pub enum AnyColumn<R> {
    Integer(Column<R, i64>),
    Text(Column<R, String>),
    Real(Column<R, f64>),
    Date(Column<R, NaiveDate>),
    DateTime(Column<R, NaiveDateTime>),
}

impl<R: 'static> AnyColumn<R> {
    pub fn name(&self) -> &'static str {
        match self {
            AnyColumn::Integer(c) => c.name(),
            AnyColumn::Text(c) => c.name(),
            AnyColumn::Real(c) => c.name(),
            AnyColumn::Date(c) => c.name(),
            AnyColumn::DateTime(c) => c.name(),
        }
    }
    pub fn data_type(&self) -> &'static str {
        match self {
            AnyColumn::Integer(c) => c.data_type(),
            AnyColumn::Text(c) => c.data_type(),
            AnyColumn::Real(c) => c.data_type(),
            AnyColumn::Date(c) => c.data_type(),
            AnyColumn::DateTime(c) => c.data_type(),
        }
    }
    /// Renders the field's value on `record`.
    pub fn display(&self, record: &R) -> String {
        match self {
            AnyColumn::Integer(c) => c.field(record).to_string(),
            AnyColumn::Text(c) => c.field(record).to_string(),
            AnyColumn::Real(c) => c.field(record).to_string(),
            AnyColumn::Date(c) => c.field(record).to_string(),
            AnyColumn::DateTime(c) => c.field(record).to_string(),
        }
    }
    pub fn operand(self) -> AnyOperand<R> {
        match self {
            AnyColumn::Integer(c) => AnyOperand::Integer(Operand::Field(c)),
            AnyColumn::Text(c) => AnyOperand::Text(Operand::Field(c)),
            AnyColumn::Real(c) => AnyOperand::Real(Operand::Field(c)),
            AnyColumn::Date(c) => AnyOperand::Date(Operand::Field(c)),
            AnyColumn::DateTime(c) => AnyOperand::DateTime(Operand::Field(c)),
        }
    }
    pub fn maximum(self) -> AnyOperand<R> {
        match self {
            AnyColumn::Integer(c) => AnyOperand::Integer(Operand::Max(c)),
            AnyColumn::Text(c) => AnyOperand::Text(Operand::Max(c)),
            AnyColumn::Real(c) => AnyOperand::Real(Operand::Max(c)),
            AnyColumn::Date(c) => AnyOperand::Date(Operand::Max(c)),
            AnyColumn::DateTime(c) => AnyOperand::DateTime(Operand::Max(c)),
        }
    }
    /// Assignment with the type check deferred to build time.
    pub fn assign(self, value: AnyOperand<R>) -> Result<Action<R>> {
        match (self, value) {
            (AnyColumn::Integer(c), AnyOperand::Integer(v)) => Ok(c.assign(v)),
            (AnyColumn::Text(c), AnyOperand::Text(v)) => Ok(c.assign(v)),
            (AnyColumn::Real(c), AnyOperand::Real(v)) => Ok(c.assign(v)),
            (AnyColumn::Date(c), AnyOperand::Date(v)) => Ok(c.assign(v)),
            (AnyColumn::DateTime(c), AnyOperand::DateTime(v)) => Ok(c.assign(v)),
            (c, v) => Err(KeepsetError::TypeMismatch {
                left: c.data_type(),
                right: v.data_type(),
            }),
        }
    }
}
impl<R> Clone for AnyColumn<R> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<R> Copy for AnyColumn<R> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    struct Pair {
        left: Field<i64>,
        right: Field<String>,
    }

    #[test]
    fn assignment_keeps_name() {
        let mut pair = Pair {
            left: Field::new("left", 1),
            right: Field::new("right", "a"),
        };
        let left: Column<Pair, i64> = column!(Pair::left);
        left.set(&mut pair, 42);
        assert_eq!(pair.left.name(), "left");
        assert_eq!(pair.left, 42);
        pair.right.set("b");
        assert_eq!(pair.right, "b");
        assert_eq!(pair.right.data_type(), "TEXT");
    }

    #[test]
    fn field_equality_ignores_name() {
        assert_eq!(Field::<i64>::new("a", 3), Field::<i64>::new("b", 3));
        assert_ne!(Field::<i64>::new("a", 3), Field::<i64>::new("a", 4));
    }

    #[test]
    fn erased_assignment_checks_types() {
        let right: Column<Pair, String> = column!(Pair::right);
        let erased = AnyColumn::Text(right);
        assert_eq!(erased.name(), "right");
        let err = erased.assign(AnyOperand::Integer(Operand::Literal(1))).err();
        assert_eq!(
            err,
            Some(KeepsetError::TypeMismatch { left: "TEXT", right: "INTEGER" })
        );
    }
}
