//! Composable, lazily evaluated expressions over records.
//!
//! Three families make up the algebra:
//! * [`Operand`] – value producing: a field reference, a literal, a sum or
//!   the maximum of a column across the set.
//! * [`Predicate`] – boolean: comparisons of two operands of the same type,
//!   combined with a short-circuiting AND.
//! * [`Action`] – mutating: assignments of operands to fields, possibly
//!   sequenced into a single action.
//!
//! Operands and predicates read a record (`&R`), actions write one (`&mut R`).
//! All of them also see the rows of the set that owns the record, which is
//! what aggregate operands such as [`Operand::Max`] are evaluated over.
//! Since operands of a comparison or assignment share their type parameter,
//! combining incompatible types is rejected when the expression is built.

use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::datatype::{DataType, Summable};
use crate::error::{KeepsetError, Result};
use crate::field::Column;

// ------------- Operand -------------
pub enum Operand<R, T> {
    Field(Column<R, T>),
    Literal(T),
    Plus {
        left: Box<Operand<R, T>>,
        right: Box<Operand<R, T>>,
        add: fn(&T, &T) -> T,
    },
    /// Largest value of the column among the rows of the set,
    /// or the type's default when the set is empty.
    Max(Column<R, T>),
}

impl<R: 'static, T: DataType> Operand<R, T> {
    pub fn evaluate<'a>(&'a self, record: &'a R, rows: &'a [R]) -> Cow<'a, T> {
        match self {
            Operand::Field(column) => Cow::Borrowed(column.get(record)),
            Operand::Literal(value) => Cow::Borrowed(value),
            Operand::Plus { left, right, add } => Cow::Owned(add(
                &left.evaluate(record, rows),
                &right.evaluate(record, rows),
            )),
            Operand::Max(column) => {
                let mut largest: Option<&T> = None;
                for row in rows {
                    let value = column.get(row);
                    if largest.is_none_or(|l| value > l) {
                        largest = Some(value);
                    }
                }
                match largest {
                    Some(value) => Cow::Borrowed(value),
                    None => Cow::Owned(T::default()),
                }
            }
        }
    }
    /// Evaluates and wraps the result as a literal, so it can be fed into
    /// further expressions without being evaluated again.
    pub fn reduce(&self, record: &R, rows: &[R]) -> Operand<R, T> {
        Operand::Literal(self.evaluate(record, rows).into_owned())
    }
    pub fn data_type(&self) -> &'static str {
        T::DATA_TYPE
    }
    pub fn compare(self, comparator: Comparator, other: impl IntoOperand<R, T>) -> Predicate<R> {
        Predicate::Compare(Box::new(Compare {
            comparator,
            left: self,
            right: other.into_operand(),
        }))
    }
    pub fn equals(self, other: impl IntoOperand<R, T>) -> Predicate<R> {
        self.compare(Comparator::Equal, other)
    }
    pub fn not_equals(self, other: impl IntoOperand<R, T>) -> Predicate<R> {
        self.compare(Comparator::NotEqual, other)
    }
    pub fn greater_than(self, other: impl IntoOperand<R, T>) -> Predicate<R> {
        self.compare(Comparator::GreaterThan, other)
    }
    pub fn less_than(self, other: impl IntoOperand<R, T>) -> Predicate<R> {
        self.compare(Comparator::LessThan, other)
    }
}

impl<R: 'static, T: Summable> Operand<R, T> {
    pub fn plus(self, other: impl IntoOperand<R, T>) -> Operand<R, T> {
        Operand::Plus {
            left: Box::new(self),
            right: Box::new(other.into_operand()),
            add: T::plus,
        }
    }
}

impl<R, T: Clone> Clone for Operand<R, T> {
    fn clone(&self) -> Self {
        match self {
            Operand::Field(column) => Operand::Field(*column),
            Operand::Literal(value) => Operand::Literal(value.clone()),
            Operand::Plus { left, right, add } => Operand::Plus {
                left: left.clone(),
                right: right.clone(),
                add: *add,
            },
            Operand::Max(column) => Operand::Max(*column),
        }
    }
}

impl<R, T: DataType> fmt::Display for Operand<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Field(column) => write!(f, "{}", column.name()),
            Operand::Literal(value) => write!(f, "{:?}", value),
            Operand::Plus { left, right, .. } => write!(f, "{} + {}", left, right),
            Operand::Max(column) => write!(f, "max({})", column.name()),
        }
    }
}

/// Anything that can stand on either side of a comparison or on the
/// right side of an assignment: operands, columns and plain values.
pub trait IntoOperand<R, T> {
    fn into_operand(self) -> Operand<R, T>;
}
impl<R, T> IntoOperand<R, T> for Operand<R, T> {
    fn into_operand(self) -> Operand<R, T> {
        self
    }
}
impl<R, T> IntoOperand<R, T> for Column<R, T> {
    fn into_operand(self) -> Operand<R, T> {
        Operand::Field(self)
    }
}
macro_rules! literal_operand {
    ($($t:ty),*) => {
        $(
            impl<R> IntoOperand<R, $t> for $t {
                fn into_operand(self) -> Operand<R, $t> {
                    Operand::Literal(self)
                }
            }
        )*
    };
}
literal_operand!(i64, f64, String, NaiveDate, NaiveDateTime);
impl<R> IntoOperand<R, String> for &str {
    fn into_operand(self) -> Operand<R, String> {
        Operand::Literal(self.to_string())
    }
}

// ------------- Column builders -------------
impl<R: 'static, T: DataType> Column<R, T> {
    pub fn equals(self, other: impl IntoOperand<R, T>) -> Predicate<R> {
        Operand::Field(self).equals(other)
    }
    pub fn not_equals(self, other: impl IntoOperand<R, T>) -> Predicate<R> {
        Operand::Field(self).not_equals(other)
    }
    pub fn greater_than(self, other: impl IntoOperand<R, T>) -> Predicate<R> {
        Operand::Field(self).greater_than(other)
    }
    pub fn less_than(self, other: impl IntoOperand<R, T>) -> Predicate<R> {
        Operand::Field(self).less_than(other)
    }
    pub fn max(self) -> Operand<R, T> {
        Operand::Max(self)
    }
    pub fn assign(self, value: impl IntoOperand<R, T>) -> Action<R> {
        Action::Assign(Box::new(Assign {
            target: self,
            value: value.into_operand(),
        }))
    }
}
impl<R: 'static, T: Summable> Column<R, T> {
    pub fn plus(self, other: impl IntoOperand<R, T>) -> Operand<R, T> {
        Operand::Field(self).plus(other)
    }
}

// ------------- Predicate -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
}
impl Comparator {
    pub fn test<T: PartialOrd>(&self, left: &T, right: &T) -> bool {
        match self {
            Comparator::Equal => left == right,
            Comparator::NotEqual => left != right,
            Comparator::GreaterThan => left > right,
            Comparator::LessThan => left < right,
        }
    }
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::GreaterThan => ">",
            Comparator::LessThan => "<",
        }
    }
}

/// A boolean test of a record.
pub trait Condition<R> {
    fn holds(&self, record: &R, rows: &[R]) -> bool;
}

pub struct Compare<R, T> {
    comparator: Comparator,
    left: Operand<R, T>,
    right: Operand<R, T>,
}
impl<R: 'static, T: DataType> Condition<R> for Compare<R, T> {
    fn holds(&self, record: &R, rows: &[R]) -> bool {
        let left = self.left.evaluate(record, rows);
        let right = self.right.evaluate(record, rows);
        self.comparator.test(&*left, &*right)
    }
}
impl<R, T: DataType> fmt::Display for Compare<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.comparator.symbol(), self.right)
    }
}

pub enum Predicate<R> {
    /// Holds for every record.
    Always,
    Compare(Box<dyn Condition<R>>),
    /// Short-circuits: the right side is never evaluated when the left fails.
    And(Box<Predicate<R>>, Box<Predicate<R>>),
}

impl<R: 'static> Predicate<R> {
    pub fn custom(condition: impl Condition<R> + 'static) -> Self {
        Predicate::Compare(Box::new(condition))
    }
    pub fn and(self, other: Predicate<R>) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }
    pub fn evaluate(&self, record: &R, rows: &[R]) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Compare(condition) => condition.holds(record, rows),
            Predicate::And(left, right) => {
                left.evaluate(record, rows) && right.evaluate(record, rows)
            }
        }
    }
}

// ------------- Action -------------
/// A change applied to a record in place.
pub trait Mutation<R> {
    fn apply(&self, record: &mut R, rows: &[R]) -> bool;
}

pub struct Assign<R, T> {
    target: Column<R, T>,
    value: Operand<R, T>,
}
impl<R: 'static, T: DataType> Mutation<R> for Assign<R, T> {
    fn apply(&self, record: &mut R, rows: &[R]) -> bool {
        let value = self.value.evaluate(record, rows).into_owned();
        self.target.set(record, value);
        true
    }
}

pub enum Action<R> {
    Assign(Box<dyn Mutation<R>>),
    /// Runs every member, left to right.
    Sequence(Vec<Action<R>>),
}

impl<R: 'static> Action<R> {
    pub fn custom(mutation: impl Mutation<R> + 'static) -> Self {
        Action::Assign(Box::new(mutation))
    }
    /// Appends another action to run after this one.
    pub fn then(self, next: Action<R>) -> Self {
        match self {
            Action::Sequence(mut actions) => {
                actions.push(next);
                Action::Sequence(actions)
            }
            single => Action::Sequence(vec![single, next]),
        }
    }
    pub fn apply(&self, record: &mut R, rows: &[R]) -> bool {
        match self {
            Action::Assign(mutation) => mutation.apply(record, rows),
            Action::Sequence(actions) => {
                for action in actions {
                    action.apply(record, rows);
                }
                true
            }
        }
    }
}

// ------------- Free builders -------------
/// Wraps a constant so it composes with field references.
pub fn val<R, T>(value: T) -> Operand<R, T> {
    Operand::Literal(value)
}
pub fn equals<R: 'static, T: DataType>(
    left: impl IntoOperand<R, T>,
    right: impl IntoOperand<R, T>,
) -> Predicate<R> {
    left.into_operand().equals(right)
}
pub fn not_equals<R: 'static, T: DataType>(
    left: impl IntoOperand<R, T>,
    right: impl IntoOperand<R, T>,
) -> Predicate<R> {
    left.into_operand().not_equals(right)
}
pub fn greater_than<R: 'static, T: DataType>(
    left: impl IntoOperand<R, T>,
    right: impl IntoOperand<R, T>,
) -> Predicate<R> {
    left.into_operand().greater_than(right)
}
pub fn less_than<R: 'static, T: DataType>(
    left: impl IntoOperand<R, T>,
    right: impl IntoOperand<R, T>,
) -> Predicate<R> {
    left.into_operand().less_than(right)
}
pub fn and<R: 'static>(left: Predicate<R>, right: Predicate<R>) -> Predicate<R> {
    left.and(right)
}
pub fn plus<R: 'static, T: Summable>(
    left: impl IntoOperand<R, T>,
    right: impl IntoOperand<R, T>,
) -> Operand<R, T> {
    left.into_operand().plus(right)
}
pub fn max<R: 'static, T: DataType>(column: Column<R, T>) -> Operand<R, T> {
    Operand::Max(column)
}
pub fn assign<R: 'static, T: DataType>(
    target: Column<R, T>,
    value: impl IntoOperand<R, T>,
) -> Action<R> {
    target.assign(value)
}
pub fn sequence<R: 'static>(actions: impl IntoIterator<Item = Action<R>>) -> Action<R> {
    Action::Sequence(actions.into_iter().collect())
}

// ------------- AnyOperand -------------
/// An operand with its value type turned into a tag. Combining two of them
/// checks the tags first and fails with a type error instead of building
/// an expression that could not be evaluated.
pub enum AnyOperand<R> {
    Integer(Operand<R, i64>),
    Text(Operand<R, String>),
    Real(Operand<R, f64>),
    Date(Operand<R, NaiveDate>),
    DateTime(Operand<R, NaiveDateTime>),
}

impl<R: 'static> AnyOperand<R> {
    pub fn data_type(&self) -> &'static str {
        match self {
            AnyOperand::Integer(o) => o.data_type(),
            AnyOperand::Text(o) => o.data_type(),
            AnyOperand::Real(o) => o.data_type(),
            AnyOperand::Date(o) => o.data_type(),
            AnyOperand::DateTime(o) => o.data_type(),
        }
    }
    pub fn compare(self, comparator: Comparator, other: AnyOperand<R>) -> Result<Predicate<R>> {
        match (self, other) {
            (AnyOperand::Integer(l), AnyOperand::Integer(r)) => Ok(l.compare(comparator, r)),
            (AnyOperand::Text(l), AnyOperand::Text(r)) => Ok(l.compare(comparator, r)),
            (AnyOperand::Real(l), AnyOperand::Real(r)) => Ok(l.compare(comparator, r)),
            (AnyOperand::Date(l), AnyOperand::Date(r)) => Ok(l.compare(comparator, r)),
            (AnyOperand::DateTime(l), AnyOperand::DateTime(r)) => Ok(l.compare(comparator, r)),
            (l, r) => Err(KeepsetError::TypeMismatch {
                left: l.data_type(),
                right: r.data_type(),
            }),
        }
    }
    pub fn plus(self, other: AnyOperand<R>) -> Result<AnyOperand<R>> {
        match (self, other) {
            (AnyOperand::Integer(l), AnyOperand::Integer(r)) => Ok(AnyOperand::Integer(l.plus(r))),
            (AnyOperand::Text(l), AnyOperand::Text(r)) => Ok(AnyOperand::Text(l.plus(r))),
            (AnyOperand::Real(l), AnyOperand::Real(r)) => Ok(AnyOperand::Real(l.plus(r))),
            (l @ AnyOperand::Date(_), AnyOperand::Date(_))
            | (l @ AnyOperand::DateTime(_), AnyOperand::DateTime(_)) => {
                Err(KeepsetError::NotSummable { data_type: l.data_type() })
            }
            (l, r) => Err(KeepsetError::TypeMismatch {
                left: l.data_type(),
                right: r.data_type(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column;
    use crate::field::Field;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, PartialEq, Debug)]
    struct Sample {
        a: Field<i64>,
        b: Field<i64>,
        s: Field<String>,
    }
    fn sample(a: i64, b: i64, s: &str) -> Sample {
        Sample {
            a: Field::new("a", a),
            b: Field::new("b", b),
            s: Field::new("s", s),
        }
    }
    fn a() -> Column<Sample, i64> {
        column!(Sample::a)
    }
    fn b() -> Column<Sample, i64> {
        column!(Sample::b)
    }
    fn s() -> Column<Sample, String> {
        column!(Sample::s)
    }

    #[test]
    fn literal_ignores_record() {
        let one: Operand<Sample, i64> = val(1);
        assert_eq!(*one.evaluate(&sample(5, 6, ""), &[]), 1);
        assert_eq!(*one.evaluate(&sample(7, 8, "x"), &[]), 1);
    }

    #[test]
    fn plus_reduces_to_literal() {
        let record = sample(1000, 0, "first_name");
        let sum = a().plus(a()).reduce(&record, &[]);
        assert!(matches!(sum, Operand::Literal(2000)));
        assert_eq!(*a().plus(1).evaluate(&record, &[]), 1001);
        let text = s().plus("second_name");
        assert_eq!(text.evaluate(&record, &[]).into_owned(), "first_namesecond_name");
        // a reduced sum is a valid operand for a further comparison
        assert!(sum.equals(2000).evaluate(&record, &[]));
    }

    #[test]
    fn plus_adds_or_concatenates() {
        let record = sample(2, 3, "foo");
        assert_eq!(*plus(a(), b()).evaluate(&record, &[]), 5);
        assert_eq!(*s().plus(val("bar".to_string())).evaluate(&record, &[]), "foobar");
    }

    #[test]
    fn comparisons() {
        let record = sample(2, 3, "x");
        assert!(a().less_than(b()).evaluate(&record, &[]));
        assert!(b().greater_than(a()).evaluate(&record, &[]));
        assert!(a().not_equals(3).evaluate(&record, &[]));
        assert!(!equals(a(), b()).evaluate(&record, &[]));
        assert!(equals(s(), "x").evaluate(&record, &[]));
    }

    #[test]
    fn max_over_rows() {
        let rows = vec![sample(3, 0, ""), sample(9, 0, ""), sample(4, 0, "")];
        let next = max(a()).plus(val(1));
        assert_eq!(*next.evaluate(&sample(0, 0, ""), &rows), 10);
        assert_eq!(*next.evaluate(&sample(0, 0, ""), &[]), 1);
    }

    struct Counting(Rc<Cell<usize>>);
    impl Condition<Sample> for Counting {
        fn holds(&self, _: &Sample, _: &[Sample]) -> bool {
            self.0.set(self.0.get() + 1);
            true
        }
    }

    #[test]
    fn and_short_circuits() {
        let calls = Rc::new(Cell::new(0));
        let predicate = a().equals(1).and(Predicate::custom(Counting(Rc::clone(&calls))));
        assert!(!predicate.evaluate(&sample(2, 0, ""), &[]));
        assert_eq!(calls.get(), 0);
        assert!(predicate.evaluate(&sample(1, 0, ""), &[]));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn sequence_runs_in_order() {
        let mut record = sample(1, 2, "");
        let action = sequence([a().assign(10), b().assign(a().plus(1)), s().assign("done")]);
        assert!(action.apply(&mut record, &[]));
        assert_eq!(record, sample(10, 11, "done"));
    }

    #[test]
    fn erased_operands_check_tags() {
        let int = AnyOperand::<Sample>::Integer(val(1));
        let text = AnyOperand::<Sample>::Text(val("x".to_string()));
        assert_eq!(
            int.compare(Comparator::Equal, text).err(),
            Some(KeepsetError::TypeMismatch { left: "INTEGER", right: "TEXT" })
        );
        let date = AnyOperand::<Sample>::Date(val(NaiveDate::default()));
        let other = AnyOperand::<Sample>::Date(val(NaiveDate::default()));
        assert_eq!(
            date.plus(other).err(),
            Some(KeepsetError::NotSummable { data_type: "DATE" })
        );
    }
}
