// used for date and timestamp fields
use chrono::{NaiveDate, NaiveDateTime};

// used to print out readable forms of a data type
use std::fmt;

use crate::field::{AnyColumn, Column};

pub trait DataType: fmt::Display + fmt::Debug + Clone + Default + PartialEq + PartialOrd + 'static {
    // static stuff which needs to be implemented downstream
    const UID: u8;
    const DATA_TYPE: &'static str;
    fn any_column<R>(column: Column<R, Self>) -> AnyColumn<R>;
    // instance callable with pre-made implementation
    fn data_type(&self) -> &'static str {
        Self::DATA_TYPE
    }
    fn identifier(&self) -> u8 {
        Self::UID
    }
}

/// Data types with a native `+`. Numbers add, text concatenates.
///
/// Integer addition wraps around on overflow (`i64::MAX + 1` is
/// `i64::MIN`) in every build profile, so evaluating an expression never
/// panics.
pub trait Summable: DataType {
    fn plus(&self, other: &Self) -> Self;
}

// ------------- Data Types --------------
impl DataType for i64 {
    const UID: u8 = 1;
    const DATA_TYPE: &'static str = "INTEGER";
    fn any_column<R>(column: Column<R, i64>) -> AnyColumn<R> {
        AnyColumn::Integer(column)
    }
}
impl DataType for String {
    const UID: u8 = 2;
    const DATA_TYPE: &'static str = "TEXT";
    fn any_column<R>(column: Column<R, String>) -> AnyColumn<R> {
        AnyColumn::Text(column)
    }
}
impl DataType for f64 {
    const UID: u8 = 3;
    const DATA_TYPE: &'static str = "REAL";
    fn any_column<R>(column: Column<R, f64>) -> AnyColumn<R> {
        AnyColumn::Real(column)
    }
}
impl DataType for NaiveDate {
    const UID: u8 = 4;
    const DATA_TYPE: &'static str = "DATE";
    fn any_column<R>(column: Column<R, NaiveDate>) -> AnyColumn<R> {
        AnyColumn::Date(column)
    }
}
impl DataType for NaiveDateTime {
    const UID: u8 = 5;
    const DATA_TYPE: &'static str = "DATETIME";
    fn any_column<R>(column: Column<R, NaiveDateTime>) -> AnyColumn<R> {
        AnyColumn::DateTime(column)
    }
}

impl Summable for i64 {
    fn plus(&self, other: &i64) -> i64 {
        self.wrapping_add(*other)
    }
}
impl Summable for f64 {
    fn plus(&self, other: &f64) -> f64 {
        self + other
    }
}
impl Summable for String {
    fn plus(&self, other: &String) -> String {
        let mut sum = String::with_capacity(self.len() + other.len());
        sum.push_str(self);
        sum.push_str(other);
        sum
    }
}
