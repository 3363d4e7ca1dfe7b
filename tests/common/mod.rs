#![allow(dead_code)]

use keepset::column;
use keepset::field::{Column, Field};
use keepset::schema::{Definition, Table};

/// A person with caller-supplied ids and no constraints or triggers.
#[derive(Clone, PartialEq, Debug)]
pub struct Person {
    pub id: Field<i64>,
    pub first_name: Field<String>,
    pub second_name: Field<String>,
}

impl Person {
    pub fn new(id: i64, first_name: &str, second_name: &str) -> Self {
        Self {
            id: Field::new("id", id),
            first_name: Field::new("first_name", first_name),
            second_name: Field::new("second_name", second_name),
        }
    }
    pub fn id() -> Column<Self, i64> {
        column!(Person::id)
    }
    pub fn first_name() -> Column<Self, String> {
        column!(Person::first_name)
    }
    pub fn second_name() -> Column<Self, String> {
        column!(Person::second_name)
    }
}

impl Table for Person {
    const NAME: &'static str = "person";
    fn define(definition: &mut Definition<Self>) {
        definition.field(Person::id());
        definition.field(Person::first_name());
        definition.field(Person::second_name());
    }
}

pub fn ids(persons: &[Person]) -> Vec<i64> {
    persons.iter().map(|p| *p.id.value()).collect()
}
