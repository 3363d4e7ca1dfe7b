//! Keepset – an embeddable, in-process store of typed records.
//!
//! Keepset centers on the *record set*: an ordered, in-memory collection of
//! records of one type, queried and changed through composable expressions.
//! * A [`field::Field`] is a named, typed slot of a record.
//! * A [`schema::Table`] is a record type: a struct of fields that declares
//!   them, their constraints and its triggers once, in a [`schema::Definition`].
//! * A [`field::Column`] is a typed accessor for one field of a record type,
//!   built with the [`column!`] macro, from which expressions start.
//! * An [`expression::Predicate`] tests a record, an [`expression::Action`]
//!   changes one, and an [`expression::Operand`] yields a value from one.
//! * A [`dataset::RecordSet`] owns the records and runs constraints and
//!   triggers as they are inserted.
//!
//! ## Modules
//! * [`datatype`] – The [`datatype::DataType`] trait and the supported value
//!   types with their type names (`INTEGER`, `TEXT`, `REAL`, `DATE`, `DATETIME`).
//! * [`field`] – Fields, columns and type-tagged columns.
//! * [`schema`] – Record type definitions and their schemas.
//! * [`expression`] – Operands, predicates and actions.
//! * [`constraint`] – Auto-increment, uniqueness and case rules bound to fields.
//! * [`trigger`] – Condition/action pairs run at insertion.
//! * [`dataset`] – Record sets.
//! * [`cursor`] – One-shot forward cursors over record snapshots.
//! * [`query`] – A small textual language (parsed with pest) for predicates
//!   and actions, resolved against a schema.
//! * [`settings`] – Settings for the interactive front end.
//!
//! ## Quick Start
//! ```
//! use keepset::column;
//! use keepset::constraint::Constraint;
//! use keepset::dataset::RecordSet;
//! use keepset::field::{Column, Field};
//! use keepset::schema::{Definition, Table};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Person {
//!     id: Field<i64>,
//!     name: Field<String>,
//! }
//! impl Person {
//!     fn new(name: &str) -> Self {
//!         Self { id: Field::new("id", 0), name: Field::new("name", name) }
//!     }
//!     fn id() -> Column<Self, i64> { column!(Person::id) }
//!     fn name() -> Column<Self, String> { column!(Person::name) }
//! }
//! impl Table for Person {
//!     const NAME: &'static str = "person";
//!     fn define(definition: &mut Definition<Self>) {
//!         definition.field(Person::id()).constraint(Constraint::auto_increment());
//!         definition.field(Person::name());
//!     }
//! }
//!
//! let mut persons = RecordSet::<Person>::new();
//! persons.insert(Person::new("Alice")).unwrap();
//! persons.insert(Person::new("Bob")).unwrap();
//! let bob = persons.filter(&Person::id().greater_than(1));
//! assert_eq!(bob[0].name, "Bob");
//! persons.update_where(&Person::name().equals("Bob"), &Person::name().assign("Robert"));
//! assert_eq!(persons.all()[1].name, "Robert");
//! ```
//!
//! ## Scope
//! Everything lives in memory and in one thread. There is no persistence,
//! no query planning and no deletion; a set only grows, and its records only
//! change through updates.

pub mod constraint;
pub mod cursor;
pub mod dataset;
pub mod datatype;
pub mod error;
pub mod expression;
pub mod field;
pub mod query;
pub mod schema;
pub mod settings;
pub mod trigger;
