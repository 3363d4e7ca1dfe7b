// used to keep the one-to-one mapping between field names and their positions
use bimap::BiMap;

// used to describe a schema in serialized form
use serde::Serialize;

use std::fmt;

use crate::constraint::{Attached, Constraint, Enforce};
use crate::datatype::DataType;
use crate::expression::{Action, Predicate};
use crate::field::{AnyColumn, Column};
use crate::trigger::Trigger;

/// A record type: a named struct of [`crate::field::Field`]s.
///
/// Records are compared structurally, which is what uniqueness checks and
/// [`crate::dataset::RecordSet::exists`] rely on.
pub trait Table: Clone + PartialEq + fmt::Debug + Sized + 'static {
    const NAME: &'static str;
    /// Registers fields in declaration order, along with their
    /// constraints, and the triggers of the record type.
    fn define(definition: &mut Definition<Self>);
}

// ------------- Definition -------------
pub struct Definition<R: Table> {
    columns: Vec<AnyColumn<R>>,
    positions: BiMap<&'static str, usize>,
    constraints: Vec<Box<dyn Enforce<R>>>,
    triggers: Vec<Trigger<R>>,
}

impl<R: Table> Definition<R> {
    fn new() -> Self {
        Self {
            columns: Vec::new(),
            positions: BiMap::new(),
            constraints: Vec::new(),
            triggers: Vec::new(),
        }
    }
    // A field is registered once; registering it again keeps its
    // original position, so declaration order is never disturbed.
    pub fn field<T: DataType>(&mut self, column: Column<R, T>) -> FieldDefinition<'_, R, T> {
        if !self.positions.contains_left(column.name()) {
            self.positions.insert(column.name(), self.columns.len());
            self.columns.push(T::any_column(column));
        }
        FieldDefinition {
            definition: self,
            column,
        }
    }
    pub fn trigger(&mut self, condition: Predicate<R>, action: Action<R>) -> &mut Self {
        self.triggers.push(Trigger::new(condition, action));
        self
    }
}

pub struct FieldDefinition<'d, R: Table, T> {
    definition: &'d mut Definition<R>,
    column: Column<R, T>,
}

impl<R: Table, T: DataType> FieldDefinition<'_, R, T> {
    pub fn constraint(self, constraint: Constraint<T>) -> Self {
        self.definition
            .constraints
            .push(Box::new(Attached::new(self.column, constraint)));
        self
    }
}

// ------------- Schema -------------
/// The fields, constraints and triggers of a record type, in declaration order.
pub struct Schema<R: Table> {
    columns: Vec<AnyColumn<R>>,
    positions: BiMap<&'static str, usize>,
    constraints: Vec<Box<dyn Enforce<R>>>,
    triggers: Vec<Trigger<R>>,
}

impl<R: Table> Schema<R> {
    pub fn new() -> Self {
        let mut definition = Definition::new();
        R::define(&mut definition);
        Self {
            columns: definition.columns,
            positions: definition.positions,
            constraints: definition.constraints,
            triggers: definition.triggers,
        }
    }
    pub fn table(&self) -> &'static str {
        R::NAME
    }
    pub fn columns(&self) -> &[AnyColumn<R>] {
        &self.columns
    }
    /// Field names paired with their type names.
    pub fn fields(&self) -> Vec<(&'static str, &'static str)> {
        self.columns
            .iter()
            .map(|column| (column.name(), column.data_type()))
            .collect()
    }
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get_by_left(name).copied()
    }
    pub fn name_at(&self, position: usize) -> Option<&'static str> {
        self.positions.get_by_right(&position).copied()
    }
    pub fn column(&self, name: &str) -> Option<AnyColumn<R>> {
        self.position(name).map(|position| self.columns[position])
    }
    pub fn constraints(&self) -> &[Box<dyn Enforce<R>>] {
        &self.constraints
    }
    pub fn triggers(&self) -> &[Trigger<R>] {
        &self.triggers
    }
    /// Renders a record as `table(value, ...)` in field order.
    pub fn render(&self, record: &R) -> String {
        let values: Vec<String> = self
            .columns
            .iter()
            .map(|column| column.display(record))
            .collect();
        format!("{}({})", R::NAME, values.join(", "))
    }
    pub fn describe(&self) -> SchemaDescription {
        SchemaDescription {
            table: R::NAME,
            fields: self
                .columns
                .iter()
                .map(|column| FieldDescription {
                    name: column.name(),
                    data_type: column.data_type(),
                })
                .collect(),
        }
    }
}

impl<R: Table> Default for Schema<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescription {
    pub table: &'static str,
    pub fields: Vec<FieldDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescription {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub data_type: &'static str,
}
