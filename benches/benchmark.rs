use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use keepset::column;
use keepset::constraint::Constraint;
use keepset::dataset::RecordSet;
use keepset::field::{Column, Field};
use keepset::query::parse_predicate;
use keepset::schema::{Definition, Table};

#[derive(Clone, PartialEq, Debug)]
struct Person {
    id: Field<i64>,
    first_name: Field<String>,
    second_name: Field<String>,
}

impl Person {
    fn new(n: usize) -> Self {
        Self {
            id: Field::new("id", 0),
            first_name: Field::new("first_name", format!("first_name{}", n % 100)),
            second_name: Field::new("second_name", format!("second_name{n}")),
        }
    }
    fn id() -> Column<Self, i64> {
        column!(Person::id)
    }
    fn first_name() -> Column<Self, String> {
        column!(Person::first_name)
    }
}

impl Table for Person {
    const NAME: &'static str = "person";
    fn define(definition: &mut Definition<Self>) {
        definition
            .field(Person::id())
            .constraint(Constraint::auto_increment());
        definition.field(Person::first_name());
        definition.field(column!(Person::second_name));
    }
}

fn populated(size: usize) -> RecordSet<Person> {
    let mut persons = RecordSet::new();
    for n in 0..size {
        let _ = persons.insert(Person::new(n));
    }
    persons
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("insert 1k", |b| b.iter(|| populated(black_box(1_000))));

    for (label, size) in [("1k", 1_000), ("100k", 100_000)] {
        let persons = populated(size);
        let predicate = Person::id()
            .greater_than(10)
            .and(Person::first_name().equals("first_name7"));
        c.bench_function(&format!("filter {label}"), |b| {
            b.iter(|| persons.filter(black_box(&predicate)))
        });
        let parsed = parse_predicate(persons.schema(), r#"id > 10 & first_name == "first_name7""#)
            .expect("benchmark predicate parses");
        c.bench_function(&format!("parsed filter {label}"), |b| {
            b.iter(|| persons.filter(black_box(&parsed)))
        });
    }

    let mut persons = populated(10_000);
    let action = Person::id().assign(Person::id().plus(1));
    c.bench_function("update 10k", |b| b.iter(|| persons.update(black_box(&action))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
