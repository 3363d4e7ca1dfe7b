use std::io::{self, BufRead, Write};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use keepset::column;
use keepset::constraint::Constraint;
use keepset::cursor::Cursor;
use keepset::dataset::RecordSet;
use keepset::error::Result;
use keepset::field::{Column, Field};
use keepset::query::{parse_predicate, parse_update};
use keepset::schema::{Definition, Schema, Table};
use keepset::settings::Settings;

lazy_static! {
    static ref COMMAND: Regex = Regex::new(r"^\s*(\w+)\s*(.*?)\s*$").unwrap();
}

#[derive(Clone, PartialEq, Debug)]
struct Person {
    id: Field<i64>,
    first_name: Field<String>,
    second_name: Field<String>,
}

impl Person {
    fn new(first_name: &str, second_name: &str) -> Self {
        Self {
            id: Field::new("id", 0),
            first_name: Field::new("first_name", first_name),
            second_name: Field::new("second_name", second_name),
        }
    }
    fn first_name() -> Column<Self, String> {
        column!(Person::first_name)
    }
    fn second_name() -> Column<Self, String> {
        column!(Person::second_name)
    }
}

impl Table for Person {
    const NAME: &'static str = "person";
    fn define(definition: &mut Definition<Self>) {
        definition
            .field(column!(Person::id))
            .constraint(Constraint::auto_increment());
        definition.field(Person::first_name());
        definition.field(Person::second_name());
    }
}

fn menu() {
    println!("add\tadd new person");
    println!("list\tlist persons");
    println!("filter\tfilter by name");
    println!("where <predicate>\tlist persons matching a predicate, e.g. id > 1 & first_name == \"John\"");
    println!("update <predicate> set <action>\te.g. id == 2 set first_name = \"John\", second_name = \"Appleseed\"");
    println!("schema\tdescribe the person record");
    println!("quit\tleave");
}

fn ask(input: &mut impl BufRead, question: &str) -> io::Result<String> {
    print!("{question}: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, format!("no {question} given")));
    }
    Ok(answer.trim().to_string())
}

fn print_all(schema: &Schema<Person>, cursor: Cursor<Person>) {
    println!("---");
    // the cursor knows its size up front
    let total = cursor.remaining();
    for person in cursor {
        println!("{}", schema.render(&person));
    }
    println!("---");
    println!("total: {total}");
}

/// Runs one command line. Returns false when the session should end.
fn execute(persons: &mut RecordSet<Person>, line: &str, input: &mut impl BufRead) -> Result<bool> {
    let Some(captures) = COMMAND.captures(line) else {
        return Ok(true);
    };
    let argument = captures.get(2).map_or("", |m| m.as_str());
    match &captures[1] {
        "add" => {
            let first_name = ask(input, "first_name")?;
            let second_name = ask(input, "second_name")?;
            persons.insert(Person::new(&first_name, &second_name))?;
        }
        "list" => print_all(persons.schema(), persons.cursor()),
        "filter" => {
            let first_name = ask(input, "first_name")?;
            let second_name = ask(input, "second_name")?;
            let predicate = Person::first_name()
                .equals(first_name)
                .and(Person::second_name().equals(second_name));
            print_all(persons.schema(), Cursor::new(persons.filter(&predicate)));
        }
        "where" => {
            let predicate = parse_predicate(persons.schema(), argument)?;
            print_all(persons.schema(), Cursor::new(persons.filter(&predicate)));
        }
        "update" => {
            let (predicate, action) = parse_update(persons.schema(), argument)?;
            let updated = persons.update_where(&predicate, &action);
            println!("updated: {updated}");
        }
        "schema" => match serde_json::to_string_pretty(&persons.schema().describe()) {
            Ok(json) => println!("{json}"),
            Err(e) => error!(error = %e, "could not describe schema"),
        },
        "quit" | "exit" => return Ok(false),
        _ => menu(),
    }
    Ok(true)
}

fn main() {
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("{e}, using default settings");
        Settings::default()
    });
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut persons = RecordSet::<Person>::new();
    for seed in &settings.seed {
        let mut names = seed.split_whitespace();
        let first_name = names.next().unwrap_or_default();
        let second_name = names.next().unwrap_or_default();
        if let Err(e) = persons.insert(Person::new(first_name, second_name)) {
            error!(error = %e, seed = %seed, "could not seed");
        }
    }
    info!(seeded = persons.len(), "keepset ready");

    println!("keepset testdb");
    menu();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("{}", settings.prompt);
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => (),
        }
        match execute(&mut persons, &line, &mut input) {
            Ok(true) => println!(),
            Ok(false) => break,
            Err(e) => println!("error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepset::error::KeepsetError;
    use std::io::{BufReader, Read};

    struct Broken;
    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stdin closed"))
        }
    }

    #[test]
    fn add_reads_both_names() {
        let mut persons = RecordSet::<Person>::new();
        let mut input = "Ada\nLovelace\n".as_bytes();
        assert_eq!(execute(&mut persons, "add", &mut input), Ok(true));
        assert_eq!(persons.len(), 1);
        assert_eq!(persons.schema().render(&persons.all()[0]), "person(1, Ada, Lovelace)");
    }

    #[test]
    fn input_errors_abort_the_command() {
        let mut persons = RecordSet::<Person>::new();
        let mut broken = BufReader::new(Broken);
        assert!(matches!(execute(&mut persons, "add", &mut broken), Err(KeepsetError::Io(_))));
        assert!(matches!(execute(&mut persons, "filter", &mut broken), Err(KeepsetError::Io(_))));
        // running out of input halfway is an error too
        let mut short = "Ada\n".as_bytes();
        assert!(matches!(execute(&mut persons, "add", &mut short), Err(KeepsetError::Io(_))));
        assert!(persons.is_empty());
    }

    #[test]
    fn update_command_keeps_literals_whole() {
        let mut persons = RecordSet::<Person>::new();
        persons.insert(Person::new("a set b", "x")).unwrap();
        let mut input = io::empty();
        let line = r#"update first_name == "a set b" set second_name = "y""#;
        assert_eq!(execute(&mut persons, line, &mut input), Ok(true));
        assert_eq!(persons.all()[0].second_name, "y");
    }
}
