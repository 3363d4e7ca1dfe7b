//! Textual predicates and actions, resolved against a [`Schema`].
//!
//! This is what lets an interactive front end build the same expression
//! trees the typed API builds. Field names are looked up in the schema and
//! dispatched on their type tag, so every type error surfaces here, while
//! the expression is built, never while it is evaluated.
//!
//! Text literals are double-quoted; a `"` inside one is written `\"` and a
//! backslash `\\`. Dates are single-quoted, `'2024-01-31'`, and datetimes
//! `'2024-01-31 12:00:00'`.

use chrono::{NaiveDate, NaiveDateTime};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::error::{KeepsetError, Result};
use crate::expression::{Action, AnyOperand, Comparator, Operand, Predicate};
use crate::field::AnyColumn;
use crate::schema::{Schema, Table};

#[derive(Parser)]
#[grammar = "query.pest"]
struct QueryParser;

/// Parses `field op operand (& field op operand)*` into a predicate.
pub fn parse_predicate<R: Table>(schema: &Schema<R>, text: &str) -> Result<Predicate<R>> {
    let mut root = parse(Rule::predicate, text)?.into_inner();
    comparisons(schema, next(&mut root)?)
}

/// Parses `field = operand (, field = operand)*` into an action.
pub fn parse_action<R: Table>(schema: &Schema<R>, text: &str) -> Result<Action<R>> {
    let mut root = parse(Rule::action, text)?.into_inner();
    assignments(schema, next(&mut root)?)
}

/// Parses `<predicate> set <action>`. The keyword is only recognized
/// outside text literals, so `name == "a set b" set id = 1` splits after
/// the literal.
pub fn parse_update<R: Table>(schema: &Schema<R>, text: &str) -> Result<(Predicate<R>, Action<R>)> {
    let mut root = parse(Rule::update, text)?.into_inner();
    let predicate = comparisons(schema, next(&mut root)?)?;
    next(&mut root)?; // set
    let action = assignments(schema, next(&mut root)?)?;
    Ok((predicate, action))
}

fn comparisons<R: Table>(schema: &Schema<R>, pair: Pair<'_, Rule>) -> Result<Predicate<R>> {
    let mut predicate: Option<Predicate<R>> = None;
    for pair in pair.into_inner() {
        let comparison = comparison(schema, pair)?;
        predicate = Some(match predicate {
            Some(previous) => previous.and(comparison),
            None => comparison,
        });
    }
    predicate.ok_or_else(|| parse_error("empty predicate"))
}

fn assignments<R: Table>(schema: &Schema<R>, pair: Pair<'_, Rule>) -> Result<Action<R>> {
    let mut assignments = Vec::new();
    for pair in pair.into_inner() {
        let mut inner = pair.into_inner();
        let target = resolve(schema, next(&mut inner)?.as_str())?;
        let value = operand(schema, next(&mut inner)?)?;
        assignments.push(target.assign(value)?);
    }
    match assignments.len() {
        0 => Err(parse_error("empty action")),
        1 => Ok(assignments.remove(0)),
        _ => Ok(Action::Sequence(assignments)),
    }
}

fn parse(rule: Rule, text: &str) -> Result<Pair<'_, Rule>> {
    QueryParser::parse(rule, text)
        .map_err(|e| parse_error(&e.to_string()))?
        .next()
        .ok_or_else(|| parse_error("nothing to parse"))
}

fn comparison<R: Table>(schema: &Schema<R>, pair: Pair<'_, Rule>) -> Result<Predicate<R>> {
    let mut inner = pair.into_inner();
    let left = operand(schema, next(&mut inner)?)?;
    let comparator = match next(&mut inner)?.as_str() {
        "==" => Comparator::Equal,
        "!=" => Comparator::NotEqual,
        ">" => Comparator::GreaterThan,
        "<" => Comparator::LessThan,
        other => return Err(parse_error(&format!("unknown comparator {other}"))),
    };
    let right = operand(schema, next(&mut inner)?)?;
    left.compare(comparator, right)
}

fn operand<R: Table>(schema: &Schema<R>, pair: Pair<'_, Rule>) -> Result<AnyOperand<R>> {
    let mut terms = pair.into_inner();
    let mut sum = term(schema, next(&mut terms)?)?;
    for pair in terms {
        sum = sum.plus(term(schema, pair)?)?;
    }
    Ok(sum)
}

fn term<R: Table>(schema: &Schema<R>, pair: Pair<'_, Rule>) -> Result<AnyOperand<R>> {
    let text = pair.as_str();
    match pair.as_rule() {
        Rule::identifier => Ok(resolve(schema, text)?.operand()),
        Rule::maximum => {
            let name = next(&mut pair.into_inner())?;
            Ok(resolve(schema, name.as_str())?.maximum())
        }
        Rule::integer => text
            .parse::<i64>()
            .map(|v| AnyOperand::Integer(Operand::Literal(v)))
            .map_err(|e| parse_error(&format!("{text}: {e}"))),
        Rule::real => text
            .parse::<f64>()
            .map(|v| AnyOperand::Real(Operand::Literal(v)))
            .map_err(|e| parse_error(&format!("{text}: {e}"))),
        Rule::text => {
            let chars = next(&mut pair.into_inner())?;
            Ok(AnyOperand::Text(Operand::Literal(unescape(chars.as_str()))))
        }
        Rule::date => {
            let chars = next(&mut pair.into_inner())?.as_str();
            NaiveDate::parse_from_str(chars, "%Y-%m-%d")
                .map(|v| AnyOperand::Date(Operand::Literal(v)))
                .map_err(|e| parse_error(&format!("{chars}: {e}")))
        }
        Rule::datetime => {
            let chars = next(&mut pair.into_inner())?.as_str().replacen('T', " ", 1);
            NaiveDateTime::parse_from_str(&chars, "%Y-%m-%d %H:%M:%S")
                .map(|v| AnyOperand::DateTime(Operand::Literal(v)))
                .map_err(|e| parse_error(&format!("{chars}: {e}")))
        }
        rule => Err(parse_error(&format!("unexpected {rule:?}"))),
    }
}

// `\"` and `\\` are the only escapes the grammar admits
fn unescape(chars: &str) -> String {
    let mut text = String::with_capacity(chars.len());
    let mut escaped = false;
    for c in chars.chars() {
        if c == '\\' && !escaped {
            escaped = true;
            continue;
        }
        escaped = false;
        text.push(c);
    }
    text
}

fn resolve<R: Table>(schema: &Schema<R>, name: &str) -> Result<AnyColumn<R>> {
    schema.column(name).ok_or_else(|| KeepsetError::UnknownField {
        table: schema.table().to_string(),
        field: name.to_string(),
    })
}

fn next<'i>(pairs: &mut pest::iterators::Pairs<'i, Rule>) -> Result<Pair<'i, Rule>> {
    pairs.next().ok_or_else(|| parse_error("unexpected end of input"))
}

fn parse_error(message: &str) -> KeepsetError {
    KeepsetError::Parse {
        message: message.to_string(),
    }
}
