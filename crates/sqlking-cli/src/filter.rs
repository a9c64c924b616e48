//! Parsing of `--where`, `--in`, `--order` and `--limit` arguments.

use sqlking_db::{rusqlite::types::Value, Clause, ColumnType, Exp, Order, TableSchema};

use crate::{
    cli::FilterArgs,
    error::{CliError, CliResult},
};

// Longest operators first so `>=` is not read as `>`.
const OPERATORS: [(&str, Exp); 7] = [
    ("!=", Exp::NotEqualTo),
    (">=", Exp::MoreThanOrEqualTo),
    ("<=", Exp::LessThanOrEqualTo),
    ("=", Exp::EqualTo),
    (">", Exp::MoreThan),
    ("<", Exp::LessThan),
    ("~", Exp::Like),
];

/// Integer if it parses as one, `true`/`false` as booleans, text otherwise.
fn guess_value(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Integer(int);
    }
    match raw {
        "true" => Value::from(true),
        "false" => Value::from(false),
        _ => Value::Text(raw.to_string()),
    }
}

/// Converts a raw argument by the storage class of the column it filters.
///
/// Text columns keep the argument as written, so `007` stays `'007'`.
/// Columns the schema does not know fall back to guessing from the text.
pub fn parse_value(raw: &str, kind: Option<ColumnType>) -> Value {
    match kind {
        Some(ColumnType::Text) => Value::Text(raw.to_string()),
        Some(ColumnType::Real) => raw
            .parse::<f64>()
            .map(Value::Real)
            .unwrap_or_else(|_| guess_value(raw)),
        _ => guess_value(raw),
    }
}

fn column_name(raw: &str) -> Option<&str> {
    let column = raw.trim();
    let valid = !column.is_empty()
        && column
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(column)
}

/// Checks a table or column name given on the command line.
pub fn identifier(raw: &str) -> CliResult<&str> {
    column_name(raw).ok_or_else(|| CliError::InvalidIdentifier(raw.to_string()))
}

fn column_kind(schema: &TableSchema, column: &str) -> Option<ColumnType> {
    schema.column(column).map(|def| def.kind)
}

/// Parses `col<op>value` into a comparison.
pub fn parse_filter(expr: &str, schema: &TableSchema) -> CliResult<Clause> {
    let invalid = || CliError::InvalidFilter(expr.to_string());

    let start = expr.find(['!', '=', '<', '>', '~']).ok_or_else(invalid)?;
    let (column, rest) = expr.split_at(start);
    let column = column_name(column).ok_or_else(invalid)?;

    let (symbol, exp) = OPERATORS
        .iter()
        .find(|(symbol, _)| rest.starts_with(symbol))
        .ok_or_else(invalid)?;
    let raw = &rest[symbol.len()..];

    let value = if *exp == Exp::Like {
        Value::Text(raw.to_string())
    } else {
        parse_value(raw, column_kind(schema, column))
    };

    Ok(Clause::compare(column, *exp, value))
}

/// Parses `col=v1,v2,...` into an IN list.
pub fn parse_in_list(expr: &str, schema: &TableSchema) -> CliResult<Clause> {
    let invalid = || CliError::InvalidInList(expr.to_string());

    let (column, values) = expr.split_once('=').ok_or_else(invalid)?;
    let column = column_name(column).ok_or_else(invalid)?;
    if values.is_empty() {
        return Err(invalid());
    }

    let kind = column_kind(schema, column);
    Ok(Clause::in_list(
        column,
        values.split(',').map(|raw| parse_value(raw, kind)),
    ))
}

/// Combines every filter into one AND group, or OR group with `--any`.
pub fn build_clause(args: &FilterArgs, schema: &TableSchema) -> CliResult<Option<Clause>> {
    let mut clauses = args
        .filters
        .iter()
        .map(|expr| parse_filter(expr, schema))
        .collect::<CliResult<Vec<_>>>()?;
    for expr in &args.in_lists {
        clauses.push(parse_in_list(expr, schema)?);
    }

    if clauses.is_empty() {
        return Ok(None);
    }

    Ok(Some(if args.any {
        Clause::or(clauses)
    } else {
        Clause::and(clauses)
    }))
}

/// Parses `col`, `col:asc` or `col:desc`.
pub fn parse_order(spec: &str) -> CliResult<(String, Order)> {
    let invalid = || CliError::InvalidOrder(spec.to_string());

    let (column, order) = match spec.split_once(':') {
        None => (spec, Order::Asc),
        Some((column, dir)) => {
            let order = match dir.to_ascii_lowercase().as_str() {
                "asc" => Order::Asc,
                "desc" => Order::Desc,
                _ => return Err(invalid()),
            };
            (column, order)
        }
    };

    let column = column_name(column).ok_or_else(invalid)?;
    Ok((column.to_string(), order))
}

/// Parses `offset,count`, or a bare `count` starting at offset 0.
pub fn parse_limit(spec: &str) -> CliResult<(u32, u32)> {
    let invalid = || CliError::InvalidLimit(spec.to_string());
    let number = |raw: &str| raw.trim().parse::<u32>().map_err(|_| invalid());

    match spec.split_once(',') {
        Some((offset, count)) => Ok((number(offset)?, number(count)?)),
        None => Ok((0, number(spec)?)),
    }
}
