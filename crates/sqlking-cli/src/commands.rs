use std::time::Duration;

use sqlking_config::{config::Config, paths::resolve_path};
use sqlking_db::{ConnectionOptions, Count, Select, SqliteProvider, TableSchema};
use tracing::{debug, info};

use crate::{
    cli::FilterArgs,
    error::CliResult,
    filter::{build_clause, identifier, parse_limit, parse_order},
    output::{row_json, rows_table, schema_table, ColumnInfo},
};

pub struct QueryOptions {
    pub table: String,
    pub select: Vec<String>,
    pub filter: FilterArgs,
    pub order: Vec<String>,
    pub limit: Option<String>,
    pub single: bool,
}

/// Opens `--database` if given, otherwise the configured database, and
/// applies the configured connection pragmas.
pub fn open_database(database: Option<&str>, config: &Config) -> CliResult<SqliteProvider> {
    let path = match database {
        Some(path) => resolve_path(path)?,
        None => config.get_db_path()?,
    };
    debug!("using database {}", path.display());

    let provider = SqliteProvider::open(&path)?;
    provider.configure(&connection_options(config))?;
    Ok(provider)
}

pub fn connection_options(config: &Config) -> ConnectionOptions {
    ConnectionOptions {
        journal_mode: config.journal_mode.clone(),
        case_sensitive_like: config.case_sensitive_like.unwrap_or(false),
        busy_timeout: config.busy_timeout.map(Duration::from_millis),
    }
}

fn build_select(
    options: &QueryOptions,
    schema: &TableSchema,
    default_limit: u32,
) -> CliResult<Select> {
    let columns = options
        .select
        .iter()
        .map(|column| identifier(column))
        .collect::<CliResult<Vec<_>>>()?;
    let mut query = Select::builder().select(columns);

    if let Some(clause) = build_clause(&options.filter, schema)? {
        query = query.filter(clause);
    }

    for spec in &options.order {
        let (column, order) = parse_order(spec)?;
        query = query.order_by(column, order);
    }

    query = match &options.limit {
        Some(spec) => {
            let (offset, count) = parse_limit(spec)?;
            query.limit(offset, count)
        }
        // a single-row query brings its own window
        None if options.single => query,
        None => query.limit(0, default_limit),
    };

    Ok(query)
}

pub fn query_rows(
    provider: &SqliteProvider,
    options: QueryOptions,
    config: &Config,
    json: bool,
) -> CliResult<()> {
    let schema = TableSchema::introspect(provider, identifier(&options.table)?)?;
    let query = build_select(&options, &schema, config.query_limit.unwrap_or(100))?;

    let rows = if options.single {
        vec![query.fetch_single(&schema, provider)?]
    } else {
        query.fetch_rows(&schema, provider)?
    };

    if json {
        let rows: Vec<_> = rows.iter().map(row_json).collect();
        let output = match (options.single, rows.first()) {
            (true, Some(row)) => serde_json::to_string_pretty(row)?,
            _ => serde_json::to_string_pretty(&rows)?,
        };
        println!("{output}");
        return Ok(());
    }

    if rows.is_empty() {
        info!("No rows in {} matched", schema.table);
        return Ok(());
    }

    info!("\n{}", rows_table(&schema.table, &rows));
    info!("{} row(s)", rows.len());
    Ok(())
}

pub fn count_rows(
    provider: &SqliteProvider,
    table: &str,
    filter: &FilterArgs,
    json: bool,
) -> CliResult<()> {
    let schema = TableSchema::introspect(provider, identifier(table)?)?;

    let mut query = Count::builder();
    if let Some(clause) = build_clause(filter, &schema)? {
        query = query.filter(clause);
    }
    let count = query.fetch_count(&schema, provider)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "table": schema.table, "count": count })
        );
    } else {
        info!("{count}");
    }
    Ok(())
}

pub fn describe_table(provider: &SqliteProvider, table: &str, json: bool) -> CliResult<()> {
    let schema = TableSchema::introspect(provider, identifier(table)?)?;

    if json {
        let columns: Vec<_> = schema.columns.iter().map(ColumnInfo::from).collect();
        println!("{}", serde_json::to_string_pretty(&columns)?);
    } else {
        info!("\n{}", schema_table(&schema));
    }
    Ok(())
}

pub fn print_config(config: &Config, json: bool) -> CliResult<()> {
    let output = if json {
        serde_json::to_string_pretty(config)?
    } else {
        toml::to_string_pretty(config)?
    };
    println!("{}", output.trim_end());
    Ok(())
}
