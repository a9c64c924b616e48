use clap::Parser;
use cli::{Args, Commands};
use commands::{count_rows, describe_table, open_database, print_config, query_rows, QueryOptions};
use error::CliResult;
use logging::setup_logging;
use sqlking_config::{
    config::{self, generate_default_config, get_config, set_config_path, Config},
    paths::resolve_path,
};
use tracing::debug;

mod cli;
mod commands;
mod error;
mod filter;
mod logging;
mod output;
mod utils;

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();
    setup_logging(&args)?;
    run(args)
}

fn run(args: Args) -> CliResult<()> {
    if args.no_color {
        utils::disable_color();
    }

    if let Some(ref c) = args.config {
        let path = resolve_path(c)?;
        debug!("using configuration at {}", path.display());
        set_config_path(path);
    }

    // defconfig must work before a config file exists
    let load_config = || -> CliResult<Config> {
        config::init()?;
        Ok(get_config())
    };

    match args.command {
        Commands::DefConfig => {
            generate_default_config()?;
        }
        Commands::Config => print_config(&load_config()?, args.json)?,
        Commands::Query {
            table,
            select,
            filter,
            order,
            limit,
            single,
        } => {
            let config = load_config()?;
            let provider = open_database(args.database.as_deref(), &config)?;
            let options = QueryOptions {
                table,
                select,
                filter,
                order,
                limit,
                single,
            };
            query_rows(&provider, options, &config, args.json)?;
        }
        Commands::Count {
            table,
            filter,
        } => {
            let config = load_config()?;
            let provider = open_database(args.database.as_deref(), &config)?;
            count_rows(&provider, &table, &filter, args.json)?;
        }
        Commands::Schema {
            table,
        } => {
            let config = load_config()?;
            let provider = open_database(args.database.as_deref(), &config)?;
            describe_table(&provider, &table, args.json)?;
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
