use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Database file to open instead of the configured one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub database: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Row selection shared by `query` and `count`.
#[derive(clap::Args, Debug, Default)]
pub struct FilterArgs {
    /// Filter expression: col=v, col!=v, col>v, col>=v, col<v, col<=v or col~pattern
    #[arg(short = 'w', long = "where", value_name = "EXPR")]
    pub filters: Vec<String>,

    /// Membership filter: col=v1,v2,...
    #[arg(short = 'i', long = "in", value_name = "COL=V1,V2")]
    pub in_lists: Vec<String>,

    /// Match rows satisfying any filter instead of all of them
    #[arg(long)]
    pub any: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select rows from a table
    #[command(arg_required_else_help = true)]
    #[clap(name = "query", visible_alias = "q")]
    Query {
        /// Table to read
        #[arg(required = true)]
        table: String,

        /// Columns to select, comma separated
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<String>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Sort key: col, col:asc or col:desc
        #[arg(short, long = "order", value_name = "COL[:DIR]")]
        order: Vec<String>,

        /// Result window: offset,count or count
        #[arg(short, long)]
        limit: Option<String>,

        /// Return only the first matching row, failing if there is none
        #[arg(long)]
        single: bool,
    },

    /// Count rows of a table
    #[command(arg_required_else_help = true)]
    Count {
        /// Table to count
        #[arg(required = true)]
        table: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show the columns of a table
    #[command(arg_required_else_help = true)]
    Schema {
        /// Table to describe
        #[arg(required = true)]
        table: String,
    },

    /// Print the effective configuration
    Config,

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,
}
