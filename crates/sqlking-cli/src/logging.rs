use std::io::{self, Stderr, Stdout, Write};

use nu_ansi_term::Color::{Blue, Magenta, Red, Yellow};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::{
    fmt::{
        self,
        format::{FmtSpan, Writer},
        FmtContext, FormatEvent, FormatFields, MakeWriter,
    },
    registry::LookupSpan,
};

use crate::{cli::Args, error::CliResult, utils::Colored};

const TARGETS: [&str; 3] = ["sqlking", "sqlking_db", "sqlking_config"];

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}

pub struct CustomFormatter;

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        match *event.metadata().level() {
            Level::TRACE => write!(writer, "{} ", Colored(Magenta, "[TRACE]")),
            Level::DEBUG => write!(writer, "{} ", Colored(Blue, "[DEBUG]")),
            Level::INFO => write!(writer, ""),
            Level::WARN => write!(writer, "{} ", Colored(Yellow, "[WARN]")),
            Level::ERROR => write!(writer, "{} ", Colored(Red, "[ERROR]")),
        }?;

        match visitor.message {
            Some(message) => writeln!(writer, "{message}"),
            None => writeln!(writer),
        }
    }
}

/// INFO goes to stdout, every other level to stderr.
struct StdioMakeWriter;

enum StdioWriter {
    Out(Stdout),
    Err(Stderr),
}

impl Write for StdioWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StdioWriter::Out(out) => out.write(buf),
            StdioWriter::Err(err) => err.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StdioWriter::Out(out) => out.flush(),
            StdioWriter::Err(err) => err.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for StdioMakeWriter {
    type Writer = StdioWriter;

    fn make_writer(&'a self) -> Self::Writer {
        StdioWriter::Out(io::stdout())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if *meta.level() == Level::INFO {
            StdioWriter::Out(io::stdout())
        } else {
            StdioWriter::Err(io::stderr())
        }
    }
}

fn filter_level(args: &Args) -> Level {
    if args.quiet {
        Level::ERROR
    } else if args.verbose >= 2 {
        Level::TRACE
    } else if args.verbose == 1 {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

fn env_filter(level: Level) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn setup_logging(args: &Args) -> CliResult<()> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter(filter_level(args)))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(StdioMakeWriter)
        .compact()
        .without_time();

    let subscriber: Box<dyn Subscriber + Send + Sync> = if args.json {
        Box::new(builder.json().flatten_event(true).finish())
    } else {
        Box::new(builder.event_format(CustomFormatter).finish())
    };

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("sqlking").chain(argv.iter().copied()))
    }

    #[test]
    fn test_filter_level_from_flags() {
        assert_eq!(filter_level(&args(&["config"])), Level::INFO);
        assert_eq!(filter_level(&args(&["-v", "config"])), Level::DEBUG);
        assert_eq!(filter_level(&args(&["-vv", "config"])), Level::TRACE);
        assert_eq!(filter_level(&args(&["-q", "-v", "config"])), Level::ERROR);
    }

    #[test]
    fn test_env_filter_covers_workspace_crates() {
        assert_eq!(
            env_filter(Level::DEBUG),
            "sqlking=DEBUG,sqlking_db=DEBUG,sqlking_config=DEBUG"
        );
    }
}
