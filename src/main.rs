use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vpcmap::{Direction, Error, OutputFormat, RenderOptions, Snapshot};

#[derive(Parser)]
#[command(
    name = "vpcmap",
    about = "Render a VPC network topology snapshot as a graph (text, Mermaid, JSON)"
)]
struct Cli {
    /// Snapshot file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Flowchart direction for Mermaid output
    #[arg(long, value_enum, default_value_t = Direction::LeftRight)]
    direction: Direction,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print each node's detail text (text format)
    #[arg(long)]
    details: bool,

    /// Leave diagnostics out of text output
    #[arg(long, short = 'q')]
    quiet: bool,

    /// Exit with status 2 when any record was skipped
    #[arg(long)]
    strict: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}

/// Returns the exit status for a run that got as far as rendering.
fn run(cli: &Cli) -> Result<i32, Error> {
    let snapshot = match &cli.file {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
                path: path.clone(),
                source,
            })?;
            Snapshot::from_json(&text)?
        }
        None => Snapshot::from_reader(std::io::stdin().lock())?,
    };

    let output = vpcmap::build(&snapshot);
    for d in output.diagnostics.iter().filter(|d| !d.kind.is_informational()) {
        tracing::warn!(kind = d.kind.as_str(), "{d}");
    }

    let options = RenderOptions {
        format: cli.format,
        direction: cli.direction,
        details: cli.details,
        diagnostics: !cli.quiet,
    };
    let rendered = vpcmap::render_output(&output, &options)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|source| Error::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), "graph written");
        }
        None => print!("{rendered}"),
    }

    Ok(output.exit_code(cli.strict))
}
