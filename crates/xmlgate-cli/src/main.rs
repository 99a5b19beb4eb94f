use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use xmlgate::{parse_tree, validate, Outcome, Response, Tree};

#[derive(Debug, Parser)]
#[command(
    name = "xmlgate",
    version,
    about = "Validate an intacct-style XML API request and print the response"
)]
struct Args {
    /// Request file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Only report the result through the exit status
    #[arg(short, long)]
    quiet: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Rendered XML response, as the server sends it
    Xml,
    /// Validation result as JSON
    Json,
    /// Parsed request tree as JSON
    Tree,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let input = read_input(&args.input)?;
    let tree = if input.trim().is_empty() {
        Ok(Tree::empty())
    } else {
        parse_tree(&input)
    };

    let (response, outcome) = match &tree {
        Ok(tree) => {
            let outcome = validate(tree);
            (Response::from_outcome(&outcome), Some(outcome))
        }
        Err(err) => (Response::invalid_xml(err), None),
    };
    debug!(status = response.status_code(), "request validated");

    let output = match args.format {
        OutputFormat::Xml => response.to_xml(),
        OutputFormat::Json => render_json(&response, outcome.as_ref())?,
        OutputFormat::Tree => match &tree {
            Ok(tree) => serde_json::to_string_pretty(tree).context("failed to encode tree")?,
            Err(err) => bail!("failed to parse request: {err}"),
        },
    };

    if !args.quiet {
        write_output(&args.output, output.as_bytes())?;
    }

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn render_json(response: &Response, outcome: Option<&Outcome>) -> Result<String> {
    let value = match (response, outcome) {
        (_, Some(Ok(request))) => serde_json::json!({
            "status": "success",
            "function": request.kind(),
            "controlid": request.control_id,
            "request": request,
        }),
        (Response::Error { message }, _) => serde_json::json!({
            "status": "error",
            "message": message,
        }),
        (Response::Success { customer_id }, _) => serde_json::json!({
            "status": "success",
            "customerid": customer_id,
        }),
    };
    let mut text = serde_json::to_string_pretty(&value).context("failed to encode result")?;
    text.push('\n');
    Ok(text)
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            if !data.ends_with(b"\n") {
                stdout.write_all(b"\n").context("failed to write stdout")?;
            }
            Ok(())
        }
    }
}
