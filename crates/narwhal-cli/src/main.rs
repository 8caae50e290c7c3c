use narwhal::{CountInput, LayoutInput, LayoutOptions, OrderingStrategy};
use serde::Serialize;
use std::io::{Read, Write};
use tracing::debug;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Narwhal(narwhal::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Narwhal(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Narwhal(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Count,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    focus: Option<String>,
    config: Option<String>,
    strategy: Option<OrderingStrategy>,
    budget: Option<usize>,
    sweeps: Option<usize>,
    seed: Option<u64>,
    no_sampling: bool,
    max_evaluations: Option<usize>,
}

fn usage() -> &'static str {
    "narwhal-cli\n\
\n\
USAGE:\n\
  narwhal-cli [layout] [--focus <id>] [--strategy search|barycenter] [--budget <n>] [--sweeps <n>] [--seed <n>] [--no-sampling] [--max-evaluations <n>] [--config <path>] [--pretty] [<path>|-]\n\
  narwhal-cli count [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - layout reads {\"focus\", \"relations\", \"hint\"?} and prints positions, crossings and layers.\n\
  - count reads {\"relations\", \"layers\"} and prints the crossing report.\n\
  - --config reads layout options as JSON; flags given on the command line take precedence.\n\
  - Set RUST_LOG=narwhal=debug to trace the search on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, CliError> {
    raw.trim().parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "count" => args.command = Command::Count,
            "--pretty" => args.pretty = true,
            "--no-sampling" => args.no_sampling = true,
            "--focus" => args.focus = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--strategy" => {
                let raw = next_value(&mut it)?;
                args.strategy = Some(raw.parse().map_err(|_| CliError::Usage(usage()))?);
            }
            "--budget" => args.budget = Some(parse_number(next_value(&mut it)?)?),
            "--sweeps" => args.sweeps = Some(parse_number(next_value(&mut it)?)?),
            "--seed" => args.seed = Some(parse_number(next_value(&mut it)?)?),
            "--max-evaluations" => {
                args.max_evaluations = Some(parse_number(next_value(&mut it)?)?);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Config file first, then command-line overrides, then validation.
fn layout_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => serde_json::from_str::<LayoutOptions>(&std::fs::read_to_string(path)?)?,
        None => LayoutOptions::default(),
    };
    if let Some(strategy) = args.strategy {
        options.strategy = strategy;
    }
    if let Some(budget) = args.budget {
        options.exploration_budget = budget;
    }
    if let Some(sweeps) = args.sweeps {
        options.sweep_iterations = sweeps;
    }
    if args.seed.is_some() {
        options.seed = args.seed;
    }
    if args.no_sampling {
        options.sampling = false;
    }
    if args.max_evaluations.is_some() {
        options.max_evaluations = args.max_evaluations;
    }
    options.validate()?;
    Ok(options)
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Layout => {
            let options = layout_options(&args)?;
            let text = read_input(args.input.as_deref())?;
            let mut input = LayoutInput::from_json(&text)?;
            if let Some(focus) = args.focus {
                input.focus = focus;
            }
            debug!(?options, focus = %input.focus, "layout request");
            let out = narwhal::layout_input(&input, &options);
            write_json(&out, args.pretty)
        }
        Command::Count => {
            let text = read_input(args.input.as_deref())?;
            let input = CountInput::from_json(&text)?;
            let report = narwhal::count_crossings(&input.relations, &input.layers);
            write_json(&report, args.pretty)
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Narwhal(narwhal::Error::InvalidOption { .. })) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
