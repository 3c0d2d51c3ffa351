// aidir - browse the AI company directory published as a Google Sheet

mod exit_codes;
mod ingest;
mod output;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use aidir_config::ConfigError;
use aidir_engine::{Card, DetailView, Lookup, SearchFields};

use exit_codes::{
    EXIT_CONFIG, EXIT_ERROR, EXIT_IO, EXIT_NOT_FOUND, EXIT_NO_RESULTS, EXIT_SUCCESS, EXIT_USAGE,
};
use ingest::{load_directory, SourceArgs};

#[derive(Parser)]
#[command(name = "aidir")]
#[command(about = "Browse the AI company directory published as a Google Sheet")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the sheet and write every company as CSV or JSON
    #[command(after_help = "\
Examples:
  aidir fetch > companies.csv
  aidir fetch --json --out companies.json
  aidir fetch --format csv --gid 0")]
    Fetch {
        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Write a JSON array instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Search companies by case-insensitive substring
    #[command(after_help = "\
Examples:
  aidir search robotics
  aidir search 'san francisco' --fields headquarters
  aidir search ai --fields name,industry,headquarters --json
  aidir search            (lists every company)")]
    Search {
        /// Text to look for (omit to list everything)
        query: Option<String>,

        /// Fields to search: comma-separated keys, or `all`
        #[arg(long, value_name = "LIST")]
        fields: Option<String>,

        /// Print matching cards as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the detail page for one company (exact, case-sensitive name)
    Show {
        /// Company name exactly as it appears in the sheet
        name: String,

        /// Print the detail view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file path
    Path,
    /// Print the effective settings (file plus flags) as JSON
    Show,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Captures `log` records from the library crates as well.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    tracing::debug!("aidir {}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Fetch { out, json } => cmd_fetch(&cli.source, out, json, cli.quiet),
        Commands::Search { query, fields, json } => {
            cmd_search(&cli.source, query, fields, json, cli.quiet)
        }
        Commands::Show { name, json } => cmd_show(&cli.source, &name, json, cli.quiet),
        Commands::Config { command } => match command {
            ConfigCommands::Path => cmd_config_path(&cli.source),
            ConfigCommands::Show => cmd_config_show(&cli.source),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::Read { .. } => Some("check the --config path (or AIDIR_CONFIG)".to_string()),
            _ => Some(format!(
                "fix the settings file; defaults live at {}",
                aidir_config::Settings::config_path().display()
            )),
        };
        Self { code: EXIT_CONFIG, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// fetch
// ============================================================================

fn cmd_fetch(source: &SourceArgs, out: Option<PathBuf>, json: bool, quiet: bool) -> Result<(), CliError> {
    let settings = source.settings()?;
    let directory = load_directory(&settings, source.url.as_deref(), settings.search.fields.clone(), quiet)?;

    let dest = output::dump_records(directory.records(), &out, json)?;
    if !quiet && out.is_some() {
        eprintln!("Wrote {} companies to {}", directory.records().len(), dest);
    }
    Ok(())
}

// ============================================================================
// search
// ============================================================================

fn cmd_search(
    source: &SourceArgs,
    query: Option<String>,
    fields: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = source.settings()?;

    let fields = match fields {
        Some(list) => {
            let parsed = SearchFields::parse_list(&list).map_err(|e| {
                CliError::args(e.to_string()).with_hint(format!(
                    "valid fields: all, {}",
                    aidir_engine::Field::ALL.iter().map(|f| f.key()).collect::<Vec<_>>().join(", ")
                ))
            })?;
            if parsed.fields().is_empty() {
                return Err(CliError::args("--fields is empty").with_hint("pass `all` or a comma-separated list"));
            }
            parsed
        }
        None => settings.search.fields.clone(),
    };

    let directory = load_directory(&settings, source.url.as_deref(), fields, quiet)?;
    let query = query.unwrap_or_default();
    let hits = directory.search(&query);
    let cards: Vec<Card<'_>> = hits.iter().map(|r| Card::from_record(r)).collect();

    if json {
        output::write_json(&cards, io::stdout().lock())?;
    } else {
        let mut stdout = io::stdout().lock();
        for card in &cards {
            writeln!(stdout, "{}", output::render_card(card)).map_err(|e| CliError::io(e.to_string()))?;
        }
        writeln!(stdout, "{}", output::results_line(cards.len())).map_err(|e| CliError::io(e.to_string()))?;
    }

    if cards.is_empty() {
        return Err(CliError {
            code: EXIT_NO_RESULTS,
            message: format!("no companies match \"{}\"", query),
            hint: Some("search is a case-insensitive substring match; try a shorter query or --fields all".to_string()),
        });
    }
    Ok(())
}

// ============================================================================
// show
// ============================================================================

fn cmd_show(source: &SourceArgs, name: &str, json: bool, quiet: bool) -> Result<(), CliError> {
    let settings = source.settings()?;
    let directory = load_directory(&settings, source.url.as_deref(), settings.search.fields.clone(), quiet)?;

    let record = match directory.find_by_name(name) {
        Lookup::Found(record) => record,
        Lookup::NotFound => {
            let near = directory
                .records()
                .iter()
                .filter(|r| !r.name.is_empty())
                .find(|r| r.name.eq_ignore_ascii_case(name) || r.name.trim() == name.trim());
            let hint = match near {
                Some(r) => format!("names are case-sensitive; did you mean \"{}\"?", r.name),
                None => format!("try `aidir search \"{}\"`", name),
            };
            return Err(CliError {
                code: EXIT_NOT_FOUND,
                message: format!("company not found: {}", name),
                hint: Some(hint),
            });
        }
        // A one-shot load has always completed by now.
        Lookup::Loading => return Err(CliError::general("directory is still loading")),
    };

    let view = DetailView::from_record(record);
    if json {
        output::write_json(&view, io::stdout().lock())
    } else {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", output::render_detail(&view)).map_err(|e| CliError::io(e.to_string()))
    }
}

// ============================================================================
// config
// ============================================================================

fn cmd_config_path(source: &SourceArgs) -> Result<(), CliError> {
    println!("{}", source.settings_path().display());
    Ok(())
}

fn cmd_config_show(source: &SourceArgs) -> Result<(), CliError> {
    let settings = source.settings()?;
    output::write_json(&settings, io::stdout().lock())
}
