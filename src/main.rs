mod config;
mod error;
mod fixer;
mod format;
mod header_search;
mod index;
mod io;
mod logging;
mod project;
mod symbol;

#[cfg(test)]
mod test_utils;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug, error, info, warn};

use config::{ConfigOverrides, FixerConfig};
use error::IncludeFixerError;
use fixer::{EditBuilder, FixerSession, ParserEvent, PathMinimizer, ResolutionContext};
use format::{FormatStyle, IncludeCleanupFormatter, apply_replacements};
use header_search::HeaderSearchPaths;
use index::{FixedSymbolIndex, JsonSymbolIndex, SymbolIndexManager};
use logging::{LogConfig, init_logging};
use project::{CompilationDatabase, locate_compilation_database};

/// Exit code when no symbol could be resolved
const EXIT_UNRESOLVED: u8 = 1;
/// Exit code when candidates point at several headers
const EXIT_AMBIGUOUS: u8 = 2;

/// Directory depth searched for compile_commands.json when none is configured
const COMPILATION_DATABASE_SEARCH_DEPTH: usize = 3;

/// CLI arguments for the include fixer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to ./.include-fixer.json when present)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// JSON symbol database; may be repeated
    #[arg(long = "symbol-db", value_name = "FILE", global = true)]
    symbol_databases: Vec<PathBuf>,

    /// Fixed symbol mapping `name=header1,header2;name2=header3`; may be repeated
    #[arg(long = "fixed-symbols", value_name = "MAPPING", global = true)]
    fixed_symbols: Vec<String>,

    /// compile_commands.json used for include search directories
    #[arg(long, value_name = "FILE", global = true)]
    compile_commands: Option<PathBuf>,

    /// Extra compiler argument such as `-Iinclude`; may be repeated
    #[arg(long = "extra-arg", value_name = "ARG", allow_hyphen_values = true, global = true)]
    extra_args: Vec<String>,

    /// Include placement style (llvm, google, chromium, mozilla, webkit, none)
    #[arg(long, value_name = "STYLE", global = true)]
    style: Option<String>,

    /// Keep header paths exactly as stored in the symbol database
    #[arg(long, global = true)]
    no_minimize: bool,

    /// Log level (overrides RUST_LOG env var)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Log file path (overrides INCLUDE_FIXER_LOG_FILE env var)
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the first unknown symbol of a file and print the candidates as JSON
    Resolve {
        /// Source file the events refer to
        #[arg(long, value_name = "FILE")]
        source: PathBuf,

        /// JSON array of parser events for the source file
        #[arg(long, value_name = "FILE")]
        events: PathBuf,
    },

    /// Insert an #include for an already chosen header
    Insert {
        #[arg(long, value_name = "FILE")]
        source: PathBuf,

        /// Wrapped header spelling, e.g. `"foo.h"` or `<vector>`
        #[arg(long, value_name = "HEADER")]
        header: String,

        /// Write the result back instead of printing it
        #[arg(long)]
        in_place: bool,
    },

    /// Resolve and insert the header when the choice is unambiguous
    Fix {
        #[arg(long, value_name = "FILE")]
        source: PathBuf,

        #[arg(long, value_name = "FILE")]
        events: PathBuf,

        #[arg(long)]
        in_place: bool,
    },
}

fn build_symbol_index(config: &FixerConfig) -> Result<SymbolIndexManager, IncludeFixerError> {
    let mut manager = SymbolIndexManager::new();

    for path in &config.symbol_databases {
        let database = JsonSymbolIndex::load(path)?;
        info!(
            "Using symbol database {} ({} symbols)",
            database.path().unwrap_or(path.as_path()).display(),
            database.symbol_count()
        );
        manager.add_index(Box::new(database));
    }

    if !config.fixed_symbols.is_empty() {
        manager.add_index(Box::new(FixedSymbolIndex::parse(
            &config.fixed_symbols.join(";"),
        )?));
    }

    if manager.index_count() == 0 {
        warn!("No symbol databases configured, nothing can be resolved");
    }
    Ok(manager)
}

/// Search directories of the compile command for `source` plus the extra
/// arguments from the configuration
fn build_header_search(
    config: &FixerConfig,
    source: &Path,
    working_directory: &Path,
) -> Result<HeaderSearchPaths, IncludeFixerError> {
    let database_path = config.compile_commands.clone().or_else(|| {
        locate_compilation_database(working_directory, COMPILATION_DATABASE_SEARCH_DEPTH)
    });

    let mut search = HeaderSearchPaths::new(working_directory);
    if let Some(database_path) = database_path {
        let database = CompilationDatabase::new(database_path)?;
        match database.entry_for(source, working_directory) {
            Some(entry) => {
                search = HeaderSearchPaths::new(&entry.directory)
                    .with_arguments(&entry.arguments, &entry.directory);
            }
            None => warn!(
                "{} has no entry for {}",
                database.path().display(),
                source.display()
            ),
        }
    }

    let search = search.with_arguments(&config.extra_args, working_directory);
    debug!("Header search uses {} directories", search.directories().len());
    Ok(search)
}

fn read_events(path: &Path) -> Result<Vec<ParserEvent>, IncludeFixerError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| IncludeFixerError::Events {
        path: path.display().to_string(),
        error: e.to_string(),
    })
}

/// Run one compilation unit's events through a fresh session
fn resolve_unit(
    config: &FixerConfig,
    source: &Path,
    events: &Path,
    working_directory: &Path,
) -> Result<ResolutionContext, IncludeFixerError> {
    let text = std::fs::read_to_string(source)?;
    let events = read_events(events)?;
    let index = build_symbol_index(config)?;
    let header_search = build_header_search(config, source, working_directory)?;

    let mut session = FixerSession::new(&text, &index);
    for event in &events {
        session.handle_event(event)?;
    }

    let minimizer = PathMinimizer::new(&header_search, config.minimize_include_paths);
    let context = session.finish(&minimizer);
    log_resolution!(Level::INFO, source.display(), context);
    Ok(context)
}

/// Insert `header` into `source`; prints the result or writes it back
fn insert_header(
    config: &FixerConfig,
    source: &Path,
    header: &str,
    in_place: bool,
) -> Result<(), IncludeFixerError> {
    let text = std::fs::read_to_string(source)?;
    let style = FormatStyle::from_name(&config.style)?;
    let formatter = IncludeCleanupFormatter::default();

    let replacements = EditBuilder::new(&formatter, style).build_insertion(&text, source, header)?;
    let fixed = apply_replacements(&text, &replacements)?;

    if replacements.is_empty() {
        info!("{} already includes {}", source.display(), header);
    }

    if in_place {
        if fixed != text {
            std::fs::write(source, &fixed)?;
            info!("Added #include {} to {}", header, source.display());
        }
    } else {
        print!("{fixed}");
    }
    Ok(())
}

fn print_context(context: &ResolutionContext) -> Result<(), IncludeFixerError> {
    let json = serde_json::to_string_pretty(context).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}

fn run(args: Args, working_directory: &Path) -> Result<ExitCode, IncludeFixerError> {
    let config = FixerConfig::load(args.config.as_deref(), working_directory)?.with_overrides(
        ConfigOverrides {
            style: args.style,
            no_minimize: args.no_minimize,
            symbol_databases: args.symbol_databases,
            fixed_symbols: args.fixed_symbols,
            compile_commands: args.compile_commands,
            extra_args: args.extra_args,
        },
    );
    debug!("Effective configuration: {:?}", config);

    match args.command {
        Command::Resolve { source, events } => {
            let context = resolve_unit(&config, &source, &events, working_directory)?;
            print_context(&context)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Insert {
            source,
            header,
            in_place,
        } => {
            insert_header(&config, &source, &header, in_place)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Fix {
            source,
            events,
            in_place,
        } => {
            let context = resolve_unit(&config, &source, &events, working_directory)?;
            if !context.is_resolved() {
                info!("No missing symbol could be resolved in {}", source.display());
                return Ok(ExitCode::from(EXIT_UNRESOLVED));
            }

            if context.is_ambiguous() {
                for candidate in &context.candidates {
                    info!(
                        "Candidate {} from {} ({} uses)",
                        candidate.qualified_name(),
                        candidate.file_path,
                        candidate.occurrence_count
                    );
                }
                print_context(&context)?;
                return Ok(ExitCode::from(EXIT_AMBIGUOUS));
            }

            let header = context.headers()[0].to_string();
            insert_header(&config, &source, &header, in_place)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_config = LogConfig::from_env().with_overrides(args.log_level.clone(), args.log_file.clone());
    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let working_directory = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to get current directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(args, &working_directory) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            eprintln!("include-fixer: {e}");
            ExitCode::FAILURE
        }
    }
}
