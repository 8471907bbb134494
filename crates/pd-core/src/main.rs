//! Personal-data core CLI.
//!
//! The main entry point for pd-core, handling:
//! - Logging user rows with PII redacted
//! - Redacting arbitrary `field=value;` lines
//! - Password hashing and verification
//! - Settings inspection and validation

use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use pd_auth::{is_valid, PasswordHasher};
use pd_config::{load_settings, DbSettings, LoadedSettings, ValidationError};
use pd_core::exit_codes::ExitCode;
use pd_core::logging::{init_logging, LogConfig, LogError, LogFormat, LogLevel, Logger, StreamSink};
use pd_core::users::{log_rows, UsersError};
use pd_redact::{FieldRedactor, SensitiveFieldSet};
use tracing::{debug, info};

/// Personal-data toolkit - PII-redacting logging and credential checks
#[derive(Parser)]
#[command(name = "pd-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to personal-data.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase diagnostic verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Diagnostic format (human, redacted)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log every row of a users CSV export through the user_data logger
    LogUsers(LogUsersArgs),

    /// Redact field=value pairs in lines read from stdin
    Redact(RedactArgs),

    /// Hash a password read from stdin
    HashPassword(HashPasswordArgs),

    /// Check a password read from stdin against a stored hash
    CheckPassword(CheckPasswordArgs),

    /// Settings management
    Config(ConfigArgs),

    /// Print the database connection URL (password redacted)
    DbUrl(DbUrlArgs),
}

#[derive(Args, Debug)]
struct LogUsersArgs {
    /// CSV export to read (stdin when omitted)
    #[arg(long, short)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RedactArgs {
    /// Comma-separated field names (defaults to the configured fields)
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Redaction token
    #[arg(long)]
    token: Option<String>,

    /// Field separator
    #[arg(long)]
    separator: Option<char>,
}

#[derive(Args, Debug)]
struct HashPasswordArgs {
    /// bcrypt cost factor
    #[arg(long)]
    cost: Option<u32>,
}

#[derive(Args, Debug)]
struct CheckPasswordArgs {
    /// Stored bcrypt hash
    #[arg(long)]
    hash: String,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective settings as TOML
    Show,
    /// Validate the settings file
    Check,
}

#[derive(Args, Debug)]
struct DbUrlArgs {
    /// Print the password instead of the redaction token
    #[arg(long)]
    show_password: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let settings = load_settings(cli.global.config.as_deref());

    // Diagnostics share the configured redactor when the settings are usable.
    let redactor = settings
        .as_ref()
        .ok()
        .and_then(|loaded| loaded.settings.redaction.build_redactor().ok())
        .unwrap_or_default();
    init_logging(&log_config(&cli.global), redactor);

    if let Ok(loaded) = &settings {
        debug!(source = %loaded.source, "settings loaded");
    }

    let exit_code = match &cli.command {
        Commands::LogUsers(args) => run_log_users(&settings, args),
        Commands::Redact(args) => run_redact(&settings, args),
        Commands::HashPassword(args) => run_hash_password(args),
        Commands::CheckPassword(args) => run_check_password(args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(&settings),
            ConfigCommands::Check => run_config_check(&settings),
        },
        Commands::DbUrl(args) => run_db_url(args),
    };

    let _ = io::stdout().flush();
    std::process::exit(exit_code.as_i32());
}

fn log_config(global: &GlobalOpts) -> LogConfig {
    let cli_level = if global.quiet {
        Some(LogLevel::Error)
    } else if global.verbose > 0 {
        Some(LogLevel::default().more_verbose(global.verbose))
    } else {
        None
    };
    LogConfig::from_env(cli_level, global.log_format)
}

fn config_error(err: &ValidationError) -> ExitCode {
    eprintln!("pd-core: config error [{}]: {}", err.code(), err);
    ExitCode::ConfigError
}

fn loaded(settings: &Result<LoadedSettings, ValidationError>) -> Result<&LoadedSettings, ExitCode> {
    settings.as_ref().map_err(config_error)
}

fn read_password() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

fn run_log_users(settings: &Result<LoadedSettings, ValidationError>, args: &LogUsersArgs) -> ExitCode {
    let loaded = match loaded(settings) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let logger = match Logger::from_settings(&loaded.settings, Arc::new(StreamSink::stderr())) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("pd-core: {}", err);
            return ExitCode::ConfigError;
        }
    };

    let input: Box<dyn Read> = match &args.input {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(file),
            Err(err) => {
                eprintln!("pd-core: cannot open {}: {}", path.display(), err);
                return ExitCode::IoError;
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    match log_rows(input, &logger) {
        Ok(count) => {
            info!(rows = count, "user rows logged");
            ExitCode::Clean
        }
        Err(UsersError::Csv(err)) if err.is_io_error() => {
            eprintln!("pd-core: {}", err);
            ExitCode::IoError
        }
        Err(UsersError::Csv(err)) => {
            eprintln!("pd-core: {}", err);
            ExitCode::ArgsError
        }
        Err(UsersError::Log(LogError::Io(err))) => {
            eprintln!("pd-core: {}", err);
            ExitCode::IoError
        }
        Err(UsersError::Log(err)) => {
            eprintln!("pd-core: {}", err);
            ExitCode::InternalError
        }
    }
}

fn run_redact(settings: &Result<LoadedSettings, ValidationError>, args: &RedactArgs) -> ExitCode {
    let loaded = match loaded(settings) {
        Ok(l) => l,
        Err(code) => return code,
    };
    let defaults = &loaded.settings.redaction;

    let fields = args.fields.clone().unwrap_or_else(|| defaults.fields.clone());
    let token = args.token.clone().unwrap_or_else(|| defaults.token.clone());
    let separator = args.separator.unwrap_or(defaults.separator);

    let redactor = match SensitiveFieldSet::with_separator(fields, separator)
        .and_then(|set| FieldRedactor::new(set, token, separator))
    {
        Ok(r) => r,
        Err(err) => {
            eprintln!("pd-core: {}", err);
            return ExitCode::ArgsError;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(err) => {
                eprintln!("pd-core: {}", err);
                return ExitCode::IoError;
            }
        };
        if let Err(err) = writeln!(out, "{}", redactor.redact_cow(&line)) {
            eprintln!("pd-core: {}", err);
            return ExitCode::IoError;
        }
    }
    ExitCode::Clean
}

fn run_hash_password(args: &HashPasswordArgs) -> ExitCode {
    let hasher = match args.cost.map(PasswordHasher::with_cost) {
        Some(Ok(h)) => h,
        Some(Err(err)) => {
            eprintln!("pd-core: {}", err);
            return ExitCode::ArgsError;
        }
        None => PasswordHasher::new(),
    };

    let password = match read_password() {
        Ok(p) => p,
        Err(err) => {
            eprintln!("pd-core: {}", err);
            return ExitCode::IoError;
        }
    };

    match hasher.hash(&password) {
        Ok(hash) => {
            println!("{}", hash);
            ExitCode::Clean
        }
        Err(err) => {
            eprintln!("pd-core: {}", err);
            ExitCode::InternalError
        }
    }
}

fn run_check_password(args: &CheckPasswordArgs) -> ExitCode {
    let password = match read_password() {
        Ok(p) => p,
        Err(err) => {
            eprintln!("pd-core: {}", err);
            return ExitCode::IoError;
        }
    };

    if is_valid(&args.hash, &password) {
        println!("valid");
        ExitCode::Clean
    } else {
        println!("invalid");
        ExitCode::Mismatch
    }
}

fn run_config_show(settings: &Result<LoadedSettings, ValidationError>) -> ExitCode {
    let loaded = match loaded(settings) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let rendered = match loaded.settings.to_toml() {
        Ok(t) => t,
        Err(err) => return config_error(&err),
    };

    println!("# source: {}", loaded.source);
    if let Some(path) = &loaded.path {
        println!("# path: {}", path.display());
    }
    print!("{}", rendered);
    ExitCode::Clean
}

fn run_config_check(settings: &Result<LoadedSettings, ValidationError>) -> ExitCode {
    let loaded = match loaded(settings) {
        Ok(l) => l,
        Err(code) => return code,
    };

    match &loaded.path {
        Some(path) => println!("ok: {} ({})", path.display(), loaded.source),
        None => println!("ok: {}", loaded.source),
    }
    ExitCode::Clean
}

fn run_db_url(args: &DbUrlArgs) -> ExitCode {
    let db = DbSettings::from_env();
    debug!(settings = ?db, "database settings");
    if args.show_password {
        println!("{}", db.connection_url());
    } else {
        println!("{}", db.redacted_url());
    }
    ExitCode::Clean
}
