// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_cli::constants::TOKEN_ENV_VAR;
use notion_cli::{dispatch, AppError, Cli, CredentialStore, NotionHttpClient, Printer, Session};
use std::fs;
use std::io::{IsTerminal, Write};

/// Sets up logging configuration.
///
/// Console output goes to stderr so it never mixes with command output.
fn setup_logging(debug: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if debug || verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion-cli.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Parses the command line and runs one command against the live API.
async fn run(cli: Cli) -> Result<(), AppError> {
    let store = CredentialStore::default_location()?;
    let stdout = std::io::stdout();
    let stdin = std::io::stdin();
    let input_is_piped = !stdin.is_terminal();
    let mut out = stdout.lock();
    let mut input = stdin.lock();

    let mut session = Session {
        format: cli.format,
        out: Printer::new(&mut out),
        input: &mut input,
        input_is_piped,
        store,
        env_token: std::env::var(TOKEN_ENV_VAR).ok(),
    };

    let result = dispatch(cli.command, &mut session, NotionHttpClient::new).await;
    out.flush()?;
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.debug, cli.verbose) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("  → {}", hint);
        }
        std::process::exit(1);
    }
}
