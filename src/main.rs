// src/main.rs

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use mxtgen::config::{init_config, MxtgenConfig};
use mxtgen::controller::{ControllerSettings, FormController};
use mxtgen::download::HttpDownloader;
use mxtgen::errors::GenResult;
use mxtgen::form::FormField;
use mxtgen::logging::init_logging;
use mxtgen::storage::FileStore;

/// Request a license artifact from the generation endpoint.
///
/// Values not given on the command line keep their defaults; a missing
/// name is asked for interactively when stdin is a terminal.
#[derive(Debug, Parser)]
#[command(name = "mxtgen", version, about)]
struct Args {
    /// Authorized user name
    #[arg(long)]
    name: Option<String>,

    /// Target version (default from config, e.g. 25.2)
    #[arg(long = "ver")]
    version: Option<String>,

    /// Seat count
    #[arg(long)]
    count: Option<String>,

    /// Directory the artifact is saved into
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Switch display language and remember the choice
    #[arg(long)]
    toggle_lang: bool,

    /// Print the request target instead of downloading
    #[arg(long)]
    print_url: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match init_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging, args.verbose);

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: &MxtgenConfig) -> GenResult<()> {
    let store = FileStore::from_config(&config.storage)?;
    let downloader = Arc::new(HttpDownloader::new(&config.endpoint.base_url, &args.out)?);

    let mut form = FormController::initialize(
        store,
        Arc::clone(&downloader),
        ControllerSettings::from(config),
    );

    if args.toggle_lang {
        form.toggle_locale();
    }

    let texts = form.texts();
    println!("{} - {}", texts.title, texts.subtitle);

    if let Some(name) = args.name {
        form.set_field(FormField::Name, name);
    }
    if let Some(version) = args.version {
        form.set_field(FormField::Version, version);
    }
    if let Some(count) = args.count {
        form.set_field(FormField::Count, count);
    }

    if form.state().name.is_empty() && io::stdin().is_terminal() {
        let name = prompt(texts.name_label, texts.name_placeholder)?;
        form.set_field(FormField::Name, name);
    }

    if args.print_url {
        println!("{}", form.preview_target()?);
        return Ok(());
    }

    let mut loading = form.subscribe();
    let result = form.submit();
    if let Some(message) = form.notice_message() {
        println!("{message}");
    }
    result?;

    let outcomes = downloader.wait().await;
    let _ = loading.wait_for(|state| !state.is_loading()).await;

    for outcome in outcomes {
        let saved = outcome.into_result()?;
        println!("{}", saved.display());
    }
    Ok(())
}

fn prompt(label: &str, placeholder: &str) -> io::Result<String> {
    print!("{label} ({placeholder}): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
