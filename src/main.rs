use std::io;
use std::path::PathBuf;

use anyhow::Context;
use busnav::bus::ZbusConnector;
use busnav::invoke::ProcessInvoker;
use busnav::shell::{run_repl, run_script, Command, Shell};
use busnav::Config;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "busnav")]
#[command(author, version, about = "Interactive D-Bus object explorer", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Bus to connect to on startup (session, system or a bus address)
    #[arg(short, long)]
    bus: Option<String>,

    /// Service to select after connecting
    #[arg(short, long)]
    service: Option<String>,

    /// Object path to cd into after selecting the service
    #[arg(short, long)]
    path: Option<String>,

    /// Run a shell command and exit instead of starting the shell (repeatable)
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    commands: Vec<String>,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep the per-process log file after exit
    #[arg(long)]
    keep_log: bool,
}

/// Log to a per-process file so the shell's own output stays clean.
fn init_logging(verbose: bool, level: &str) -> anyhow::Result<(WorkerGuard, PathBuf)> {
    let directive = if verbose {
        "busnav=debug".to_string()
    } else {
        format!("busnav={}", level)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let dir = std::env::temp_dir();
    let file_name = format!("busnav-{}.log", std::process::id());
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&file_name)
        .build(&dir)
        .context("failed to create log file")?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok((guard, dir.join(file_name)))
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let result = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    result.unwrap_or_else(|e| {
        eprintln!("warning: {}, using defaults", e);
        Config::default()
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    busnav::panic_handler::install();

    let config = load_config(cli.config.as_ref());
    let (guard, log_path) = init_logging(cli.verbose, &config.logging.level)?;
    info!("busnav {} starting, pid {}", env!("CARGO_PKG_VERSION"), std::process::id());

    let mut shell = Shell::new(
        Box::new(ZbusConnector),
        Box::new(ProcessInvoker),
        config.shell.options(),
    );

    let bus = cli
        .bus
        .or_else(|| config.bus.startup_kind().map(|_| config.bus.default.clone()));
    let mut startup = Vec::new();
    if let Some(bus) = bus {
        startup.push(Command::Connect(Some(bus)));
    }
    if let Some(service) = cli.service {
        startup.push(Command::ChangeService(Some(service)));
    }
    if let Some(path) = cli.path {
        startup.push(Command::Cd(vec![path]));
    }
    for command in startup {
        if let Err(e) = shell.execute(command, &mut io::stdout().lock()) {
            eprintln!("error: {}", e);
        }
    }

    if cli.commands.is_empty() {
        let history = if config.shell.history {
            Config::history_path().ok()
        } else {
            None
        };
        run_repl(&mut shell, &config.shell.prompt, history)?;
    } else {
        run_script(&mut shell, &cli.commands)?;
    }

    info!("busnav exiting");
    drop(guard);

    if !cli.keep_log {
        if let Err(e) = std::fs::remove_file(&log_path) {
            warn!("Failed to remove log file {}: {}", log_path.display(), e);
        }
    }

    Ok(())
}
