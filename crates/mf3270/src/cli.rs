//! `mf3270` command line client

use crate::config::parse_duration;
use crate::{ConnectionOptions, ExtraArgs, LibraryConfig, Mainframe3270};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive IBM 3270 sessions through the x3270 emulators")]
struct Args {
    /// Use the windowed emulator (x3270 / wc3270)
    #[arg(long)]
    visible: bool,

    /// Terminal model, e.g. 2, 3279-4-E
    #[arg(long)]
    model: Option<String>,

    /// Emulator wait timeout, e.g. "30 seconds"
    #[arg(long, value_parser = duration_arg)]
    timeout: Option<Duration>,

    /// Library settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct Target {
    /// Host to connect to
    host: String,

    /// Telnet port
    #[arg(long, default_value_t = crate::keywords::DEFAULT_PORT)]
    port: u16,

    /// Logical unit name
    #[arg(long)]
    lu: Option<String>,

    /// Extra emulator option, repeatable
    #[arg(long = "extra-arg", allow_hyphen_values = true)]
    extra_args: Vec<String>,

    /// File with extra emulator options
    #[arg(long, conflicts_with = "extra_args")]
    arg_file: Option<PathBuf>,
}

impl Target {
    fn options(&self) -> ConnectionOptions {
        let mut options = ConnectionOptions::default().with_port(self.port);
        if let Some(lu) = &self.lu {
            options = options.with_lu(lu.clone());
        }
        if let Some(path) = &self.arg_file {
            options = options.with_extra_args(ExtraArgs::File(path.clone()));
        } else if !self.extra_args.is_empty() {
            options = options.with_extra_args(ExtraArgs::List(self.extra_args.clone()));
        }
        options
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run raw emulator actions and print the data they return
    Exec {
        #[command(flatten)]
        target: Target,

        /// Actions such as `Enter`, `PF(3)` or `String("user")`
        #[arg(required = true, last = true)]
        actions: Vec<String>,
    },

    /// Wait for an input field and print the screen row by row
    ReadScreen {
        #[command(flatten)]
        target: Target,
    },

    /// Save the screen as HTML
    Screenshot {
        #[command(flatten)]
        target: Target,

        /// Output file
        file: PathBuf,
    },
}

fn duration_arg(value: &str) -> Result<Duration, String> {
    parse_duration(value).map_err(|e| e.to_string())
}

fn library_config(args: &Args) -> Result<LibraryConfig> {
    let mut config = match &args.config {
        Some(path) => LibraryConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LibraryConfig {
            visible: false,
            ..LibraryConfig::default()
        },
    };
    if args.visible {
        config.visible = true;
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    Ok(config)
}

pub async fn run() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str())),
        )
        .with_writer(io::stderr)
        .init();

    let mut library = Mainframe3270::new(library_config(&args)?);
    let result = run_command(&mut library, &args.command).await;
    let closed = library
        .close_all_connections()
        .await
        .context("Failed to close the emulator");
    result.and(closed)
}

async fn run_command(library: &mut Mainframe3270, command: &Commands) -> Result<()> {
    let mut stdout = io::stdout();
    match command {
        Commands::Exec { target, actions } => {
            open(library, target).await?;
            for action in actions {
                let response = library
                    .mf()?
                    .exec_command(action.as_str())
                    .await
                    .with_context(|| format!("Action {action} failed"))?;
                for line in &response.data {
                    stdout.write_all(line)?;
                    stdout.write_all(b"\n")?;
                }
            }
        }
        Commands::ReadScreen { target } => {
            open(library, target).await?;
            library.wait_field_detected().await?;
            let geometry = library.mf()?.geometry();
            for row in 1..=geometry.rows {
                let line = library.read(row, 1, geometry.columns as usize).await?;
                writeln!(stdout, "{line}")?;
            }
        }
        Commands::Screenshot { target, file } => {
            open(library, target).await?;
            library.wait_field_detected().await?;
            library.mf()?.save_screen(&file.to_string_lossy()).await?;
            info!("Screen saved to {}", file.display());
        }
    }
    stdout.flush()?;
    Ok(())
}

async fn open(library: &mut Mainframe3270, target: &Target) -> Result<()> {
    library
        .open_connection(&target.host, target.options())
        .await
        .with_context(|| format!("Failed to connect to {}", target.host))?;
    Ok(())
}
