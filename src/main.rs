use clap::{Parser, Subcommand};
use filelog::config::{LoggerSettings, load_config};
use filelog::hooks::install_panic_hook;
use filelog::logger::{DEFAULT_LEVEL, FileLogger, Logger};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "filelog")]
#[command(about = "Append leveled entries to rotating log files", long_about = None)]
struct Cli {
    /// Path to a JSON logger config; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the log directory from the config
    #[arg(long)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append one entry
    Write {
        message: String,
        /// Level name (standard or registered custom level)
        #[arg(short, long, default_value = DEFAULT_LEVEL)]
        level: String,
        /// Calling unit; labels the entry and picks the file under per-caller routing
        #[arg(short, long)]
        source: Option<String>,
        /// Parse the message as JSON and log it as a structured value
        #[arg(long)]
        json: bool,
    },
    /// Write padded entries against a small ceiling and report each rotation
    Fill {
        /// Number of entries to write
        #[arg(short, long, default_value_t = 1000)]
        entries: u32,
        /// Rotation ceiling in KiB
        #[arg(short, long, default_value_t = 100)]
        max_kb: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => load_config(path)?,
        None => LoggerSettings::default(),
    };
    if let Some(dir) = cli.dir {
        settings.config.base_dir = dir;
    }

    let logger = Arc::new(FileLogger::from_settings(settings)?);
    install_panic_hook(logger.clone());

    match cli.command {
        Commands::Write {
            message,
            level,
            source,
            json,
        } => {
            if json {
                let value: serde_json::Value = serde_json::from_str(&message)?;
                logger.write_from(source.as_deref(), &value, &level)?;
            } else {
                logger.write_from(source.as_deref(), &message, &level)?;
            }
        }
        Commands::Fill { entries, max_kb } => {
            run_fill(&logger, entries, max_kb)?;
        }
    }

    logger.flush()?;
    logger.shutdown();
    Ok(())
}

/// Rotation exercise: writes `entries` padded messages with a `max_kb`
/// ceiling and detects rotations by watching the file shrink.
fn run_fill(
    logger: &FileLogger,
    entries: u32,
    max_kb: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let max_bytes = max_kb * 1024;
    logger.configure_rotation(true, Some(max_bytes))?;
    let filename = logger.target_filename(None);
    let path = logger.log_path(&filename);
    let message = "This is a test message for log rotation. ".repeat(10);

    println!("Max log size: {max_kb}KB ({max_bytes} bytes)");
    println!("Entries to write: {entries}");
    println!("Log file: {}", path.display());
    logger.info(&format!("fill started: {entries} entries, ceiling {max_bytes} bytes"))?;

    let mut rotations = 0u32;
    let mut last_size = file_size(&path);
    for i in 1..=entries {
        logger.write(&format!("Entry #{i}: {message}"), DEFAULT_LEVEL)?;
        let size = file_size(&path);
        if size < last_size {
            rotations += 1;
            println!("Rotation detected: size went from {last_size} to {size} bytes");
        }
        last_size = size;

        if i % 50 == 0 {
            println!("Progress: {i}/{entries} entries written");
        }
    }

    println!("Total entries written: {entries}");
    println!("Rotation count: {rotations}");
    println!("Current log file size: {} bytes", file_size(&path));
    Ok(())
}

fn file_size(path: &std::path::Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

