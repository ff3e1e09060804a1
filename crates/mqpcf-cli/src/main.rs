//! MQPCF CLI
//!
//! Offline tooling for PCF queue-status inquiries.
//!
//! # Usage
//!
//! ```bash
//! # Build an INQUIRE_QUEUE_STATUS command and show its bytes
//! mqpcf build TEST.QUEUE
//!
//! # Write the raw command to a file
//! mqpcf build TEST.QUEUE --out inquiry.bin
//!
//! # Decode a reply captured from the command server
//! mqpcf parse reply.bin --format json
//!
//! # Hex dump the first 64 bytes of a message
//! mqpcf dump reply.bin --limit 64
//!
//! # Produce a synthetic reply and decode it
//! mqpcf sample --queue Q1 --queue Q2 | mqpcf parse -
//! ```

mod config;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

use config::{Config, OutputFormat};
use mqpcf_protocol::{hex_dump, InquiryHandler, QueueHandleDetails, ResponseBuilder};

/// MQPCF - PCF queue-status inquiry tool
#[derive(Parser, Debug)]
#[command(name = "mqpcf")]
#[command(author, version, about = "MQPCF - build and decode PCF queue-status inquiries")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "MQPCF_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MQPCF_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an INQUIRE_QUEUE_STATUS command
    Build {
        /// Queue name to inquire about
        queue: String,

        /// Write raw bytes here instead of printing a hex dump
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Decode a queue-status reply into handles
    Parse {
        /// Reply file, or `-` for stdin
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Hex dump the start of a message
    Dump {
        /// Message file, or `-` for stdin
        input: PathBuf,

        /// Number of bytes to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Emit a synthetic queue-status reply
    Sample {
        /// Queue name for one handle (repeatable)
        #[arg(short, long = "queue", default_value = "TEST.QUEUE")]
        queues: Vec<String>,

        /// Process ID given to every handle
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        pid: i32,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
        config.validate()?;
    }

    FmtSubscriber::builder()
        .with_max_level(config.level()?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let handler = InquiryHandler::new();

    match args.command {
        Command::Build { queue, out } => {
            let cmd = handler.build_inquire_queue_status_cmd(&queue);
            match out {
                Some(path) => {
                    write_output(Some(&path), &cmd)?;
                    info!(path = %path.display(), bytes = cmd.len(), "Wrote inquiry command");
                }
                None => print!("{}", hex_dump(&cmd, cmd.len())),
            }
        }
        Command::Parse { input, format } => {
            let data = read_input(&input)?;
            debug!(bytes = data.len(), "Read reply");
            let handles = handler.parse_queue_status_response(&data);
            match format.unwrap_or(config.output) {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&handles)?);
                }
                OutputFormat::Table => print_table(&handles),
            }
        }
        Command::Dump { input, limit } => {
            let data = read_input(&input)?;
            let limit = limit.unwrap_or(config.dump_limit);
            println!("{} bytes", data.len());
            print!("{}", hex_dump(&data, limit));
        }
        Command::Sample { queues, pid, out } => {
            let reply = queues
                .iter()
                .fold(ResponseBuilder::new(), |builder, queue| {
                    builder.handle(&QueueHandleDetails {
                        queue_name: queue.clone(),
                        process_id: pid,
                        ..Default::default()
                    })
                })
                .finish();
            write_output(out.as_deref(), &reply)?;
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .context("Failed to read stdin")?;
        return Ok(data);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn print_table(handles: &[QueueHandleDetails]) {
    if handles.is_empty() {
        println!("{}", "(no handles: empty or unparseable reply)".dimmed());
        return;
    }

    println!(
        "{}",
        format!(
            "{:<24} {:<20} {:<16} {:<16} {:>8}  {}",
            "QUEUE", "CHANNEL", "CONNECTION", "USER", "PID", "APPLICATION"
        )
        .cyan()
        .bold()
    );
    for handle in handles {
        println!(
            "{:<24} {:<20} {:<16} {:<16} {:>8}  {}",
            handle.queue_name.green(),
            handle.channel_name,
            handle.connection_name,
            handle.user_id,
            handle.process_id.to_string().yellow(),
            handle.application_tag,
        );
    }
    println!("{}", format!("{} handle(s)", handles.len()).dimmed());
}
