use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use memory_modder::config::{load_config, validate_config, Config, ConfigLoader};
use memory_modder::memory::AddressPreview;
use memory_modder::{Address, Comparison, MemoryEngine, MemoryValue, ScanSession, ValueType};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "memory-modder")]
#[command(version, about, long_about = None)]
struct Args {
    /// Process id to attach to
    pid: u32,

    /// TOML configuration file; memory-modder.toml is used when present
    config: Option<PathBuf>,

    /// Log level, overriding the configuration file
    #[arg(short, long)]
    log_level: Option<String>,
}

const HELP: &str = "\
commands:
  scan [type] [unaligned]      start a new scan (i8..i64, u8..u64, f32, f64)
  filter [op] <value>          keep addresses where current <op> value (== != < > <= >=)
  list [n]                     show the first n addresses with their values
  stats                        candidate statistics as JSON
  read <addr> [type]           read one value
  write <addr> <value> [type]  write one value
  dump <addr> <len>            hex dump of raw bytes
  info                         attached process
  quit                         exit";

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Scan {
        value_type: Option<ValueType>,
        unaligned: bool,
    },
    Filter {
        comparison: Comparison,
        value: String,
    },
    List(Option<usize>),
    Stats,
    Read {
        address: Address,
        value_type: Option<ValueType>,
    },
    Write {
        address: Address,
        value: String,
        value_type: Option<ValueType>,
    },
    Dump {
        address: Address,
        len: usize,
    },
    Info,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        ["scan"] => Command::Scan {
            value_type: None,
            unaligned: false,
        },
        ["scan", "unaligned"] => Command::Scan {
            value_type: None,
            unaligned: true,
        },
        ["scan", value_type] => Command::Scan {
            value_type: Some(value_type.parse()?),
            unaligned: false,
        },
        ["scan", value_type, "unaligned"] => Command::Scan {
            value_type: Some(value_type.parse()?),
            unaligned: true,
        },
        ["filter", value] => Command::Filter {
            comparison: Comparison::Equals,
            value: value.to_string(),
        },
        ["filter", op, value] => Command::Filter {
            comparison: op.parse()?,
            value: value.to_string(),
        },
        ["list"] => Command::List(None),
        ["list", count] => Command::List(Some(
            count
                .parse()
                .with_context(|| format!("Invalid count: {}", count))?,
        )),
        ["stats"] => Command::Stats,
        ["read", address] => Command::Read {
            address: address.parse()?,
            value_type: None,
        },
        ["read", address, value_type] => Command::Read {
            address: address.parse()?,
            value_type: Some(value_type.parse()?),
        },
        ["write", address, value] => Command::Write {
            address: address.parse()?,
            value: value.to_string(),
            value_type: None,
        },
        ["write", address, value, value_type] => Command::Write {
            address: address.parse()?,
            value: value.to_string(),
            value_type: Some(value_type.parse()?),
        },
        ["dump", address, len] => Command::Dump {
            address: address.parse()?,
            len: len
                .parse()
                .with_context(|| format!("Invalid length: {}", len))?,
        },
        ["info"] => Command::Info,
        ["help"] | ["?"] => Command::Help,
        ["quit"] | ["exit"] => Command::Quit,
        _ => bail!("Unrecognized command: {}", line.trim()),
    };

    Ok(command)
}

/// Preview rows, then a count of the candidates left out
fn write_preview(out: &mut impl Write, preview: &[AddressPreview], total: usize) -> io::Result<()> {
    for entry in preview {
        match entry.value {
            Some(value) => writeln!(out, "{}  {}", entry.address, value)?,
            None => writeln!(out, "{}  ??", entry.address)?,
        }
    }

    if total > preview.len() {
        writeln!(out, "...And {} more...", total - preview.len())?;
    }
    Ok(())
}

/// Rejects dumps longer than the configured limit
fn check_dump_len(len: usize, limit: usize) -> Result<()> {
    if len > limit {
        bail!("Dump of {} bytes exceeds the limit of {} bytes", len, limit);
    }
    Ok(())
}

/// Interactive state: the attached engine and the current scan, if any
struct Driver {
    engine: MemoryEngine,
    session: Option<ScanSession>,
    config: Config,
}

impl Driver {
    /// Value type for commands that name none: the scan's, else the configured one
    fn default_value_type(&self) -> Result<ValueType> {
        match &self.session {
            Some(session) => Ok(session.value_type()),
            None => Ok(self.config.value_type()?),
        }
    }

    fn session(&self) -> Result<&ScanSession> {
        self.session
            .as_ref()
            .ok_or_else(|| anyhow!("No scan in progress; run `scan` first"))
    }

    /// Runs one command. Returns `false` when the session should end.
    fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<bool> {
        match command {
            Command::Scan {
                value_type,
                unaligned,
            } => {
                let value_type = match value_type {
                    Some(value_type) => value_type,
                    None => self.config.value_type()?,
                };
                let mut options = self.config.scan_options();
                options.aligned &= !unaligned;

                let session = ScanSession::start_with(&self.engine, value_type, &options)?;
                writeln!(out, "{}", session.stats())?;
                self.session = Some(session);
            }
            Command::Filter { comparison, value } => {
                let engine = &self.engine;
                let session = self
                    .session
                    .as_mut()
                    .ok_or_else(|| anyhow!("No scan in progress; run `scan` first"))?;
                let value = MemoryValue::parse(&value, session.value_type())?;
                let stats = session.filter(engine, comparison, &value)?;
                writeln!(out, "{}", stats)?;
            }
            Command::List(count) => {
                let count = count.unwrap_or(self.config.display.preview_count);
                let session = self.session()?;
                let preview = session.preview(&self.engine, count);
                write_preview(out, &preview, session.size())?;
            }
            Command::Stats => {
                let stats = self.session()?.stats();
                writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
            }
            Command::Read {
                address,
                value_type,
            } => {
                let value_type = match value_type {
                    Some(value_type) => value_type,
                    None => self.default_value_type()?,
                };
                match self.engine.read_value(address, value_type) {
                    Ok(value) => writeln!(out, "{}  {}", address, value)?,
                    Err(e) if e.is_access_failure() => {
                        writeln!(out, "{}  ?? ({})", address, e.user_message())?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Command::Write {
                address,
                value,
                value_type,
            } => {
                let value_type = match value_type {
                    Some(value_type) => value_type,
                    None => self.default_value_type()?,
                };
                let value = MemoryValue::parse(&value, value_type)?;
                match self.engine.write_value(address, &value) {
                    Ok(()) => {
                        info!("Wrote {} to {}", value, address);
                        writeln!(out, "ok")?;
                    }
                    Err(e) if e.is_access_failure() => writeln!(out, "{}", e.user_message())?,
                    Err(e) => return Err(e.into()),
                }
            }
            Command::Dump { address, len } => {
                check_dump_len(len, self.config.display.max_dump_bytes)?;
                let bytes = self.engine.read_bytes(address, len)?;
                for (row, chunk) in bytes.chunks(16).enumerate() {
                    writeln!(
                        out,
                        "{}  {}",
                        address.wrapping_add(row * 16),
                        hex::encode(chunk)
                    )?;
                }
                if bytes.len() < len {
                    writeln!(out, "({} of {} bytes readable)", bytes.len(), len)?;
                }
            }
            Command::Info => {
                let process = self.engine.process();
                writeln!(
                    out,
                    "pid {}  name {}  base {}",
                    process.pid(),
                    process.name(),
                    process.base_address()
                )?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(false),
        }

        Ok(true)
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let pid = args.pid;

    let mut config = match &args.config {
        Some(path) => ConfigLoader::new(path)
            .load()
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => load_config().context("Failed to load configuration")?,
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    validate_config(&config)?;

    init_logging(&config.logging.level);
    info!("Starting memory-modder v{}", memory_modder::VERSION);

    let engine = MemoryEngine::attach(pid).map_err(|e| {
        error!("Attach to {} failed: {}", pid, e);
        anyhow!(e.user_message())
    })?;

    let mut driver = Driver {
        engine,
        session: None,
        config,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let outcome = parse_command(&line).and_then(|command| driver.execute(command, &mut stdout));
        match outcome {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => writeln!(stdout, "error: {:#}", e)?,
        }
        stdout.flush()?;
    }

    info!("Shutting down memory-modder");
    Ok(())
}
