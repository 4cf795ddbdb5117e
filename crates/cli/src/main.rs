//! Set-associative cache model CLI.
//!
//! This binary drives a single cache against a pattern-filled backing memory. It provides:
//! 1. **Demo:** Replays the reference walkthrough with a 16-word, 2-way, write-back, write-allocate cache.
//! 2. **Trace run:** Executes a trace file of loads and stores (see the `trace` module).
//!
//! Both print the decoded address, outcome and cache contents for every request,
//! or a JSON report of the final state with `--json`.

mod driver;
mod trace;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, io};

use clap::{Args, Parser, Subcommand, ValueEnum};
use setcache_core::CacheConfig;
use setcache_core::common::WORD_BYTES;
use setcache_core::config::{AllocatePolicy, WritePolicy};
use setcache_core::memory::word_address;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::driver::Driver;
use crate::trace::{DEMO, Request, TraceError};

/// Words in the default backing memory (1 MiB of 4-byte words).
const DEFAULT_MEMORY_WORDS: usize = 0x0010_0000 / 4;

const RULE: &str = "--------------------------------------";

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Set-associative cache model",
    long_about = "Run the reference walkthrough or a trace of loads and stores against a single cache.\n\nExamples:\n  cachesim demo\n  cachesim run trace.txt --ways 4 --write-policy write-through\n  cachesim run trace.txt --config cache.json --json"
)]
struct Cli {
    /// Log cache decisions (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay the reference walkthrough.
    Demo {
        #[command(flatten)]
        cache: CacheArgs,
    },

    /// Execute a trace file (`L <addr>` / `S <addr> <value>` per line).
    Run {
        /// Trace file path.
        trace: PathBuf,

        #[command(flatten)]
        cache: CacheArgs,
    },
}

#[derive(Args, Debug)]
struct CacheArgs {
    /// JSON cache configuration; flags below override its fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Capacity in words.
    #[arg(long)]
    capacity: Option<usize>,

    /// Words per block.
    #[arg(long)]
    block_size: Option<usize>,

    /// Ways per set.
    #[arg(long)]
    ways: Option<usize>,

    /// Store propagation policy.
    #[arg(long, value_enum)]
    write_policy: Option<WriteArg>,

    /// Store miss allocation policy.
    #[arg(long, value_enum)]
    allocate_policy: Option<AllocateArg>,

    /// Backing memory size in words.
    #[arg(long, default_value_t = DEFAULT_MEMORY_WORDS)]
    memory_words: usize,

    /// Print only a JSON report of the final state.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WriteArg {
    WriteBack,
    WriteThrough,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AllocateArg {
    Allocate,
    NoAllocate,
}

impl From<WriteArg> for WritePolicy {
    fn from(arg: WriteArg) -> Self {
        match arg {
            WriteArg::WriteBack => Self::WriteBack,
            WriteArg::WriteThrough => Self::WriteThrough,
        }
    }
}

impl From<AllocateArg> for AllocatePolicy {
    fn from(arg: AllocateArg) -> Self {
        match arg {
            AllocateArg::Allocate => Self::Allocate,
            AllocateArg::NoAllocate => Self::NoAllocate,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("bad configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Trace(#[from] TraceError),
    #[error("request {index} ({request}): {source}")]
    Request {
        index: usize,
        request: Request,
        source: setcache_core::CacheError,
    },
    #[error(transparent)]
    Cache(#[from] setcache_core::CacheError),
    #[error("cannot encode report: {0}")]
    Report(#[from] serde_json::Error),
}

impl CacheArgs {
    /// Resolves the configuration: `base`, replaced by the config file if
    /// given, then patched with explicit flags.
    fn resolve(&self, base: CacheConfig) -> Result<CacheConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = read(path)?;
                serde_json::from_str(&text).map_err(|source| CliError::Config {
                    path: path.clone(),
                    source,
                })?
            }
            None => base,
        };
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if let Some(ways) = self.ways {
            config.associativity = ways;
        }
        if let Some(policy) = self.write_policy {
            config.write_policy = policy.into();
        }
        if let Some(policy) = self.allocate_policy {
            config.allocate_policy = policy.into();
        }
        Ok(config)
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Demo { cache } => {
            let reference =
                CacheConfig::new(16, 4, 2, WritePolicy::WriteBack, AllocatePolicy::Allocate);
            cache
                .resolve(reference)
                .and_then(|config| simulate(config, &cache, DEMO))
        }
        Commands::Run { trace: path, cache } => read(&path)
            .and_then(|text| Ok(trace::parse(&text)?))
            .and_then(|requests| {
                let config = cache.resolve(CacheConfig::default())?;
                simulate(config, &cache, &requests)
            }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[!] {e}");
            ExitCode::FAILURE
        }
    }
}

/// Number of leading memory blocks listed before a run.
const LISTED_BLOCKS: usize = 10;

fn print_memory(driver: &Driver) {
    let memory = driver.memory();
    let block_bytes = memory.block_size() as u32 * WORD_BYTES;
    println!("Initial memory blocks:");
    for block in 0..memory.num_blocks().min(LISTED_BLOCKS) {
        let address = block as u32 * block_bytes;
        let words = memory
            .block(word_address(address))
            .map(|words| {
                words
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        println!(" Block[{block}]: addr={address:#x} {words}");
    }
    println!();
}

/// Runs `requests` and prints either a per-request log or the JSON report.
fn simulate(config: CacheConfig, args: &CacheArgs, requests: &[Request]) -> Result<(), CliError> {
    let mut driver = Driver::new(config, args.memory_words)?;

    if !args.json {
        let geometry = driver.cache().geometry();
        println!(
            "Cache: {} words, {}-word blocks, {} ways, {} sets, {:?} + {:?}",
            geometry.capacity(),
            geometry.block_size(),
            geometry.associativity(),
            geometry.num_sets(),
            driver.cache().write_policy(),
            driver.cache().allocate_policy()
        );
        println!();
        print_memory(&driver);
    }

    for (index, &request) in requests.iter().enumerate() {
        let access = driver
            .execute(request)
            .map_err(|source| CliError::Request {
                index,
                request,
                source,
            })?;
        if !args.json {
            println!("{RULE}");
            println!("{access}");
            println!("{}", driver.cache().snapshot());
            println!("{RULE}");
            println!();
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&driver.report())?);
    } else {
        println!("{}", driver.cache().stats());
    }
    Ok(())
}
