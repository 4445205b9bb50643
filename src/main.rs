use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gsc::config::DEFAULT_CHUNK_SIZE;
use gsc::gpu::{open_device, HostDevice};
use gsc::io_utils::{
    default_artifact_path, default_restored_path, gsc_cli_error, io_cli_error, simple_cli_error,
    CliError,
};
use gsc::{compress, compress_batched, Artifact, GscError, SearchConfig, ARTIFACT_LEN};

/// Generative Seed Compression: store a file as the seed that regenerates it.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Brute-force a seed on all CPU cores.
    Compress {
        input: PathBuf,
        /// Defaults to `<input>.bin`
        output: Option<PathBuf>,
        /// Worker threads (defaults to available parallelism)
        #[arg(long)]
        threads: Option<usize>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Brute-force a seed in batches on an OpenCL GPU.
    CompressCl {
        input: PathBuf,
        /// Defaults to `<input>.bin`
        output: Option<PathBuf>,
        /// Seeds per device batch
        #[arg(default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: u64,
        /// Kernel source to build instead of the embedded one
        #[arg(long)]
        kernel: Option<PathBuf>,
        /// Run the batches on the host emulation instead of OpenCL
        #[arg(long)]
        host: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Regenerate the original file from an artifact.
    Decompress {
        input: PathBuf,
        /// Defaults to the input with `.bin` stripped, or `<input>.out`
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Only test seeds below this value; fail if none matches
    #[arg(long)]
    limit: Option<u64>,
    /// Hide the progress spinner
    #[arg(long, short)]
    quiet: bool,
    /// Print a JSON summary on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    backend: &'a str,
    input_bytes: usize,
    bit_count: u64,
    seed: u64,
    artifact: String,
    elapsed_ms: u128,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("{e}");
        let code = match e.source.as_deref().and_then(|s| s.downcast_ref::<GscError>()) {
            Some(GscError::DeviceUnavailable(_))
            | Some(GscError::KernelBuild(_))
            | Some(GscError::Device(_)) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Compress {
            input,
            output,
            threads,
            common,
        } => {
            let mut config = search_config(&common);
            if let Some(t) = threads {
                config.workers = t;
            }
            let output = output.unwrap_or_else(|| default_artifact_path(&input));
            let data = read_input(&input)?;
            eprintln!(
                "Target: {} bits. Using {} threads.",
                data.len() * 8,
                config.workers
            );
            let start = Instant::now();
            let found = compress(&data, &config)
                .map_err(|e| gsc_cli_error("compression failed", e))?;
            finish(found, "cpu", &data, &output, &common, start)
        }
        Command::CompressCl {
            input,
            output,
            chunk_size,
            kernel,
            host,
            common,
        } => {
            let mut config = search_config(&common);
            config.chunk_size = chunk_size;
            let output = output.unwrap_or_else(|| default_artifact_path(&input));
            let data = read_input(&input)?;
            eprintln!(
                "Target: {} bits. Using {} seeds per batch.",
                data.len() * 8,
                chunk_size
            );
            let start = Instant::now();
            let found = if host {
                compress_batched(&data, HostDevice::default(), &config)
            } else {
                open_device(kernel.as_deref())
                    .and_then(|device| compress_batched(&data, device, &config))
            }
            .map_err(|e| gsc_cli_error("device search failed", e))?;
            let backend = if host { "host" } else { "opencl" };
            finish(found, backend, &data, &output, &common, start)
        }
        Command::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| default_restored_path(&input));
            let bytes =
                fs::read(&input).map_err(|e| io_cli_error("reading artifact", &input, e))?;
            let artifact = Artifact::deserialize(&bytes)
                .map_err(|e| gsc_cli_error("decompression failed", e))?;
            if bytes.len() > ARTIFACT_LEN {
                tracing::warn!(
                    extra = bytes.len() - ARTIFACT_LEN,
                    "ignoring trailing bytes after artifact record"
                );
            }
            let restored = artifact.reconstruct();
            fs::write(&output, &restored)
                .map_err(|e| io_cli_error("writing output file", &output, e))?;
            eprintln!(
                "Decompressed file with seed {} ({} bits).",
                artifact.seed, artifact.bit_count
            );
            Ok(())
        }
    }
}

fn search_config(common: &CommonArgs) -> SearchConfig {
    SearchConfig {
        seed_limit: common.limit,
        show_progress: !common.quiet,
        ..SearchConfig::default()
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|e| io_cli_error("reading input file", path, e))
}

fn finish(
    found: Option<Artifact>,
    backend: &str,
    data: &[u8],
    output: &Path,
    common: &CommonArgs,
    start: Instant,
) -> Result<(), CliError> {
    let artifact = found.ok_or_else(|| {
        simple_cli_error(&format!(
            "compression failed: no seed below {} reproduces the input. Raise --limit to search further.",
            common.limit.unwrap_or(u64::MAX)
        ))
    })?;
    artifact
        .write_to(output)
        .map_err(|e| gsc_cli_error(&format!("writing '{}'", output.display()), e))?;

    if common.json {
        let summary = Summary {
            backend,
            input_bytes: data.len(),
            bit_count: artifact.bit_count,
            seed: artifact.seed,
            artifact: output.display().to_string(),
            elapsed_ms: start.elapsed().as_millis(),
        };
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| simple_cli_error(&format!("encoding summary: {e}")))?;
        println!("{text}");
    } else {
        eprintln!("Seed found: {}", artifact.seed);
        eprintln!("Saved to: {}", output.display());
        eprintln!("Elapsed: {:.2?}", start.elapsed());
    }
    Ok(())
}
