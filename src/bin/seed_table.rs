//! Dump generator output for a seed range as CSV, for checking a device
//! kernel against the host generator.
use clap::Parser;
use gsc::io_utils::io_cli_error;
use gsc::Xoshiro1024pp;
use std::path::PathBuf;

#[derive(Parser)]
struct Args {
    /// First seed
    #[clap(long, default_value_t = 0)]
    start: u64,
    /// Number of seeds
    #[clap(long, default_value_t = 16)]
    count: u64,
    /// Output words per seed
    #[clap(long, default_value_t = 2)]
    words: usize,
    /// CSV destination (stdout if omitted)
    #[clap(long)]
    out: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut wtr: csv::Writer<Box<dyn std::io::Write>> = match &args.out {
        Some(path) => {
            let f = std::fs::File::create(path).map_err(|e| io_cli_error("creating", path, e))?;
            csv::Writer::from_writer(Box::new(f))
        }
        None => csv::Writer::from_writer(Box::new(std::io::stdout())),
    };

    let mut header = vec!["seed".to_string()];
    header.extend((0..args.words).map(|i| format!("word{i}")));
    wtr.write_record(&header)?;

    let end = args.start.saturating_add(args.count);
    for seed in args.start..end {
        let mut record = vec![seed.to_string()];
        record.extend(
            Xoshiro1024pp::new(seed)
                .take(args.words)
                .map(|w| hex::encode(w.to_be_bytes())),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
