mod plotfile;

use clap::Parser;
use plotfile::PlotfileWriter;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wavetoy_core::{WaveToy, WaveToyConfig};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Output directory
    #[arg(long)]
    out: PathBuf,

    /// JSON parameter file; flags below override its fields
    #[arg(long)]
    params: Option<PathBuf>,

    /// Cells per axis
    #[arg(long)]
    ncells: Option<usize>,

    /// Ghost width per patch face
    #[arg(long)]
    nghostzones: Option<usize>,

    /// Longest patch edge in cells
    #[arg(long)]
    max_grid_size: Option<usize>,

    /// Lower domain bound, one value or "x,y,z"
    #[arg(long)]
    lo: Option<String>,

    /// Upper domain bound, one value or "x,y,z"
    #[arg(long)]
    hi: Option<String>,

    /// dt = dtfac / ncells
    #[arg(long)]
    dtfac: Option<f64>,

    /// Number of iterations to run
    #[arg(long, default_value_t = 64)]
    iterations: u64,

    /// Write a plot file every N iterations (0 disables output)
    #[arg(long, default_value_t = 16)]
    out_every: u64,

    /// Plot file prefix, relative to --out
    #[arg(long, default_value = "wavetoy/phi")]
    prefix: String,
}

#[derive(Serialize)]
struct NormsRow {
    iteration: u64,
    time: f64,
    max_abs_error: f64,
    l2_error: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = build_config(&args)?;

    fs::create_dir_all(&args.out)?;
    write_params(&args.out, &cfg)?;

    let mut norms_file = BufWriter::new(
        OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(args.out.join("norms.jsonl"))?,
    );

    let mut sim = WaveToy::new(&cfg)?;
    let mut sink = PlotfileWriter::new(&args.out);

    sim.initialize();
    if args.out_every > 0 {
        emit(&mut sim, &args.prefix, &mut sink, &mut norms_file)?;
    }

    for _ in 0..args.iterations {
        sim.step()?;
        if args.out_every > 0 && sim.iteration() % args.out_every == 0 {
            emit(&mut sim, &args.prefix, &mut sink, &mut norms_file)?;
        }
    }

    sim.compute_error();
    let norms = sim.error_norms();
    info!(
        "finished: iteration={} t={:.6} max|err|={:.3e} l2={:.3e}",
        sim.iteration(),
        sim.time(),
        norms.max_abs,
        norms.l2
    );

    norms_file.flush()?;

    println!("Wrote run to: {}", args.out.display());
    println!(
        "Plot files: {} (iterations={} out_every={})",
        sink.written().len(),
        args.iterations,
        args.out_every
    );

    Ok(())
}

/// Write a plot file and append its error norms to the JSONL log.
fn emit<W: Write>(
    sim: &mut WaveToy,
    prefix: &str,
    sink: &mut PlotfileWriter,
    norms_file: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    sim.output(prefix, sink)?;

    let norms = sim.error_norms();
    let row = NormsRow {
        iteration: sim.iteration(),
        time: sim.time(),
        max_abs_error: norms.max_abs,
        l2_error: norms.l2,
    };
    serde_json::to_writer(&mut *norms_file, &row)?;
    norms_file.write_all(b"\n")?;
    Ok(())
}

fn build_config(args: &Args) -> Result<WaveToyConfig, Box<dyn std::error::Error>> {
    let mut cfg = match &args.params {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => WaveToyConfig::default(),
    };

    if let Some(n) = args.ncells {
        cfg.ncells = n;
    }
    if let Some(g) = args.nghostzones {
        cfg.nghostzones = g;
    }
    if let Some(m) = args.max_grid_size {
        cfg.max_grid_size = m;
    }
    if let Some(s) = &args.lo {
        cfg.lo = parse_triple(s)?;
    }
    if let Some(s) = &args.hi {
        cfg.hi = parse_triple(s)?;
    }
    if let Some(f) = args.dtfac {
        cfg.dtfac = f;
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Record the effective parameters next to the output.
fn write_params(out: &Path, cfg: &WaveToyConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut w = BufWriter::new(File::create(out.join("params.json"))?);
    serde_json::to_writer_pretty(&mut w, cfg)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}

fn parse_triple(s: &str) -> Result<[f64; 3], Box<dyn std::error::Error>> {
    let mut out = Vec::new();
    for part in s.split(',') {
        let p = part.trim();
        if p.is_empty() {
            continue;
        }
        let v: f64 = p.parse()?;
        out.push(v);
    }
    match out.as_slice() {
        [v] => Ok([*v; 3]),
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(format!("expected 1 or 3 comma-separated values, got {:?}", s).into()),
    }
}
