use anyhow::{bail, Context, Result};
use clap::Parser;
use statscraper::{
    config::Config,
    dataset::{write_csv, write_json, write_parquet, OutputFormat},
    fetch::HttpSource,
    process::{build_dataset, snapshot_dates},
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    // ─── 1) init logging (stderr; stdout carries data only) ──────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cfg = Config::parse();
    if let Err(e) = run(&cfg) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cfg: &Config) -> Result<()> {
    info!(faculty = %cfg.faculty, base = %cfg.base_url, "startup");

    if cfg.format == OutputFormat::Parquet && cfg.output.is_none() {
        bail!("--format parquet needs --output <PATH>");
    }

    // ─── 2) http source ──────────────────────────────────────────────
    let source = HttpSource::new(cfg.base_url.clone(), cfg.timeout())
        .context("creating HTTP source")?;

    // ─── 3) --list-dates short-circuit ───────────────────────────────
    if cfg.list_dates {
        let dates = snapshot_dates(&source, &cfg.faculty)
            .with_context(|| format!("listing dates for faculty {}", cfg.faculty))?;
        let mut buf = Vec::new();
        for d in &dates {
            writeln!(buf, "{},{}", d.token(), d.iso_date()?)?;
        }
        io::stdout().lock().write_all(&buf)?;
        return Ok(());
    }

    // ─── 4) scrape everything, then write ────────────────────────────
    let dataset = build_dataset(&source, &cfg.faculty, &cfg.run_options())
        .with_context(|| format!("building dataset for faculty {}", cfg.faculty))?;

    match (&cfg.output, cfg.format) {
        (Some(path), OutputFormat::Parquet) => {
            write_parquet(&dataset, path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        (Some(path), format) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_text(&dataset, format, &mut out)?;
            out.flush()?;
        }
        (None, format) => {
            // buffer fully so a failure never leaves a truncated table on stdout
            let mut buf = Vec::new();
            write_text(&dataset, format, &mut buf)?;
            io::stdout().lock().write_all(&buf)?;
        }
    }

    info!(rows = dataset.len(), "all done");
    Ok(())
}

fn write_text<W: Write>(
    dataset: &statscraper::Dataset,
    format: OutputFormat,
    out: W,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(dataset, out).context("writing json"),
        _ => write_csv(dataset, out).context("writing csv"),
    }
}
