use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod data;
mod decode;
mod dir;
mod error;
mod load;
mod render;
mod spec;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "fixedload")]
#[command(about = "Load fixed-width data files into SQLite using CSV column specs", long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", env = "FIXEDLOAD_LOG_LEVEL")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a table per spec, then load every matching data file.
    Load {
        /// Directory of `<format>.csv` column specs.
        #[arg(long, default_value = "./specs/", env = "FIXEDLOAD_SPECS")]
        specs: PathBuf,

        /// Directory of `<format>_<suffix>.txt` data files.
        #[arg(long, default_value = "./data/", env = "FIXEDLOAD_DATA")]
        data: PathBuf,

        /// SQLite database file (created if missing).
        #[arg(long, default_value = "./data.db", env = "FIXEDLOAD_DB")]
        db: PathBuf,

        /// Fail a file on an unparsable numeric field instead of loading 0.
        #[arg(long)]
        strict: bool,

        /// Write a JSON summary of the load to this file.
        #[arg(long)]
        summary: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.cmd {
        Commands::Load {
            specs,
            data: data_dir,
            db,
            strict,
            summary,
        } => {
            // 1) Specs.
            let catalog = spec::load_all(&specs)
                .with_context(|| format!("load specs from {}", specs.display()))?;
            if catalog.is_empty() {
                warn!("no usable specs in {}", specs.display());
            }

            // 2) Tables.
            let sink = load::SqliteSink::open(&db)
                .with_context(|| format!("open database {}", db.display()))?;
            load::create_tables(&sink, &catalog).context("create tables")?;

            // 3) Data files.
            let files = data::find_all(&catalog, &data_dir)
                .with_context(|| format!("scan data files in {}", data_dir.display()))?;
            for df in &files {
                info!("{} => format {:?}", df.path().display(), df.format);
            }

            // 4) Rows.
            let policy = if strict {
                decode::FieldPolicy::Reject
            } else {
                decode::FieldPolicy::Substitute
            };
            let report = load::load(&sink, &files, policy);

            if let Some(path) = &summary {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(path, json)
                    .with_context(|| format!("write summary {}", path.display()))?;
                info!("wrote summary {}", path.display());
            }

            for spec in catalog.iter() {
                match sink.row_count(&spec.name) {
                    Ok(n) => info!("table {:?} holds {} rows", spec.name, n),
                    Err(e) => warn!("couldn't count rows in {:?}: {}", spec.name, e),
                }
            }
            info!(
                "loaded {} rows from {} of {} data files",
                report.total_rows(),
                report.loaded.len(),
                files.len()
            );
            if !report.failed.is_empty() {
                bail!(
                    "{} of {} data files failed to load",
                    report.failed.len(),
                    files.len()
                );
            }
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };

    let filter = EnvFilter::try_new(format!("fixedload={level}"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
