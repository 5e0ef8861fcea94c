mod catalog;
mod lookup;
mod parser;
mod settings;
mod source;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use catalog::Catalog;
use settings::Settings;

#[derive(Parser)]
#[command(name = "schedule_indexer", about = "Season schedule PDF → searchable race-week catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the schedule document and write the catalog
    Build {
        /// Source document (default: assets/SeasonSchedule.pdf)
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// Output catalog (default: data/index.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Treat the source as a form-feed separated text export
        #[arg(long)]
        text: bool,
        /// Re-parse even if the catalog matches the document checksum
        #[arg(short, long)]
        force: bool,
    },
    /// List track names, optionally filtered
    Tracks {
        /// Accent/case-insensitive substring
        query: Option<String>,
        #[arg(long)]
        index: Option<PathBuf>,
    },
    /// Show race weeks held at a track
    Lookup {
        track: String,
        #[arg(long)]
        index: Option<PathBuf>,
        /// Only weeks running on this date (YYYY-MM-DD)
        #[arg(long)]
        on: Option<NaiveDate>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Catalog statistics
    Stats {
        #[arg(long)]
        index: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Build { pdf, out, text, force } => {
            let pdf = pdf.unwrap_or(settings.pdf_path);
            let out = out.unwrap_or(settings.out_path);
            build(&pdf, &out, text, force)
        }
        Commands::Tracks { query, index } => {
            let catalog = load_index(index, &settings)?;
            let tracks = lookup::filter_tracks(&catalog.tracks, query.as_deref().unwrap_or(""));
            if tracks.is_empty() {
                println!("No tracks found.");
                return Ok(());
            }
            for t in &tracks {
                println!("{}", t);
            }
            println!("\n{} of {} tracks", tracks.len(), catalog.tracks.len());
            Ok(())
        }
        Commands::Lookup { track, index, on, limit } => {
            let catalog = load_index(index, &settings)?;
            let mut rows = lookup::records_for_track(&catalog.records, &track);
            if let Some(date) = on {
                rows = lookup::active_on(&rows, date);
            }
            if rows.is_empty() {
                println!("Nothing found for '{}'.", track);
                return Ok(());
            }

            println!(
                "{:>4} | {:<10} | {:<11} | {:<3} | {:<32} | {:<32}",
                "Week", "Start", "Category", "Cls", "Series", "Track"
            );
            println!("{}", "-".repeat(107));
            for r in rows.iter().take(limit) {
                println!(
                    "{:>4} | {:<10} | {:<11} | {:<3} | {:<32} | {:<32}",
                    r.week_number,
                    r.week_start_date,
                    truncate(&r.category, 11),
                    r.class_code,
                    truncate(&r.series_name, 32),
                    truncate(&r.track_name, 32)
                );
            }
            println!("\n{} race weeks", rows.len());
            Ok(())
        }
        Commands::Stats { index } => {
            let catalog = load_index(index, &settings)?;
            println!("Source:   {}", catalog.source_document_path);
            println!("SHA-256:  {}", catalog.source_document_checksum);
            println!("Records:  {}", catalog.records.len());
            println!("Tracks:   {}", catalog.tracks.len());
            for (category, n) in lookup::count_by_category(&catalog.records) {
                println!("  {:<12} {}", category, n);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_elapsed(elapsed));
    }

    result
}

fn build(pdf: &Path, out: &Path, text: bool, force: bool) -> anyhow::Result<()> {
    let doc = source::read_document(pdf)?;
    let checksum = doc.checksum();
    let source_path = pdf.to_string_lossy();

    if !force && out.exists() {
        match Catalog::load(out) {
            Ok(existing) if existing.is_current(&source_path, &checksum) => {
                info!("Catalog up to date ({}), skipping parse", &checksum[..12]);
                println!("{} (cached)", existing.summary(out));
                return Ok(());
            }
            Ok(_) => info!("Source changed, rebuilding {}", out.display()),
            Err(e) => info!("Ignoring unreadable catalog: {:#}", e),
        }
    }

    let pages = if text {
        doc.text_pages()?
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
        pb.set_message(format!("Reading {}", pdf.display()));
        pb.enable_steady_tick(Duration::from_millis(120));
        let pages = doc.pdf_pages();
        pb.finish_and_clear();
        pages?
    };

    let records = parser::parse_document(&pages);
    let catalog = Catalog::build(&source_path, &checksum, records);
    catalog
        .save(out)
        .with_context(|| format!("Failed to save catalog for {}", pdf.display()))?;
    println!("{}", catalog.summary(out));
    Ok(())
}

fn load_index(index: Option<PathBuf>, settings: &Settings) -> anyhow::Result<Catalog> {
    let path = index.unwrap_or_else(|| settings.out_path.clone());
    Catalog::load(&path).context("Run 'build' first")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// "4.2s", "2m 05s", "1h 02m 05s"
fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{:.1}s", d.as_secs_f64()),
        (0, _) => format!("{m}m {s:02}s"),
        _ => format!("{h}h {m:02}m {s:02}s"),
    }
}
