use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use laptop_scraper::aggregate::{self, FilterSpec, Order, SortKey};
use laptop_scraper::config::Settings;
use laptop_scraper::export::{self, Format};
use laptop_scraper::record::{ProductRecord, ResultSet};
use laptop_scraper::report;
use laptop_scraper::session::{RefreshSource, Session, View};
use laptop_scraper::Extractor;

#[derive(Parser)]
#[command(name = "laptop_scraper", about = "Laptop listing scraper and dashboard")]
struct Cli {
    /// Listing page to scrape (overrides settings)
    #[arg(long, global = true)]
    url: Option<String>,
    /// Request timeout in seconds (overrides settings)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape and print metrics, table, rankings and price analysis
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,
        /// Table sort column
        #[arg(long, value_enum, default_value = "name")]
        sort: SortArg,
        /// Sort the table descending
        #[arg(long)]
        desc: bool,
        /// Number of top rated products to show
        #[arg(short = 'n', long, default_value = "10",
              value_parser = clap::value_parser!(u16).range(5..=20))]
        top: u16,
    },
    /// Scrape and export the filtered records
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
        /// Output path, "-" for stdout (default: laptops_<timestamp>.<ext>)
        #[arg(short, long)]
        out: Option<String>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Lowest price to keep (default: cheapest product)
    #[arg(long)]
    min_price: Option<f64>,
    /// Highest price to keep (default: most expensive product)
    #[arg(long)]
    max_price: Option<f64>,
    /// Ratings to keep, repeatable (default: every rating present)
    #[arg(short, long = "rating")]
    ratings: Vec<i64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Price,
    Rating,
    Reviews,
}

impl From<SortArg> for SortKey {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Name => SortKey::Name,
            SortArg::Price => SortKey::Price,
            SortArg::Rating => SortKey::Rating,
            SortArg::Reviews => SortKey::Reviews,
        }
    }
}

impl FilterArgs {
    /// Unset bounds default to the full range of `records`.
    fn resolve(&self, records: &[ProductRecord]) -> Option<FilterSpec> {
        let mut spec = FilterSpec::covering(records)?;
        if let Some(min) = self.min_price {
            spec.price_min = min;
        }
        if let Some(max) = self.max_price {
            spec.price_max = max;
        }
        if !self.ratings.is_empty() {
            spec.ratings = self.ratings.iter().copied().collect::<BTreeSet<_>>();
        }
        Some(spec)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(url) = cli.url {
        settings.url = url;
    }
    if let Some(secs) = cli.timeout {
        settings.timeout_secs = secs;
    }

    let extractor = Extractor::new(&settings).context("Failed to set up HTTP client")?;
    let mut session = Session::new(settings.cache_ttl());
    refresh_with_spinner(&mut session, &extractor, &settings.url).await;

    let snap = match session.view() {
        View::Ready(snap) => snap,
        View::NoData { error } => {
            if let Some(e) = error {
                eprintln!("{}", e);
            }
            println!("{}", report::NO_DATA);
            return Ok(());
        }
    };

    let filters = match &cli.command {
        Commands::Dashboard { filters, .. } | Commands::Export { filters, .. } => filters,
    };
    let filtered = apply_filters(&snap.records, filters);

    let result = match cli.command {
        Commands::Dashboard { sort, desc, top, .. } => {
            let order = if desc { Order::Descending } else { Order::Ascending };
            let table_rows = aggregate::sort_by(&filtered, sort.into(), order);
            println!("{}\n", report::status_line(snap));
            print!("{}", report::dashboard(&filtered, &table_rows, top as usize));
            Ok(())
        }
        Commands::Export { format, out, .. } => write_export(&filtered, format, out.as_deref()),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn refresh_with_spinner(session: &mut Session, extractor: &Extractor, url: &str) {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Scraping data... Please wait...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let source = session.refresh(extractor, url).await;

    pb.finish_and_clear();
    if source == RefreshSource::Cache {
        eprintln!("Using cached data for {}", url);
    }
}

fn apply_filters(records: &[ProductRecord], args: &FilterArgs) -> ResultSet {
    match args.resolve(records) {
        Some(spec) => spec.apply(records),
        None => ResultSet::new(),
    }
}

fn write_export(
    records: &[ProductRecord],
    format: Format,
    out: Option<&str>,
) -> Result<()> {
    let body = export::render(records, format).context("Failed to encode export")?;
    match out {
        Some("-") => print!("{}", body),
        Some(path) => write_file(path, &body)?,
        None => {
            let path = export::default_file_name(format, chrono::Local::now());
            write_file(&path, &body)?;
        }
    }
    eprintln!("Total records to export: {}", records.len());
    Ok(())
}

fn write_file(path: &str, body: &str) -> Result<()> {
    std::fs::write(path, body).with_context(|| format!("Failed to write {}", path))?;
    eprintln!("Wrote {}", path);
    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
