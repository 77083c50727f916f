//! Oklahoma Flood Statistics Service
//!
//! Loads the curated flood dataset once, then either:
//! 1. Prints a statistics report for a filtered view
//! 2. Exports the filtered, classified records as CSV or JSON
//! 3. Serves the JSON API the dashboard front end draws from
//!
//! Usage:
//!   cargo run -- report --county Tulsa --from-year 2015 --to-year 2025
//!   cargo run -- export --format json --severity High
//!   cargo run -- serve --port 8080
//!
//! Environment:
//!   DASHBOARD_CONFIG - path to dashboard.toml (default: ./dashboard.toml)
//!   RUST_LOG         - log filter (default: info)

use std::path::PathBuf;

use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};

use okflood_service::analysis::filter::EventFilter;
use okflood_service::analysis::return_period::ReturnPeriodOutcome;
use okflood_service::analysis::trend::TrendOutcome;
use okflood_service::config::{config_path, load_config_or_default};
use okflood_service::dashboard::Dashboard;
use okflood_service::endpoint;
use okflood_service::export::{default_file_name, write_export, ExportFormat};
use okflood_service::ingest::records::load_csv_file;
use okflood_service::model::{County, Severity};

#[derive(Parser)]
#[command(name = "okflood", version, about = "Oklahoma flood statistics service")]
struct Cli {
    /// Configuration file (overrides DASHBOARD_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Load events from a CSV table instead of the embedded dataset
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print summary metrics, trend tests and return levels
    Report(FilterArgs),
    /// Write the filtered, classified records to a file
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Output path (default: oklahoma_floods_YYYYMMDD.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Serve the dashboard JSON API
    Serve {
        /// Port (overrides [endpoint].port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    #[arg(long)]
    county: Option<County>,
    #[arg(long)]
    severity: Option<Severity>,
    #[arg(long)]
    from_year: Option<i32>,
    #[arg(long)]
    to_year: Option<i32>,
}

impl FilterArgs {
    fn to_filter(&self, span: Option<(i32, i32)>) -> EventFilter {
        let mut filter = EventFilter::all();
        filter.county = self.county;
        filter.severity = self.severity;
        if self.from_year.is_some() || self.to_year.is_some() {
            let (min, max) = span.unwrap_or((i32::MIN, i32::MAX));
            filter = filter.years(self.from_year.unwrap_or(min), self.to_year.unwrap_or(max));
        }
        filter
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    println!("🌊 Oklahoma Flood Statistics");
    println!("============================\n");

    let path = cli.config.clone().unwrap_or_else(config_path);
    let mut config = load_config_or_default(&path)?;

    if let Command::Serve { port: Some(port) } = &cli.command {
        config.endpoint.port = *port;
    }

    let dashboard = match &cli.data {
        Some(data) => {
            println!("📋 Loading flood table from {}...", data.display());
            Dashboard::new(load_csv_file(data)?, config)
        }
        None => Dashboard::embedded(config)?,
    };
    println!("✓ Loaded {} events", dashboard.events().len());
    for rejected in dashboard.rejected() {
        eprintln!("   ⚠ Row {} excluded: {}", rejected.row, rejected.reason);
    }
    println!();

    match &cli.command {
        Command::Report(args) => print_report(&dashboard, &args.to_filter(dashboard.year_span())),
        Command::Export { filter, format, out } => {
            let format = ExportFormat::from(*format);
            let out = out
                .clone()
                .unwrap_or_else(|| PathBuf::from(default_file_name(format, Local::now().date_naive())));
            let events = dashboard.select(&filter.to_filter(dashboard.year_span()));
            let count = write_export(&events, format, &out)?;
            println!("✓ Exported {} events to {}", count, out.display());
        }
        Command::Serve { .. } => {
            println!("🚀 Starting HTTP endpoint server...");
            endpoint::start_endpoint_server(&dashboard)?;
        }
    }

    Ok(())
}

fn print_report(dashboard: &Dashboard, filter: &EventFilter) {
    let view = dashboard.view(filter);
    let s = &view.summary;

    println!("📊 Summary");
    println!("  Total events:          {}", s.total_events);
    println!("  Economic loss:         ${:.1}M", s.total_damage_millions);
    println!("  Total fatalities:      {}", s.total_fatalities);
    println!("  High severity events:  {}", s.high_severity_events);
    match s.avg_damage_millions {
        Some(avg) => println!("  Avg damage/event:      ${:.1}M", avg),
        None => println!("  Avg damage/event:      n/a"),
    }

    println!("\n🏷️  Severity");
    for sc in &view.severity_distribution {
        println!("  {:<8} {}", sc.severity.as_str(), sc.count);
    }

    println!("\n🗺️  Damage by county");
    for cd in &view.damage_by_county {
        println!("  {:<18} ${:.1}M", cd.full_name, cd.damage_millions);
    }

    println!("\n📅 Trends (Mann-Kendall)");
    print_trend("Annual damage", &view.trends.annual_damage);
    print_trend("Annual events", &view.trends.annual_events);

    println!("\n📈 Return levels (annual peak damage)");
    match &view.return_periods {
        ReturnPeriodOutcome::Fitted { fit, periods } => {
            println!("  Weibull shape {:.3}, scale ${:.1}M (n = {})",
                fit.shape, fit.scale / 1_000_000.0, fit.sample_size);
            for (years, magnitude) in periods {
                println!("  {:>4}-year  ${:.1}M", years, magnitude / 1_000_000.0);
            }
        }
        ReturnPeriodOutcome::Unfitted { reason } => println!("  Unfitted: {}", reason),
    }
}

fn print_trend(label: &str, outcome: &TrendOutcome) {
    match outcome {
        TrendOutcome::Tested(r) => println!(
            "  {}: S = {}, p = {:.4} → {}",
            label,
            r.s,
            r.p_value,
            r.direction.describe()
        ),
        TrendOutcome::InsufficientData { points, required } => println!(
            "  {}: insufficient data ({} of {} points)",
            label, points, required
        ),
    }
}
