use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use evaluator::{
    EvaluationConfig, Evaluator, PreferenceConfig, ProductFamily, RankedListing, RawListing,
};

/// Evaluate and rank second-hand marketplace listings.
#[derive(Parser, Debug)]
#[command(name = "evaluate", version, about)]
struct Args {
    /// JSON file with an array of normalized listings
    listings: PathBuf,

    /// JSON file with the buyer's preference configuration
    #[arg(short, long)]
    preferences: Option<PathBuf>,

    /// Product family (phone, laptop, tablet, camera, generic)
    #[arg(short, long, default_value = "generic")]
    family: String,

    /// The search query the listings came from
    #[arg(short, long)]
    query: Option<String>,

    /// Number of ranked results to show
    #[arg(short = 'k', long, default_value_t = 10)]
    top_k: usize,

    /// Write the full report as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the compact JSON report to stdout instead of the table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();

    let listings_json = fs::read_to_string(&args.listings)
        .with_context(|| format!("reading listings from {}", args.listings.display()))?;
    let listings: Vec<RawListing> =
        serde_json::from_str(&listings_json).context("parsing listings JSON")?;

    let prefs = match &args.preferences {
        Some(path) => {
            let prefs_json = fs::read_to_string(path)
                .with_context(|| format!("reading preferences from {}", path.display()))?;
            PreferenceConfig::from_json(&prefs_json).context("parsing preference configuration")?
        }
        None => PreferenceConfig::default(),
    };

    let family = ProductFamily::from_str(&args.family)
        .with_context(|| format!("unrecognized family {:?}", args.family))?;

    let engine = Evaluator::new(EvaluationConfig::default().with_top_k(args.top_k));
    let report = engine
        .evaluate(args.query.as_deref(), family, listings, &prefs)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.to_minimal())?);
    } else {
        print_report(&report);
    }

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report to {}", path.display()))?;
        eprintln!("Full report written to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &evaluator::EvaluationReport) {
    println!();
    println!(
        "{} {} evaluated, {} filtered out, {} comparable groups",
        "Results:".bold(),
        report.total_evaluated,
        report.filtered_out,
        report.comps_group_count
    );
    println!();

    for entry in &report.ranked {
        print_entry(entry);
    }

    if !report.data_quality_notes.is_empty() {
        println!("{}", "Data quality notes:".yellow().bold());
        for note in &report.data_quality_notes {
            println!("  - {note}");
        }
    }
}

fn print_entry(entry: &RankedListing) {
    let scores = &entry.scores;
    let score_text = format!("{:.0}", scores.final_score);
    let score_colored = if scores.final_score >= 70.0 {
        score_text.green().bold()
    } else if scores.final_score >= 50.0 {
        score_text.yellow().bold()
    } else {
        score_text.red().bold()
    };

    let price = entry
        .asking_price
        .map(|p| format!("{p:.0}"))
        .unwrap_or_else(|| "no price".to_string());

    println!(
        "{:>3}. [{}] {} ({})",
        entry.rank,
        score_colored,
        entry.title.bold(),
        price
    );
    println!(
        "     value {:.0} | preference {:.0} | risk {:.0} | comps {} ({})",
        scores.value.score,
        scores.preference.score,
        scores.risk.score,
        scores.value.comps_n,
        scores
            .value
            .comps_key
            .as_deref()
            .unwrap_or("no comparable group")
    );
    if let Some(delta) = scores.value.deal_delta {
        let pct = delta * 100.0;
        if pct.abs() >= 1.0 {
            let label = if pct > 0.0 {
                format!("{pct:.0}% below market").green()
            } else {
                format!("{:.0}% above market", -pct).red()
            };
            println!("     {label}");
        }
    }
    if !scores.risk.flags.is_empty() {
        println!("     {}", scores.risk.summary().red());
    }
    for question in &entry.checklist {
        println!("     {} {}", "ask:".cyan(), question.question);
    }
    if !entry.url.is_empty() {
        println!("     {}", entry.url.dimmed());
    }
    println!();
}
