use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use geo_analyzer::html::truncate;
use geo_analyzer::pipeline::{self, CheckReport};
use geo_analyzer::schema::{generate_schema_json_ld, SchemaOptions};
use geo_analyzer::{parse_knowledge_blocks, validate_dictionary, Settings, TerminologyManager};

#[derive(Parser)]
#[command(name = "geo_check", about = "GEO quality checks for HTML articles")]
struct Cli {
    /// Settings file stem (geo.toml, geo.json, ...)
    #[arg(long, global = true, default_value = "geo")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score articles and check terminology
    Check {
        /// Article JSON files (one article or an array each)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Terminology dictionary (overrides settings)
        #[arg(short, long)]
        dictionary: Option<PathBuf>,
        /// Minimum passing score (overrides settings)
        #[arg(long)]
        min_score: Option<i32>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
        /// Show individual issues
        #[arg(short, long)]
        verbose: bool,
    },
    /// List knowledge blocks found in an HTML file
    Blocks {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print Schema.org JSON-LD for each article in a file
    Schema { file: PathBuf },
    /// Validate a terminology dictionary
    Dictionary { file: PathBuf },
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
    let settings = Settings::load_from(&cli.config).context("loading settings")?;

    let result = match cli.command {
        Commands::Check {
            files,
            dictionary,
            min_score,
            json,
            verbose,
        } => {
            let min_score = min_score.unwrap_or(settings.min_score);
            let dictionary = dictionary.or_else(|| settings.dictionary.clone());
            let terms = match dictionary {
                Some(path) => Some(
                    geo_analyzer::load_dictionary(&path)
                        .with_context(|| format!("loading dictionary {}", path.display()))?,
                ),
                None => {
                    warn!("no terminology dictionary configured, skipping terminology checks");
                    None
                }
            };

            let mut articles = Vec::new();
            for file in &files {
                let loaded = pipeline::load_articles(file)
                    .with_context(|| format!("reading articles from {}", file.display()))?;
                articles.extend(loaded);
            }
            if articles.is_empty() {
                println!("No articles found.");
                return Ok(());
            }

            info!(articles = articles.len(), "checking articles");
            let report = check_articles(&articles, terms.as_ref(), &settings, min_score);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, verbose);
            }

            let failed = report.articles.len() - report.passed_count();
            if failed > 0 {
                bail!("{} of {} articles below the bar", failed, report.articles.len());
            }
            Ok(())
        }
        Commands::Blocks { file, json } => {
            let html = read(&file)?;
            let blocks = parse_knowledge_blocks(&html);
            if json {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
                return Ok(());
            }
            println!(
                "{:>5} | {:<11} | {:>5} | {:<50}",
                "ID", "Type", "Score", "Title"
            );
            println!("{}", "-".repeat(80));
            for b in &blocks {
                println!(
                    "{:>5} | {:<11} | {:>5.2} | {:<50}",
                    b.id,
                    b.kind.as_str(),
                    b.extractability,
                    truncate(&b.title, 50)
                );
            }
            println!("\n{} blocks", blocks.len());
            Ok(())
        }
        Commands::Schema { file } => {
            let articles = pipeline::load_articles(&file)
                .with_context(|| format!("reading articles from {}", file.display()))?;
            for article in &articles {
                let opts = SchemaOptions::from_article(article, &settings.site);
                println!("{}", generate_schema_json_ld(&opts)?);
            }
            Ok(())
        }
        Commands::Dictionary { file } => {
            let raw: serde_json::Value = serde_json::from_str(&read(&file)?)
                .with_context(|| format!("parsing {}", file.display()))?;
            let validation = validate_dictionary(&raw);
            if !validation.valid {
                for e in &validation.errors {
                    println!("  - {}", e);
                }
                bail!("{} errors in {}", validation.errors.len(), file.display());
            }
            let entries = raw["entries"].as_array().map_or(0, |e| e.len());
            println!("{}: valid ({} entries)", file.display(), entries);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn check_articles(
    articles: &[geo_analyzer::Article],
    terms: Option<&TerminologyManager>,
    settings: &Settings,
    min_score: i32,
) -> CheckReport {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(articles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut analyses = Vec::with_capacity(articles.len());
    for chunk in articles.chunks(64) {
        analyses.extend(pipeline::analyze_batch(chunk, terms, settings));
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    CheckReport::new(analyses, terms, min_score)
}

fn print_report(report: &CheckReport, verbose: bool) {
    let s = &report.summary;
    println!("Articles:           {}", s.total_articles);
    println!("Average score:      {}/100", s.average_score);
    println!("Pass rate:          {}%", s.pass_rate);
    println!("Terminology terms:  {}", report.terminology.total_terms);
    println!("Terminology issues: {}", report.terminology.conflicts_found);
    println!("Generated:          {}", s.timestamp);
    println!();

    println!(
        "{:>4} | {:<24} | {:<2} | {:>5} | {:>6} | {:>5}",
        "", "Article", "", "Score", "Issues", "Terms"
    );
    println!("{}", "-".repeat(62));
    for a in &report.articles {
        let status = if a.passed { "PASS" } else { "FAIL" };
        println!(
            "{:>4} | {:<24} | {:<2} | {:>5} | {:>6} | {:>5}",
            status,
            truncate(&a.id, 24),
            a.locale.as_str(),
            a.quality_report.overall_score,
            a.quality_report.issues.len(),
            a.terminology_issues.len()
        );

        if verbose {
            for issue in a.quality_report.issues.iter().take(5) {
                println!("       {:?}: {}", issue.kind, truncate(&issue.message, 80));
            }
            if a.quality_report.issues.len() > 5 {
                println!("       ... and {} more", a.quality_report.issues.len() - 5);
            }
            for c in a.terminology_issues.iter().take(3) {
                println!("       {}: {}", c.term, truncate(&c.article_definition, 60));
            }
        }
    }

    if !report.recommendations.is_empty() {
        println!("\n--- Recommendations ---");
        for (i, rec) in report.recommendations.iter().enumerate() {
            println!("{:>2}. {}", i + 1, rec);
        }
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
