mod analyzers;
mod config;
mod error;
mod fetch;
mod logging;
mod pipeline;
mod project;
mod reporters;
mod stats;
mod types;
mod vcs;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;
use error::Result;
use types::*;

#[derive(Parser, Debug)]
#[command(
    name = "contrib-rank",
    about = "📊 Rank your commit contributions across repositories",
    version,
    long_about = "Clones or updates every repository listed in the config file and reports,\n\
                  per project, how many commits you authored, where you rank among all\n\
                  contributors, and the same for the last 12 months.\n\n\
                  Use --repo with --name to analyse an existing local working copy instead."
)]
struct Args {
    /// Config file (YAML). See --generate-config.
    #[arg(long, short, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print an annotated config template (or write it to FILE) and exit.
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    generate_config: Option<Option<PathBuf>>,

    /// Analyse a local git/hg working copy; no cloning or updating.
    #[arg(long, value_name = "PATH", requires = "name")]
    repo: Option<PathBuf>,

    /// Author name to rank (overrides the config file).
    #[arg(long)]
    name: Option<String>,

    /// Output format: terminal, json
    #[arg(long)]
    format: Option<String>,

    /// Write the JSON report to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Parent directory for working copies.
    #[arg(long)]
    checkout_dir: Option<PathBuf>,

    /// Also rank within the last 12 months.
    #[arg(long)]
    past_year_ranking: bool,

    /// Repositories fetched in parallel (default: CPU count).
    #[arg(long, short)]
    jobs: Option<usize>,

    /// More log output (-v debug, -vv trace).
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(long, short)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(logging::env_filter(args.quiet, args.verbose, "warn"));

    if let Some(output) = &args.generate_config {
        if let Err(e) = config::print_template(output.as_deref()) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let total_start = Instant::now();
    let now = chrono::Utc::now();

    let (report, format) = match &args.repo {
        Some(path) => (run_local(args, path, now)?, args.format.clone()),
        None => {
            let cfg = load_with_overrides(args)?;
            let jobs = cfg.jobs.unwrap_or_else(default_jobs);
            let options = AnalysisOptions {
                past_year_ranking: cfg.past_year_ranking.unwrap_or(false),
            };
            let format = cfg.format.clone();
            let progress = fetch_progress(is_terminal(format.as_deref()));
            info!(repositories = cfg.repositories.len(), jobs, "starting");
            (pipeline::run(&cfg, jobs, options, now, &progress)?, format)
        }
    };

    info!(elapsed = %fmt_dur(total_start.elapsed()), projects = report.projects.len(), "done");

    match format.as_deref() {
        Some("json") => reporters::json::report_json(&report, args.output.as_deref())?,
        _ => reporters::terminal::report_terminal(&report),
    }
    Ok(())
}

/// Loads the config file and applies CLI overrides on top of it.
fn load_with_overrides(args: &Args) -> Result<config::RankConfig> {
    let mut cfg = config::load_config(&args.config)?;
    if let Some(name) = &args.name {
        cfg.name = name.clone();
    }
    if args.format.is_some() {
        cfg.format = args.format.clone();
    }
    if args.checkout_dir.is_some() {
        cfg.checkout_dir = args.checkout_dir.clone();
    }
    if args.past_year_ranking {
        cfg.past_year_ranking = Some(true);
    }
    if args.jobs.is_some() {
        cfg.jobs = args.jobs;
    }
    cfg.validate()
        .map_err(|e| error::Error::Config(format!("Config file '{}': {e}", args.config.display())))?;
    check_output(cfg.format.as_deref(), args.output.as_deref())?;
    Ok(cfg)
}

/// `--output` only applies to the JSON report.
fn check_output(format: Option<&str>, output: Option<&Path>) -> Result<()> {
    match (format, output) {
        (Some("json"), _) | (_, None) => Ok(()),
        (_, Some(path)) => Err(error::Error::Config(format!(
            "--output {} requires --format json",
            path.display()
        ))),
    }
}

fn run_local(args: &Args, path: &Path, now: chrono::DateTime<chrono::Utc>) -> Result<Report> {
    let name = args.name.as_deref().unwrap_or_default();
    let settings = config::RankConfig {
        name: name.to_string(),
        format: args.format.clone(),
        ..Default::default()
    };
    settings.validate().map_err(error::Error::Config)?;
    check_output(settings.format.as_deref(), args.output.as_deref())?;
    let checkout = vcs::Checkout::open_local(path)?;
    let project_name = path
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .unwrap_or_else(|| path.display().to_string());
    let options = AnalysisOptions { past_year_ranking: args.past_year_ranking };
    let project = project::build_project(name, Some(&project_name), &[&checkout], now, options)?;
    Ok(pipeline::report(name, now, vec![project], Vec::new()))
}

fn default_jobs() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn is_terminal(format: Option<&str>) -> bool {
    !matches!(format, Some("json"))
}

// ── Progress ───────────────────────────────────────────────────────────────────

fn fetch_progress(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{pos}/{len}] {wide_msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ── Duration formatting ────────────────────────────────────────────────────────

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_millis();
    if ms >= 1000 { format!("{:.1}s", d.as_secs_f64()) } else { format!("{ms}ms") }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
