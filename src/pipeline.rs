use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, warn};
use crate::config::RankConfig;
use crate::error::{Error, Result};
use crate::fetch::{fetch_all, plan, Fetched};
use crate::project::build_project;
use crate::types::{AnalysisOptions, ProjectReport, Report, ReportMeta};
use crate::vcs::Checkout;

/// Fetches every configured repository, applies claimed commits, and
/// analyses each project. Repository failures are recorded in the report
/// rather than aborting the run.
pub fn run(
    cfg:      &RankConfig,
    jobs:     usize,
    options:  AnalysisOptions,
    now:      DateTime<Utc>,
    progress: &ProgressBar,
) -> Result<Report> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let (fetch_jobs, mut failed) = plan(cfg);
    progress.set_length(fetch_jobs.len() as u64);
    let Fetched { mut checkouts, failed: fetch_failed } =
        fetch_all(&pool, &fetch_jobs, &cfg.checkout_parent(), progress);
    failed.extend(fetch_failed);
    progress.finish_and_clear();

    for repo in &cfg.repositories {
        for id in &repo.commits {
            for url in repo.urls() {
                let Some(checkout) = checkouts.get_mut(url) else { continue };
                match checkout.claim_commit(&cfg.name, id) {
                    Ok(()) => debug!(url, id = %id, "claimed commit"),
                    Err(Error::CommitNotFound(_)) => debug!(url, id = %id, "claimed commit not in this repository"),
                    Err(e) => return Err(e),
                }
            }
        }
    }
    for checkout in checkouts.values().filter(|c| !c.claimed().is_empty()) {
        debug!(url = checkout.remote(), claimed = checkout.claimed().len(), "claims applied");
    }

    let projects: Vec<ProjectReport> = pool.install(|| {
        cfg.repositories
            .par_iter()
            .filter_map(|repo| {
                let found: Vec<&Checkout> = repo.urls().into_iter().filter_map(|u| checkouts.get(u)).collect();
                if found.is_empty() {
                    return None;
                }
                match build_project(&cfg.name, repo.name.as_deref(), &found, now, options) {
                    Ok(project) => Some(project),
                    Err(e) => {
                        warn!(error = %e, "skipping project");
                        None
                    }
                }
            })
            .collect()
    });

    Ok(report(&cfg.name, now, projects, failed))
}

/// Packages project results with run metadata; projects are sorted by name.
pub fn report(author: &str, now: DateTime<Utc>, mut projects: Vec<ProjectReport>, failed: Vec<String>) -> Report {
    projects.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Report {
        meta: ReportMeta {
            author: author.to_string(),
            analyzed_at: now.to_rfc3339(),
            project_count: projects.len(),
            failed_repositories: failed,
        },
        projects,
    }
}
