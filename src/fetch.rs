use indicatif::ProgressBar;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};
use crate::config::RankConfig;
use crate::vcs::{Checkout, VcsKind};

/// One repository to clone or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub url: String,
    pub kind: VcsKind,
    pub branch: Option<String>,
}

/// Checkouts keyed by remote URL, plus the URLs that could not be fetched.
#[derive(Debug, Default)]
pub struct Fetched {
    pub checkouts: BTreeMap<String, Checkout>,
    pub failed: Vec<String>,
}

/// Turns the configured repositories into one job per distinct URL.
///
/// URLs whose type cannot be determined are reported in the second vector
/// and do not stop the others from being planned.
pub fn plan(cfg: &RankConfig) -> (Vec<FetchJob>, Vec<String>) {
    let mut jobs: Vec<FetchJob> = Vec::new();
    let mut failed: Vec<String> = Vec::new();

    for repo in &cfg.repositories {
        for url in repo.urls() {
            if jobs.iter().any(|j| j.url == url) || failed.iter().any(|f| f == url) {
                continue;
            }
            match repo.kind_for(url, &cfg.vcs_by_domain) {
                Ok(kind) => jobs.push(FetchJob {
                    url: url.to_string(),
                    kind,
                    branch: repo.branch.clone(),
                }),
                Err(e) => {
                    warn!(url, error = %e, "skipping repository");
                    failed.push(url.to_string());
                }
            }
        }
    }

    (jobs, failed)
}

/// Clones or updates every job on `pool`, one unit of work per repository.
/// A failing repository is logged and skipped.
pub fn fetch_all(pool: &ThreadPool, jobs: &[FetchJob], parent: &Path, progress: &ProgressBar) -> Fetched {
    let results: Vec<(String, Result<Checkout, String>)> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                progress.set_message(job.url.clone());
                let result = Checkout::fetch(job.kind, &job.url, parent, job.branch.as_deref())
                    .map_err(|e| e.to_string());
                progress.inc(1);
                (job.url.clone(), result)
            })
            .collect()
    });

    let mut fetched = Fetched::default();
    for (url, result) in results {
        match result {
            Ok(checkout) => {
                info!(url = %url, kind = %checkout.kind(), commits = checkout.commits().len(), dir = %checkout.directory().display(), "fetched");
                fetched.checkouts.insert(url, checkout);
            }
            Err(e) => {
                warn!(url = %url, error = %e, "fetch failed, skipping");
                fetched.failed.push(url);
            }
        }
    }
    fetched
}
