use chrono::{DateTime, Utc};
use tracing::debug;
use crate::error::{Error, Result};
use crate::stats::analyze;
use crate::types::{AnalysisOptions, Commit, ProjectReport};
use crate::vcs::{repo_name_from_url, Checkout};

/// Analyses the combined history of `checkouts` for `person`.
///
/// Without an explicit `name`, a single-repository project is named after the
/// last segment of its URL; several repositories require a name.
pub fn build_project(
    person:    &str,
    name:      Option<&str>,
    checkouts: &[&Checkout],
    now:       DateTime<Utc>,
    options:   AnalysisOptions,
) -> Result<ProjectReport> {
    let name = match (name, checkouts) {
        (Some(n), _) => n.to_string(),
        (None, [only]) => {
            repo_name_from_url(only.remote()).unwrap_or_else(|| only.remote().to_string())
        }
        (None, many) => return Err(Error::AmbiguousProjectName(many.len())),
    };

    let commits: Vec<Commit> = checkouts
        .iter()
        .flat_map(|c| c.commits().iter().cloned())
        .collect();
    debug!(project = %name, commits = commits.len(), "analysing");

    Ok(ProjectReport {
        name,
        repositories: checkouts.iter().map(|c| c.remote().to_string()).collect(),
        analysis: analyze(person, &commits, now, options),
    })
}
