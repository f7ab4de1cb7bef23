use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

// ─── Core VCS Data ────────────────────────────────────────────────────────────

/// A single commit, normalized across VCS backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
}

impl Commit {
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>, author: impl Into<String>) -> Self {
        Commit {
            id: id.into(),
            timestamp,
            author: author.into(),
        }
    }
}

// ─── Engine Outputs ───────────────────────────────────────────────────────────

/// Competition rank of one author among all authors of a commit set.
///
/// `rank == 0` means the author has no commits and is unranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankResult {
    pub rank: usize,
    pub total_distinct_ranks: usize,
}

/// A "me out of everyone" pair, used for both commit counts and rankings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Ratio {
    pub me: usize,
    pub everyone: usize,
}

impl Ratio {
    /// `me / everyone` as a percentage; 0.0 when `everyone` is zero.
    pub fn percentage(&self) -> f64 {
        if self.everyone == 0 {
            0.0
        } else {
            self.me as f64 / self.everyone as f64 * 100.0
        }
    }
}

impl From<RankResult> for Ratio {
    fn from(r: RankResult) -> Self {
        Ratio {
            me: r.rank,
            everyone: r.total_distinct_ranks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub commit_count: Ratio,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Ratio>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub all: Stats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past_year: Option<Stats>,
    /// Raw author strings that were coalesced into the target.
    pub matched_authors: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    /// Also rank the target within the trailing-12-month window.
    pub past_year_ranking: bool,
}

// ─── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub name: String,
    pub repositories: Vec<String>,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub author: String,
    pub analyzed_at: String,
    pub project_count: usize,
    pub failed_repositories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub projects: Vec<ProjectReport>,
}
