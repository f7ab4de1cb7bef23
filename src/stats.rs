use chrono::{DateTime, Utc};
use crate::analyzers::aggregate::{bucket, counts};
use crate::analyzers::identity::{resolve, Resolution};
use crate::analyzers::ranking::rank;
use crate::analyzers::window::{cutoff, windowed};
use crate::types::*;

/// Computes lifetime and trailing-12-month statistics for `target`.
///
/// `now` anchors the rolling one-year cutoff. A target without commits gets
/// zero-valued lifetime stats and no past-year stats.
pub fn analyze(
    target:  &str,
    commits: &[Commit],
    now:     DateTime<Utc>,
    options: AnalysisOptions,
) -> AnalysisResult {
    let lifetime = resolve(target, &bucket(commits));
    let mine = lifetime.commits();

    let date_range = mine
        .iter()
        .map(|c| c.timestamp)
        .min()
        .zip(mine.iter().map(|c| c.timestamp).max())
        .map(|(first, last)| DateRange { first, last });

    let all = Stats {
        date_range,
        commit_count: Ratio { me: mine.len(), everyone: commits.len() },
        ranking: Some(ranking_of(&lifetime)),
    };

    let cut = cutoff(now);
    let past_year = match date_range {
        Some(range) if range.last > cut => {
            let recent = windowed(commits, cut);
            let resolved = resolve(target, &bucket(recent.iter().copied()));
            Some(Stats {
                date_range: None,
                commit_count: Ratio { me: resolved.commits().len(), everyone: recent.len() },
                ranking: options.past_year_ranking.then(|| ranking_of(&resolved)),
            })
        }
        _ => None,
    };

    AnalysisResult {
        all,
        past_year,
        matched_authors: lifetime.matched.clone(),
    }
}

/// The target's rank among the resolved authors. A target that matched no
/// author is unranked even if an author string equals it verbatim.
fn ranking_of(resolution: &Resolution<'_>) -> Ratio {
    let ranked = rank(&resolution.target, &counts(&resolution.buckets));
    if resolution.matched.is_empty() {
        return Ratio { me: 0, everyone: ranked.total_distinct_ranks };
    }
    ranked.into()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
