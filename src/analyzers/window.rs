use chrono::{DateTime, Months, Utc};
use crate::types::Commit;

/// One calendar year before `now`, keeping the time of day.
///
/// 29 February maps to 28 February of the previous year.
pub fn cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(12)).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Commits strictly after `cutoff`.
pub fn windowed<'a, I>(commits: I, cutoff: DateTime<Utc>) -> Vec<&'a Commit>
where
    I: IntoIterator<Item = &'a Commit>,
{
    commits.into_iter().filter(|c| c.timestamp > cutoff).collect()
}
