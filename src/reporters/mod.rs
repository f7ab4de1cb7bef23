pub mod json;
pub mod terminal;

use chrono::{DateTime, Utc};
use crate::types::Ratio;

/// `1234567` → `"1,234,567"`.
pub fn fmt_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Percentage with one decimal, e.g. `"12.5%"`.
pub fn fmt_percent(ratio: &Ratio) -> String {
    format!("{:.1}%", ratio.percentage())
}

/// ISO calendar date.
pub fn fmt_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// `"3 out of 12 (top 25.0%)"`, or `"unranked"` for rank 0.
pub fn fmt_ranking(ranking: &Ratio) -> String {
    if ranking.me == 0 {
        return "unranked".to_string();
    }
    format!(
        "{} out of {} (top {})",
        fmt_count(ranking.me),
        fmt_count(ranking.everyone),
        fmt_percent(ranking)
    )
}

/// `"1,024 out of 8,192 (12.5%)"`.
pub fn fmt_commits(count: &Ratio) -> String {
    format!(
        "{} out of {} ({})",
        fmt_count(count.me),
        fmt_count(count.everyone),
        fmt_percent(count)
    )
}
