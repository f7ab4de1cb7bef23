use chrono::{DateTime, TimeZone, Utc};
use crate::error::{Error, Result};
use crate::types::Commit;

/// Separates log records.
pub const RECORD_SEP: char = '\x1e';
/// Separates fields within a record.
pub const FIELD_SEP: char = '\x1f';

/// `git log --format` producing `hash␟unix-time␟author-name␞` per commit.
pub const GIT_FORMAT: &str = "--format=%H%x1f%at%x1f%an%x1e";

/// `hg log --template` producing `node␟hgdate␟author␞` per changeset.
/// Mercurial unescapes `\x1f`/`\x1e` inside templates itself.
pub const HG_TEMPLATE: &str = r"{node}\x1f{date|hgdate}\x1f{author}\x1e";

/// Parses the output of `git log` run with [`GIT_FORMAT`].
pub fn parse_git_log(raw: &str) -> Result<Vec<Commit>> {
    records(raw)
        .map(|record| {
            let (id, time, author) = fields(record)?;
            Ok(Commit::new(id, parse_unix(time, record)?, author.trim()))
        })
        .collect()
}

/// Parses the output of `hg log` run with [`HG_TEMPLATE`].
///
/// `hgdate` is `"<unix-time> <tz-offset>"`; only the first part is kept.
/// Authors are recorded as `Name <email>` and are cut down to the name.
pub fn parse_hg_log(raw: &str) -> Result<Vec<Commit>> {
    records(raw)
        .map(|record| {
            let (id, date, author) = fields(record)?;
            let time = date.split_whitespace().next().unwrap_or("");
            Ok(Commit::new(id, parse_unix(time, record)?, author_name(author)))
        })
        .collect()
}

/// `"Jane Doe <jane@example.com>"` → `"Jane Doe"`.
pub fn author_name(raw: &str) -> &str {
    raw.split('<').next().unwrap_or(raw).trim()
}

fn records(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(RECORD_SEP)
        .map(|r| r.trim_matches(|c: char| c == '\n' || c == '\r'))
        .filter(|r| !r.trim().is_empty())
}

fn fields(record: &str) -> Result<(&str, &str, &str)> {
    let mut parts = record.splitn(3, FIELD_SEP);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(time), Some(author)) if !id.trim().is_empty() => {
            Ok((id.trim(), time.trim(), author))
        }
        _ => Err(Error::MalformedLog(record.to_string())),
    }
}

fn parse_unix(time: &str, record: &str) -> Result<DateTime<Utc>> {
    time.parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or_else(|| Error::MalformedLog(record.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_git_log() {
        let raw = "abc123\x1f1700000000\x1fJane Doe\x1e\ndef456\x1f1700003600\x1fBob\x1e\n";
        let commits = parse_git_log(raw).expect("valid log");
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].id, "abc123");
        assert_eq!(commits[0].author, "Jane Doe");
        assert_eq!(commits[0].timestamp.timestamp(), 1_700_000_000);
        assert_eq!(commits[1].id, "def456");
    }

    #[test]
    fn test_parse_empty_git_log() {
        assert!(parse_git_log("").unwrap().is_empty());
        assert!(parse_git_log("\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_hg_log_strips_email_and_offset() {
        let raw = "f00d\x1f1700000000 -3600\x1fJDoe <j@x.com>\x1e";
        let commits = parse_hg_log(raw).expect("valid log");
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].author, "JDoe");
        assert_eq!(commits[0].timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_author_with_separator_free_text_kept() {
        let raw = "abc\x1f1700000000\x1fO'Brien, Pat\x1e";
        assert_eq!(parse_git_log(raw).unwrap()[0].author, "O'Brien, Pat");
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let err = parse_git_log("abc\x1f1700000000\x1e").unwrap_err();
        assert!(matches!(err, Error::MalformedLog(_)), "got {err:?}");
    }

    #[test]
    fn test_bad_timestamp_is_malformed() {
        let err = parse_git_log("abc\x1fyesterday\x1fBob\x1e").unwrap_err();
        assert!(matches!(err, Error::MalformedLog(_)), "got {err:?}");
    }

    #[test]
    fn test_author_name() {
        assert_eq!(author_name("Jane Doe <jane@example.com>"), "Jane Doe");
        assert_eq!(author_name("jane"), "jane");
        assert_eq!(author_name("  <only@mail>"), "");
    }
}
