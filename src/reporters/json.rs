use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use crate::error::Result;
use crate::types::Report;

/// Outputs the report as JSON. Writes to a file if given, otherwise stdout.
pub fn report_json(report: &Report, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_json(report, &mut writer)?;
            info!(path = %path.display(), "JSON report written");
        }
        None => {
            let stdout = std::io::stdout();
            write_json(report, &mut BufWriter::new(stdout.lock()))?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(report: &Report, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::report;
    use crate::stats::analyze;
    use crate::types::{AnalysisOptions, Commit, ProjectReport};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_json_shape() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap();
        let commits = vec![
            Commit::new("1", now - Duration::days(800), "Jane Doe"),
            Commit::new("2", now - Duration::days(700), "Bob"),
        ];
        let project = ProjectReport {
            name: "demo".to_string(),
            repositories: vec!["https://example.com/demo".to_string()],
            analysis: analyze("Jane Doe", &commits, now, AnalysisOptions::default()),
        };
        let r = report("Jane Doe", now, vec![project], vec!["https://bad.example/x".to_string()]);

        let mut buf: Vec<u8> = Vec::new();
        write_json(&r, &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(v["meta"]["author"], "Jane Doe");
        assert_eq!(v["meta"]["failed_repositories"][0], "https://bad.example/x");
        let all = &v["projects"][0]["analysis"]["all"];
        assert_eq!(all["commit_count"]["me"], 1);
        assert_eq!(all["commit_count"]["everyone"], 2);
        assert_eq!(all["ranking"]["me"], 1);
        assert!(all["date_range"]["first"].is_string());
        assert!(v["projects"][0]["analysis"].get("past_year").is_none(), "inactive year is omitted");
    }

    #[test]
    fn test_json_written_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.json");
        let r = report("x", Utc::now(), Vec::new(), Vec::new());
        report_json(&r, Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
    }
}
