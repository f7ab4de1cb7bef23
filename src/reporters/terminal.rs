use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, Table};
use crate::reporters::{fmt_commits, fmt_date, fmt_ranking};
use crate::types::{ProjectReport, Ratio, Report, Stats};

pub fn report_terminal(report: &Report) {
    eprintln!();
    println!(
        "{} — {} ({} project{})",
        "📊 contrib-rank".cyan().bold(),
        report.meta.author.bold(),
        report.meta.project_count.to_string().bright_black(),
        if report.meta.project_count == 1 { "" } else { "s" },
    );
    println!();

    if report.projects.is_empty() {
        println!("{}", "  No projects could be analysed.".yellow());
        println!();
    }

    for project in &report.projects {
        print_project(project);
    }

    // ── Failures ───────────────────────────────────────────────────────────
    if !report.meta.failed_repositories.is_empty() {
        println!("{}", "⚠  Skipped repositories:".yellow().bold());
        for url in &report.meta.failed_repositories {
            println!("   {} {}", "•".yellow(), url.bright_black());
        }
        println!();
    }
}

fn print_project(project: &ProjectReport) {
    let analysis = &project.analysis;
    println!("{}", format!("📁 {}", project.name).bold());
    for repo in &project.repositories {
        println!("   {}", repo.bright_black());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", "LIFETIME", "LAST 12 MONTHS"]);

    table.add_row(vec![
        Cell::new("Commits").add_attribute(Attribute::Bold),
        Cell::new(fmt_commits(&analysis.all.commit_count)),
        past_year_cell(analysis.past_year.as_ref(), |s| Cell::new(fmt_commits(&s.commit_count))),
    ]);
    table.add_row(vec![
        Cell::new("Ranking").add_attribute(Attribute::Bold),
        ranking_cell(analysis.all.ranking.as_ref()),
        past_year_cell(analysis.past_year.as_ref(), |s| ranking_cell(s.ranking.as_ref())),
    ]);
    println!("{table}");

    match &analysis.all.date_range {
        Some(range) => {
            println!("   First commit:  {}", fmt_date(&range.first).green());
            println!("   Latest commit: {}", fmt_date(&range.last).green());
        }
        None => println!("   {}", "No commits found for this author.".yellow()),
    }

    if analysis.matched_authors.len() > 1 {
        let names: Vec<&str> = analysis.matched_authors.iter().map(String::as_str).collect();
        println!("   {} {}", "Matched as:".bright_black(), names.join(", ").bright_black());
    }
    println!();
}

// ─── Cell builders ────────────────────────────────────────────────────────────

fn ranking_cell(ranking: Option<&Ratio>) -> Cell {
    match ranking {
        Some(r) if r.me == 1 => Cell::new(fmt_ranking(r)).fg(Color::Green).add_attribute(Attribute::Bold),
        Some(r) if r.me == 0 => Cell::new(fmt_ranking(r)).fg(Color::DarkGrey),
        Some(r) => Cell::new(fmt_ranking(r)),
        None => Cell::new("—").fg(Color::DarkGrey),
    }
}

/// Past-year column; "inactive" when the target has no recent commits.
fn past_year_cell(stats: Option<&Stats>, cell: impl Fn(&Stats) -> Cell) -> Cell {
    match stats {
        Some(stats) => cell(stats),
        None => Cell::new("inactive").fg(Color::DarkGrey),
    }
}
