//! Text, Markdown and JSON renditions of a [`MatchReport`].

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use super::{MatchReport, SideSummary};
use crate::config::ReportFormat;

/// Width of a 100 % bar in the text charts.
const BAR_WIDTH: usize = 40;

/// Presentation toggles; the engine never sees these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub show_charts: bool,
    pub show_specials: bool,
}

pub fn render(report: &MatchReport, format: ReportFormat, view: ViewOptions) -> Result<String> {
    match format {
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialise report")
        }
        ReportFormat::Text => Ok(Renderer::new(Style::Text).render(report, view)),
        ReportFormat::Markdown => Ok(Renderer::new(Style::Markdown).render(report, view)),
    }
}

/// Render and write the report to `path`.
pub fn export(
    report: &MatchReport,
    format: ReportFormat,
    view: ViewOptions,
    path: &Path,
) -> Result<()> {
    let body = render(report, format, view)?;
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report written to {} ({:?})", path.display(), format);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Text,
    Markdown,
}

struct Renderer {
    style: Style,
    out: String,
}

// `write!` into a String cannot fail; results are discarded.
impl Renderer {
    fn new(style: Style) -> Self {
        Renderer {
            style,
            out: String::new(),
        }
    }

    fn render(mut self, report: &MatchReport, view: ViewOptions) -> String {
        self.header(report);
        if view.show_charts {
            self.charts(report);
        }
        self.tables(report);
        self.insights(report);
        self.interpretation(report);
        if view.show_specials {
            self.specials(report);
        }
        self.footer();
        self.out
    }

    fn heading(&mut self, level: usize, title: &str) {
        match self.style {
            Style::Markdown => {
                let _ = writeln!(self.out, "{} {}\n", "#".repeat(level), title);
            }
            Style::Text => {
                let rule = if level == 1 { '=' } else { '-' };
                let width = title.chars().count();
                let _ = writeln!(self.out, "{}\n{}\n", title, rule.to_string().repeat(width));
            }
        }
    }

    fn bold(&self, s: &str) -> String {
        match self.style {
            Style::Markdown => format!("**{s}**"),
            Style::Text => s.to_string(),
        }
    }

    fn bullet(&mut self, line: &str) {
        let _ = writeln!(self.out, "- {line}");
    }

    fn header(&mut self, report: &MatchReport) {
        self.heading(
            1,
            &format!("StatBall report: {} vs {}", report.team_a.name, report.team_b.name),
        );
        let _ = writeln!(
            self.out,
            "Generated at: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(
            self.out,
            "Averages based on {} matches ({}) and {} matches ({}). Larger samples make the estimates more reliable.\n",
            report.team_a.matches, report.team_a.name, report.team_b.matches, report.team_b.name
        );
    }

    fn charts(&mut self, report: &MatchReport) {
        let k = report.tail_threshold;
        self.heading(2, &format!("Probability of at least {k} occurrences (P(X ≥ {k}))"));
        for (name, side_a) in [(&report.team_a.name, true), (&report.team_b.name, false)] {
            let title = self.bold(name);
            let _ = writeln!(self.out, "{title}");
            self.fence_open();
            for e in &report.events {
                let tail = if side_a { e.a.tail } else { e.b.tail };
                let pct = tail * 100.0;
                let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
                let _ = writeln!(
                    self.out,
                    "{:<9} {:>6.2}% {}",
                    e.event.label(),
                    pct,
                    "█".repeat(filled.min(BAR_WIDTH))
                );
            }
            self.fence_close();
        }
        let _ = writeln!(
            self.out,
            "Each bar is the chance that the event happens at least {k} times in a match, from the historical average and the Poisson distribution.\n"
        );
    }

    fn fence_open(&mut self) {
        if self.style == Style::Markdown {
            let _ = writeln!(self.out, "```");
        }
    }

    fn fence_close(&mut self) {
        if self.style == Style::Markdown {
            let _ = writeln!(self.out, "```");
        }
        let _ = writeln!(self.out);
    }

    fn tables(&mut self, report: &MatchReport) {
        let title = format!(
            "Tables 0 → {}: exact and cumulative probabilities",
            report.table_k_max
        );
        self.heading(2, &title);
        for e in &report.events {
            for (name, side) in [(&report.team_a.name, &e.a), (&report.team_b.name, &e.b)] {
                self.heading(3, &format!("{}: {} (mean {:.2})", e.event.label(), name, side.rate));
                self.table(side);
            }
        }
    }

    fn table(&mut self, side: &SideSummary) {
        match self.style {
            Style::Markdown => {
                let _ = writeln!(self.out, "| k | P(X=k) (%) | P(X≤k) (%) |");
                let _ = writeln!(self.out, "|---:|---:|---:|");
                for row in &side.table {
                    let _ = writeln!(
                        self.out,
                        "| {} | {:.4} | {:.4} |",
                        row.k, row.pmf_pct, row.cdf_pct
                    );
                }
            }
            Style::Text => {
                let _ = writeln!(self.out, "{:>4}  {:>12}  {:>12}", "k", "P(X=k) %", "P(X<=k) %");
                for row in &side.table {
                    let _ = writeln!(
                        self.out,
                        "{:>4}  {:>12.4}  {:>12.4}",
                        row.k, row.pmf_pct, row.cdf_pct
                    );
                }
            }
        }
        let _ = writeln!(self.out);
    }

    fn insights(&mut self, report: &MatchReport) {
        self.heading(2, "Quick insights (gaps in pp)");
        for e in &report.events {
            let line = format!("{} (A - B): {:.2} pp, {}", e.event.label(), e.gap_pp, e.tier);
            self.bullet(&line);
        }
        let _ = writeln!(
            self.out,
            "\npp = percentage points: the absolute difference between the two teams' P(X ≥ {}).\n",
            report.tail_threshold
        );
    }

    fn interpretation(&mut self, report: &MatchReport) {
        let i = &report.interpretation;
        self.heading(2, "Automatic interpretation");
        for (title, lines) in [
            ("Technical summary", &i.technical),
            ("Tactical reading", &i.tactical),
            ("Executive summary", &i.executive),
            ("Practical suggestions", &i.advice),
        ] {
            let title = self.bold(&format!("{title}:"));
            let _ = writeln!(self.out, "{title}");
            for line in lines {
                self.bullet(line);
            }
            let _ = writeln!(self.out);
        }
    }

    fn specials(&mut self, report: &MatchReport) {
        let (a, b) = (&report.team_a.name, &report.team_b.name);
        self.heading(2, &format!("Special events: chance of {a} having MORE than {b}"));
        for e in &report.events {
            let c = e.special.comparison;
            let line = format!(
                "{}: P({a} > {b}) = {:.2}% (tie {:.2}%, {b} > {a} {:.2}%); {} has a {}",
                e.event.label(),
                c.a_greater * 100.0,
                c.tie * 100.0,
                c.b_greater * 100.0,
                a,
                e.special.verdict.description()
            );
            self.bullet(&line);
        }
        let k_max = report
            .events
            .iter()
            .map(|e| e.special.comparison.k_max)
            .max()
            .unwrap_or(0);
        let _ = writeln!(
            self.out,
            "\nHow it was computed: for every possible count i of {a} (i = 0..{k_max}) multiply P_A(i) by P_B(< i) and add the terms up, giving P(A > B).\n"
        );
    }

    fn footer(&mut self) {
        let _ = writeln!(self.out, "StatBall v{}", env!("CARGO_PKG_VERSION"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchup::Event;
    use crate::report::tests::sample_report;

    #[test]
    fn markdown_contains_every_table() {
        let report = sample_report();
        let md = render(&report, ReportFormat::Markdown, ViewOptions::default()).unwrap();
        assert!(md.starts_with("# StatBall report: Lions vs Hawks"));
        for event in Event::ALL {
            assert!(md.contains(&format!("### {}: Lions", event.label())));
            assert!(md.contains(&format!("### {}: Hawks", event.label())));
        }
        assert_eq!(md.matches("| k | P(X=k) (%) | P(X≤k) (%) |").count(), 10);
        assert!(md.contains("Generated at: 2026-03-14 18:30:00 UTC"));
        assert!(md.contains("| 0 | 16.5299 | 16.5299 |"));
    }

    #[test]
    fn view_toggles_control_optional_sections() {
        let report = sample_report();
        let plain = render(&report, ReportFormat::Text, ViewOptions::default()).unwrap();
        assert!(!plain.contains("Special events"));
        assert!(!plain.contains("█"));

        let full = render(
            &report,
            ReportFormat::Text,
            ViewOptions {
                show_charts: true,
                show_specials: true,
            },
        )
        .unwrap();
        assert!(full.contains("Probability of at least 5 occurrences"));
        assert!(full.contains("Special events: chance of Lions having MORE than Hawks"));
        assert!(full.contains("Goals: P(Lions > Hawks) = 44.92%"));
    }

    #[test]
    fn chart_bars_scale_with_probability() {
        let report = sample_report();
        let text = render(
            &report,
            ReportFormat::Text,
            ViewOptions {
                show_charts: true,
                show_specials: false,
            },
        )
        .unwrap();
        // Shots at a mean of 12 almost surely reach five.
        let shots = text.lines().find(|l| l.starts_with("Shots ")).unwrap();
        assert_eq!(shots.matches('█').count(), BAR_WIDTH);
    }

    #[test]
    fn json_round_trips_to_a_value() {
        let report = sample_report();
        let json = render(&report, ReportFormat::Json, ViewOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["team_a"]["name"], "Lions");
        assert_eq!(value["events"].as_array().unwrap().len(), 5);
        assert_eq!(value["events"][3]["event"], "corners");
        assert_eq!(value["events"][3]["tier"], "clear_a");
        assert!(value["events"][2]["special"]["a_greater"].as_f64().unwrap() > 0.44);
        assert_eq!(value["events"][0]["a"]["table"].as_array().unwrap().len(), 11);
    }

    #[test]
    fn export_writes_file() {
        let report = sample_report();
        let path = std::env::temp_dir().join(format!("statball-report-{}.md", std::process::id()));
        export(&report, ReportFormat::Markdown, ViewOptions::default(), &path).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(body.contains("Automatic interpretation"));
        assert!(body.trim_end().ends_with(&format!("StatBall v{}", env!("CARGO_PKG_VERSION"))));
    }
}
