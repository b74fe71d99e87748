//! Per-run summary.
//!
//! Reports how many tokens landed in each section and what happened to each
//! artifact, so a schema mismatch ("0 palettes" from a populated source)
//! is visible at a glance.

use serde::Serialize;

use crate::output::{Section, WriteReport, WriteStatus};
use crate::tokens::Normalized;

/// What happened to one section's artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// New content persisted.
    Written,
    /// Destination already up to date.
    Unchanged,
    /// Persisting failed.
    Failed,
    /// Section was empty; no artifact.
    Skipped,
}

/// Status line for one section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionSummary {
    /// Section name.
    pub section: &'static str,
    /// Artifact file name.
    pub file: &'static str,
    /// Outcome.
    pub status: SectionStatus,
    /// Error message for failed sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of one normalize run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Where the tokens came from.
    pub source: String,
    /// Number of emitted tokens across all sections.
    pub tokens: usize,
    /// Number of color palettes.
    pub palettes: usize,
    /// Number of color shades across all palettes.
    pub colors: usize,
    /// Number of spacing tokens.
    pub spacing: usize,
    /// Number of font-size tokens.
    pub font_sizes: usize,
    /// Number of font-weight tokens.
    pub font_weights: usize,
    /// Number of line-height tokens.
    pub line_heights: usize,
    /// Number of border-radius tokens.
    pub border_radius: usize,
    /// Leaves recognized but not routed anywhere.
    pub dropped: usize,
    /// Per-section artifact outcomes; empty when nothing was written.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<SectionSummary>,
}

impl RunSummary {
    /// Builds the counts from a normalization result.
    #[must_use]
    pub fn new(source: impl Into<String>, normalized: &Normalized) -> Self {
        let tokens = &normalized.tokens;
        Self {
            source: source.into(),
            tokens: tokens.token_count(),
            palettes: tokens.colors.len(),
            colors: tokens.color_count(),
            spacing: tokens.spacing.len(),
            font_sizes: tokens.typography.font_size.len(),
            font_weights: tokens.typography.font_weight.len(),
            line_heights: tokens.typography.line_height.len(),
            border_radius: tokens.border_radius.len(),
            dropped: normalized.dropped.len(),
            sections: Vec::new(),
        }
    }

    /// Adds per-section outcomes. Sections absent from `report` are skipped.
    #[must_use]
    pub fn with_report(mut self, report: &WriteReport) -> Self {
        self.sections = Section::ALL
            .into_iter()
            .map(|section| {
                let (status, error) = match report.outcome(section).map(|o| &o.result) {
                    None => (SectionStatus::Skipped, None),
                    Some(Ok(WriteStatus::Written)) => (SectionStatus::Written, None),
                    Some(Ok(WriteStatus::Unchanged)) => (SectionStatus::Unchanged, None),
                    Some(Err(e)) => (SectionStatus::Failed, Some(e.to_string())),
                };
                SectionSummary {
                    section: section.as_str(),
                    file: section.file_name(),
                    status,
                    error,
                }
            })
            .collect();
        self
    }

    /// Multi-line report for terminals.
    #[must_use]
    pub fn render_human(&self) -> String {
        let mut out = format!("{self}\n");
        for s in &self.sections {
            let status = match s.status {
                SectionStatus::Written => "written",
                SectionStatus::Unchanged => "unchanged",
                SectionStatus::Failed => "FAILED",
                SectionStatus::Skipped => "skipped (empty)",
            };
            out.push_str(&format!("  {:<20} {status}", s.file));
            if let Some(error) = &s.error {
                out.push_str(&format!(": {error}"));
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: palettes={} colors={} spacing={} fontSize={} fontWeight={} lineHeight={} borderRadius={} dropped={}",
            self.source,
            self.palettes,
            self.colors,
            self.spacing,
            self.font_sizes,
            self.font_weights,
            self.line_heights,
            self.border_radius,
            self.dropped,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OutputError;
    use crate::output::SectionOutcome;
    use crate::tokens::normalize_with_report;
    use serde_json::json;

    fn normalized() -> Normalized {
        normalize_with_report(&json!({
            "Primary": {
                "Bleu": {
                    "500": {"value": "#1a70ef", "type": "color"},
                    "600": {"value": "#155ac0", "type": "color"}
                }
            },
            "Neutral": {"100": {"value": "#f5f5f5", "type": "color"}},
            "spacing": {"sm": {"value": "4px", "type": "dimension"}},
            "misc": {"shadow": {"value": "none", "type": "boxShadow"}}
        }))
    }

    #[test]
    fn test_counts() {
        let summary = RunSummary::new("tokens.json", &normalized());
        assert_eq!(summary.palettes, 2);
        assert_eq!(summary.colors, 3);
        assert_eq!(summary.spacing, 1);
        assert_eq!(summary.font_sizes, 0);
        assert_eq!(summary.tokens, 4);
        assert_eq!(summary.dropped, 1);
    }

    #[test]
    fn test_display() {
        let summary = RunSummary::new("tokens.json", &normalized());
        assert_eq!(
            summary.to_string(),
            "tokens.json: palettes=2 colors=3 spacing=1 fontSize=0 fontWeight=0 lineHeight=0 borderRadius=0 dropped=1"
        );
    }

    #[test]
    fn test_with_report_marks_each_section() {
        let report = WriteReport {
            outcomes: vec![
                SectionOutcome {
                    section: Section::Colors,
                    result: Ok(WriteStatus::Written),
                },
                SectionOutcome {
                    section: Section::Spacing,
                    result: Err(OutputError::Io {
                        path: "spacing.json".into(),
                        error: std::io::Error::other("disk full"),
                    }),
                },
            ],
        };
        let summary = RunSummary::new("tokens.json", &normalized()).with_report(&report);

        let statuses: Vec<SectionStatus> = summary.sections.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            [
                SectionStatus::Written,
                SectionStatus::Failed,
                SectionStatus::Skipped,
                SectionStatus::Skipped
            ]
        );
        assert!(summary.sections[1].error.as_deref().unwrap().contains("disk full"));

        let human = summary.render_human();
        assert!(human.contains("spacing.json"));
        assert!(human.contains("FAILED"));
        assert!(human.contains("skipped (empty)"));
    }

    #[test]
    fn test_serialize() {
        let summary = RunSummary::new("tokens.json", &normalized());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["tokens"], 4);
        assert_eq!(json["palettes"], 2);
        assert_eq!(json["dropped"], 1);
        assert!(json.get("sections").is_none());
    }
}
