//! Output sinks for normalized token artifacts.
//!
//! [`write_all`] renders each non-empty section and hands it to an
//! [`OutputSink`]. Sections are written one after another; a failing section
//! is recorded in the [`WriteReport`] and the remaining sections are still
//! attempted.

pub mod artifacts;
pub mod directory;
pub mod github;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::OutputError;
use crate::tokens::NormalizedTokenSet;

pub use artifacts::Section;
pub use directory::DirectorySink;
pub use github::GitHubSink;

/// What happened to a section that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// New content was persisted.
    Written,
    /// The destination already held identical content.
    Unchanged,
}

/// Destination for section artifacts.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Human-readable destination, used in logs.
    fn describe(&self) -> String;

    /// Persists one section as a single unit.
    ///
    /// # Errors
    ///
    /// Returns an [`OutputError`] when the section could not be persisted.
    /// The destination must not be left with a partially written file.
    async fn write_section(
        &self,
        section: Section,
        contents: &[u8],
    ) -> Result<WriteStatus, OutputError>;
}

/// Outcome for one section.
#[derive(Debug)]
pub struct SectionOutcome {
    /// The section.
    pub section: Section,
    /// Write result.
    pub result: Result<WriteStatus, OutputError>,
}

/// Per-section results of one [`write_all`] call.
///
/// Empty sections are not attempted and do not appear here.
#[derive(Debug, Default)]
pub struct WriteReport {
    /// One entry per attempted section, in write order.
    pub outcomes: Vec<SectionOutcome>,
}

impl WriteReport {
    /// Outcome for `section`, if it was attempted.
    #[must_use]
    pub fn outcome(&self, section: Section) -> Option<&SectionOutcome> {
        self.outcomes.iter().find(|o| o.section == section)
    }

    /// Sections that failed.
    #[must_use]
    pub fn failed(&self) -> Vec<Section> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.section)
            .collect()
    }

    /// Returns `true` when no attempted section failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Writes every non-empty section of `set` to `sink`.
pub async fn write_all(set: &NormalizedTokenSet, sink: &dyn OutputSink) -> WriteReport {
    let destination = sink.describe();
    let mut report = WriteReport::default();

    for section in Section::ALL {
        let Some(rendered) = section.render(set) else {
            continue;
        };
        let result = match rendered {
            Ok(contents) => sink.write_section(section, &contents).await,
            Err(e) => Err(OutputError::from(e)),
        };

        match &result {
            Ok(status) => info!(
                section = %section,
                file = section.file_name(),
                destination = %destination,
                status = ?status,
                "section written"
            ),
            Err(e) => warn!(
                section = %section,
                file = section.file_name(),
                destination = %destination,
                error = %e,
                "section failed"
            ),
        }
        report.outcomes.push(SectionOutcome { section, result });
    }

    report
}
