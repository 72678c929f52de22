//! Runs the stages in order and produces the report.
//!
//! ```text
//! NotStarted → Scanning → Validating → Reporting → Done
//!      └──────→ Failed   (content root missing or unreadable)
//! ```
//!
//! There is no way back to an earlier stage and nothing is persisted between
//! runs. Only a root-level failure aborts; per-file problems are recorded in
//! the report and the run continues.

use crate::config::ScanConfig;
use crate::index::build_index;
use crate::report::Report;
use crate::scan::{self, ScanError};
use crate::types::{PairingStatus, SeriesIndex};
use crate::validate::{find_orphans, pair_variants, validate_links};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    Scanning,
    Validating,
    Reporting,
    Done,
    Failed,
}

impl Stage {
    /// The stage that follows a successful `self`. Terminal stages have none.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::NotStarted => Some(Stage::Scanning),
            Stage::Scanning => Some(Stage::Validating),
            Stage::Validating => Some(Stage::Reporting),
            Stage::Reporting => Some(Stage::Done),
            Stage::Done | Stage::Failed => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::NotStarted => "not started",
            Stage::Scanning => "scanning",
            Stage::Validating => "validating",
            Stage::Reporting => "reporting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct RunOutput {
    pub report: Report,
    /// The series index the report was built from, for Markdown rendering.
    pub index: Vec<SeriesIndex>,
}

/// Tracks the current stage and logs each transition.
struct Progress {
    stage: Stage,
}

impl Progress {
    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            tracing::info!(from = %self.stage, to = %next, "stage");
            self.stage = next;
        }
    }

    fn fail(&mut self, err: &ScanError) {
        tracing::debug!(from = %self.stage, error = %err, "stage failed");
        self.stage = Stage::Failed;
    }
}

/// Scan `root`, validate cross-references, and build the index and report.
pub fn run(root: &Path, config: &ScanConfig) -> Result<RunOutput, ScanError> {
    let span = tracing::info_span!("run", root = %root.display());
    let _guard = span.enter();
    let mut progress = Progress {
        stage: Stage::NotStarted,
    };

    progress.advance();
    let outcome = scan::scan(root, config).inspect_err(|err| progress.fail(err))?;

    progress.advance();
    let links = validate_links(&outcome.documents);
    let pairings = pair_variants(&outcome.documents, &config.variant_suffix);
    let orphans = config
        .report_orphans
        .then(|| find_orphans(&outcome.documents, &links));
    for pairing in pairings.iter().filter(|p| p.status == PairingStatus::Unpaired) {
        tracing::warn!(path = %pairing.path, missing = %pairing.counterpart, "unpaired variant");
    }

    progress.advance();
    let index = build_index(&outcome.documents);
    let report = Report::new(&outcome, &links, &pairings, orphans, &index);

    progress.advance();
    tracing::info!(
        documents = report.documents_scanned,
        broken = report.broken_links.len(),
        unpaired = report.unpaired_variants.len(),
        "run complete"
    );

    Ok(RunOutput { report, index })
}
