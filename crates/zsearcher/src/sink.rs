use std::io;

use zenith_core::{FileMatchSummary, MatchRecord};

/// Where the engine sends results, once it knows what to do with them.
///
/// Implementations pick output formats (human-readable, JSONL); the engine
/// only knows three things can happen per `output_mode`: a match record, a
/// per-file count summary, or a files-with-matches summary. Errors
/// propagated from a sink method short-circuit the run the same way a
/// read error does.
pub trait Sink: Send {
    fn match_found(&mut self, record: &MatchRecord) -> io::Result<()>;
    fn file_count(&mut self, summary: &FileMatchSummary) -> io::Result<()>;
    fn files_with_matches(&mut self, summary: &FileMatchSummary) -> io::Result<()>;
}

/// A sink that records everything it's given, for tests.
#[derive(Default)]
pub struct RecordingSink {
    pub matches: Vec<MatchRecord>,
    pub counts: Vec<FileMatchSummary>,
    pub files_with_matches: Vec<FileMatchSummary>,
}

impl Sink for RecordingSink {
    fn match_found(&mut self, record: &MatchRecord) -> io::Result<()> {
        self.matches.push(record.clone());
        Ok(())
    }

    fn file_count(&mut self, summary: &FileMatchSummary) -> io::Result<()> {
        self.counts.push(summary.clone());
        Ok(())
    }

    fn files_with_matches(&mut self, summary: &FileMatchSummary) -> io::Result<()> {
        self.files_with_matches.push(summary.clone());
        Ok(())
    }
}
