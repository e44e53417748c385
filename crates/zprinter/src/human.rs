use std::io::{self, Write};

use zenith_core::{FileMatchSummary, MatchRecord};
use zenith_searcher::Sink;

/// Writes matches and summaries in the plain, human-readable form of §6:
/// one record per line, fields separated by `:`.
pub struct HumanWriter<W> {
    wtr: W,
    no_snippet: bool,
}

impl<W: Write> HumanWriter<W> {
    pub fn new(wtr: W, no_snippet: bool) -> HumanWriter<W> {
        HumanWriter { wtr, no_snippet }
    }

    pub fn into_inner(self) -> W {
        self.wtr
    }
}

impl<W: Write + Send> Sink for HumanWriter<W> {
    fn match_found(&mut self, record: &MatchRecord) -> io::Result<()> {
        if self.no_snippet {
            writeln!(self.wtr, "{}:{}", record.path, record.offset)
        } else {
            writeln!(self.wtr, "{}:{}:{}", record.path, record.offset, record.snippet)
        }
    }

    fn file_count(&mut self, summary: &FileMatchSummary) -> io::Result<()> {
        writeln!(self.wtr, "{}:{}", summary.path, summary.count)
    }

    fn files_with_matches(&mut self, summary: &FileMatchSummary) -> io::Result<()> {
        writeln!(self.wtr, "{}", summary.path)
    }
}
