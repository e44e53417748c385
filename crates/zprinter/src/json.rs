use std::io::{self, Write};

use zenith_core::{FileMatchSummary, MatchRecord, json_escape};
use zenith_searcher::Sink;

/// Writes matches and summaries as JSON Lines, per §6.
///
/// Each line is a single flat object tagged by `"mode"`. Text is escaped
/// with [`zenith_core::json_escape`] rather than a general-purpose JSON
/// encoder: that function's ASCII-only escaping contract is part of this
/// system's output format, not an implementation detail a generic encoder
/// would reproduce.
pub struct JsonWriter<W> {
    wtr: W,
    pattern: String,
    no_snippet: bool,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(wtr: W, pattern: &[u8], no_snippet: bool) -> JsonWriter<W> {
        JsonWriter { wtr, pattern: json_escape(&String::from_utf8_lossy(pattern)), no_snippet }
    }

    pub fn into_inner(self) -> W {
        self.wtr
    }
}

impl<W: Write + Send> Sink for JsonWriter<W> {
    fn match_found(&mut self, record: &MatchRecord) -> io::Result<()> {
        let path = json_escape(&record.path);
        if self.no_snippet {
            writeln!(
                self.wtr,
                r#"{{"path":"{}","mode":"match","pattern":"{}","offset":{},"binary":{}}}"#,
                path, self.pattern, record.offset, record.binary,
            )
        } else {
            writeln!(
                self.wtr,
                r#"{{"path":"{}","mode":"match","pattern":"{}","offset":{},"binary":{},"snippet":"{}"}}"#,
                path,
                self.pattern,
                record.offset,
                record.binary,
                json_escape(&record.snippet),
            )
        }
    }

    fn file_count(&mut self, summary: &FileMatchSummary) -> io::Result<()> {
        writeln!(
            self.wtr,
            r#"{{"path":"{}","mode":"count","pattern":"{}","binary":{},"count":{}}}"#,
            json_escape(&summary.path),
            self.pattern,
            summary.binary,
            summary.count,
        )
    }

    fn files_with_matches(&mut self, summary: &FileMatchSummary) -> io::Result<()> {
        writeln!(
            self.wtr,
            r#"{{"path":"{}","mode":"files_with_matches","pattern":"{}","binary":{}}}"#,
            json_escape(&summary.path),
            self.pattern,
            summary.binary,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_line_has_all_fields() {
        let mut w = JsonWriter::new(Vec::new(), b"pat", false);
        let record = MatchRecord { path: "/t/a.txt".to_string(), offset: 6, snippet: "hello".to_string(), binary: false };
        w.match_found(&record).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(
            out,
            r#"{"path":"/t/a.txt","mode":"match","pattern":"pat","offset":6,"binary":false,"snippet":"hello"}"#.to_string() + "\n"
        );
    }

    #[test]
    fn no_snippet_omits_the_snippet_key() {
        let mut w = JsonWriter::new(Vec::new(), b"pat", true);
        let record = MatchRecord { path: "/t/a.txt".to_string(), offset: 6, snippet: String::new(), binary: false };
        w.match_found(&record).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(!out.contains("snippet"));
    }

    #[test]
    fn paths_and_snippets_are_escaped() {
        let mut w = JsonWriter::new(Vec::new(), b"pat", false);
        let record = MatchRecord {
            path: "/t/a.txt".to_string(),
            offset: 0,
            snippet: "a\"b\\c".to_string(),
            binary: false,
        };
        w.match_found(&record).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains(r#""snippet":"a\"b\\c""#));
    }

    #[test]
    fn count_and_files_with_matches_lines() {
        let summary = FileMatchSummary { path: "/t/a.txt".to_string(), count: 4, binary: false };
        let mut w = JsonWriter::new(Vec::new(), b"pat", false);
        w.file_count(&summary).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(out, r#"{"path":"/t/a.txt","mode":"count","pattern":"pat","binary":false,"count":4}"#.to_string() + "\n");

        let mut w = JsonWriter::new(Vec::new(), b"pat", false);
        w.files_with_matches(&summary).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(out, r#"{"path":"/t/a.txt","mode":"files_with_matches","pattern":"pat","binary":false}"#.to_string() + "\n");
    }
}
