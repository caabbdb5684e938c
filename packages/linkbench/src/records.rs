//! Link record source: lazy parsing of line-oriented triple dumps.
//!
//! Each input line is matched against the Wikipedia page-link triple shape:
//!
//! ```text
//! <http://dbpedia.org/resource/Calf> <http://dbpedia.org/ontology/wikiPageWikiLink> <http://dbpedia.org/resource/Veal> .
//! ```
//!
//! Only the trailing resource-name segment of the subject and object URIs
//! is kept as the vertex keys. Lines that do not match are skipped
//! silently and never counted. The source is not restartable except by
//! reopening the underlying stream.

use std::io::BufRead;

use regex_lite::Regex;

/// One directed edge to ingest, identified by endpoint keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub from: String,
    pub to: String,
}

/// Anchored triple pattern; capture groups are the two resource names.
const LINK_PATTERN: &str =
    r"^<http://dbpedia\.org/resource/([^>]*)> <[^>]*> <http://dbpedia\.org/resource/([^>]*)> \.$";

/// Lazy, finite iterator of [`LinkRecord`] over a line-oriented reader.
pub struct LinkRecordSource<R> {
    reader: R,
    pattern: Regex,
    line: String,
    produced: u64,
    limit: Option<u64>,
}

impl<R: BufRead> LinkRecordSource<R> {
    /// Source over the whole stream.
    pub fn new(reader: R) -> Self {
        Self::with_limit(reader, None)
    }

    /// Source that terminates after `limit` matching records, or at
    /// end-of-stream, whichever comes first. `None` means unbounded.
    pub fn with_limit(reader: R, limit: Option<u64>) -> Self {
        Self {
            reader,
            // The pattern is fixed; compilation cannot fail.
            pattern: Regex::new(LINK_PATTERN).unwrap(),
            line: String::new(),
            produced: 0,
            limit,
        }
    }

    /// Number of records produced so far.
    pub fn produced(&self) -> u64 {
        self.produced
    }
}

impl<R: BufRead> Iterator for LinkRecordSource<R> {
    type Item = std::io::Result<LinkRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(limit) = self.limit {
            if self.produced >= limit {
                return None;
            }
        }
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            let trimmed = self.line.trim_end_matches(&['\r', '\n'][..]);
            if let Some(caps) = self.pattern.captures(trimmed) {
                self.produced += 1;
                return Some(Ok(LinkRecord {
                    from: caps[1].to_string(),
                    to: caps[2].to_string(),
                }));
            }
            // Non-matching line: skip, do not count.
        }
    }
}
