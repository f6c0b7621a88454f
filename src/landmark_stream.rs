//! Live landmark input: one JSON object per line, as written by the external
//! hand-pose estimator.
//!
//! ```text
//! {"landmarks": [[0.51, 0.83], [0.47, 0.79], ...]}
//! {"landmarks": []}
//! ```
//!
//! An empty or missing `landmarks` list means no hand in that frame.

use std::io::BufRead;

use serde::Deserialize;
use thiserror::Error;

use crate::types::{Landmark, LandmarkSet};

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    landmarks: Vec<Landmark>,
}

/// Lazy frame iterator over a JSON Lines reader. Blank lines are skipped.
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

pub fn parse_frame(text: &str) -> Result<LandmarkSet, serde_json::Error> {
    serde_json::from_str::<FrameRecord>(text).map(|record| record.landmarks)
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = Result<LandmarkSet, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            return Some(parse_frame(text).map_err(|source| StreamError::Parse {
                line: self.line,
                source,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn yields_one_set_per_line() {
        let input = "{\"landmarks\": [[0.1, 0.2], [0.3, 0.4]]}\n\n{\"landmarks\": []}\n{}\n";
        let frames: Vec<_> = JsonLinesSource::new(Cursor::new(input))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], vec![Landmark::new(0.1, 0.2), Landmark::new(0.3, 0.4)]);
        assert!(frames[1].is_empty());
        assert!(frames[2].is_empty());
    }

    #[test]
    fn reports_line_of_bad_frame() {
        let input = "{\"landmarks\": []}\n{\"landmarks\": [[0.1]]}\n";
        let mut source = JsonLinesSource::new(Cursor::new(input));
        assert!(source.next().unwrap().is_ok());
        match source.next().unwrap() {
            Err(StreamError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ends_at_eof() {
        let mut source = JsonLinesSource::new(Cursor::new(""));
        assert!(source.next().is_none());
    }
}
