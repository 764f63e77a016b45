//! Lazy reader for the article stream handed over by the acquisition side.
//!
//! The stream is JSON Lines: one [`ArticleData`] object per line. Records
//! are decoded one at a time as the caller pulls them, so a large dump is
//! never held in memory.

use std::io::{BufRead, Lines};

use wikigraph_core::ArticleData;

use crate::error::{IngestError, Result};

pub struct ArticleReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> ArticleReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for ArticleReader<R> {
    type Item = Result<ArticleData>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }
            return Some(
                serde_json::from_str(&line).map_err(|source| IngestError::Article {
                    line: self.line_no,
                    source,
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_records_and_skips_blank_lines() {
        let input = concat!(
            r#"{"title":"A","url":"u/A","content":"a","links":["B"],"html":"<p>a</p>"}"#,
            "\n\n",
            r#"{"title":"B","url":"u/B","content":"b","links":[],"html":"","topic":"sci"}"#,
            "\n"
        );

        let articles: Vec<ArticleData> = ArticleReader::new(input.as_bytes())
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[0].topic, "");
        assert_eq!(articles[1].topic, "sci");
    }

    #[test]
    fn test_bad_record_reports_line_number() {
        let input = concat!(
            r#"{"title":"A","url":"","content":"","links":[],"html":""}"#,
            "\n",
            r#"{"title":"B"}"#,
            "\n"
        );

        let mut reader = ArticleReader::new(input.as_bytes());
        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(IngestError::Article { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected article error, got {other:?}"),
        }
    }
}
