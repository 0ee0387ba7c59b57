// Dweve Tabula - Multi-line CSV Reader
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Row assembly: turning physical lines into logical rows.
//!
//! [`RowBuffer`] holds the text of the row currently being assembled and
//! runs one grammar attempt per appended line. [`RowAssembler`] pulls lines
//! from a [`LineSource`] and feeds them to the buffer until a row completes
//! or the source runs dry.
//!
//! States: accumulating (buffer possibly empty), row complete (buffer reset,
//! row yielded), end of stream, failed. End of stream and failed are
//! terminal; the line source is released on entering either.

use crate::dialect::Dialect;
use crate::error::{CsvError, CsvResult};
use crate::grammar::{ParsedRow, Row, RowParser};
use crate::reader::CsvReaderConfig;
use crate::source::LineSource;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Accumulated text of the logical row in progress.
///
/// Shared by the sync and async assemblers so both apply identical
/// continuation, blank-line and size rules.
#[derive(Debug, Clone)]
pub struct RowBuffer {
    parser: RowParser,
    skip_empty_line: bool,
    max_row_length: usize,
    text: String,
    start_line: usize,
}

impl RowBuffer {
    pub fn new(dialect: &Dialect, max_row_length: usize) -> Self {
        Self {
            parser: RowParser::new(dialect),
            skip_empty_line: dialect.skip_empty_line,
            max_row_length,
            text: String::new(),
            start_line: 0,
        }
    }

    /// Whether a row is partially assembled.
    #[inline]
    pub fn is_pending(&self) -> bool {
        !self.text.is_empty()
    }

    /// Append physical line number `line_number` and try to complete a row.
    ///
    /// Returns `Ok(None)` when the line was skipped or the row still needs
    /// more lines.
    pub fn push_line(&mut self, line: &str, line_number: usize) -> CsvResult<Option<Row>> {
        if self.skip_empty_line && self.text.is_empty() && line.trim().is_empty() {
            trace!(line = line_number, "skipping blank line");
            return Ok(None);
        }

        if self.text.is_empty() {
            self.start_line = line_number;
        }
        self.text.push_str(line);

        if self.text.len() > self.max_row_length {
            debug!(
                start_line = self.start_line,
                length = self.text.len(),
                "row exceeds length limit"
            );
            self.text.clear();
            return Err(CsvError::malformed(
                self.start_line,
                format!(
                    "row starting here exceeds the maximum length of {} bytes",
                    self.max_row_length
                ),
            ));
        }

        match self.parser.parse_row(&self.text, line_number) {
            ParsedRow::Complete(row) => {
                self.text.clear();
                Ok(Some(row))
            }
            ParsedRow::Incomplete => {
                trace!(
                    start_line = self.start_line,
                    line = line_number,
                    "row continues on next line"
                );
                Ok(None)
            }
        }
    }

    /// Signal end of input; fails if a row is left half-assembled.
    pub fn finish(&mut self) -> CsvResult<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let leftover = std::mem::take(&mut self.text);
        Err(CsvError::malformed(
            self.start_line,
            format!(
                "unterminated quoted field at end of input: {:?}",
                leftover
            ),
        ))
    }
}

/// Pull-based assembler of logical rows over a line source.
///
/// Single pass and forward only. The source is released exactly once: when
/// the pass reaches its end, when it fails, or when the assembler is dropped.
///
/// # Examples
///
/// ```rust
/// use tabula::{CsvReaderConfig, ReaderSource, RowAssembler};
///
/// let source = ReaderSource::new("id,note\n1,\"two\nlines\"\n".as_bytes());
/// let mut rows = RowAssembler::new(source, &CsvReaderConfig::default());
///
/// assert_eq!(rows.next_row().unwrap(), Some(vec!["id".into(), "note".into()]));
/// assert_eq!(rows.next_row().unwrap(), Some(vec!["1".into(), "two\nlines".into()]));
/// assert_eq!(rows.next_row().unwrap(), None);
/// assert_eq!(rows.line_number(), 3);
/// ```
pub struct RowAssembler<S: LineSource> {
    source: S,
    buffer: RowBuffer,
    line_number: usize,
    finished: bool,
}

impl<S: LineSource> RowAssembler<S> {
    pub fn new(source: S, config: &CsvReaderConfig) -> Self {
        Self {
            source,
            buffer: RowBuffer::new(&config.dialect, config.max_row_length),
            line_number: 0,
            finished: false,
        }
    }

    /// Number of physical lines consumed so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Whether the pass has ended, cleanly or not.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read the next logical row.
    ///
    /// Returns `Ok(None)` at a clean end of input. After an error or the
    /// end of input, every further call returns `Ok(None)`.
    pub fn next_row(&mut self) -> CsvResult<Option<Row>> {
        if self.finished {
            return Ok(None);
        }
        match self.pull_row() {
            Ok(Some(row)) => Ok(Some(row)),
            other => {
                self.finish();
                other
            }
        }
    }

    /// End the pass early and release the line source.
    pub fn close(&mut self) {
        self.finish();
    }

    fn pull_row(&mut self) -> CsvResult<Option<Row>> {
        loop {
            let Some(line) = self.source.next_line()? else {
                debug!(lines = self.line_number, "end of input");
                self.buffer.finish()?;
                return Ok(None);
            };
            self.line_number += 1;

            if let Some(row) = self.buffer.push_line(&line, self.line_number)? {
                return Ok(Some(row));
            }
        }
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.source.release();
        }
    }
}

impl<S: LineSource> Drop for RowAssembler<S> {
    fn drop(&mut self) {
        self.finish();
    }
}

impl<S: LineSource> Iterator for RowAssembler<S> {
    type Item = CsvResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl<S: LineSource> FusedIterator for RowAssembler<S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReaderSource;
    use std::cell::Cell;
    use std::rc::Rc;

    fn assembler(input: &str, dialect: Dialect) -> RowAssembler<ReaderSource<&[u8]>> {
        let config = CsvReaderConfig {
            dialect,
            ..CsvReaderConfig::default()
        };
        RowAssembler::new(ReaderSource::new(input.as_bytes()), &config)
    }

    fn strings(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    /// Line source over fixed lines that counts release calls.
    struct ScriptedSource {
        lines: Vec<&'static str>,
        next: usize,
        releases: Rc<Cell<usize>>,
    }

    impl LineSource for ScriptedSource {
        fn next_line(&mut self) -> CsvResult<Option<String>> {
            let line = self.lines.get(self.next).map(|l| l.to_string());
            self.next += 1;
            Ok(line)
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    fn scripted(lines: Vec<&'static str>) -> (ScriptedSource, Rc<Cell<usize>>) {
        let releases = Rc::new(Cell::new(0));
        let source = ScriptedSource {
            lines,
            next: 0,
            releases: Rc::clone(&releases),
        };
        (source, releases)
    }

    // ==================== RowBuffer ====================

    #[test]
    fn test_buffer_single_line_row() {
        let mut buffer = RowBuffer::new(&Dialect::csv(), usize::MAX);
        assert_eq!(
            buffer.push_line("a,b\n", 1).unwrap(),
            Some(strings(&["a", "b"]))
        );
        assert!(!buffer.is_pending());
    }

    #[test]
    fn test_buffer_continuation() {
        let mut buffer = RowBuffer::new(&Dialect::csv(), usize::MAX);
        assert_eq!(buffer.push_line("\"start\n", 1).unwrap(), None);
        assert!(buffer.is_pending());
        assert_eq!(
            buffer.push_line("end\"\n", 2).unwrap(),
            Some(strings(&["start\nend"]))
        );
        assert!(buffer.finish().is_ok());
    }

    #[test]
    fn test_buffer_finish_with_pending_row() {
        let mut buffer = RowBuffer::new(&Dialect::csv(), usize::MAX);
        buffer.push_line("1,\"open\n", 4).unwrap();
        let err = buffer.finish().unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.line(), Some(4));
        assert!(err.to_string().contains("open"));
    }

    #[test]
    fn test_buffer_row_length_limit() {
        let mut buffer = RowBuffer::new(&Dialect::csv(), 8);
        assert_eq!(buffer.push_line("\"abc\n", 1).unwrap(), None);
        let err = buffer.push_line("defghij\n", 2).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.line(), Some(1));
    }

    // ==================== RowAssembler ====================

    #[test]
    fn test_assembles_rows_in_order() {
        let rows: Vec<Row> = assembler("a,b\nc,d\n", Dialect::csv())
            .collect::<CsvResult<_>>()
            .unwrap();
        assert_eq!(rows, vec![strings(&["a", "b"]), strings(&["c", "d"])]);
    }

    #[test]
    fn test_multiline_field() {
        let mut rows = assembler("x,\"line1\nline2\nline3\",y\nz,w,v\n", Dialect::csv());
        assert_eq!(
            rows.next_row().unwrap(),
            Some(strings(&["x", "line1\nline2\nline3", "y"]))
        );
        assert_eq!(rows.line_number(), 3);
        assert_eq!(rows.next_row().unwrap(), Some(strings(&["z", "w", "v"])));
        assert_eq!(rows.next_row().unwrap(), None);
    }

    #[test]
    fn test_unterminated_quote_at_end_of_input() {
        let mut rows = assembler("a,b\n\"never closed\n", Dialect::csv());
        assert!(rows.next_row().unwrap().is_some());
        let err = rows.next_row().unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.line(), Some(2));
        assert!(rows.is_finished());
        assert_eq!(rows.next_row().unwrap(), None);
    }

    #[test]
    fn test_blank_lines_kept_by_default() {
        let rows: Vec<Row> = assembler("a\n\nb\n", Dialect::csv())
            .collect::<CsvResult<_>>()
            .unwrap();
        assert_eq!(rows, vec![strings(&["a"]), strings(&[""]), strings(&["b"])]);
    }

    #[test]
    fn test_blank_lines_skipped_between_rows() {
        let dialect = Dialect::csv().with_skip_empty_line(true);
        let rows: Vec<Row> = assembler("\na\n   \n\nb\n\n", dialect)
            .collect::<CsvResult<_>>()
            .unwrap();
        assert_eq!(rows, vec![strings(&["a"]), strings(&["b"])]);
    }

    #[test]
    fn test_blank_line_inside_quotes_is_content() {
        let dialect = Dialect::csv().with_skip_empty_line(true);
        let rows: Vec<Row> = assembler("\"a\n\n\nb\"\n", dialect)
            .collect::<CsvResult<_>>()
            .unwrap();
        assert_eq!(rows, vec![strings(&["a\n\n\nb"])]);
    }

    #[test]
    fn test_release_once_on_clean_end() {
        let (source, releases) = scripted(vec!["a\n", "b\n"]);
        let mut rows = RowAssembler::new(source, &CsvReaderConfig::default());
        while rows.next_row().unwrap().is_some() {}
        assert_eq!(releases.get(), 1);
        drop(rows);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_release_once_on_failure() {
        let (source, releases) = scripted(vec!["\"open\n"]);
        let mut rows = RowAssembler::new(source, &CsvReaderConfig::default());
        assert!(rows.next_row().is_err());
        assert_eq!(releases.get(), 1);
        drop(rows);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_release_on_early_drop() {
        let (source, releases) = scripted(vec!["a\n", "b\n", "c\n"]);
        let mut rows = RowAssembler::new(source, &CsvReaderConfig::default());
        assert!(rows.next_row().unwrap().is_some());
        assert_eq!(releases.get(), 0);
        drop(rows);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_close_ends_pass() {
        let (source, releases) = scripted(vec!["a\n", "b\n"]);
        let mut rows = RowAssembler::new(source, &CsvReaderConfig::default());
        rows.close();
        assert_eq!(releases.get(), 1);
        assert_eq!(rows.next_row().unwrap(), None);
    }
}
