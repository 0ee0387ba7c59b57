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

//! Tabular views over the row stream.
//!
//! A [`CsvReader`] owns one read pass. Each read mode consumes the reader, so
//! a second mode needs a freshly opened reader over the input.
//!
//! - [`read_all`](CsvReader::read_all): every row, materialized
//! - [`read_all_as_sequence`](CsvReader::read_all_as_sequence): lazy rows
//! - [`read_all_with_header`](CsvReader::read_all_with_header): header-keyed records
//! - [`records`](CsvReader::records): lazy header-keyed records
//! - [`read_all_with_header_from_sequence`](CsvReader::read_all_with_header_from_sequence):
//!   callback per data row with a shared [`Header`] context
//!
//! Plain modes require every row to have the width of the first row. Header
//! modes reject duplicated header names before any data row is read.

use crate::assembler::RowAssembler;
use crate::dialect::Dialect;
use crate::error::{CsvError, CsvResult};
use crate::grammar::Row;
use crate::header::{find_duplicate, Header, Record};
use crate::source::{LineSource, ReaderSource};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Configuration for a CSV reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvReaderConfig {
    /// Quote, delimiter, escape and blank-line handling.
    pub dialect: Dialect,

    /// Buffer size for reading input.
    ///
    /// Default: 64KB
    pub buffer_size: usize,

    /// Maximum size in bytes of one logical row, terminators included.
    ///
    /// An unclosed quote makes every following line part of the same row;
    /// this limit turns that into an error instead of unbounded buffering.
    ///
    /// A pending row is re-parsed from its start on every appended line, so
    /// a row of `n` lines costs O(n^2) work. This bounds memory, not time;
    /// lower it for untrusted input with long quoted fields.
    ///
    /// Default: 16MB
    pub max_row_length: usize,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            buffer_size: 64 * 1024,
            max_row_length: 16 * 1024 * 1024,
        }
    }
}

impl CsvReaderConfig {
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }
}

/// Reader of one CSV input.
///
/// # Examples
///
/// ```rust
/// use tabula::{CsvReader, CsvReaderConfig};
///
/// let input = "id,name\n1,\"Smith, Jane\"\n2,\"multi\nline\"\n";
///
/// let rows = CsvReader::from_text(input, CsvReaderConfig::default())
///     .unwrap()
///     .read_all()
///     .unwrap();
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[2][1], "multi\nline");
///
/// let records = CsvReader::from_text(input, CsvReaderConfig::default())
///     .unwrap()
///     .read_all_with_header()
///     .unwrap();
/// assert_eq!(records[0].get("name"), Some("Smith, Jane"));
/// ```
pub struct CsvReader<S: LineSource> {
    rows: RowAssembler<S>,
}

impl<S: LineSource> CsvReader<S> {
    /// Create a reader over any line source.
    pub fn new(source: S, config: CsvReaderConfig) -> CsvResult<Self> {
        config.dialect.validate()?;
        Ok(Self {
            rows: RowAssembler::new(source, &config),
        })
    }

    /// Number of physical lines consumed so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.rows.line_number()
    }

    /// Read every row.
    pub fn read_all(self) -> CsvResult<Vec<Row>> {
        self.read_all_as_sequence().collect()
    }

    /// Lazy row sequence; fails at the first row whose width differs from
    /// the first row's.
    pub fn read_all_as_sequence(self) -> Rows<S> {
        Rows {
            rows: self.rows,
            width: WidthCheck::default(),
            done: false,
        }
    }

    /// Read every data row keyed by the header row.
    ///
    /// Empty input yields no records.
    pub fn read_all_with_header(self) -> CsvResult<Vec<Record>> {
        match self.records()? {
            Some(records) => records.collect(),
            None => Ok(Vec::new()),
        }
    }

    /// Lazy header-keyed records.
    ///
    /// The header is read and checked for duplicates immediately. Returns
    /// `None` for empty input.
    pub fn records(mut self) -> CsvResult<Option<Records<S>>> {
        let Some(names) = self.rows.next_row()? else {
            return Ok(None);
        };
        let header = checked_header(names, self.rows.line_number())?;
        Ok(Some(Records {
            header: Arc::new(header),
            rows: self.read_all_as_sequence(),
        }))
    }

    /// Stream rows to `body`, with the first row as the header context.
    ///
    /// `body` receives the logical row index (1 for the first data row), the
    /// header, and the row. Row widths are checked as in
    /// [`read_all_as_sequence`](Self::read_all_as_sequence); header names are
    /// not checked for duplicates. An error from `body` ends the pass.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tabula::{CsvReader, CsvReaderConfig};
    ///
    /// let mut total = 0;
    /// CsvReader::from_text("item,qty\napple,3\npear,4\n", CsvReaderConfig::default())
    ///     .unwrap()
    ///     .read_all_with_header_from_sequence(|_index, header, row| {
    ///         let qty = header.get(&row, "qty")?;
    ///         total += qty.parse::<u32>().unwrap_or(0);
    ///         Ok(())
    ///     })
    ///     .unwrap();
    /// assert_eq!(total, 7);
    /// ```
    pub fn read_all_with_header_from_sequence<F>(self, mut body: F) -> CsvResult<()>
    where
        F: FnMut(usize, &Header, Row) -> CsvResult<()>,
    {
        let mut header = Header::default();
        for (index, row) in self.read_all_as_sequence().enumerate() {
            let row = row?;
            if index == 0 {
                header = Header::new(row);
            } else {
                body(index, &header, row)?;
            }
        }
        Ok(())
    }
}

impl<R: Read> CsvReader<ReaderSource<R>> {
    /// Create a reader over any byte reader.
    pub fn from_reader(reader: R, config: CsvReaderConfig) -> CsvResult<Self> {
        let source = ReaderSource::with_capacity(reader, config.buffer_size);
        Self::new(source, config)
    }
}

impl CsvReader<ReaderSource<File>> {
    /// Open a file; it is closed when the pass ends or the reader is dropped.
    pub fn from_path(path: impl AsRef<Path>, config: CsvReaderConfig) -> CsvResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, config)
    }
}

impl<'a> CsvReader<ReaderSource<&'a [u8]>> {
    /// Create a reader over in-memory text.
    pub fn from_text(text: &'a str, config: CsvReaderConfig) -> CsvResult<Self> {
        Self::from_reader(text.as_bytes(), config)
    }
}

pub(crate) fn checked_header(names: Row, line: usize) -> CsvResult<Header> {
    if let Some(duplicate) = find_duplicate(&names) {
        return Err(CsvError::malformed(
            line,
            format!("header '{}' is duplicated", duplicate),
        ));
    }
    debug!(columns = names.len(), "header accepted");
    Ok(Header::new(names))
}

pub(crate) fn check_record_width(header: &Header, row: &Row, line: usize) -> CsvResult<()> {
    if row.len() != header.len() {
        return Err(CsvError::malformed(
            line,
            format!(
                "row has {} fields but the header has {}",
                row.len(),
                header.len()
            ),
        ));
    }
    Ok(())
}

/// Field-count consistency across a row sequence.
#[derive(Debug, Default)]
pub(crate) struct WidthCheck {
    expected: Option<usize>,
    index: usize,
}

impl WidthCheck {
    pub(crate) fn check(&mut self, row: &Row) -> CsvResult<()> {
        self.index += 1;
        let expected = *self.expected.get_or_insert(row.len());
        if row.len() != expected {
            return Err(CsvError::FieldCountMismatch {
                expected,
                actual: row.len(),
                row: self.index,
            });
        }
        Ok(())
    }
}

/// Lazy, width-checked row sequence.
pub struct Rows<S: LineSource> {
    rows: RowAssembler<S>,
    width: WidthCheck,
    done: bool,
}

impl<S: LineSource> Rows<S> {
    /// Number of physical lines consumed so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.rows.line_number()
    }

    /// End the pass with `err`.
    fn fail(&mut self, err: CsvError) -> CsvError {
        self.done = true;
        self.rows.close();
        err
    }
}

impl<S: LineSource> Iterator for Rows<S> {
    type Item = CsvResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.rows.next_row() {
            Ok(Some(row)) => match self.width.check(&row) {
                Ok(()) => Some(Ok(row)),
                Err(e) => Some(Err(self.fail(e))),
            },
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => Some(Err(self.fail(e))),
        }
    }
}

impl<S: LineSource> FusedIterator for Rows<S> {}

/// Lazy header-keyed records.
pub struct Records<S: LineSource> {
    header: Arc<Header>,
    rows: Rows<S>,
}

impl<S: LineSource> Records<S> {
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }
}

impl<S: LineSource> Iterator for Records<S> {
    type Item = CsvResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rows.done {
            return None;
        }
        // The header width governs every data row here, so the plain
        // first-row width check is bypassed.
        let row = match self.rows.rows.next_row() {
            Ok(Some(row)) => row,
            Ok(None) => {
                self.rows.done = true;
                return None;
            }
            Err(e) => return Some(Err(self.rows.fail(e))),
        };
        if let Err(e) = check_record_width(&self.header, &row, self.rows.line_number()) {
            return Some(Err(self.rows.fail(e)));
        }
        Some(Ok(Record::new(Arc::clone(&self.header), row)))
    }
}

impl<S: LineSource> FusedIterator for Records<S> {}
