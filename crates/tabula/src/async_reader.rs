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

//! Async CSV reading with tokio.
//!
//! Mirrors the synchronous [`CsvReader`](crate::CsvReader) over tokio's
//! async I/O. Only line reading awaits; row assembly and the grammar are the
//! same code the synchronous reader uses, so both produce identical rows.
//!
//! # Examples
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use tabula::{AsyncCsvReader, CsvReaderConfig};
//!
//! let mut reader = AsyncCsvReader::from_path("data.csv", CsvReaderConfig::default()).await?;
//!
//! while let Some(row) = reader.next_row().await? {
//!     println!("{:?}", row);
//! }
//! # Ok(())
//! # }
//! ```

use crate::assembler::RowBuffer;
use crate::error::{CsvError, CsvResult};
use crate::grammar::Row;
use crate::header::Record;
use crate::reader::{check_record_width, checked_header, CsvReaderConfig, WidthCheck};
use crate::source::{decode_line, take_segment};
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, trace};

/// Async physical line source; same terminator rules as
/// [`ReaderSource`](crate::ReaderSource).
pub struct AsyncReaderSource<R: AsyncRead + Unpin> {
    reader: Option<BufReader<R>>,
    line_number: usize,
    bytes: Vec<u8>,
}

impl<R: AsyncRead + Unpin> AsyncReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, 8 * 1024)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: Some(BufReader::with_capacity(capacity, reader)),
            line_number: 0,
            bytes: Vec::new(),
        }
    }

    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next physical line including its terminator.
    pub async fn next_line(&mut self) -> CsvResult<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        self.bytes.clear();
        loop {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                break;
            }
            let (used, complete) = take_segment(&mut self.bytes, available);
            reader.consume(used);
            if complete {
                break;
            }
        }

        if self.bytes.is_empty() {
            return Ok(None);
        }
        self.line_number += 1;
        decode_line(std::mem::take(&mut self.bytes), self.line_number).map(Some)
    }

    /// Drop the underlying reader. Idempotent.
    pub fn release(&mut self) {
        if self.reader.take().is_some() {
            trace!(lines = self.line_number, "async line source released");
        }
    }
}

/// Async CSV reader.
pub struct AsyncCsvReader<R: AsyncRead + Unpin> {
    source: AsyncReaderSource<R>,
    buffer: RowBuffer,
    finished: bool,
}

impl<R: AsyncRead + Unpin> AsyncCsvReader<R> {
    pub fn new(reader: R, config: CsvReaderConfig) -> CsvResult<Self> {
        config.dialect.validate()?;
        Ok(Self {
            source: AsyncReaderSource::with_capacity(reader, config.buffer_size),
            buffer: RowBuffer::new(&config.dialect, config.max_row_length),
            finished: false,
        })
    }

    /// Number of physical lines consumed so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.source.line_number()
    }

    /// Read the next logical row, without width checks.
    ///
    /// Returns `Ok(None)` at the end of input and after any error.
    pub async fn next_row(&mut self) -> CsvResult<Option<Row>> {
        if self.finished {
            return Ok(None);
        }
        match self.pull_row().await {
            Ok(Some(row)) => Ok(Some(row)),
            other => {
                self.finished = true;
                self.source.release();
                other
            }
        }
    }

    /// Read every row, requiring the width of the first row throughout.
    pub async fn read_all(mut self) -> CsvResult<Vec<Row>> {
        let mut width = WidthCheck::default();
        let mut rows = Vec::new();
        while let Some(row) = self.next_row().await? {
            width.check(&row)?;
            rows.push(row);
        }
        Ok(rows)
    }

    /// Read every data row keyed by the header row.
    pub async fn read_all_with_header(mut self) -> CsvResult<Vec<Record>> {
        let Some(names) = self.next_row().await? else {
            return Ok(Vec::new());
        };
        let header = Arc::new(checked_header(names, self.line_number())?);

        let mut records = Vec::new();
        while let Some(row) = self.next_row().await? {
            check_record_width(&header, &row, self.line_number())?;
            records.push(Record::new(Arc::clone(&header), row));
        }
        Ok(records)
    }

    async fn pull_row(&mut self) -> CsvResult<Option<Row>> {
        loop {
            let Some(line) = self.source.next_line().await? else {
                debug!(lines = self.source.line_number(), "end of input");
                self.buffer.finish()?;
                return Ok(None);
            };
            let line_number = self.source.line_number();
            if let Some(row) = self.buffer.push_line(&line, line_number)? {
                return Ok(Some(row));
            }
        }
    }
}

impl AsyncCsvReader<File> {
    /// Open a file with tokio.
    pub async fn from_path(path: impl AsRef<Path>, config: CsvReaderConfig) -> CsvResult<Self> {
        let file = File::open(path).await.map_err(CsvError::Io)?;
        Self::new(file, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[tokio::test]
    async fn test_async_lines_keep_terminators() {
        let mut source = AsyncReaderSource::with_capacity("a\r\nb\rc".as_bytes(), 1);
        assert_eq!(source.next_line().await.unwrap(), Some("a\r\n".to_string()));
        assert_eq!(source.next_line().await.unwrap(), Some("b\r".to_string()));
        assert_eq!(source.next_line().await.unwrap(), Some("c".to_string()));
        assert_eq!(source.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_async_multiline_rows() {
        let input = "a,\"b\nc\"\nd,e\n";
        let reader = AsyncCsvReader::new(input.as_bytes(), CsvReaderConfig::default()).unwrap();
        let rows = reader.read_all().await.unwrap();
        assert_eq!(rows, vec![strings(&["a", "b\nc"]), strings(&["d", "e"])]);
    }

    #[tokio::test]
    async fn test_async_unterminated_quote() {
        let mut reader =
            AsyncCsvReader::new("\"open\n".as_bytes(), CsvReaderConfig::default()).unwrap();
        assert!(reader.next_row().await.unwrap_err().is_malformed());
        assert_eq!(reader.next_row().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_async_header_records() {
        let input = "id,name\n1,Ada\n";
        let reader = AsyncCsvReader::new(input.as_bytes(), CsvReaderConfig::default()).unwrap();
        let records = reader.read_all_with_header().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some("Ada"));
    }

    #[tokio::test]
    async fn test_async_later_record_width_is_malformed() {
        let input = "a,b\n1,2\n3,4,5\n";
        let reader = AsyncCsvReader::new(input.as_bytes(), CsvReaderConfig::default()).unwrap();
        let err = reader.read_all_with_header().await.unwrap_err();
        match err {
            CsvError::Malformed { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("3 fields"));
                assert!(message.contains("header has 2"));
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }
}
