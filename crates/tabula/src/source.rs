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

//! Physical line sources.
//!
//! A [`LineSource`] hands out one physical line at a time, terminator
//! included. Terminators matter: inside a quoted field they are part of the
//! field value, so the row assembler needs them verbatim.
//!
//! [`ReaderSource`] is the standard implementation over any [`Read`]. It
//! recognises `\n`, `\r\n` and a bare `\r` as terminators.

use crate::error::{CsvError, CsvResult};
use std::io::{self, BufRead, BufReader, Read};
use tracing::trace;

/// Provider of physical lines.
pub trait LineSource {
    /// Read the next physical line including its terminator.
    ///
    /// Returns `None` once the input is exhausted. The final line of the
    /// input may come without a terminator.
    fn next_line(&mut self) -> CsvResult<Option<String>>;

    /// Release the underlying resource.
    ///
    /// Must be idempotent. After release, `next_line` returns `None`.
    fn release(&mut self);
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> CsvResult<Option<String>> {
        (**self).next_line()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> CsvResult<Option<String>> {
        (**self).next_line()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Buffered line source over any reader.
///
/// # Examples
///
/// ```rust
/// use tabula::{LineSource, ReaderSource};
///
/// let mut source = ReaderSource::new("a,b\r\nc,d\re,f".as_bytes());
///
/// assert_eq!(source.next_line().unwrap(), Some("a,b\r\n".to_string()));
/// assert_eq!(source.next_line().unwrap(), Some("c,d\r".to_string()));
/// assert_eq!(source.next_line().unwrap(), Some("e,f".to_string()));
/// assert_eq!(source.next_line().unwrap(), None);
/// ```
pub struct ReaderSource<R: Read> {
    reader: Option<BufReader<R>>,
    line_number: usize,
    bytes: Vec<u8>,
}

impl<R: Read> ReaderSource<R> {
    /// Create a new line source.
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(BufReader::new(reader)),
            line_number: 0,
            bytes: Vec::new(),
        }
    }

    /// Create with a specific buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: Some(BufReader::with_capacity(capacity, reader)),
            line_number: 0,
            bytes: Vec::new(),
        }
    }

    /// Number of physical lines read so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Whether the underlying reader has been released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.reader.is_none()
    }
}

impl<R: Read> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> CsvResult<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        self.bytes.clear();
        loop {
            let available = match reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CsvError::Io(e)),
            };
            if available.is_empty() {
                break; // EOF
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

    fn release(&mut self) {
        if self.reader.take().is_some() {
            trace!(lines = self.line_number, "line source released");
        }
    }
}

/// Append the next piece of a physical line from `available` to `line`.
///
/// Returns how many bytes were used and whether the line is now complete.
/// A `\r` already at the end of `line` is a terminator whose optional `\n`
/// may arrive in the next buffer fill.
pub(crate) fn take_segment(line: &mut Vec<u8>, available: &[u8]) -> (usize, bool) {
    if line.last() == Some(&b'\r') {
        return if available.first() == Some(&b'\n') {
            line.push(b'\n');
            (1, true)
        } else {
            (0, true)
        };
    }

    match available.iter().position(|&b| b == b'\n' || b == b'\r') {
        Some(pos) => {
            line.extend_from_slice(&available[..=pos]);
            (pos + 1, available[pos] == b'\n')
        }
        None => {
            line.extend_from_slice(available);
            (available.len(), false)
        }
    }
}

pub(crate) fn decode_line(bytes: Vec<u8>, line: usize) -> CsvResult<String> {
    String::from_utf8(bytes).map_err(|e| CsvError::Utf8 {
        line,
        message: e.utf8_error().to_string(),
    })
}
