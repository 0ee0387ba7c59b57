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

//! Error types for CSV reading.
//!
//! Every error is terminal for the read pass that produced it: rows yielded
//! before the failure stay valid, but the pass cannot be resumed. To recover
//! the remaining data, open a fresh reader over the same input.
//!
//! # Error Categories
//!
//! - **I/O Errors**: Problems reading the underlying line source
//! - **Encoding Errors**: A physical line that is not valid UTF-8
//! - **Malformed Input**: Unterminated quoted fields, duplicated headers,
//!   header/row width disagreement, oversized rows
//! - **Field Count Mismatch**: A row whose width differs from the first row
//! - **Unknown Column**: A header lookup by a name the header does not contain
//!
//! # Examples
//!
//! ```rust
//! use tabula::{CsvError, CsvReader, CsvReaderConfig};
//!
//! let reader = CsvReader::from_text("a,b\nc,d,e\n", CsvReaderConfig::default()).unwrap();
//!
//! match reader.read_all() {
//!     Err(CsvError::FieldCountMismatch { expected, actual, row }) => {
//!         assert_eq!((expected, actual, row), (2, 3, 2));
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur while reading CSV data.
///
/// Use [`line()`](Self::line) to get the physical line number uniformly for
/// the variants that carry one.
#[derive(Error, Debug)]
pub enum CsvError {
    /// IO error from the underlying reader.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 encoding in a physical line.
    #[error("Invalid UTF-8 at line {line}: {message}")]
    Utf8 { line: usize, message: String },

    /// Input that cannot form a valid table.
    #[error("Malformed CSV at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// A row's field count differs from the first row's.
    ///
    /// `row` is the 1-based logical row index, not a physical line number.
    #[error("Field count mismatch at row {row}: expected {expected} fields, got {actual}")]
    FieldCountMismatch {
        expected: usize,
        actual: usize,
        row: usize,
    },

    /// Header lookup by a name the header row does not contain.
    #[error("Unknown column: '{0}'")]
    UnknownColumn(String),

    /// Dialect characters that cannot be parsed unambiguously.
    #[error("Invalid dialect: {0}")]
    InvalidDialect(String),
}

impl CsvError {
    /// Create a malformed input error.
    #[inline]
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Get the line number if available.
    #[inline]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Utf8 { line, .. } | Self::Malformed { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Whether this error reports malformed input.
    #[inline]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Result type for CSV reading operations.
pub type CsvResult<T> = Result<T, CsvError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_display() {
        let err = CsvError::from(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_utf8_error() {
        let err = CsvError::Utf8 {
            line: 7,
            message: "invalid byte sequence".to_string(),
        };
        assert_eq!(err.line(), Some(7));
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn test_malformed_constructor() {
        let err = CsvError::malformed(3, "header 'id' is duplicated");
        assert!(err.is_malformed());
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.to_string(),
            "Malformed CSV at line 3: header 'id' is duplicated"
        );
    }

    #[test]
    fn test_field_count_mismatch_display() {
        let err = CsvError::FieldCountMismatch {
            expected: 2,
            actual: 3,
            row: 2,
        };
        let display = err.to_string();
        assert!(display.contains('2'));
        assert!(display.contains('3'));
        assert_eq!(err.line(), None);
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_unknown_column_display() {
        let err = CsvError::UnknownColumn("email".to_string());
        assert_eq!(err.to_string(), "Unknown column: 'email'");
    }

    #[test]
    fn test_invalid_dialect_display() {
        let err = CsvError::InvalidDialect("delimiter equals quote".to_string());
        assert!(err.to_string().starts_with("Invalid dialect"));
    }
}
