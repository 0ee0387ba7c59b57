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

//! Tabula: Line-driven CSV Reader
//!
//! This crate reads delimited text (CSV, TSV and similar dialects) into rows
//! of string fields. Input is consumed one physical line at a time; a quoted
//! field that spans several lines is reassembled into a single field that
//! keeps its embedded line terminators.
//!
//! # Features
//!
//! - **Multi-line fields**: Quoted fields may contain delimiters and newlines
//! - **Configurable dialect**: Quote, delimiter and escape characters, blank-line skipping
//! - **Lazy or materialized**: Iterate rows one by one or collect them all
//! - **Header-keyed rows**: Records addressed by column name, in header order
//! - **Strict consistency**: Every row must have the same field count;
//!   duplicated header names are rejected
//! - **Async Support**: Non-blocking I/O with tokio (feature `async`)
//!
//! # Pipeline
//!
//! ```text
//! LineSource ──lines──▶ RowAssembler ──(buffer)──▶ RowParser
//!                            │
//!                          rows
//!                            ▼
//!                   CsvReader views (rows, records, callback)
//! ```
//!
//! # Examples
//!
//! ## Plain rows
//!
//! ```rust
//! use tabula::{CsvReader, CsvReaderConfig};
//!
//! let input = "a,\"b,c\",d\n\"start\nend\",x,y\n";
//! let rows = CsvReader::from_text(input, CsvReaderConfig::default())
//!     .unwrap()
//!     .read_all()
//!     .unwrap();
//!
//! assert_eq!(rows[0], vec!["a", "b,c", "d"]);
//! assert_eq!(rows[1][0], "start\nend");
//! ```
//!
//! ## Custom dialect
//!
//! ```rust
//! use tabula::{CsvReader, CsvReaderConfig, Dialect};
//!
//! let dialect = Dialect::csv()
//!     .with_delimiter(';')
//!     .with_escape('\\')
//!     .with_skip_empty_line(true);
//! let config = CsvReaderConfig::with_dialect(dialect);
//!
//! let rows = CsvReader::from_text("\"say \\\"hi\\\"\";2\n\n", config)
//!     .unwrap()
//!     .read_all()
//!     .unwrap();
//! assert_eq!(rows, vec![vec!["say \"hi\"", "2"]]);
//! ```
//!
//! ## Streaming from a file
//!
//! ```rust,no_run
//! use tabula::{CsvReader, CsvReaderConfig};
//!
//! let reader = CsvReader::from_path("large.csv", CsvReaderConfig::default()).unwrap();
//!
//! for row in reader.read_all_as_sequence() {
//!     match row {
//!         Ok(fields) => println!("{}", fields.join(" | ")),
//!         Err(e) => {
//!             eprintln!("Error: {}", e);
//!             break;
//!         }
//!     }
//! }
//! ```

mod assembler;
mod dialect;
mod error;
mod grammar;
mod header;
mod reader;
mod source;

#[cfg(feature = "async")]
mod async_reader;

pub use assembler::{RowAssembler, RowBuffer};
pub use dialect::Dialect;
pub use error::{CsvError, CsvResult};
pub use grammar::{ParsedRow, Row, RowParser};
pub use header::{Header, Record};
pub use reader::{CsvReader, CsvReaderConfig, Records, Rows};
pub use source::{LineSource, ReaderSource};

#[cfg(feature = "async")]
pub use async_reader::{AsyncCsvReader, AsyncReaderSource};
