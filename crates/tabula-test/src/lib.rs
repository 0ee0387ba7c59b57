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

//! Shared test fixtures and utilities for tabula.
//!
//! # Quick Start
//!
//! ```rust
//! use tabula_test::{fixtures, generate_table, CountingSource};
//!
//! let input = fixtures::MULTILINE;
//! let big = generate_table(100, 5);
//!
//! let (source, releases) = CountingSource::from_text("a\nb\n");
//! assert_eq!(releases.get(), 0);
//! ```

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use tabula::{CsvResult, LineSource};
use tracing_subscriber::{fmt, EnvFilter};

/// Canonical CSV inputs.
pub mod fixtures;

pub use fixtures::errors;

/// Initialize tracing for tests.
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(true)
        .with_test_writer()
        .try_init();
}

/// Line source over prepared lines that counts `release` calls.
///
/// Lines are returned exactly as given, so callers control terminators.
pub struct CountingSource {
    lines: VecDeque<String>,
    releases: Rc<Cell<usize>>,
    released: bool,
}

impl CountingSource {
    pub fn new<I, L>(lines: I) -> (Self, Rc<Cell<usize>>)
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let releases = Rc::new(Cell::new(0));
        let source = Self {
            lines: lines.into_iter().map(Into::into).collect(),
            releases: Rc::clone(&releases),
            released: false,
        };
        (source, releases)
    }

    /// Split `text` after every `\n`, keeping the terminators.
    pub fn from_text(text: &str) -> (Self, Rc<Cell<usize>>) {
        Self::new(text.split_inclusive('\n'))
    }
}

impl LineSource for CountingSource {
    fn next_line(&mut self) -> CsvResult<Option<String>> {
        if self.released {
            return Ok(None);
        }
        Ok(self.lines.pop_front())
    }

    fn release(&mut self) {
        self.released = true;
        self.releases.set(self.releases.get() + 1);
    }
}

/// Build a `rows` x `cols` CSV table with a header row.
///
/// Every third row carries a quoted field with an embedded delimiter and
/// every fifth a quoted field spanning two lines, so the output exercises
/// the multi-line path.
pub fn generate_table(rows: usize, cols: usize) -> String {
    let mut out = String::new();
    let header: Vec<String> = (0..cols).map(|c| format!("col{}", c)).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for r in 0..rows {
        let fields: Vec<String> = (0..cols)
            .map(|c| match (r % 5, r % 3, c) {
                (0, _, 0) => format!("\"row {}\nsecond line\"", r),
                (_, 0, 1) => format!("\"{}, with comma\"", r),
                _ => format!("v{}_{}", r, c),
            })
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field for the default dialect, doubling embedded quotes.
pub fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
