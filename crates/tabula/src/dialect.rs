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

//! Dialect configuration: which characters quote, delimit, and escape.

use crate::error::{CsvError, CsvResult};
use serde::{Deserialize, Serialize};

/// Characters and flags that govern how text is split into fields.
///
/// A dialect is immutable once handed to a reader. `escape` may equal
/// `quote`, which gives the usual RFC-4180 behaviour where a doubled quote
/// inside a quoted field stands for one literal quote.
///
/// # Examples
///
/// ```rust
/// use tabula::Dialect;
///
/// let dialect = Dialect::tsv().with_escape('\\').with_skip_empty_line(true);
/// assert_eq!(dialect.delimiter, '\t');
/// assert!(dialect.validate().is_ok());
///
/// let broken = Dialect::csv().with_delimiter('"');
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Character that opens and closes a quoted field.
    ///
    /// Default: `"`
    pub quote: char,

    /// Character separating fields outside quotes.
    ///
    /// Default: `,`
    pub delimiter: char,

    /// Character that neutralizes a following quote inside a quoted field.
    ///
    /// Default: `"` (same as quote)
    pub escape: char,

    /// Skip whitespace-only lines that appear between rows.
    ///
    /// A blank line inside an open quoted field is always field content.
    ///
    /// Default: false
    pub skip_empty_line: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            quote: '"',
            delimiter: ',',
            escape: '"',
            skip_empty_line: false,
        }
    }
}

impl Dialect {
    /// Comma-separated values with double quotes.
    pub fn csv() -> Self {
        Self::default()
    }

    /// Tab-separated values with double quotes.
    pub fn tsv() -> Self {
        Self {
            delimiter: '\t',
            ..Self::default()
        }
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    pub fn with_skip_empty_line(mut self, skip: bool) -> Self {
        self.skip_empty_line = skip;
        self
    }

    /// Check that the dialect characters can be told apart.
    pub fn validate(&self) -> CsvResult<()> {
        for (name, ch) in [
            ("quote", self.quote),
            ("delimiter", self.delimiter),
            ("escape", self.escape),
        ] {
            if is_line_terminator(ch) {
                return Err(CsvError::InvalidDialect(format!(
                    "{} character must not be a line terminator",
                    name
                )));
            }
        }
        if self.delimiter == self.quote {
            return Err(CsvError::InvalidDialect(format!(
                "delimiter and quote are both {:?}",
                self.delimiter
            )));
        }
        if self.delimiter == self.escape {
            return Err(CsvError::InvalidDialect(format!(
                "delimiter and escape are both {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn is_line_terminator(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}
