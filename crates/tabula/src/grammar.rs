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

//! Row grammar: splitting one logical-row buffer into fields.
//!
//! The parser makes a single left-to-right pass and never reads input on its
//! own. When the buffer ends inside a quoted field it answers
//! [`ParsedRow::Incomplete`]; the caller appends the next physical line and
//! asks again.
//!
//! Quoting rules, for quote `"` and delimiter `,`:
//!
//! - A field starting with the quote char is quoted; delimiters and line
//!   terminators inside it are field content.
//! - Inside a quoted field `""` stands for one literal quote.
//! - When escape differs from quote, escape followed by quote or escape
//!   yields that char alone; escape followed by anything else is kept as-is.
//!   Outside quotes the escape char is ordinary.
//! - A quote inside an unquoted field is ordinary.
//! - Text between a closing quote and the next delimiter is appended to the
//!   field verbatim.
//! - The first line terminator outside quotes ends the row and is dropped.

use crate::dialect::{is_line_terminator, Dialect};
use tracing::trace;

/// One logical row: ordered field values.
pub type Row = Vec<String>;

/// Outcome of a parse attempt on an accumulated buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRow {
    /// The buffer holds one complete row.
    Complete(Row),
    /// The buffer ends inside a quoted field and needs another physical line.
    Incomplete,
}

impl ParsedRow {
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Get the row if complete.
    pub fn into_row(self) -> Option<Row> {
        match self {
            Self::Complete(row) => Some(row),
            Self::Incomplete => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// Saw a quote inside a quoted field: a closing quote or the first half
    /// of a doubled quote.
    QuoteInQuoted,
    EscapeInQuoted,
    AfterQuoted,
}

/// Dialect-parameterized row parser.
///
/// # Examples
///
/// ```rust
/// use tabula::{Dialect, ParsedRow, RowParser};
///
/// let parser = RowParser::new(&Dialect::csv());
///
/// assert_eq!(
///     parser.parse_row("a,\"b,c\",d\n", 1),
///     ParsedRow::Complete(vec!["a".into(), "b,c".into(), "d".into()])
/// );
/// assert_eq!(parser.parse_row("\"start\n", 1), ParsedRow::Incomplete);
/// assert_eq!(
///     parser.parse_row("\"start\nend\"\n", 2),
///     ParsedRow::Complete(vec!["start\nend".into()])
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RowParser {
    quote: char,
    delimiter: char,
    escape: char,
}

impl RowParser {
    pub fn new(dialect: &Dialect) -> Self {
        Self {
            quote: dialect.quote,
            delimiter: dialect.delimiter,
            escape: dialect.escape,
        }
    }

    /// Try to split `buffer` into one row.
    ///
    /// `line` is the physical line number of the last line in the buffer and
    /// is only used for diagnostics.
    pub fn parse_row(&self, buffer: &str, line: usize) -> ParsedRow {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut state = State::FieldStart;
        let separate_escape = self.escape != self.quote;

        for ch in buffer.chars() {
            match state {
                State::FieldStart => {
                    if ch == self.quote {
                        state = State::Quoted;
                    } else if ch == self.delimiter {
                        fields.push(std::mem::take(&mut field));
                    } else if is_line_terminator(ch) {
                        break;
                    } else {
                        field.push(ch);
                        state = State::Unquoted;
                    }
                }
                State::Unquoted | State::AfterQuoted => {
                    if ch == self.delimiter {
                        fields.push(std::mem::take(&mut field));
                        state = State::FieldStart;
                    } else if is_line_terminator(ch) {
                        break;
                    } else {
                        field.push(ch);
                    }
                }
                State::Quoted => {
                    if separate_escape && ch == self.escape {
                        state = State::EscapeInQuoted;
                    } else if ch == self.quote {
                        state = State::QuoteInQuoted;
                    } else {
                        field.push(ch);
                    }
                }
                State::QuoteInQuoted => {
                    if ch == self.quote {
                        field.push(ch);
                        state = State::Quoted;
                    } else if ch == self.delimiter {
                        fields.push(std::mem::take(&mut field));
                        state = State::FieldStart;
                    } else if is_line_terminator(ch) {
                        break;
                    } else {
                        field.push(ch);
                        state = State::AfterQuoted;
                    }
                }
                State::EscapeInQuoted => {
                    if ch != self.quote && ch != self.escape {
                        field.push(self.escape);
                    }
                    field.push(ch);
                    state = State::Quoted;
                }
            }
        }

        if matches!(state, State::Quoted | State::EscapeInQuoted) {
            trace!(line, "quoted field still open at end of buffer");
            return ParsedRow::Incomplete;
        }

        fields.push(field);
        ParsedRow::Complete(fields)
    }
}
