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

//! Sample inputs shared by the integration tests and benchmarks.

/// Three rows, no quoting.
pub const SIMPLE: &str = "id,name,city\n1,Ada,London\n2,Grace,Arlington\n";

/// Quoted fields containing delimiters and doubled quotes.
pub const QUOTED: &str = "id,comment\n1,\"Hello, world\"\n2,\"She said \"\"hi\"\"\"\n";

/// Quoted fields spanning several physical lines, including a blank one.
pub const MULTILINE: &str =
    "id,address\n1,\"221B Baker Street\nLondon\"\n2,\"line one\n\nline three\"\n3,plain\n";

/// Windows line endings throughout, including inside a quoted field.
pub const CRLF: &str = "a,b\r\n\"x\r\ny\",z\r\n";

/// Backslash-escaped quotes; read with escape `\`.
pub const BACKSLASH_ESCAPED: &str = "id,quote\n1,\"a \\\"quoted\\\" word\"\n";

/// Semicolon-delimited with blank separator lines; read with `;` and
/// blank-line skipping.
pub const SEMICOLON_WITH_BLANKS: &str = "\nname;qty\n\napple;3\n   \npear;4\n\n";

/// Tab-separated.
pub const TSV: &str = "name\tnote\nx\t\"a\tb\"\n";

/// Malformed inputs for the default dialect.
pub mod errors {
    /// Second row is wider than the first.
    pub const WIDER_ROW: &str = "a,b\nc,d,e\n";

    /// Header names repeat.
    pub const DUPLICATE_HEADER: &str = "id,name,id\n1,Ada,2\n";

    /// Quoted field never closed.
    pub const UNTERMINATED_QUOTE: &str = "a,b\n1,\"never closed\n2,3\n";

    /// Data row narrower than the header.
    pub const SHORT_RECORD: &str = "a,b,c\n1,2\n";

    /// `(name, input)` pairs that fail in every plain read mode.
    pub fn malformed_samples() -> Vec<(&'static str, &'static str)> {
        vec![
            ("wider_row", WIDER_ROW),
            ("unterminated_quote", UNTERMINATED_QUOTE),
            ("unterminated_at_eof", "\"open"),
            ("narrower_row", "a,b,c\n1\n"),
        ]
    }
}
