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

//! Header context and header-keyed records.

use crate::error::{CsvError, CsvResult};
use crate::grammar::Row;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Column names taken from the first row, with name to position lookup.
///
/// Lookups are exact and case-sensitive. If a name occurs more than once
/// (only possible in the callback read mode, which does not reject
/// duplicates), lookups resolve to its first position.
///
/// # Examples
///
/// ```rust
/// use tabula::Header;
///
/// let header = Header::new(vec!["id".into(), "name".into()]);
/// let row = vec!["7".to_string(), "Ada".to_string()];
///
/// assert_eq!(header.index_of("name").unwrap(), 1);
/// assert_eq!(header.get(&row, "id").unwrap(), "7");
/// assert!(header.index_of("email").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    pub fn new(names: Row) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(idx);
        }
        Self { names, positions }
    }

    /// Column names in header order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Position of the column called `name`.
    pub fn index_of(&self, name: &str) -> CsvResult<usize> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| CsvError::UnknownColumn(name.to_string()))
    }

    /// Value of column `name` in `row`.
    ///
    /// Fails with `UnknownColumn` when the header lacks `name`, and with
    /// `Malformed` (line 0, no physical line known) when `row` is too short
    /// to hold the column.
    pub fn get<'r>(&self, row: &'r [String], name: &str) -> CsvResult<&'r str> {
        let idx = self.index_of(name)?;
        row.get(idx).map(String::as_str).ok_or_else(|| {
            CsvError::malformed(
                0,
                format!(
                    "column '{}' is at position {} but the row has {} fields",
                    name,
                    idx + 1,
                    row.len()
                ),
            )
        })
    }

    /// First name that repeats an earlier one, in header order.
    pub fn find_duplicate(&self) -> Option<&str> {
        find_duplicate(&self.names)
    }
}

pub(crate) fn find_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = std::collections::HashSet::with_capacity(names.len());
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}

/// One data row keyed by header names, iterated in header order.
///
/// Records from the same read share one [`Header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    header: Arc<Header>,
    values: Row,
}

impl Record {
    pub(crate) fn new(header: Arc<Header>, values: Row) -> Self {
        debug_assert_eq!(header.len(), values.len());
        Self { header, values }
    }

    /// Value for column `name`, if the header has it.
    pub fn get(&self, name: &str) -> Option<&str> {
        let idx = self.header.index_of(name).ok()?;
        self.values.get(idx).map(String::as_str)
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Field values in header order.
    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(name, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn into_values(self) -> Row {
        self.values
    }

    /// Owned `(name, value)` pairs in header order.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.header.names().iter().cloned().zip(self.values).collect()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
