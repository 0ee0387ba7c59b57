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

//! Reader throughput benchmarks.
//!
//! - Row grammar on single-line and multi-line buffers
//! - Full reads in plain and header-keyed modes across table sizes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tabula::{CsvReader, CsvReaderConfig, Dialect, RowParser};
use tabula_test::generate_table;

fn bench_grammar(c: &mut Criterion) {
    let parser = RowParser::new(&Dialect::csv());
    let mut group = c.benchmark_group("grammar");

    let plain = "alpha,beta,gamma,delta,epsilon,zeta\n";
    group.bench_function("plain_row", |b| {
        b.iter(|| parser.parse_row(black_box(plain), 1))
    });

    let quoted = "1,\"quoted, with comma\",\"say \"\"hi\"\"\",\"two\nlines\"\n";
    group.bench_function("quoted_row", |b| {
        b.iter(|| parser.parse_row(black_box(quoted), 2))
    });

    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");

    for rows in [100usize, 1_000, 10_000] {
        let table = generate_table(rows, 8);
        group.throughput(Throughput::Bytes(table.len() as u64));

        group.bench_with_input(BenchmarkId::new("read_all", rows), &table, |b, table| {
            b.iter(|| {
                CsvReader::from_text(black_box(table), CsvReaderConfig::default())
                    .and_then(|reader| reader.read_all())
                    .map(|rows| rows.len())
            })
        });

        group.bench_with_input(
            BenchmarkId::new("read_all_with_header", rows),
            &table,
            |b, table| {
                b.iter(|| {
                    CsvReader::from_text(black_box(table), CsvReaderConfig::default())
                        .and_then(|reader| reader.read_all_with_header())
                        .map(|records| records.len())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_grammar, bench_read);
criterion_main!(benches);
