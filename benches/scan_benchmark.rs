//! Benchmarks for configuration scanning and scoring.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mule_assess::scanner::scan_config;
use mule_assess::transform::{measure, TransformAnalyzer};
use std::hint::black_box;

/// A configuration document with `flows` flows of a few components each
fn config_document(flows: usize) -> String {
    let mut doc = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mule xmlns="http://www.mulesoft.org/schema/mule/core"
      xmlns:http="http://www.mulesoft.org/schema/mule/http"
      xmlns:db="http://www.mulesoft.org/schema/mule/db"
      xmlns:ee="http://www.mulesoft.org/schema/mule/ee/core">
"#,
    );
    for i in 0..flows {
        doc.push_str(&format!(
            r#"  <flow name="flow-{i}">
    <http:listener config-ref="api" path="/r{i}"/>
    <db:select config-ref="db"><db:sql>SELECT 1</db:sql></db:select>
    <ee:transform>
      <ee:message>
        <ee:set-payload><![CDATA[%dw 2.0
output application/json
---
payload map (row) -> {{ id: row.id, name: upper(row.name) }}]]></ee:set-payload>
      </ee:message>
    </ee:transform>
    <error-handler><on-error-propagate type="ANY"/></error-handler>
  </flow>
"#
        ));
    }
    doc.push_str("</mule>\n");
    doc
}

fn dataweave_script(lines: usize) -> String {
    let mut script = String::from("%dw 2.0\noutput application/json\n---\n{\n");
    for i in 0..lines {
        script.push_str(&format!(
            "  f{i}: if (payload.a{i} != null) payload.a{i} map ((x) -> x.v) else [],\n"
        ));
    }
    script.push_str("}\n");
    script
}

fn benchmark_scan_config(c: &mut Criterion) {
    let analyzer = TransformAnalyzer::default();
    let mut group = c.benchmark_group("scan_config");
    for flows in [10, 100, 1000] {
        let doc = config_document(flows);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(flows), &doc, |b, doc| {
            b.iter(|| scan_config(black_box(doc.as_bytes()), "bench.xml", &analyzer));
        });
    }
    group.finish();
}

fn benchmark_dataweave(c: &mut Criterion) {
    let mut group = c.benchmark_group("dataweave_measure");
    for lines in [50, 500] {
        let script = dataweave_script(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &script, |b, script| {
            b.iter(|| measure(black_box(script)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_scan_config, benchmark_dataweave);
criterion_main!(benches);
