//! MUnit suite scanning.

use super::namespaces::NamespaceLabel;
use crate::error::AssessError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::NsReader;
use std::collections::BTreeSet;
use std::io::BufRead;

/// Directory holding MUnit suites, relative to the project root
pub const MUNIT_DIR: &str = "src/test/munit";

/// Directory holding all test sources, relative to the project root
pub const TEST_DIR: &str = "src/test";

/// Extensions of non-MUnit test sources
pub const OTHER_TEST_EXTENSIONS: &[&str] = &["java", "groovy", "py"];

/// Test cases and the flows they reach in one suite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MunitFacts {
    pub tests: usize,
    pub referenced_flows: BTreeSet<String>,
}

impl MunitFacts {
    pub fn merge(&mut self, other: Self) {
        self.tests += other.tests;
        self.referenced_flows.extend(other.referenced_flows);
    }
}

fn attribute(element: &BytesStart<'_>, wanted: &[u8]) -> Option<String> {
    element
        .attributes()
        .filter_map(std::result::Result::ok)
        .find(|a| a.key.local_name().as_ref() == wanted)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Scan one MUnit suite.
///
/// Flows count as referenced when a test calls them through `flow-ref` or
/// enables them as a flow source.
pub fn scan_munit<R: BufRead>(source: R, context: &str) -> Result<MunitFacts, AssessError> {
    let mut reader = NsReader::from_reader(source);
    let mut facts = MunitFacts::default();
    let mut depth = 0usize;
    let mut test_depth: Option<usize> = None;
    let mut buf = Vec::new();

    loop {
        let (resolved, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(pair) => pair,
            Err(e) => {
                return Err(AssessError::invalid_xml(
                    context,
                    format!("error at position {}: {e}", reader.buffer_position()),
                ))
            }
        };

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let ns = NamespaceLabel::from_resolved(&resolved);
                let local = e.local_name();
                let is_start = matches!(event, Event::Start(_));

                if ns.label == "munit" && local.as_ref() == b"test" {
                    facts.tests += 1;
                    if is_start && test_depth.is_none() {
                        test_depth = Some(depth);
                    }
                } else if test_depth.is_some() {
                    let target = match (ns.is_core(), local.as_ref()) {
                        (true, b"flow-ref") => attribute(e, b"name"),
                        (false, b"enable-flow-source") if ns.label == "munit" => {
                            attribute(e, b"value")
                        }
                        _ => None,
                    };
                    if let Some(flow) = target {
                        facts.referenced_flows.insert(flow);
                    }
                }

                if is_start {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if test_depth == Some(depth) {
                    test_depth = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(facts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_munit_suite() {
        let suite = r##"<?xml version="1.0" encoding="UTF-8"?>
<mule xmlns="http://www.mulesoft.org/schema/mule/core"
      xmlns:munit="http://www.mulesoft.org/schema/mule/munit"
      xmlns:munit-tools="http://www.mulesoft.org/schema/mule/munit-tools">
  <munit:config name="orders-suite.xml"/>
  <munit:test name="creates-order">
    <munit:enable-flow-sources>
      <munit:enable-flow-source value="orders-listener"/>
    </munit:enable-flow-sources>
    <munit:execution>
      <flow-ref name="create-order"/>
    </munit:execution>
    <munit:validation>
      <munit-tools:assert-that expression="#[payload]"/>
    </munit:validation>
  </munit:test>
  <munit:test name="rejects-order">
    <munit:execution>
      <flow-ref name="create-order"/>
    </munit:execution>
  </munit:test>
  <flow-ref name="outside-any-test"/>
</mule>"##;

        let facts = scan_munit(suite.as_bytes(), "suite.xml").unwrap();
        assert_eq!(facts.tests, 2);
        let flows: Vec<_> = facts.referenced_flows.iter().map(String::as_str).collect();
        assert_eq!(flows, vec!["create-order", "orders-listener"]);
    }

    #[test]
    fn test_malformed_suite() {
        let result = scan_munit("<mule><munit:test></mule>".as_bytes(), "bad.xml");
        assert!(result.is_err());
    }
}
