//! Streaming extraction of structural facts from one configuration file.
//!
//! The file is read event by event with a namespace-resolving reader, so
//! memory use does not grow with file size. Only a stack of open element
//! labels and the text of the inline block currently being measured are
//! held at any time.

use super::namespaces::NamespaceLabel;
use crate::custom_code::{embedded_finding, embedded_signature, EmbeddedForm, EmbeddedSignature, ENGINE_ATTRIBUTE};
use crate::error::{AssessError, ParseErrorKind};
use crate::model::{CustomCodeFinding, Flow, FlowKind, SourceLocation, TransformScript};
use crate::transform::{is_inline_transform, TransformAnalyzer};
use quick_xml::events::{BytesStart, Event};
use quick_xml::NsReader;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Prefix marking an inline expression in an attribute value
const EXPRESSION_PREFIX: &str = "#[";

/// Facts extracted from one configuration file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFacts {
    /// Qualified name of the document element
    pub root_element: Option<String>,
    pub flows: Vec<Flow>,
    /// Connector type to operation count
    pub connectors: BTreeMap<String, usize>,
    pub tag_usage: BTreeMap<String, usize>,
    /// Elements below the document element
    pub components: usize,
    pub async_scopes: usize,
    pub error_handlers: usize,
    pub inline_expressions: usize,
    pub transforms: Vec<TransformScript>,
    pub custom_code: Vec<CustomCodeFinding>,
}

impl ConfigFacts {
    #[must_use]
    pub fn flow_count(&self) -> usize {
        self.flows.iter().filter(|f| f.kind == FlowKind::Flow).count()
    }

    #[must_use]
    pub fn sub_flow_count(&self) -> usize {
        self.flows.iter().filter(|f| f.kind == FlowKind::SubFlow).count()
    }
}

/// Attributes the scanner cares about
#[derive(Debug, Default)]
struct ElementAttrs {
    name: Option<String>,
    engine: Option<String>,
    has_class: bool,
    expressions: usize,
}

impl ElementAttrs {
    fn read(element: &BytesStart<'_>) -> Self {
        let mut attrs = Self::default();
        for attr in element.attributes().filter_map(std::result::Result::ok) {
            let value = decode(&attr.value);
            if value.trim_start().starts_with(EXPRESSION_PREFIX) {
                attrs.expressions += 1;
            }
            match attr.key.local_name().as_ref() {
                b"name" => attrs.name = Some(value),
                b"class" => attrs.has_class = true,
                key if key == ENGINE_ATTRIBUTE.as_bytes() => attrs.engine = Some(value),
                _ => {}
            }
        }
        attrs
    }
}

/// Decode raw markup bytes, resolving entity references where possible
fn decode(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    quick_xml::escape::unescape(&text).map_or_else(|_| text.to_string(), std::borrow::Cow::into_owned)
}

struct OpenFlow {
    flow: Flow,
    depth: usize,
}

enum CaptureTarget {
    Transform,
    Script {
        signature: &'static EmbeddedSignature,
        engine: Option<String>,
    },
}

/// Text collection for the inline block being measured
struct Capture {
    target: CaptureTarget,
    depth: usize,
    location: SourceLocation,
    text: String,
}

/// Event-driven state machine over one document
struct ConfigWalker<'a> {
    relative: &'a str,
    analyzer: &'a TransformAnalyzer,
    facts: ConfigFacts,
    /// Namespace labels of the open elements
    stack: Vec<String>,
    flow: Option<OpenFlow>,
    capture: Option<Capture>,
}

impl<'a> ConfigWalker<'a> {
    fn new(relative: &'a str, analyzer: &'a TransformAnalyzer) -> Self {
        Self {
            relative,
            analyzer,
            facts: ConfigFacts::default(),
            stack: Vec::new(),
            flow: None,
            capture: None,
        }
    }

    /// Element trail used in source locations
    fn context(&self, tag: &str) -> String {
        match &self.flow {
            Some(open) => {
                let kind = match open.flow.kind {
                    FlowKind::Flow => "flow",
                    FlowKind::SubFlow => "sub-flow",
                };
                format!("{kind}[{}]/{tag}", open.flow.name)
            }
            None => tag.to_string(),
        }
    }

    fn open(&mut self, ns: NamespaceLabel, local: &str, attrs: ElementAttrs, is_empty: bool) {
        let tag = ns.qualify(local);
        *self.facts.tag_usage.entry(tag.clone()).or_insert(0) += 1;
        self.facts.inline_expressions += attrs.expressions;

        let depth = self.stack.len();
        if depth == 0 && self.facts.root_element.is_none() {
            self.facts.root_element = Some(tag);
            if !is_empty {
                self.stack.push(ns.label);
            }
            return;
        }
        self.facts.components += 1;

        let is_error_handler =
            (ns.is_core() && local == "error-handler") || local.ends_with("exception-strategy");
        if is_error_handler {
            self.facts.error_handlers += 1;
        }
        if ns.is_core() && local == "async" {
            self.facts.async_scopes += 1;
        }

        let flow_kind = match local {
            "flow" if ns.is_core() => Some(FlowKind::Flow),
            "sub-flow" if ns.is_core() => Some(FlowKind::SubFlow),
            _ => None,
        };

        match (flow_kind, self.flow.as_mut()) {
            (Some(kind), None) => {
                let flow = Flow {
                    name: attrs.name.clone().unwrap_or_else(|| "(unnamed)".to_string()),
                    kind,
                    file: self.relative.to_string(),
                    component_count: 0,
                    flow_refs: Vec::new(),
                    has_error_handler: false,
                };
                if is_empty {
                    self.facts.flows.push(flow);
                } else {
                    self.flow = Some(OpenFlow { flow, depth });
                }
            }
            (_, Some(open)) => {
                open.flow.component_count += 1;
                if is_error_handler {
                    open.flow.has_error_handler = true;
                }
                if ns.is_core() && local == "flow-ref" {
                    if let Some(name) = &attrs.name {
                        open.flow.flow_refs.push(name.clone());
                    }
                }
                if let Some(connector) = ns.connector_type() {
                    let nested_in_same = self.stack.last().is_some_and(|parent| *parent == ns.label);
                    if !nested_in_same {
                        *self.facts.connectors.entry(connector).or_insert(0) += 1;
                    }
                }
            }
            (None, None) => {}
        }

        self.open_capture(&ns, local, &tag, attrs, is_empty, depth);

        if !is_empty {
            self.stack.push(ns.label);
        }
    }

    fn open_capture(
        &mut self,
        ns: &NamespaceLabel,
        local: &str,
        tag: &str,
        attrs: ElementAttrs,
        is_empty: bool,
        depth: usize,
    ) {
        if let Some(capture) = self.capture.as_mut() {
            // Mule 3 names the engine on a nested `scripting:script`
            if let CaptureTarget::Script { engine, .. } = &mut capture.target {
                if engine.is_none() {
                    *engine = attrs.engine;
                }
            }
            return;
        }

        let location = SourceLocation::element(self.relative, self.context(tag));
        if is_inline_transform(&ns.label, local) {
            if !is_empty {
                self.capture = Some(Capture {
                    target: CaptureTarget::Transform,
                    depth,
                    location,
                    text: String::new(),
                });
            }
        } else if let Some(signature) = embedded_signature(&ns.label, local, attrs.has_class) {
            if signature.form == EmbeddedForm::Text && !is_empty {
                self.capture = Some(Capture {
                    target: CaptureTarget::Script {
                        signature,
                        engine: attrs.engine,
                    },
                    depth,
                    location,
                    text: String::new(),
                });
            } else {
                self.facts.custom_code.push(embedded_finding(
                    signature,
                    attrs.engine.as_deref(),
                    location,
                    "",
                ));
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            capture.text.push_str(text);
        }
    }

    fn close(&mut self) {
        self.stack.pop();
        let depth = self.stack.len();

        if self.capture.as_ref().is_some_and(|c| c.depth == depth) {
            if let Some(capture) = self.capture.take() {
                self.finish_capture(capture);
            }
        }

        if self.flow.as_ref().is_some_and(|f| f.depth == depth) {
            if let Some(open) = self.flow.take() {
                self.facts.flows.push(open.flow);
            }
        }
    }

    fn finish_capture(&mut self, capture: Capture) {
        match capture.target {
            CaptureTarget::Transform => {
                if let Some(script) = self.analyzer.analyze_inline(&capture.text, capture.location) {
                    self.facts.transforms.push(script);
                }
            }
            CaptureTarget::Script { signature, engine } => {
                self.facts.custom_code.push(embedded_finding(
                    signature,
                    engine.as_deref(),
                    capture.location,
                    &capture.text,
                ));
            }
        }
    }

    fn finish(self) -> Result<ConfigFacts, AssessError> {
        if !self.stack.is_empty() {
            return Err(AssessError::parse(
                self.relative,
                ParseErrorKind::UnexpectedEof {
                    open: self.stack.len(),
                },
            ));
        }
        if self.facts.root_element.is_none() {
            return Err(AssessError::parse(self.relative, ParseErrorKind::NoRootElement));
        }
        Ok(self.facts)
    }
}

/// Scan one configuration document.
///
/// `relative` is the file's path relative to the project root; it names the
/// file in flows, locations and errors. Inline transformation blocks are
/// rated with `analyzer` as soon as they close and their text is dropped.
pub fn scan_config<R: BufRead>(
    source: R,
    relative: &str,
    analyzer: &TransformAnalyzer,
) -> Result<ConfigFacts, AssessError> {
    let mut reader = NsReader::from_reader(source);
    let mut walker = ConfigWalker::new(relative, analyzer);
    let mut buf = Vec::new();

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((resolved, Event::Start(ref e))) => {
                let ns = NamespaceLabel::from_resolved(&resolved);
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                walker.open(ns, &local, ElementAttrs::read(e), false);
            }
            Ok((resolved, Event::Empty(ref e))) => {
                let ns = NamespaceLabel::from_resolved(&resolved);
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                walker.open(ns, &local, ElementAttrs::read(e), true);
            }
            Ok((_, Event::Text(ref e))) => {
                if walker.capture.is_some() {
                    walker.text(&decode(e));
                }
            }
            Ok((_, Event::CData(ref e))) => {
                if walker.capture.is_some() {
                    walker.text(&String::from_utf8_lossy(e));
                }
            }
            Ok((_, Event::End(_))) => walker.close(),
            Ok((_, Event::Eof)) => break,
            Err(e) => {
                return Err(AssessError::invalid_xml(
                    relative,
                    format!("error at position {}: {e}", reader.buffer_position()),
                ))
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    walker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomCodeKind, TransformTier};

    const MULE4_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mule xmlns="http://www.mulesoft.org/schema/mule/core"
      xmlns:http="http://www.mulesoft.org/schema/mule/http"
      xmlns:ee="http://www.mulesoft.org/schema/mule/ee/core"
      xmlns:scripting="http://www.mulesoft.org/schema/mule/scripting"
      xmlns:java="http://www.mulesoft.org/schema/mule/java">"#;

    fn scan(body: &str) -> Result<ConfigFacts, AssessError> {
        let doc = format!("{MULE4_HEADER}\n{body}\n</mule>\n");
        scan_config(doc.as_bytes(), "src/main/mule/app.xml", &TransformAnalyzer::default())
    }

    #[test]
    fn test_flows_and_error_handlers() {
        let facts = scan(
            r##"
  <http:listener-config name="cfg"/>
  <flow name="orders">
    <http:listener config-ref="cfg" path="/orders"/>
    <flow-ref name="enrich"/>
    <error-handler>
      <on-error-propagate type="ANY"/>
    </error-handler>
  </flow>
  <sub-flow name="enrich">
    <logger message="#[payload]"/>
  </sub-flow>
  <flow name="unguarded"/>
"##,
        )
        .unwrap();

        assert_eq!(facts.root_element.as_deref(), Some("mule"));
        assert_eq!(facts.flows.len(), 3);
        assert_eq!(facts.flow_count(), 2);
        assert_eq!(facts.sub_flow_count(), 1);

        let orders = facts.flows.iter().find(|f| f.name == "orders").unwrap();
        assert!(orders.has_error_handler);
        assert_eq!(orders.flow_refs, vec!["enrich"]);
        // listener, flow-ref, error-handler, on-error-propagate
        assert_eq!(orders.component_count, 4);
        assert_eq!(orders.file, "src/main/mule/app.xml");

        let unguarded = facts.flows.iter().find(|f| f.name == "unguarded").unwrap();
        assert!(!unguarded.has_error_handler);

        assert_eq!(facts.error_handlers, 1);
        assert_eq!(facts.inline_expressions, 1);
        assert_eq!(facts.tag_usage.get("http:listener"), Some(&1));
        assert_eq!(facts.tag_usage.get("flow"), Some(&2));
    }

    #[test]
    fn test_connector_operations_inside_flows_only() {
        let facts = scan(
            r#"
  <http:request-config name="api">
    <http:request-connection host="example.com"/>
  </http:request-config>
  <flow name="calls">
    <http:request config-ref="api" path="/a">
      <http:headers>#[{}]</http:headers>
    </http:request>
    <http:request config-ref="api" path="/b"/>
  </flow>
"#,
        )
        .unwrap();

        assert_eq!(facts.connectors.len(), 1);
        assert_eq!(facts.connectors.get("http"), Some(&2));
        // request-config, request-connection, flow, 2x request, headers
        assert_eq!(facts.components, 6);
    }

    #[test]
    fn test_inline_transform_rated_and_located() {
        let facts = scan(
            r#"
  <flow name="map-orders">
    <ee:transform>
      <ee:message>
        <ee:set-payload><![CDATA[%dw 2.0
output application/json
---
payload map (o) -> { id: o.id }]]></ee:set-payload>
      </ee:message>
    </ee:transform>
  </flow>
"#,
        )
        .unwrap();

        assert_eq!(facts.transforms.len(), 1);
        let script = &facts.transforms[0];
        assert_eq!(script.lines, 4);
        assert_eq!(script.tier, TransformTier::Low);
        assert_eq!(
            script.location.context.as_deref(),
            Some("flow[map-orders]/ee:set-payload")
        );
        assert!(facts.connectors.is_empty());
    }

    #[test]
    fn test_embedded_custom_code() {
        let facts = scan(
            r#"
  <flow name="scripted">
    <scripting:execute engine="groovy">
      <scripting:code>
        def x = 1
        return x + payload.size()
      </scripting:code>
    </scripting:execute>
    <java:invoke-static class="com.acme.Util" method="run()"/>
  </flow>
"#,
        )
        .unwrap();

        assert_eq!(facts.custom_code.len(), 2);
        let script = facts
            .custom_code
            .iter()
            .find(|c| c.kind == CustomCodeKind::EmbeddedScript)
            .unwrap();
        assert_eq!(script.language, "groovy");
        assert_eq!(script.lines, 2);

        let binding = facts
            .custom_code
            .iter()
            .find(|c| c.kind == CustomCodeKind::ForeignLanguage)
            .unwrap();
        assert_eq!(binding.language, "java");
        assert!(facts.connectors.is_empty());
    }

    #[test]
    fn test_mule3_constructs() {
        let doc = r#"<mule xmlns="http://www.mulesoft.org/schema/mule/core"
      xmlns:scripting="http://www.mulesoft.org/schema/mule/scripting"
      xmlns:dw="http://www.mulesoft.org/schema/mule/ee/dw">
  <flow name="legacy">
    <scripting:component>
      <scripting:script engine="Groovy">return payload</scripting:script>
    </scripting:component>
    <expression-component>payload.x = 1;</expression-component>
    <dw:transform-message>
      <dw:set-payload><![CDATA[%dw 1.0
%output application/json
---
payload]]></dw:set-payload>
    </dw:transform-message>
    <catch-exception-strategy/>
  </flow>
</mule>"#;
        let facts = scan_config(doc.as_bytes(), "legacy.xml", &TransformAnalyzer::default()).unwrap();

        let languages: Vec<_> = facts.custom_code.iter().map(|c| c.language.as_str()).collect();
        assert_eq!(languages, vec!["groovy", "mel"]);
        assert_eq!(facts.transforms.len(), 1);
        assert!(facts.flows[0].has_error_handler);
        assert_eq!(facts.tag_usage.get("dw:set-payload"), Some(&1));
    }

    #[test]
    fn test_undeclared_prefix_keeps_literal() {
        let doc = r#"<mule><flow name="f"><acme:thing/></flow></mule>"#;
        let facts = scan_config(doc.as_bytes(), "a.xml", &TransformAnalyzer::default()).unwrap();
        assert_eq!(facts.tag_usage.get("acme:thing"), Some(&1));
        assert!(facts.connectors.is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        let mismatched = scan("<flow name=\"x\"></sub-flow>");
        assert!(matches!(mismatched, Err(AssessError::Parse { .. })));

        let truncated = scan_config(
            "<mule><flow name=\"x\">".as_bytes(),
            "a.xml",
            &TransformAnalyzer::default(),
        );
        assert!(matches!(truncated, Err(AssessError::Parse { .. })));

        let empty = scan_config("".as_bytes(), "a.xml", &TransformAnalyzer::default());
        assert!(matches!(
            empty,
            Err(AssessError::Parse {
                source: ParseErrorKind::NoRootElement,
                ..
            })
        ));
    }
}
