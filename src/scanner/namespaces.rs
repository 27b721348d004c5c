//! Namespace labels and the namespace to connector-type table.

use quick_xml::name::ResolveResult;

/// Path segment that introduces a Mule module name in a schema URI
const MULE_SCHEMA_MARKER: &str = "mulesoft.org/schema/mule/";

/// Label of the Mule core namespace; core tags are reported bare
pub const CORE_LABEL: &str = "";

/// Mule module labels mapped to the connector type they count as
pub const CONNECTOR_NAMESPACES: &[(&str, &str)] = &[
    ("http", "http"),
    ("db", "db"),
    ("file", "file"),
    ("ftp", "ftp"),
    ("sftp", "sftp"),
    ("jms", "jms"),
    ("vm", "vm"),
    ("sap", "sap"),
    ("salesforce", "salesforce"),
    ("servicenow", "servicenow"),
    ("s3", "aws-s3"),
    ("sqs", "aws-sqs"),
    ("email", "email"),
    ("compression", "compression"),
    ("crypto", "crypto"),
    ("validation", "validation"),
    ("json", "json"),
    ("xml-module", "xml"),
    ("apikit", "apikit"),
    ("oauth", "oauth"),
    ("spring", "spring"),
    ("wsc", "web-service"),
    ("ws", "web-service"),
    ("anypoint-mq", "anypoint-mq"),
    ("os", "object-store"),
    ("objectstore", "object-store"),
];

/// Mule modules that are never connectors.
///
/// `scripting` and `java` are reported as custom code instead.
pub const NON_CONNECTOR_MODULES: &[&str] = &[
    CORE_LABEL,
    "ee",
    "dw",
    "tracking",
    "batch",
    "documentation",
    "doc",
    "tls",
    "munit",
    "munit-tools",
    "mock",
    "scripting",
    "java",
    "secure-properties",
    "secure-property-placeholder",
    "api-gateway",
];

/// A resolved element namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceLabel {
    pub label: String,
    /// The URI is a Mule module schema
    pub mule_module: bool,
}

impl NamespaceLabel {
    fn new(label: impl Into<String>, mule_module: bool) -> Self {
        Self {
            label: label.into(),
            mule_module,
        }
    }

    /// Label for a namespace URI.
    ///
    /// Mule schema URIs yield the module name (`.../mule/http` is `http`,
    /// `.../mule/ee/core` is `ee`, `.../mule/ee/dw` is `dw`). Other URIs
    /// yield their last path segment.
    #[must_use]
    pub fn from_uri(uri: &str) -> Self {
        if let Some(idx) = uri.find(MULE_SCHEMA_MARKER) {
            let module = uri[idx + MULE_SCHEMA_MARKER.len()..].trim_matches('/');
            let label = match module {
                "" | "core" => CORE_LABEL,
                "ee/core" => "ee",
                _ => {
                    let module = module.strip_prefix("ee/").unwrap_or(module);
                    module.split('/').next().unwrap_or(module)
                }
            };
            return Self::new(label, true);
        }

        let label = uri
            .trim_end_matches(['/', '#'])
            .rsplit(['/', ':'])
            .next()
            .unwrap_or(uri);
        Self::new(label, false)
    }

    /// Label for a reader resolution result.
    ///
    /// Elements with no namespace at all count as core; undeclared prefixes
    /// keep the literal prefix.
    #[must_use]
    pub fn from_resolved(resolved: &ResolveResult<'_>) -> Self {
        match resolved {
            ResolveResult::Bound(ns) => Self::from_uri(&String::from_utf8_lossy(ns.as_ref())),
            ResolveResult::Unbound => Self::new(CORE_LABEL, true),
            ResolveResult::Unknown(prefix) => Self::new(String::from_utf8_lossy(prefix), false),
        }
    }

    #[must_use]
    pub fn is_core(&self) -> bool {
        self.label == CORE_LABEL
    }

    /// Qualified tag identity for a local name in this namespace
    #[must_use]
    pub fn qualify(&self, local: &str) -> String {
        if self.is_core() {
            local.to_string()
        } else {
            format!("{}:{local}", self.label)
        }
    }

    /// Connector type for elements in this namespace, if any.
    ///
    /// Only Mule module namespaces hold connectors. Modules missing from both
    /// tables count as connectors named after the module.
    #[must_use]
    pub fn connector_type(&self) -> Option<String> {
        if !self.mule_module {
            return None;
        }
        if let Some((_, connector)) = CONNECTOR_NAMESPACES.iter().find(|(l, _)| *l == self.label) {
            return Some((*connector).to_string());
        }
        if NON_CONNECTOR_MODULES.contains(&self.label.as_str()) {
            return None;
        }
        Some(self.label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mule_uris() {
        let cases = [
            ("http://www.mulesoft.org/schema/mule/core", ""),
            ("http://www.mulesoft.org/schema/mule/http", "http"),
            ("http://www.mulesoft.org/schema/mule/ee/core", "ee"),
            ("http://www.mulesoft.org/schema/mule/ee/dw", "dw"),
            ("http://www.mulesoft.org/schema/mule/ee/tracking", "tracking"),
            ("https://www.mulesoft.org/schema/mule/db/", "db"),
        ];
        for (uri, expected) in cases {
            let ns = NamespaceLabel::from_uri(uri);
            assert_eq!(ns.label, expected, "{uri}");
            assert!(ns.mule_module);
        }
    }

    #[test]
    fn test_foreign_uris() {
        let ns = NamespaceLabel::from_uri("http://www.springframework.org/schema/beans");
        assert_eq!(ns.label, "beans");
        assert!(!ns.mule_module);
        assert_eq!(NamespaceLabel::from_uri("urn:acme:custom").label, "custom");
    }

    #[test]
    fn test_qualify() {
        let core = NamespaceLabel::from_uri("http://www.mulesoft.org/schema/mule/core");
        assert_eq!(core.qualify("flow"), "flow");
        let http = NamespaceLabel::from_uri("http://www.mulesoft.org/schema/mule/http");
        assert_eq!(http.qualify("request"), "http:request");
    }

    #[test]
    fn test_connector_types() {
        let label = |uri: &str| NamespaceLabel::from_uri(uri).connector_type();
        assert_eq!(
            label("http://www.mulesoft.org/schema/mule/http").as_deref(),
            Some("http")
        );
        assert_eq!(
            label("http://www.mulesoft.org/schema/mule/s3").as_deref(),
            Some("aws-s3")
        );
        assert_eq!(
            label("http://www.mulesoft.org/schema/mule/kafka").as_deref(),
            Some("kafka")
        );
        assert_eq!(label("http://www.mulesoft.org/schema/mule/ee/core"), None);
        assert_eq!(label("http://www.mulesoft.org/schema/mule/scripting"), None);
        assert_eq!(label("http://www.mulesoft.org/schema/mule/core"), None);
        assert_eq!(label("http://www.springframework.org/schema/beans"), None);
    }

    #[test]
    fn test_lookalike_namespaces_are_not_connectors() {
        let label = |uri: &str| NamespaceLabel::from_uri(uri).connector_type();
        assert_eq!(label("http://example.com/schema/http"), None);
        assert_eq!(label("urn:acme:sap"), None);

        let unknown = NamespaceLabel::from_resolved(&ResolveResult::Unknown(b"db".to_vec()));
        assert_eq!(unknown.label, "db");
        assert_eq!(unknown.connector_type(), None);
    }
}
