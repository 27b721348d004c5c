//! Connector complexity weights.

use crate::config::ScoringConfig;
use crate::model::ConnectorUsage;
use std::collections::BTreeMap;

/// Built-in weight per connector type.
///
/// Weights reflect how much migration effort one operation of the type
/// typically carries. Types absent from this table and from the configured
/// overrides fall back to `ScoringConfig::default_connector_weight`.
pub const CONNECTOR_WEIGHTS: &[(&str, u32)] = &[
    ("http", 1),
    ("db", 2),
    ("file", 1),
    ("ftp", 2),
    ("sftp", 2),
    ("jms", 3),
    ("vm", 1),
    ("sap", 5),
    ("salesforce", 4),
    ("servicenow", 4),
    ("aws-s3", 3),
    ("aws-sqs", 3),
    ("email", 2),
    ("compression", 1),
    ("crypto", 2),
    ("validation", 1),
    ("json", 1),
    ("xml", 2),
    ("apikit", 2),
    ("oauth", 3),
    ("spring", 2),
    ("web-service", 3),
    ("anypoint-mq", 3),
    ("object-store", 1),
];

/// Resolved weight table for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorWeights {
    table: BTreeMap<String, u32>,
    default_weight: u32,
}

impl ConnectorWeights {
    /// Built-in table with the configured overrides applied
    #[must_use]
    pub fn from_config(config: &ScoringConfig) -> Self {
        let mut table: BTreeMap<String, u32> = CONNECTOR_WEIGHTS
            .iter()
            .map(|(name, weight)| ((*name).to_string(), *weight))
            .collect();
        table.extend(config.connector_weights.iter().map(|(k, v)| (k.clone(), *v)));
        Self {
            table,
            default_weight: config.default_connector_weight,
        }
    }

    #[must_use]
    pub fn weight(&self, connector: &str) -> u32 {
        self.table.get(connector).copied().unwrap_or(self.default_weight)
    }

    /// Usage records for a connector histogram, in connector name order
    #[must_use]
    pub fn usages(&self, connectors: &BTreeMap<String, usize>) -> Vec<ConnectorUsage> {
        connectors
            .iter()
            .map(|(connector, count)| ConnectorUsage {
                connector: connector.clone(),
                count: *count,
                weight: self.weight(connector),
            })
            .collect()
    }
}

impl Default for ConnectorWeights {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_and_default_weights() {
        let weights = ConnectorWeights::default();
        assert_eq!(weights.weight("http"), 1);
        assert_eq!(weights.weight("sap"), 5);
        assert_eq!(weights.weight("kafka"), 2);
    }

    #[test]
    fn test_overrides() {
        let mut config = ScoringConfig::default();
        config.connector_weights.insert("http".to_string(), 3);
        config.connector_weights.insert("kafka".to_string(), 4);
        config.default_connector_weight = 1;

        let weights = ConnectorWeights::from_config(&config);
        assert_eq!(weights.weight("http"), 3);
        assert_eq!(weights.weight("kafka"), 4);
        assert_eq!(weights.weight("mongo"), 1);
        assert_eq!(weights.weight("db"), 2);
    }

    #[test]
    fn test_usages() {
        let connectors: BTreeMap<String, usize> =
            [("salesforce".to_string(), 3), ("db".to_string(), 2)].into();
        let usages = ConnectorWeights::default().usages(&connectors);
        assert_eq!(usages.len(), 2);
        assert_eq!(usages[0].connector, "db");
        assert_eq!(usages[0].weighted(), 4);
        assert_eq!(usages[1].weighted(), 12);
    }
}
