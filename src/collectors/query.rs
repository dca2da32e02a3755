// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::store::{MetricType, MetricsStore};
use super::{Collector, CollectorConfig};
use crate::resolver::Resolver;
use crate::value::Value;

use core::sync::atomic::{AtomicBool, Ordering};
use std::collections::BTreeMap;

use anyhow::Result;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

/// One metric family produced from label and value queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricConfig {
    pub name: String,

    #[serde(default)]
    pub help: String,

    #[serde(default, rename = "type")]
    pub metric_type: MetricType,

    /// Label name to query. Labels are emitted in name order.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Query for the sample value. Without one every object yields `1`.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryCollectorConfig {
    pub name: String,

    #[serde(default)]
    pub metrics: Vec<MetricConfig>,
}

/// Top level collectors document.
///
/// ```yaml
/// collectors:
///   - name: deployments
///     metrics:
///       - name: kube_deployment_replicas
///         help: Replicas requested.
///         labels:
///           namespace: o.metadata.namespace
///         value: o.spec.replicas
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorsConfig {
    #[serde(default)]
    pub collectors: Vec<QueryCollectorConfig>,
}

impl CollectorsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(c) => Self::from_yaml_str(c.as_str()),
            Err(e) => anyhow::bail!("Failed to read {path}. {e}"),
        }
    }
}

/// Collector whose series come from resolving configured queries against
/// each observed object.
pub struct QueryCollector {
    config: QueryCollectorConfig,
    resolver: Resolver,
    store: MetricsStore,
    registered: AtomicBool,
}

impl QueryCollector {
    pub fn new(config: QueryCollectorConfig, resolver: Resolver) -> Self {
        Self {
            config,
            resolver,
            store: MetricsStore::new(),
            registered: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &QueryCollectorConfig {
        &self.config
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Record one series per configured metric for `object`.
    ///
    /// Objects are ignored until the collector has been registered.
    /// Returns the number of series recorded.
    pub fn observe(&self, object: &Value) -> usize {
        if !self.is_registered() {
            trace!("collector {} is not registered; ignoring object", self.config.name);
            return 0;
        }

        let mut recorded = 0;
        for metric in &self.config.metrics {
            let queries = metric.labels.values().chain(metric.value.iter());
            let results = self.resolver.resolve_all(queries, object);

            let value = match &metric.value {
                None => 1.0,
                Some(query) => match results.get(query).map(|s| s.parse::<f64>()) {
                    Some(Ok(v)) => v,
                    _ => {
                        debug!(
                            "{}: value query `{query}` did not yield a number; skipping series",
                            metric.name
                        );
                        continue;
                    }
                },
            };

            let labels = metric
                .labels
                .iter()
                .map(|(name, query)| {
                    let v = results.get(query).cloned().unwrap_or_else(|| query.clone());
                    (name.clone(), v)
                })
                .collect();
            if self.store.add_series(&metric.name, labels, value) {
                recorded += 1;
            }
        }
        recorded
    }
}

impl Collector for QueryCollector {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn register(&self) {
        self.registered.store(true, Ordering::Release);
        info!("registered collector {}", self.config.name);
    }

    fn build_collector(&self, config: &CollectorConfig) -> MetricsStore {
        if let Some(kubeconfig) = &config.kubeconfig {
            debug!("collector {} built with kubeconfig {kubeconfig}", self.config.name);
        }
        for metric in &self.config.metrics {
            self.store
                .add_family(&metric.name, &metric.help, metric.metric_type);
        }
        self.store.clone()
    }
}
