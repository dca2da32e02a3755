// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Registry of named collectors that turn resolved queries into metrics.

mod query;
mod store;

pub use query::{CollectorsConfig, MetricConfig, QueryCollector, QueryCollectorConfig};
pub use store::{MetricFamily, MetricType, MetricsStore, Series};

use crate::resolver::Resolver;
use crate::Rc;

use std::collections::BTreeSet;
use std::io;

use log::info;

/// Settings handed to every collector when its store is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectorConfig {
    pub kubeconfig: Option<String>,
}

pub trait Collector: Send + Sync {
    fn name(&self) -> &str;

    /// Start collecting.
    fn register(&self);

    fn build_collector(&self, config: &CollectorConfig) -> MetricsStore;
}

/// Driver over all known collectors.
///
/// An empty enable-list enables every collector.
#[derive(Default)]
pub struct Collectors {
    config: CollectorConfig,
    collectors: Vec<Rc<dyn Collector>>,
    built: Vec<MetricsStore>,
    enabled: BTreeSet<String>,
}

impl Collectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collectors for every entry of `config`, sharing one resolver.
    pub fn from_config(
        config: &CollectorsConfig,
        resolver: &Resolver,
    ) -> (Self, Vec<Rc<QueryCollector>>) {
        let mut collectors = Self::new();
        let query_collectors = collectors.register_config(config, resolver);
        (collectors, query_collectors)
    }

    /// Register a [`QueryCollector`] for every entry of `config`.
    pub fn register_config(
        &mut self,
        config: &CollectorsConfig,
        resolver: &Resolver,
    ) -> Vec<Rc<QueryCollector>> {
        let mut query_collectors = vec![];
        for c in &config.collectors {
            let qc = Rc::new(QueryCollector::new(c.clone(), resolver.clone()));
            self.register(qc.clone());
            query_collectors.push(qc);
        }
        query_collectors
    }

    pub fn set_kubeconfig(&mut self, kubeconfig: impl Into<String>) -> &mut Self {
        self.config.kubeconfig = Some(kubeconfig.into());
        self
    }

    /// Replace the enable-list with the comma separated names in `list`.
    pub fn set_enabled(&mut self, list: &str) -> &mut Self {
        self.enabled = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Add a collector and build its store with the current configuration.
    pub fn register(&mut self, collector: Rc<dyn Collector>) {
        self.built.push(collector.build_collector(&self.config));
        self.collectors.push(collector);
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.is_empty() || self.enabled.contains(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Register every enabled collector.
    pub fn build(&self) {
        for collector in &self.collectors {
            if self.is_enabled(collector.name()) {
                collector.register();
            } else {
                info!("collector {} is not enabled", collector.name());
            }
        }
    }

    /// Write the metrics of enabled collectors in registration order.
    pub fn write(&self, w: &mut impl io::Write) -> io::Result<()> {
        for (collector, store) in self.collectors.iter().zip(&self.built) {
            if self.is_enabled(collector.name()) {
                store.write(w)?;
            }
        }
        Ok(())
    }
}
