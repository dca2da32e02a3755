// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Rc;

use core::fmt;
use std::io;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    #[default]
    Gauge,
    Counter,
    Info,
    Stateset,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetricType::Gauge => "gauge",
            MetricType::Counter => "counter",
            MetricType::Info => "info",
            MetricType::Stateset => "stateset",
        })
    }
}

/// One sample: ordered label pairs and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub metric_type: MetricType,
    pub series: Vec<Series>,
}

/// Metric families accumulated by a collector.
///
/// A cheap handle: clones refer to the same families, so a collector can keep
/// recording into a store it has already handed out.
#[derive(Debug, Clone, Default)]
pub struct MetricsStore {
    families: Rc<RwLock<Vec<MetricFamily>>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<MetricFamily>> {
        self.families
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Vec<MetricFamily>> {
        self.families
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Declare a family. Declaring an existing name again updates its help and type.
    pub fn add_family(&self, name: &str, help: &str, metric_type: MetricType) {
        let mut families = self.write_lock();
        match families.iter_mut().find(|f| f.name == name) {
            Some(family) => {
                family.help = help.to_string();
                family.metric_type = metric_type;
            }
            None => families.push(MetricFamily {
                name: name.to_string(),
                help: help.to_string(),
                metric_type,
                series: vec![],
            }),
        }
    }

    /// Record a series. Returns false if the family was never declared.
    pub fn add_series(&self, family: &str, labels: Vec<(String, String)>, value: f64) -> bool {
        let mut families = self.write_lock();
        match families.iter_mut().find(|f| f.name == family) {
            Some(f) => {
                f.series.push(Series { labels, value });
                true
            }
            None => false,
        }
    }

    /// Drop all series, keeping the declared families.
    pub fn clear_series(&self) {
        for family in self.write_lock().iter_mut() {
            family.series.clear();
        }
    }

    pub fn families(&self) -> Vec<MetricFamily> {
        self.read().clone()
    }

    pub fn series_count(&self) -> usize {
        self.read().iter().map(|f| f.series.len()).sum()
    }

    /// Write every family in Prometheus text exposition format.
    pub fn write(&self, w: &mut impl io::Write) -> io::Result<()> {
        for family in self.read().iter() {
            writeln!(w, "# HELP {} {}", family.name, escape_help(&family.help))?;
            writeln!(w, "# TYPE {} {}", family.name, family.metric_type)?;
            for series in &family.series {
                write!(w, "{}", family.name)?;
                if !series.labels.is_empty() {
                    let labels: Vec<String> = series
                        .labels
                        .iter()
                        .map(|(k, v)| format!("{k}=\"{}\"", escape_label_value(v)))
                        .collect();
                    write!(w, "{{{}}}", labels.join(","))?;
                }
                writeln!(w, " {}", format_value(series.value))?;
            }
        }
        Ok(())
    }
}

fn escape_help(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        v.to_string()
    }
}
