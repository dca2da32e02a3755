// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use labelexpr::collectors::*;
use labelexpr::*;

const CONFIG: &str = "tests/collectors/data/collectors.yaml";

fn deployment() -> Result<Value> {
    Value::from_yaml_str(
        "
metadata:
  name: web
  namespace: shop
  labels:
    tier: frontend
spec:
  replicas: 3
status:
  readyReplicas: 1
",
    )
}

fn provider() -> Result<Value> {
    Value::from_json_str(
        r#"{"metadata": {"name": "provider-helm"},
            "status": {"conditions": [{"type": "Healthy", "status": "True"}]}}"#,
    )
}

#[test]
fn config_round_trip() -> Result<()> {
    let config = CollectorsConfig::from_yaml_file(CONFIG)?;
    assert_eq!(config.collectors.len(), 2);
    let metric = &config.collectors[0].metrics[0];
    assert_eq!(metric.metric_type, MetricType::Info);
    assert_eq!(metric.value, None);
    assert_eq!(config.collectors[1].metrics[0].metric_type, MetricType::Gauge);

    let json = serde_json::to_string(&config)?;
    assert_eq!(CollectorsConfig::from_json_str(&json)?, config);

    assert!(CollectorsConfig::from_yaml_str("collectors: [{name: x, bogus: 1}]").is_err());
    Ok(())
}

#[test]
fn collect_and_write() -> Result<()> {
    let config = CollectorsConfig::from_yaml_file(CONFIG)?;
    let resolver = Resolver::new();
    let (mut collectors, query_collectors) = Collectors::from_config(&config, &resolver);
    collectors.set_enabled("deployments");
    collectors.build();

    let (deployments, providers) = (&query_collectors[0], &query_collectors[1]);
    assert!(deployments.is_registered());
    assert!(!providers.is_registered());

    assert_eq!(deployments.observe(&deployment()?), 2);
    assert_eq!(providers.observe(&provider()?), 0);

    let mut out = vec![];
    collectors.write(&mut out)?;
    let text = String::from_utf8(out)?;
    assert_eq!(
        text,
        "# HELP kube_deployment_labels Labels of the deployment.\n\
         # TYPE kube_deployment_labels info\n\
         kube_deployment_labels{deployment=\"web\",namespace=\"shop\",tier=\"frontend\"} 1\n\
         # HELP kube_deployment_replicas_unavailable Replicas requested but not ready.\n\
         # TYPE kube_deployment_replicas_unavailable gauge\n\
         kube_deployment_replicas_unavailable{deployment=\"web\"} 2\n"
    );
    Ok(())
}

#[test]
fn all_collectors_enabled_by_default() -> Result<()> {
    let config = CollectorsConfig::from_yaml_file(CONFIG)?;
    let (mut collectors, query_collectors) = Collectors::from_config(&config, &Resolver::new());
    collectors.set_enabled("");
    collectors.build();

    assert!(query_collectors.iter().all(|c| c.is_registered()));
    assert_eq!(query_collectors[1].observe(&provider()?), 1);

    // Failed label queries keep their query text; a failed value query drops the series.
    let bare = Value::from_json_str(r#"{"metadata": {"labels": {}}}"#)?;
    assert_eq!(query_collectors[0].observe(&bare), 1);

    let mut out = vec![];
    collectors.write(&mut out)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("provider_healthy{provider=\"provider-helm\"} 1\n"), "{text}");
    assert!(
        text.contains("kube_deployment_labels{deployment=\"o.metadata.name\",namespace=\"o.metadata.namespace\",tier=\"unknown\"} 1\n"),
        "{text}"
    );
    Ok(())
}
